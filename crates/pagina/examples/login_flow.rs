//! Login Flow Demo - Page Objects over a Mock Driver
//!
//! Declares a login page as a plain struct whose accessors build lazy
//! element descriptors, then drives it against the in-memory mock driver.
//!
//! # Running
//!
//! ```bash
//! cargo run --example login_flow -p pagina
//! ```

#![allow(clippy::unwrap_used)]

use pagina::mock::{MockDriver, MockOp};
use pagina::{Locator, Page, PaginaResult, RetryPolicy, Session, UiElement};

struct LoginPage {
    session: Session,
}

impl LoginPage {
    fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
        }
    }

    fn username(&self) -> UiElement {
        self.session
            .element()
            .located_by_xpath("//input[@id='username-inner']")
    }

    fn password(&self) -> UiElement {
        self.session
            .element()
            .located_by_xpath("//input[@id='password-inner']")
    }

    fn login_button(&self) -> UiElement {
        self.session.element().located_by_id("login")
    }

    fn login(&self, username: &str, password: &str) -> PaginaResult<()> {
        self.username().send_keys(username)?;
        self.password().send_keys(password)?;
        self.login_button().click()
    }
}

impl Page for LoginPage {
    fn url(&self) -> &str {
        "https://app.example.com/login"
    }

    fn is_loaded(&self, _session: &Session) -> bool {
        self.login_button().visible()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let driver = MockDriver::new();
    driver.install(
        None,
        &Locator::xpath("//input[@id='username-inner']"),
        &["username-field"],
    );
    driver.install(
        None,
        &Locator::xpath("//input[@id='password-inner']"),
        &["password-field"],
    );
    driver.install(None, &Locator::id("login"), &["login-button"]);

    let session = Session::builder(driver.clone())
        .with_retry_policy(RetryPolicy::new().with_backoff_ms(200))
        .build();
    let page = LoginPage::new(&session);

    println!("=== Pagina Login Flow Demo ===\n");

    page.open(&session).unwrap();
    println!("opened {} (loaded: {})", page.url(), page.is_loaded(&session));

    page.login("admin", "hunter2").unwrap();
    println!("typed username: {}", driver.typed_into("username-field"));
    println!("typed password: {}", driver.typed_into("password-field"));
    println!("events: {:?}", driver.events());

    // a stale first click is retried; the warning below comes from the
    // interaction layer
    driver.inject_stale(MockOp::Click, 1);
    page.login_button().click().unwrap();
    println!("clicks seen by the driver: {}", driver.calls(MockOp::Click));

    println!("\n=== Login Flow Demo Complete ===");
}
