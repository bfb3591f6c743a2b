//! Pagina: page-object abstraction over a browser-automation driver.
//!
//! Pagina (Spanish: "page") lets UI end-to-end tests declare elements as
//! lazy descriptors — locator, optional parent, optional index — and
//! interact with them through a readiness-gated, retry-on-flake layer. The
//! browser itself stays behind an abstract [`Driver`] contract.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      PAGINA Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌───────────┐    ┌─────────────┐    ┌───────────────────────┐  │
//! │   │ Page      │    │ UiElement   │    │ Driver                │  │
//! │   │ objects   │───►│ resolution  │───►│ (WebDriver/CDP/mock)  │  │
//! │   │ (tests)   │    │ + retry     │    │                       │  │
//! │   └───────────┘    └─────────────┘    └───────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pagina::{Locator, Session};
//! use pagina::mock::MockDriver;
//!
//! let driver = MockDriver::new();
//! driver.install(None, &Locator::id("save"), &["save-1"]);
//!
//! let session = Session::new(driver.clone());
//! let save = session.element().located_by_id("save");
//! save.click().unwrap();
//! ```

#![warn(missing_docs)]

mod driver;
mod element;
mod interaction;
mod locator;
mod page;
mod readiness;
mod result;
mod session;

/// In-memory mock driver for testing page objects without a browser
pub mod mock;

pub use driver::{Driver, ElementHandle, ScriptArg};
pub use element::{UiElement, UiElementsList};
pub use interaction::{perform, RetryPolicy, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS};
pub use locator::{Locator, Strategy};
pub use page::Page;
pub use readiness::{
    poll_until, wait_until_dom_is_loaded, wait_until_there_are_no_loaders, AlwaysReady,
    GateOptions, ReadinessProbe, DEFAULT_GATE_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
};
pub use result::{PaginaError, PaginaResult};
pub use session::{DiagnosticHook, NoopHook, ScopeGuard, Session, SessionBuilder};

/// Convenience re-exports for test code
pub mod prelude {
    pub use super::{
        Driver, ElementHandle, GateOptions, Locator, Page, PaginaError, PaginaResult,
        ReadinessProbe, RetryPolicy, Session, Strategy, UiElement, UiElementsList,
    };
}
