//! Scoped Lists Demo - Parent Scoping and Multi-Element Expansion
//!
//! Shows scope guards (descriptors built inside a scope adopt it as their
//! parent), index-pinned list expansion, and how re-resolution tracks the
//! current DOM rather than the DOM at expansion time.
//!
//! # Running
//!
//! ```bash
//! cargo run --example scoped_lists -p pagina
//! ```

#![allow(clippy::unwrap_used)]

use pagina::mock::MockDriver;
use pagina::{Locator, RetryPolicy, Session};

fn main() {
    let driver = MockDriver::new();
    driver.install(None, &Locator::id("results"), &["results-pane"]);
    driver.install(
        Some("results-pane"),
        &Locator::css(".row"),
        &["row-a", "row-b", "row-c"],
    );
    for (id, label) in [("row-a", "alpha"), ("row-b", "beta"), ("row-c", "gamma")] {
        driver.set_text(id, label);
    }

    let session = Session::builder(driver.clone())
        .with_retry_policy(RetryPolicy::new().with_backoff_ms(100))
        .build();

    println!("=== Pagina Scoped Lists Demo ===\n");

    let results = session.element().located_by_id("results");
    let rows = {
        // everything declared inside the scope is resolved within it
        let _scope = results.enter();
        session.element().located_by_css(".row")
    };

    let items = rows.as_list().unwrap();
    println!("{} rows in the results pane:", items.len());
    for item in &items {
        println!("  [{}] {}", item.index().unwrap(), item.text().unwrap());
    }

    // the page reorders under us; the same descriptors re-resolve in the
    // current DOM order
    driver.install(
        Some("results-pane"),
        &Locator::css(".row"),
        &["row-c", "row-a"],
    );
    println!("\nafter the pane refreshed:");
    for item in items.iter().take(2) {
        println!("  [{}] {}", item.index().unwrap(), item.text().unwrap());
    }
    println!(
        "  [2] {}",
        items[2].text().map_or_else(|e| e.to_string(), |t| t)
    );

    println!("\n=== Scoped Lists Demo Complete ===");
}
