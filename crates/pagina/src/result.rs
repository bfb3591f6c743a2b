//! Result and error types for Pagina.

use thiserror::Error;

/// Result type for Pagina operations
pub type PaginaResult<T> = Result<T, PaginaError>;

/// Errors that can occur in Pagina
#[derive(Debug, Error)]
pub enum PaginaError {
    /// Element descriptor has no locator configured (programmer error)
    #[error("no locator configured for {target}")]
    NotConfigured {
        /// Description of the offending element
        target: String,
    },

    /// Single-result lookup matched nothing
    #[error("no element matched {locator}{hint}")]
    NotFound {
        /// The locator that matched nothing
        locator: String,
        /// Parent-scope diagnostic hint, empty when the lookup was global
        hint: String,
    },

    /// Positional match does not exist among current results
    #[error("index {index} out of range: {count} element(s) matched {locator}")]
    IndexOutOfRange {
        /// Requested 0-based index
        index: usize,
        /// Number of elements actually matched
        count: usize,
        /// The locator that was expanded
        locator: String,
    },

    /// Element handle refers to a node no longer attached to the document
    #[error("stale element reference: {message}")]
    Stale {
        /// Driver-reported detail
        message: String,
    },

    /// Interaction was intercepted by another element (overlay, animation)
    #[error("interaction intercepted: {message}")]
    Intercepted {
        /// Driver-reported detail
        message: String,
    },

    /// Driver operation timed out
    #[error("driver operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Any other driver-reported failure
    #[error("driver error: {message}")]
    Driver {
        /// Driver-reported detail
        message: String,
    },

    /// Script execution failed in the page
    #[error("script execution failed: {message}")]
    Script {
        /// Driver-reported detail
        message: String,
    },

    /// Navigation failed
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed to load
        url: String,
        /// Driver-reported detail
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PaginaError {
    /// Whether this failure came from the driver/page rather than from
    /// Pagina itself.
    ///
    /// Driver-class failures go through the interaction retry budget; a
    /// retried action that calls `locate()` internally re-resolves from
    /// scratch, so stale references and mid-animation intercepts usually
    /// clear on a later attempt. Everything else (a missing locator, a
    /// serialization error) is surfaced to the caller immediately.
    #[must_use]
    pub fn is_driver_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::IndexOutOfRange { .. }
                | Self::Stale { .. }
                | Self::Intercepted { .. }
                | Self::Timeout { .. }
                | Self::Driver { .. }
                | Self::Script { .. }
        )
    }

    /// `NotFound` for a global lookup (no parent scope involved).
    #[must_use]
    pub fn not_found(locator: impl Into<String>) -> Self {
        Self::NotFound {
            locator: locator.into(),
            hint: String::new(),
        }
    }

    /// `NotFound` for a lookup scoped to a resolved parent, naming the
    /// parent so the test author can verify the scope is correct.
    #[must_use]
    pub fn not_found_in(locator: impl Into<String>, parent: impl std::fmt::Display) -> Self {
        Self::NotFound {
            locator: locator.into(),
            hint: format!("; ensure that {parent} is a valid parent for the element"),
        }
    }
}
