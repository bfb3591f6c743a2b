//! Page object support.
//!
//! A page object is a plain struct whose accessors build [`UiElement`]
//! descriptors from a [`Session`]; this module only contributes the small
//! trait that gives pages a uniform open/is-loaded surface.

use crate::result::PaginaResult;
use crate::session::Session;

/// Trait for page objects representing a page or component in the UI.
///
/// # Example
///
/// ```ignore
/// struct LoginPage {
///     session: Session,
/// }
///
/// impl LoginPage {
///     fn username(&self) -> UiElement {
///         self.session.element().located_by_id("username")
///     }
///
///     fn login(&self, user: &str, password: &str) -> PaginaResult<()> {
///         self.username().send_keys(user)?;
///         self.password().send_keys(password)?;
///         self.submit().click()
///     }
/// }
///
/// impl Page for LoginPage {
///     fn url(&self) -> &str {
///         "https://app.example.com/login"
///     }
/// }
/// ```
pub trait Page {
    /// The URL this page lives at
    fn url(&self) -> &str;

    /// Whether the page is ready for interaction
    fn is_loaded(&self, session: &Session) -> bool {
        let _ = session;
        true
    }

    /// Page name for logging/debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Navigate the session to this page
    fn open(&self, session: &Session) -> PaginaResult<()> {
        session.goto(self.url())
    }
}
