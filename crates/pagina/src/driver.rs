//! Driver capability contract.
//!
//! Pagina does not drive a browser itself. It consumes a [`Driver`]: a handle
//! to a running browser session exposing element lookup, interaction, script
//! execution, and navigation. Any WebDriver- or CDP-backed session can sit
//! behind this trait; the crate ships [`crate::mock::MockDriver`] for tests.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Driver (abstract trait)                                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────────┐  ┌───────────────┐  ┌──────────────────┐  │
//! │  │ WebDriver     │  │ CDP session   │  │ MockDriver       │  │
//! │  │ binding       │  │ binding       │  │ (unit tests)     │  │
//! │  └───────────────┘  └───────────────┘  └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is synchronous and blocks the calling thread until the driver
//! responds; Pagina adds no timeouts of its own here.

use crate::locator::Locator;
use crate::result::PaginaResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque reference to a live element inside the driver's session.
///
/// A handle is only as durable as the node it points at; once the DOM
/// changes, the handle may go stale and any operation on it can fail with
/// [`crate::PaginaError::Stale`]. Pagina therefore never caches handles
/// across interactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    id: String,
}

impl ElementHandle {
    /// Create a handle from a driver-assigned identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The driver-assigned identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Argument passed to an in-page script
#[derive(Debug, Clone)]
pub enum ScriptArg {
    /// A live element, surfaced to the script as a DOM node
    Element(ElementHandle),
    /// A plain JSON value
    Value(Value),
}

/// Capability contract consumed by the resolution core.
///
/// Implementations are expected to report failures through
/// [`crate::PaginaError`]: `Stale`, `Intercepted`, and `Timeout` for
/// transient page conditions, `NotFound` when a single-result lookup matches
/// nothing, and `Driver` for anything else the session reports.
pub trait Driver {
    /// Find the first/unique element matching `locator`.
    ///
    /// `scope` restricts the search to the subtree rooted at the given
    /// element; `None` searches the whole document.
    fn find_element(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> PaginaResult<ElementHandle>;

    /// Find every element matching `locator`, in document order.
    ///
    /// An empty result is not an error.
    fn find_elements(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> PaginaResult<Vec<ElementHandle>>;

    /// Click the element directly
    fn click(&self, element: &ElementHandle) -> PaginaResult<()>;

    /// Type the given text into the element
    fn send_keys(&self, element: &ElementHandle, keys: &str) -> PaginaResult<()>;

    /// Read an attribute; `None` when the attribute is absent
    fn attribute(&self, element: &ElementHandle, name: &str) -> PaginaResult<Option<String>>;

    /// Read the element's rendered text
    fn text(&self, element: &ElementHandle) -> PaginaResult<String>;

    /// Whether the element is currently displayed
    fn is_displayed(&self, element: &ElementHandle) -> PaginaResult<bool>;

    /// Move the pointer onto the element (hover / native-click composition)
    fn move_to(&self, element: &ElementHandle) -> PaginaResult<()>;

    /// Execute a script in the page and return its JSON result
    fn execute_script(&self, script: &str, args: &[ScriptArg]) -> PaginaResult<Value>;

    /// Navigate the session to `url`
    fn goto(&self, url: &str) -> PaginaResult<()>;
}
