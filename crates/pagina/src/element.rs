//! The resolution core: lazily-resolved, possibly-parented element
//! descriptors.
//!
//! A [`UiElement`] is a pure descriptor — a locator, an optional parent
//! descriptor, an optional positional index. It holds no live handle; every
//! use re-resolves from scratch by walking the parent chain down to itself,
//! so a descriptor declared once stays valid across page redraws, reloads,
//! and DOM swaps.
//!
//! # Design notes
//!
//! - **Never cached**: `locate()` performs a fresh driver round-trip on
//!   every call. Interactions re-resolve on every retry attempt, which is
//!   what makes retry-on-staleness work.
//! - **Positional identity is fragile**: an indexed descriptor (from
//!   [`UiElement::locate_multiple`]) means "the k-th match *at lookup
//!   time*". If the DOM reorders between lookups, the same descriptor
//!   resolves to a different element. This is deliberate and load-bearing
//!   for lists that refresh in place; pin an element with a more specific
//!   locator when stable identity matters.

use crate::driver::{ElementHandle, ScriptArg};
use crate::interaction::perform;
use crate::locator::Locator;
use crate::readiness::{GateOptions, DEFAULT_POLL_INTERVAL_MS};
use crate::result::{PaginaError, PaginaResult};
use crate::session::{ScopeGuard, Session};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Inline style applied by [`UiElement::highlight`]
const HIGHLIGHT_STYLE: &str = "border: 3px solid red;";

/// Script used by [`UiElement::highlight`] to set and clear the style
const SET_STYLE_SCRIPT: &str = "arguments[0].setAttribute('style', arguments[1]);";

/// How long the highlight stays visible (500ms)
const HIGHLIGHT_PAUSE_MS: u64 = 500;

/// Resolution timeout for the [`UiElement::visible`] query (500ms)
const VISIBLE_TIMEOUT_MS: u64 = 500;

/// A lazily-resolved, possibly-parented reference to a live element.
#[derive(Clone)]
pub struct UiElement {
    session: Session,
    locator: Option<Locator>,
    parent: Option<Rc<UiElement>>,
    index: Option<usize>,
}

impl fmt::Debug for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiElement")
            .field("locator", &self.locator)
            .field("index", &self.index)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.locator {
            Some(locator) => {
                write!(f, "element located by {locator}")?;
                if let Some(index) = self.index {
                    write!(f, " at index {index}")?;
                }
                Ok(())
            }
            None => write!(f, "element with no locator"),
        }
    }
}

impl UiElement {
    /// New descriptor bound to `session`.
    ///
    /// If a scope is currently open on the session, the innermost scoped
    /// element becomes this descriptor's parent. The adoption happens here,
    /// once; scopes opened or closed later do not affect it.
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            locator: None,
            parent: session.current_parent().map(Rc::new),
            index: None,
        }
    }

    /// New descriptor that ignores any open scope
    #[must_use]
    pub fn toplevel(session: &Session) -> Self {
        Self {
            session: session.clone(),
            locator: None,
            parent: None,
            index: None,
        }
    }

    // =========================================================================
    // BUILDER CONFIGURATION
    // =========================================================================

    /// Set (or overwrite) the locator
    #[must_use]
    pub fn located_by(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Locate by XPath
    #[must_use]
    pub fn located_by_xpath(self, xpath: impl Into<String>) -> Self {
        self.located_by(Locator::xpath(xpath))
    }

    /// Locate by the union of several XPath fragments (logical OR)
    #[must_use]
    pub fn located_by_xpaths<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.located_by(Locator::any_xpath(fragments))
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn located_by_css(self, selector: impl Into<String>) -> Self {
        self.located_by(Locator::css(selector))
    }

    /// Locate by `id` attribute
    #[must_use]
    pub fn located_by_id(self, id: impl Into<String>) -> Self {
        self.located_by(Locator::id(id))
    }

    /// Locate by exact anchor text
    #[must_use]
    pub fn located_by_link_text(self, text: impl Into<String>) -> Self {
        self.located_by(Locator::link_text(text))
    }

    /// Locate by a substring of anchor text
    #[must_use]
    pub fn located_by_partial_link_text(self, text: impl Into<String>) -> Self {
        self.located_by(Locator::partial_link_text(text))
    }

    /// Override the parent explicitly, bypassing scope adoption
    #[must_use]
    pub fn with_parent(mut self, parent: &UiElement) -> Self {
        self.parent = Some(Rc::new(parent.clone()));
        self
    }

    /// New descriptor whose parent is this element; used for inline nested
    /// declarations.
    #[must_use]
    pub fn subelement(&self) -> UiElement {
        UiElement {
            session: self.session.clone(),
            locator: None,
            parent: Some(Rc::new(self.clone())),
            index: None,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The configured locator, if any
    #[must_use]
    pub fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }

    /// The positional index, if pinned by a multi-match expansion
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The parent descriptor, if any
    #[must_use]
    pub fn parent(&self) -> Option<&UiElement> {
        self.parent.as_deref()
    }

    // =========================================================================
    // SCOPED CONTEXT
    // =========================================================================

    /// Open this element as the implicit parent scope.
    ///
    /// Descriptors constructed while the returned guard is alive (and not
    /// built top-level) adopt this element as their parent. The scope
    /// closes when the guard drops — on every exit path, panics included.
    pub fn enter(&self) -> ScopeGuard {
        self.session.push_scope(self.clone())
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    /// Resolve this descriptor to a live element handle.
    ///
    /// Fails with [`PaginaError::NotConfigured`] when no locator is set —
    /// the driver is never contacted in that case. With a parent, the
    /// parent resolves first (recursively) and the lookup is scoped to that
    /// node; otherwise the whole document is searched. An indexed
    /// descriptor selects its position among the current matches; an
    /// unindexed one uses a single-result lookup.
    ///
    /// The session's diagnostic hook observes every call.
    pub fn locate(&self) -> PaginaResult<ElementHandle> {
        let outcome = self.resolve();
        match &outcome {
            Ok(_) => self.session.hook().locate_resolved(&self.to_string()),
            Err(error) => self.session.hook().locate_failed(&self.to_string(), error),
        }
        outcome
    }

    fn resolve(&self) -> PaginaResult<ElementHandle> {
        let locator = self.locator.as_ref().ok_or_else(|| PaginaError::NotConfigured {
            target: self.to_string(),
        })?;
        let scope = match self.parent.as_deref() {
            Some(parent) => Some(parent.locate()?),
            None => None,
        };

        match self.index {
            Some(index) => {
                let matches = self.session.driver().find_elements(scope.as_ref(), locator)?;
                let count = matches.len();
                matches
                    .into_iter()
                    .nth(index)
                    .ok_or_else(|| PaginaError::IndexOutOfRange {
                        index,
                        count,
                        locator: locator.to_string(),
                    })
            }
            None => self
                .session
                .driver()
                .find_element(scope.as_ref(), locator)
                .map_err(|error| self.with_parent_hint(error)),
        }
    }

    fn with_parent_hint(&self, error: PaginaError) -> PaginaError {
        match (&self.parent, error) {
            (Some(parent), PaginaError::NotFound { locator, .. }) => {
                PaginaError::not_found_in(locator, parent)
            }
            (_, error) => error,
        }
    }

    /// Expand to one descriptor per element currently matching in scope.
    ///
    /// Each entry clones this element's locator and parent and pins its
    /// position in the result set (0-based, driver order). Only count and
    /// position are captured — no handles; each entry re-resolves
    /// independently on use.
    pub fn locate_multiple(&self) -> PaginaResult<UiElementsList> {
        let locator = self.locator.as_ref().ok_or_else(|| PaginaError::NotConfigured {
            target: self.to_string(),
        })?;
        let scope = match self.parent.as_deref() {
            Some(parent) => Some(parent.locate()?),
            None => None,
        };
        let matches = self.session.driver().find_elements(scope.as_ref(), locator)?;
        let entries = (0..matches.len())
            .map(|index| {
                let mut entry = self.clone();
                entry.index = Some(index);
                entry
            })
            .collect();
        Ok(UiElementsList::new(entries))
    }

    // =========================================================================
    // INTERACTIONS (readiness-gated, retried)
    // =========================================================================

    /// Click the element
    pub fn click(&self) -> PaginaResult<()> {
        perform(&self.session, &format!("click on {self}"), || {
            let element = self.locate()?;
            self.session.driver().click(&element)
        })
    }

    /// Click via pointer composition: move the pointer onto the element,
    /// then click at that position.
    pub fn native_click(&self) -> PaginaResult<()> {
        perform(&self.session, &format!("native click on {self}"), || {
            let element = self.locate()?;
            self.session.driver().move_to(&element)?;
            self.session.driver().click(&element)
        })
    }

    /// Move the pointer onto the element
    pub fn hover(&self) -> PaginaResult<()> {
        perform(&self.session, &format!("hover on {self}"), || {
            let element = self.locate()?;
            self.session.driver().move_to(&element)
        })
    }

    /// Type text into the element
    pub fn send_keys(&self, keys: &str) -> PaginaResult<()> {
        perform(&self.session, &format!("sending keys {keys:?} to {self}"), || {
            let element = self.locate()?;
            self.session.driver().send_keys(&element, keys)
        })
    }

    /// Read an attribute; `None` when the attribute is absent
    pub fn attribute(&self, name: &str) -> PaginaResult<Option<String>> {
        perform(
            &self.session,
            &format!("getting attribute {name:?} from {self}"),
            || {
                let element = self.locate()?;
                self.session.driver().attribute(&element, name)
            },
        )
    }

    /// Read the element's rendered text
    pub fn text(&self) -> PaginaResult<String> {
        perform(&self.session, &format!("getting text from {self}"), || {
            let element = self.locate()?;
            self.session.driver().text(&element)
        })
    }

    /// Expand to a list of per-match descriptors, behind the retry wrapper
    pub fn as_list(&self) -> PaginaResult<UiElementsList> {
        perform(&self.session, &format!("getting list of {self}"), || {
            self.locate_multiple()
        })
    }

    // =========================================================================
    // QUERIES AND DEBUG AIDS
    // =========================================================================

    /// Best-effort visibility query.
    ///
    /// Attempts a short-timeout resolution followed by a displayed-check.
    /// Every failure — not found, timeout, stale handle, driver error —
    /// answers `false`; this query never fails.
    #[must_use]
    pub fn visible(&self) -> bool {
        let options = GateOptions::new()
            .with_timeout(VISIBLE_TIMEOUT_MS)
            .with_poll_interval(DEFAULT_POLL_INTERVAL_MS);
        let start = Instant::now();
        let element = loop {
            match self.locate() {
                Ok(element) => break element,
                Err(error) if error.is_driver_error() && start.elapsed() < options.timeout() => {
                    std::thread::sleep(options.poll_interval());
                }
                Err(_) => return false,
            }
        };
        self.session
            .driver()
            .is_displayed(&element)
            .unwrap_or(false)
    }

    /// Flash a red border around the element, then restore it.
    ///
    /// Purely cosmetic debug aid: sets the inline `style` attribute, pauses
    /// briefly, clears it again. Not retried; failures propagate.
    pub fn highlight(&self) -> PaginaResult<()> {
        let element = self.locate()?;
        self.session.driver().execute_script(
            SET_STYLE_SCRIPT,
            &[
                ScriptArg::Element(element),
                ScriptArg::Value(Value::String(HIGHLIGHT_STYLE.to_string())),
            ],
        )?;
        std::thread::sleep(Duration::from_millis(HIGHLIGHT_PAUSE_MS));
        let element = self.locate()?;
        self.session.driver().execute_script(
            SET_STYLE_SCRIPT,
            &[
                ScriptArg::Element(element),
                ScriptArg::Value(Value::String(String::new())),
            ],
        )?;
        Ok(())
    }
}

// =============================================================================
// ELEMENT LIST
// =============================================================================

/// Ordered collection of [`UiElement`], each pinned to a positional index
/// within its parent scope at expansion time.
#[derive(Debug, Clone)]
pub struct UiElementsList {
    items: Vec<UiElement>,
}

impl UiElementsList {
    pub(crate) fn new(items: Vec<UiElement>) -> Self {
        Self { items }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entry at `index`, if present
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&UiElement> {
        self.items.get(index)
    }

    /// Iterate over the entries
    pub fn iter(&self) -> std::slice::Iter<'_, UiElement> {
        self.items.iter()
    }

    /// Highlight every member in order.
    ///
    /// Members are highlighted independently; the first failure propagates
    /// and aborts the remainder.
    pub fn highlight(&self) -> PaginaResult<()> {
        for element in &self.items {
            element.highlight()?;
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for UiElementsList {
    type Output = UiElement;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a UiElementsList {
    type Item = &'a UiElement;
    type IntoIter = std::slice::Iter<'a, UiElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for UiElementsList {
    type Item = UiElement;
    type IntoIter = std::vec::IntoIter<UiElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
