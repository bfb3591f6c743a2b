//! In-memory mock driver for testing page objects without a browser.
//!
//! [`MockDriver`] implements the full [`Driver`] contract against a
//! scriptable fake DOM: match sets are installed per (scope, locator) key,
//! nodes carry text/attributes/displayed state, and failures can be queued
//! per operation to exercise retry paths. Handles are cheap clones sharing
//! one interior, so a test can keep its own copy of the driver it handed to
//! the session and inspect or mutate state mid-test.
//!
//! Script execution is modelled shallowly: a script that sets an attribute
//! via `setAttribute` with an `[element, string]` argument pair updates the
//! node's `style` attribute (the shape the highlight aid uses); everything
//! else is recorded and returns `null`.

use crate::driver::{Driver, ElementHandle, ScriptArg};
use crate::locator::Locator;
use crate::readiness::ReadinessProbe;
use crate::result::{PaginaError, PaginaResult};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Driver operations, for failure injection and call counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    /// Single-result lookup
    FindElement,
    /// Multi-result lookup
    FindElements,
    /// Direct click
    Click,
    /// Typing
    SendKeys,
    /// Attribute read
    Attribute,
    /// Text read
    Text,
    /// Displayed check
    IsDisplayed,
    /// Pointer move
    MoveTo,
    /// Script execution
    ExecuteScript,
    /// Navigation
    Goto,
}

struct MockNode {
    text: String,
    attributes: HashMap<String, String>,
    displayed: bool,
    typed: String,
}

impl MockNode {
    fn new() -> Self {
        Self {
            text: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            typed: String::new(),
        }
    }
}

#[derive(Default)]
struct MockState {
    matches: HashMap<(Option<String>, Locator), Vec<String>>,
    nodes: HashMap<String, MockNode>,
    failures: HashMap<MockOp, VecDeque<PaginaError>>,
    calls: HashMap<MockOp, usize>,
    events: Vec<String>,
    visited: Vec<String>,
    scripts: Vec<String>,
}

/// Scriptable in-memory [`Driver`]
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Rc<RefCell<MockState>>,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockDriver")
            .field("nodes", &state.nodes.len())
            .field("match_keys", &state.matches.len())
            .finish_non_exhaustive()
    }
}

impl MockDriver {
    /// Create an empty mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // DOM SETUP
    // =========================================================================

    /// Install (or replace) the ordered match set for a (scope, locator)
    /// key. Nodes are created for any previously unseen id.
    pub fn install(&self, scope: Option<&str>, locator: &Locator, ids: &[&str]) {
        let mut state = self.state.borrow_mut();
        for id in ids {
            state
                .nodes
                .entry((*id).to_string())
                .or_insert_with(MockNode::new);
        }
        state.matches.insert(
            (scope.map(str::to_string), locator.clone()),
            ids.iter().map(|id| (*id).to_string()).collect(),
        );
    }

    /// Set a node's rendered text
    pub fn set_text(&self, id: &str, text: &str) {
        self.with_node(id, |node| node.text = text.to_string());
    }

    /// Set a node attribute
    pub fn set_attribute(&self, id: &str, name: &str, value: &str) {
        self.with_node(id, |node| {
            node.attributes.insert(name.to_string(), value.to_string());
        });
    }

    /// Set whether a node is displayed
    pub fn set_displayed(&self, id: &str, displayed: bool) {
        self.with_node(id, |node| node.displayed = displayed);
    }

    fn with_node(&self, id: &str, apply: impl FnOnce(&mut MockNode)) {
        let mut state = self.state.borrow_mut();
        let node = state
            .nodes
            .entry(id.to_string())
            .or_insert_with(MockNode::new);
        apply(node);
    }

    // =========================================================================
    // FAILURE INJECTION
    // =========================================================================

    /// Queue a failure for the next call of `op` (FIFO; one per call)
    pub fn inject(&self, op: MockOp, error: PaginaError) {
        self.state
            .borrow_mut()
            .failures
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Queue `count` stale-reference failures for `op`
    pub fn inject_stale(&self, op: MockOp, count: usize) {
        for _ in 0..count {
            self.inject(
                op,
                PaginaError::Stale {
                    message: "node detached".to_string(),
                },
            );
        }
    }

    // =========================================================================
    // INTROSPECTION
    // =========================================================================

    /// How many times `op` was called (failed calls included)
    #[must_use]
    pub fn calls(&self, op: MockOp) -> usize {
        self.state.borrow().calls.get(&op).copied().unwrap_or(0)
    }

    /// Current value of a node attribute
    #[must_use]
    pub fn attribute_of(&self, id: &str, name: &str) -> Option<String> {
        self.state
            .borrow()
            .nodes
            .get(id)
            .and_then(|node| node.attributes.get(name).cloned())
    }

    /// Everything typed into a node, concatenated
    #[must_use]
    pub fn typed_into(&self, id: &str) -> String {
        self.state
            .borrow()
            .nodes
            .get(id)
            .map(|node| node.typed.clone())
            .unwrap_or_default()
    }

    /// Interaction events in order ("move_to id", "click id", ...)
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.state.borrow().events.clone()
    }

    /// URLs navigated to, in order
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.state.borrow().visited.clone()
    }

    /// Scripts executed, in order
    #[must_use]
    pub fn scripts(&self) -> Vec<String> {
        self.state.borrow().scripts.clone()
    }

    // =========================================================================
    // DRIVER PLUMBING
    // =========================================================================

    /// Count the call and surface a queued failure, if any
    fn enter(&self, op: MockOp) -> PaginaResult<()> {
        let mut state = self.state.borrow_mut();
        *state.calls.entry(op).or_insert(0) += 1;
        match state.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn lookup(&self, scope: Option<&ElementHandle>, locator: &Locator) -> Vec<String> {
        self.state
            .borrow()
            .matches
            .get(&(scope.map(|handle| handle.id().to_string()), locator.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn checked(&self, element: &ElementHandle) -> PaginaResult<()> {
        if self.state.borrow().nodes.contains_key(element.id()) {
            Ok(())
        } else {
            Err(PaginaError::Stale {
                message: format!("no such node: {}", element.id()),
            })
        }
    }
}

impl Driver for MockDriver {
    fn find_element(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> PaginaResult<ElementHandle> {
        self.enter(MockOp::FindElement)?;
        self.lookup(scope, locator)
            .first()
            .map(|id| ElementHandle::new(id.as_str()))
            .ok_or_else(|| PaginaError::not_found(locator.to_string()))
    }

    fn find_elements(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> PaginaResult<Vec<ElementHandle>> {
        self.enter(MockOp::FindElements)?;
        Ok(self
            .lookup(scope, locator)
            .iter()
            .map(|id| ElementHandle::new(id.as_str()))
            .collect())
    }

    fn click(&self, element: &ElementHandle) -> PaginaResult<()> {
        self.enter(MockOp::Click)?;
        self.checked(element)?;
        self.state
            .borrow_mut()
            .events
            .push(format!("click {}", element.id()));
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, keys: &str) -> PaginaResult<()> {
        self.enter(MockOp::SendKeys)?;
        self.checked(element)?;
        let mut state = self.state.borrow_mut();
        state.events.push(format!("send_keys {}", element.id()));
        if let Some(node) = state.nodes.get_mut(element.id()) {
            node.typed.push_str(keys);
        }
        Ok(())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> PaginaResult<Option<String>> {
        self.enter(MockOp::Attribute)?;
        self.checked(element)?;
        Ok(self.attribute_of(element.id(), name))
    }

    fn text(&self, element: &ElementHandle) -> PaginaResult<String> {
        self.enter(MockOp::Text)?;
        self.checked(element)?;
        Ok(self
            .state
            .borrow()
            .nodes
            .get(element.id())
            .map(|node| node.text.clone())
            .unwrap_or_default())
    }

    fn is_displayed(&self, element: &ElementHandle) -> PaginaResult<bool> {
        self.enter(MockOp::IsDisplayed)?;
        self.checked(element)?;
        Ok(self
            .state
            .borrow()
            .nodes
            .get(element.id())
            .is_some_and(|node| node.displayed))
    }

    fn move_to(&self, element: &ElementHandle) -> PaginaResult<()> {
        self.enter(MockOp::MoveTo)?;
        self.checked(element)?;
        self.state
            .borrow_mut()
            .events
            .push(format!("move_to {}", element.id()));
        Ok(())
    }

    fn execute_script(&self, script: &str, args: &[ScriptArg]) -> PaginaResult<Value> {
        self.enter(MockOp::ExecuteScript)?;
        self.state.borrow_mut().scripts.push(script.to_string());
        if script.contains("setAttribute") {
            if let [ScriptArg::Element(element), ScriptArg::Value(Value::String(style))] = args {
                self.checked(element)?;
                let mut state = self.state.borrow_mut();
                if let Some(node) = state.nodes.get_mut(element.id()) {
                    node.attributes
                        .insert("style".to_string(), style.clone());
                }
            }
        }
        Ok(Value::Null)
    }

    fn goto(&self, url: &str) -> PaginaResult<()> {
        self.enter(MockOp::Goto)?;
        self.state.borrow_mut().visited.push(url.to_string());
        Ok(())
    }
}

// =============================================================================
// PROBE
// =============================================================================

#[derive(Default)]
struct ProbeState {
    dom_loaded: bool,
    active_loaders: bool,
    dom_polls: usize,
    loader_polls: usize,
}

/// Controllable [`ReadinessProbe`] with poll counters
#[derive(Clone)]
pub struct MockProbe {
    state: Rc<RefCell<ProbeState>>,
}

impl std::fmt::Debug for MockProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockProbe")
            .field("dom_loaded", &state.dom_loaded)
            .field("active_loaders", &state.active_loaders)
            .finish_non_exhaustive()
    }
}

impl Default for MockProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProbe {
    /// New probe reporting a loaded, loader-free page
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ProbeState {
                dom_loaded: true,
                active_loaders: false,
                dom_polls: 0,
                loader_polls: 0,
            })),
        }
    }

    /// Set the DOM-loaded answer
    pub fn set_dom_loaded(&self, loaded: bool) {
        self.state.borrow_mut().dom_loaded = loaded;
    }

    /// Set the active-loaders answer
    pub fn set_active_loaders(&self, active: bool) {
        self.state.borrow_mut().active_loaders = active;
    }

    /// How many times the DOM-loaded predicate was polled
    #[must_use]
    pub fn dom_polls(&self) -> usize {
        self.state.borrow().dom_polls
    }

    /// How many times the loaders predicate was polled
    #[must_use]
    pub fn loader_polls(&self) -> usize {
        self.state.borrow().loader_polls
    }
}

impl ReadinessProbe for MockProbe {
    fn is_dom_loaded(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.dom_polls += 1;
        state.dom_loaded
    }

    fn has_active_loaders(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.loader_polls += 1;
        state.active_loaders
    }
}
