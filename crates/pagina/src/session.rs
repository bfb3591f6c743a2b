//! Session context: the explicit home for what used to be global state.
//!
//! A [`Session`] bundles everything a [`crate::UiElement`] needs to resolve
//! and interact: the driver handle, the readiness probe, the diagnostic
//! hook, the retry policy, and the parent-scope stack. Handles are cheap to
//! clone (shared interior), and every descriptor built from a session
//! carries one, so no process-wide state exists anywhere in the crate.
//!
//! One session per logical test-execution context. Sessions are deliberately
//! `!Send`/`!Sync` (`Rc`/`RefCell` inside): concurrency means one session
//! per thread, not one session shared between threads.

use crate::driver::Driver;
use crate::element::UiElement;
use crate::interaction::RetryPolicy;
use crate::readiness::{AlwaysReady, ReadinessProbe};
use crate::result::{PaginaError, PaginaResult};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// =============================================================================
// DIAGNOSTIC HOOK
// =============================================================================

/// Instrumentation seam invoked around every `locate()` call.
///
/// The embedding framework can hang failure forensics here (capture a
/// screenshot, dump the DOM); the resolution core calls the hook but never
/// depends on what it does. Both methods default to no-ops.
pub trait DiagnosticHook {
    /// A `locate()` call resolved successfully
    fn locate_resolved(&self, target: &str) {
        let _ = target;
    }

    /// A `locate()` call failed
    fn locate_failed(&self, target: &str, error: &PaginaError) {
        let _ = (target, error);
    }
}

/// Hook that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl DiagnosticHook for NoopHook {}

// =============================================================================
// SESSION
// =============================================================================

struct SessionInner {
    driver: Rc<dyn Driver>,
    probe: Rc<dyn ReadinessProbe>,
    hook: Rc<dyn DiagnosticHook>,
    retry: RetryPolicy,
    scope: RefCell<Vec<UiElement>>,
}

/// Shared handle to one logical test-execution context.
#[derive(Clone)]
pub struct Session {
    inner: Rc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("retry", &self.inner.retry)
            .field("scope_depth", &self.inner.scope.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session with default probe (always ready), hook (no-op),
    /// and retry policy.
    #[must_use]
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self::builder(driver).build()
    }

    /// Start configuring a session
    #[must_use]
    pub fn builder(driver: impl Driver + 'static) -> SessionBuilder {
        SessionBuilder {
            driver: Rc::new(driver),
            probe: Rc::new(AlwaysReady),
            hook: Rc::new(NoopHook),
            retry: RetryPolicy::default(),
        }
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        &*self.inner.driver
    }

    /// The readiness probe gating interactions
    #[must_use]
    pub fn probe(&self) -> &dyn ReadinessProbe {
        &*self.inner.probe
    }

    /// The diagnostic hook wrapped around `locate()` calls
    #[must_use]
    pub fn hook(&self) -> &dyn DiagnosticHook {
        &*self.inner.hook
    }

    /// The retry policy applied to interactions
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry
    }

    /// Navigate the session to `url`
    pub fn goto(&self, url: &str) -> PaginaResult<()> {
        self.driver().goto(url)
    }

    /// New element descriptor; adopts the innermost open scope as its
    /// parent (if any).
    #[must_use]
    pub fn element(&self) -> UiElement {
        UiElement::new(self)
    }

    /// New element descriptor that ignores any open scope
    #[must_use]
    pub fn toplevel_element(&self) -> UiElement {
        UiElement::toplevel(self)
    }

    /// Clone of the innermost open scope entry, if a scope is open
    pub(crate) fn current_parent(&self) -> Option<UiElement> {
        self.inner.scope.borrow().last().cloned()
    }

    /// Push `element` as the innermost scope; popped when the guard drops.
    pub(crate) fn push_scope(&self, element: UiElement) -> ScopeGuard {
        self.inner.scope.borrow_mut().push(element);
        ScopeGuard {
            session: self.clone(),
        }
    }

    fn pop_scope(&self) {
        self.inner.scope.borrow_mut().pop();
    }
}

/// Builder for [`Session`]
pub struct SessionBuilder {
    driver: Rc<dyn Driver>,
    probe: Rc<dyn ReadinessProbe>,
    hook: Rc<dyn DiagnosticHook>,
    retry: RetryPolicy,
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl SessionBuilder {
    /// Set the readiness probe
    #[must_use]
    pub fn with_probe(mut self, probe: impl ReadinessProbe + 'static) -> Self {
        self.probe = Rc::new(probe);
        self
    }

    /// Set the diagnostic hook
    #[must_use]
    pub fn with_hook(mut self, hook: impl DiagnosticHook + 'static) -> Self {
        self.hook = Rc::new(hook);
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Finish the session
    #[must_use]
    pub fn build(self) -> Session {
        Session {
            inner: Rc::new(SessionInner {
                driver: self.driver,
                probe: self.probe,
                hook: self.hook,
                retry: self.retry,
                scope: RefCell::new(Vec::new()),
            }),
        }
    }
}

// =============================================================================
// SCOPE GUARD
// =============================================================================

/// RAII entry in the session's parent-scope stack.
///
/// Elements constructed while the guard is alive (and not built with
/// [`Session::toplevel_element`]) adopt the guarded element as their parent.
/// Dropping the guard pops the scope — on every exit path, panics included.
/// Guards must be dropped in reverse creation order; the stack is LIFO.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct ScopeGuard {
    session: Session,
}

impl fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard").finish_non_exhaustive()
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.session.pop_scope();
    }
}
