//! Readiness gate: page-level preconditions polled before every interaction.
//!
//! The gate consists of two predicates supplied by the embedding test
//! framework: "the DOM is fully loaded" and "no loading indicators are
//! active". Both are polled with plain sleep loops; there is no event-driven
//! machinery here. A wait is bounded by its [`GateOptions`] timeout and
//! resolves to a definite `bool` — timing out is an answer, not an error.

use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for readiness waits (30 seconds)
pub const DEFAULT_GATE_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// PROBE
// =============================================================================

/// Page readiness predicates consumed by the interaction layer.
///
/// Both checks must be side-effect-free; they are polled repeatedly.
pub trait ReadinessProbe {
    /// Whether the document has finished loading
    fn is_dom_loaded(&self) -> bool;

    /// Whether any loading indicator (spinner, progress overlay) is active
    fn has_active_loaders(&self) -> bool;
}

/// Probe for pages without loader semantics: always loaded, never busy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

impl ReadinessProbe for AlwaysReady {
    fn is_dom_loaded(&self) -> bool {
        true
    }

    fn has_active_loaders(&self) -> bool {
        false
    }
}

// =============================================================================
// GATE OPTIONS
// =============================================================================

/// Options for readiness waits
#[derive(Debug, Clone)]
pub struct GateOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_GATE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl GateOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `predicate` until it holds or the timeout elapses.
///
/// The predicate is checked at least once, so a zero timeout degrades to a
/// single check. Returns whether the predicate ever held.
pub fn poll_until<F>(predicate: F, options: &GateOptions) -> bool
where
    F: Fn() -> bool,
{
    let start = Instant::now();
    loop {
        if predicate() {
            return true;
        }
        if start.elapsed() >= options.timeout() {
            return false;
        }
        std::thread::sleep(options.poll_interval());
    }
}

/// Block until the probe reports the DOM loaded, or the timeout elapses
pub fn wait_until_dom_is_loaded(probe: &dyn ReadinessProbe, options: &GateOptions) -> bool {
    poll_until(|| probe.is_dom_loaded(), options)
}

/// Block until the probe reports no active loaders, or the timeout elapses
pub fn wait_until_there_are_no_loaders(probe: &dyn ReadinessProbe, options: &GateOptions) -> bool {
    poll_until(|| !probe.has_active_loaders(), options)
}
