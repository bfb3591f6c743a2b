//! Interaction retry wrapper.
//!
//! Every externally observable interaction goes through [`perform`], which
//! makes it resilient to transient driver/page flakiness:
//!
//! 1. block until the DOM-loaded predicate is satisfied (bounded);
//! 2. block until the no-active-loaders predicate is satisfied (bounded);
//! 3. attempt the action up to the retry budget, sleeping a fixed backoff
//!    between attempts and logging a warning for each failure that will be
//!    retried.
//!
//! The readiness gate runs once, before the first attempt — not between
//! attempts. The wrapper never re-resolves anything itself: an action
//! closure that calls `locate()` internally re-resolves from scratch on
//! every attempt, which is what makes retry-on-staleness work. Interaction
//! closures in this crate all do so.

use crate::readiness::{wait_until_dom_is_loaded, wait_until_there_are_no_loaders, GateOptions};
use crate::result::PaginaResult;
use crate::session::Session;
use std::time::Duration;

/// Total attempts per interaction (first try included)
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Fixed backoff between attempts (1 second)
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1_000;

/// Retry budget and readiness-gate configuration for interactions
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per interaction, at least 1
    pub attempts: u32,
    /// Fixed backoff between attempts, in milliseconds
    pub backoff_ms: u64,
    /// Options for the readiness waits preceding the attempts
    pub gate: GateOptions,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            gate: GateOptions::default(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total attempt budget (clamped to at least 1)
    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Set the fixed backoff in milliseconds
    #[must_use]
    pub const fn with_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }

    /// Set the readiness-gate options
    #[must_use]
    pub fn with_gate(mut self, gate: GateOptions) -> Self {
        self.gate = gate;
        self
    }

    /// Get the backoff as a Duration
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Run `action` behind the readiness gate and the session's retry budget.
///
/// `description` is the human-readable intent ("click on element located by
/// …") attached to retry warnings.
///
/// Driver-class failures ([`crate::PaginaError::is_driver_error`]) consume
/// an attempt; the final attempt's failure propagates without being logged.
/// Any other failure propagates immediately, unlogged and unretried.
pub fn perform<T, F>(session: &Session, description: &str, mut action: F) -> PaginaResult<T>
where
    F: FnMut() -> PaginaResult<T>,
{
    let policy = session.retry_policy();
    wait_until_dom_is_loaded(session.probe(), &policy.gate);
    wait_until_there_are_no_loaders(session.probe(), &policy.gate);

    let mut attempt = 1;
    loop {
        match action() {
            Ok(value) => return Ok(value),
            Err(error) if error.is_driver_error() && attempt < policy.attempts => {
                tracing::warn!("{} failed (attempt {}): {}", description, attempt, error);
                std::thread::sleep(policy.backoff());
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use crate::result::PaginaError;
    use std::cell::Cell;

    fn fast_session(driver: MockDriver) -> Session {
        Session::builder(driver).with_retry_policy(fast_policy()).build()
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new()
            .with_backoff_ms(1)
            .with_gate(GateOptions::new().with_timeout(10).with_poll_interval(1))
    }

    fn stale() -> PaginaError {
        PaginaError::Stale {
            message: "detached".to_string(),
        }
    }

    mod policy_tests {
        use super::*;

        #[test]
        fn test_policy_defaults() {
            let policy = RetryPolicy::default();
            assert_eq!(policy.attempts, DEFAULT_RETRY_ATTEMPTS);
            assert_eq!(policy.backoff_ms, DEFAULT_RETRY_BACKOFF_MS);
        }

        #[test]
        fn test_policy_builders() {
            let policy = RetryPolicy::new().with_attempts(5).with_backoff_ms(20);
            assert_eq!(policy.attempts, 5);
            assert_eq!(policy.backoff(), Duration::from_millis(20));
        }

        #[test]
        fn test_policy_attempts_never_zero() {
            let policy = RetryPolicy::new().with_attempts(0);
            assert_eq!(policy.attempts, 1);
        }
    }

    mod gate_tests {
        use super::*;
        use crate::mock::MockProbe;

        #[test]
        fn test_gate_polls_both_predicates_before_acting() {
            let probe = MockProbe::new();
            let session = Session::builder(MockDriver::new())
                .with_probe(probe.clone())
                .with_retry_policy(fast_policy())
                .build();
            perform(&session, "noop", || Ok(())).unwrap();
            assert_eq!(probe.dom_polls(), 1);
            assert_eq!(probe.loader_polls(), 1);
        }

        #[test]
        fn test_gate_is_bounded_when_loaders_never_clear() {
            let probe = MockProbe::new();
            probe.set_active_loaders(true);
            let session = Session::builder(MockDriver::new())
                .with_probe(probe.clone())
                .with_retry_policy(fast_policy())
                .build();
            // the wait times out, the action still runs
            perform(&session, "noop", || Ok(())).unwrap();
            assert!(probe.loader_polls() > 1);
        }

        #[test]
        fn test_gate_runs_once_not_per_attempt() {
            let probe = MockProbe::new();
            let session = Session::builder(MockDriver::new())
                .with_probe(probe.clone())
                .with_retry_policy(fast_policy())
                .build();
            let calls = Cell::new(0u32);
            let result: PaginaResult<()> = perform(&session, "doomed", || {
                calls.set(calls.get() + 1);
                Err(stale())
            });
            assert!(result.is_err());
            assert_eq!(calls.get(), 3);
            assert_eq!(probe.dom_polls(), 1);
            assert_eq!(probe.loader_polls(), 1);
        }
    }

    mod perform_tests {
        use super::*;

        #[test]
        fn test_success_on_first_attempt() {
            let session = fast_session(MockDriver::new());
            let calls = Cell::new(0u32);
            let result = perform(&session, "noop", || {
                calls.set(calls.get() + 1);
                Ok(42)
            });
            assert_eq!(result.unwrap(), 42);
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_two_transient_failures_then_success() {
            let session = fast_session(MockDriver::new());
            let calls = Cell::new(0u32);
            let result = perform(&session, "flaky click", || {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err(stale())
                } else {
                    Ok("done")
                }
            });
            assert_eq!(result.unwrap(), "done");
            assert_eq!(calls.get(), 3);
        }

        #[test]
        fn test_budget_exhaustion_raises_after_exactly_three_attempts() {
            let session = fast_session(MockDriver::new());
            let calls = Cell::new(0u32);
            let result: PaginaResult<()> = perform(&session, "doomed click", || {
                calls.set(calls.get() + 1);
                Err(stale())
            });
            assert!(matches!(result, Err(PaginaError::Stale { .. })));
            assert_eq!(calls.get(), 3);
        }

        #[test]
        fn test_non_driver_failure_propagates_without_retry() {
            let session = fast_session(MockDriver::new());
            let calls = Cell::new(0u32);
            let result: PaginaResult<()> = perform(&session, "misconfigured", || {
                calls.set(calls.get() + 1);
                Err(PaginaError::NotConfigured {
                    target: "element".to_string(),
                })
            });
            assert!(matches!(result, Err(PaginaError::NotConfigured { .. })));
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_warns_once_per_retried_failure_only() {
            use std::sync::{Arc, Mutex};

            #[derive(Clone)]
            struct Capture(Arc<Mutex<Vec<u8>>>);

            impl std::io::Write for Capture {
                fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                    self.0.lock().unwrap().extend_from_slice(buf);
                    Ok(buf.len())
                }

                fn flush(&mut self) -> std::io::Result<()> {
                    Ok(())
                }
            }

            let run = |failures: u32| -> String {
                let capture = Capture(Arc::new(Mutex::new(Vec::new())));
                let writer = capture.clone();
                let subscriber = tracing_subscriber::fmt()
                    .with_writer(move || writer.clone())
                    .finish();
                tracing::subscriber::with_default(subscriber, || {
                    let session = fast_session(MockDriver::new());
                    let calls = Cell::new(0u32);
                    let _ = perform(&session, "flaky click", || {
                        calls.set(calls.get() + 1);
                        if calls.get() <= failures {
                            Err(stale())
                        } else {
                            Ok(())
                        }
                    });
                });
                let bytes = capture.0.lock().unwrap().clone();
                String::from_utf8(bytes).unwrap()
            };

            // two failures then success: both are logged as retried
            assert_eq!(run(2).matches("flaky click failed").count(), 2);
            // three failures: the final one propagates without a warning
            assert_eq!(run(3).matches("flaky click failed").count(), 2);
            // immediate success: silence
            assert_eq!(run(0).matches("flaky click failed").count(), 0);
        }

        #[test]
        fn test_custom_attempt_budget() {
            let driver = MockDriver::new();
            let session = Session::builder(driver)
                .with_retry_policy(fast_policy().with_attempts(5))
                .build();
            let calls = Cell::new(0u32);
            let result: PaginaResult<()> = perform(&session, "very flaky", || {
                calls.set(calls.get() + 1);
                Err(stale())
            });
            assert!(result.is_err());
            assert_eq!(calls.get(), 5);
        }
    }
}
