//! Host page adapter boundary.
//!
//! The host owns the real navigation list and applies the rendered style
//! overrides; the core only sees this trait. The readiness wait replaces
//! the original unbounded per-frame poll with a cancellable, timeout-bound
//! loop whose retry policy belongs to the caller.

use std::time::Duration;

use thiserror::Error;

/// One addressable entry in the host's navigation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// What the core needs from the embedding page.
pub trait HostPage {
    /// Whether the host's structural identity marker is present yet.
    fn is_ready(&self) -> bool;

    /// The workspace identity groups are persisted under.
    fn workspace_id(&self) -> String;

    /// The current navigation list, read at call time (never cached).
    fn list_channels(&self) -> Vec<Channel>;

    /// Replace the full style-override payload. Called on every selection
    /// change with the complete recomputed CSS.
    fn apply_style_overrides(&mut self, css: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadinessError {
    #[error("host page not ready within {0:?}")]
    TimedOut(Duration),
    #[error("readiness wait cancelled")]
    Cancelled,
}

/// Polls the host's readiness marker until it appears, the timeout budget
/// is exhausted, or the caller cancels. Elapsed time is accounted in poll
/// intervals, so the wait is deterministic under an injected sleeper.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessWait {
    timeout: Duration,
    poll_interval: Duration,
}

impl ReadinessWait {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(16);

    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Wait with injected cancellation and sleeper (tests pass a recording
    /// sleeper; production passes `thread::sleep`). Cancellation is checked
    /// before readiness, and readiness before the timeout.
    pub fn wait_with<H: HostPage>(
        &self,
        host: &H,
        cancelled: &mut dyn FnMut() -> bool,
        sleep: &mut dyn FnMut(Duration),
    ) -> Result<(), ReadinessError> {
        let mut waited = Duration::ZERO;
        loop {
            if cancelled() {
                return Err(ReadinessError::Cancelled);
            }
            if host.is_ready() {
                return Ok(());
            }
            if waited >= self.timeout {
                return Err(ReadinessError::TimedOut(self.timeout));
            }
            sleep(self.poll_interval);
            waited += self.poll_interval;
        }
    }

    /// Blocking wait with no cancellation hook.
    pub fn wait<H: HostPage>(&self, host: &H) -> Result<(), ReadinessError> {
        self.wait_with(host, &mut || false, &mut std::thread::sleep)
    }
}
