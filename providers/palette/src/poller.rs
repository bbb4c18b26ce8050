//! # Readiness Poller
//!
//! Waits for a remote resource to reach a target state by probing it at a
//! fixed interval. The wait ends when:
//!
//! - the probe reports the target state (success)
//! - the probe reports a state that is neither pending nor the target
//! - the probe fails (the error is returned unchanged, no retry)
//! - the deadline elapses while the state is still pending
//! - the caller cancels the token
//!
//! The only suspension points are the initial delay and the sleep between
//! probes, and both race the cancellation token. The sleep before the last
//! probe is clamped to the deadline so a timeout never overshoots it by more
//! than one interval.

use crate::error::ProviderError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Poller settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// States that keep the poller waiting
    pub pending: Vec<String>,
    /// State that ends the wait successfully
    pub target: String,
    /// Fixed time between two probes
    pub interval: Duration,
    /// Time before the first probe
    pub delay: Duration,
    /// Overall deadline, counted from the start of the wait
    pub timeout: Duration,
}

impl PollerConfig {
    /// Settings waiting for `target` while the state is one of `pending`
    pub fn new(pending: &[&str], target: &str, interval: Duration, delay: Duration, timeout: Duration) -> Self {
        Self {
            pending: pending.iter().map(|s| (*s).to_string()).collect(),
            target: target.to_string(),
            interval,
            delay,
            timeout,
        }
    }

    fn is_pending(&self, state: &str) -> bool {
        self.pending.iter().any(|p| p == state)
    }
}

/// Successful end of a wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// The target state
    pub state: String,
    /// Number of probes performed
    pub polls: u32,
    /// Time from the start of the wait to the successful probe
    pub elapsed: Duration,
}

/// Fixed-interval readiness poller for one resource
#[derive(Debug, Clone)]
pub struct ReadinessPoller {
    resource: String,
    config: PollerConfig,
}

impl ReadinessPoller {
    /// Create a poller for `resource` (used in logs and errors)
    pub fn new(resource: impl Into<String>, config: PollerConfig) -> Self {
        Self {
            resource: resource.into(),
            config,
        }
    }

    /// Probe until the target state is reached.
    ///
    /// `probe` is called once per poll and returns the current state label.
    pub async fn wait<F, Fut>(&self, cancel: &CancellationToken, mut probe: F) -> Result<PollReport, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, ProviderError>>,
    {
        let start = Instant::now();
        // None when the timeout is too large to represent: wait without a deadline
        let deadline = start.checked_add(self.config.timeout);
        let mut polls = 0u32;

        info!(
            "Waiting up to {:?} for {} to reach {}",
            self.config.timeout, self.resource, self.config.target
        );

        self.pause(cancel, self.config.delay.min(self.config.timeout)).await?;

        loop {
            if cancel.is_cancelled() {
                return Err(self.cancelled());
            }

            polls += 1;
            let state = probe().await?;
            let elapsed = start.elapsed();

            if state == self.config.target {
                info!("{} reached {} after {} polls ({:?})", self.resource, state, polls, elapsed);
                return Ok(PollReport { state, polls, elapsed });
            }

            if !self.config.is_pending(&state) {
                warn!("{} reached unexpected state {}", self.resource, state);
                return Err(ProviderError::UnexpectedState {
                    resource: self.resource.clone(),
                    state,
                    target: self.config.target.clone(),
                });
            }

            let now = Instant::now();
            if deadline.is_some_and(|d| now >= d) {
                warn!("Timed out waiting for {} (last state: {})", self.resource, state);
                return Err(ProviderError::Timeout {
                    resource: self.resource.clone(),
                    target: self.config.target.clone(),
                    last_state: state,
                    elapsed,
                });
            }

            debug!("{} is {}, polling again in {:?}", self.resource, state, self.config.interval);
            let remaining = deadline.map_or(self.config.interval, |d| d - now);
            self.pause(cancel, self.config.interval.min(remaining)).await?;
        }
    }

    /// Sleep for `duration` unless cancelled first
    async fn pause(&self, cancel: &CancellationToken, duration: Duration) -> Result<(), ProviderError> {
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(self.cancelled()),
            _ = sleep(duration) => Ok(()),
        }
    }

    fn cancelled(&self) -> ProviderError {
        info!("Stopped waiting for {}: cancelled", self.resource);
        ProviderError::Cancelled(self.resource.clone())
    }
}
