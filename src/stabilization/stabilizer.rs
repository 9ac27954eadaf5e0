//! The reusable stabilization loop.
//!
//! One call to [`Stabilizer::poll`] is one pass of the loop: check, then either
//! confirm, schedule the next check, or give up. The loop never sleeps; the
//! host re-invokes the operation after the reported delay with the same
//! callback state.

use super::backoff::{delay_seconds, BackoffPolicy};
use crate::callback::CallbackState;
use crate::constants::{callback_keys, HandlerErrorCode};
use crate::progress::ProgressResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Where the loop stands after one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StabilizationState {
    /// Not done yet; check again after `delay`
    Polling { attempt: u32, delay: Duration },
    /// Target state reached
    Confirmed { attempts: u32 },
    /// Budget exhausted without reaching the target state
    TimedOut { attempts: u32 },
}

impl StabilizationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StabilizationState::Polling { .. })
    }
}

/// Named stabilization loop over a [`BackoffPolicy`]
#[derive(Debug, Clone, PartialEq)]
pub struct Stabilizer {
    name: String,
    policy: BackoffPolicy,
    probe_threshold: Option<u32>,
}

impl Stabilizer {
    pub fn new(name: impl Into<String>, policy: BackoffPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            probe_threshold: None,
        }
    }

    /// Gate the check through the probing debouncer under this loop's name
    pub fn with_probing(mut self, threshold: u32) -> Self {
        self.probe_threshold = Some(threshold);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    fn attempt_key(&self) -> String {
        format!("{}{}", self.name, callback_keys::ATTEMPT_SUFFIX)
    }

    fn started_at_key(&self) -> String {
        format!("{}{}", self.name, callback_keys::STARTED_AT_SUFFIX)
    }

    fn timed_out_key(&self) -> String {
        format!("{}{}", self.name, callback_keys::TIMED_OUT_SUFFIX)
    }

    /// Attempt number the next pass will run as
    pub fn attempt(&self, state: &CallbackState) -> u32 {
        state
            .count(&self.attempt_key())
            .and_then(|attempt| u32::try_from(attempt).ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Forget this loop's bookkeeping so the next pass starts at attempt 1
    pub fn reset(&self, state: &mut CallbackState) {
        state.clear_milestone(&self.attempt_key());
        state.clear_milestone(&self.timed_out_key());
        state.clear_timestamp(&self.started_at_key());
        state.probing_mut().reset(&self.name);
    }

    /// Run one pass of the loop.
    ///
    /// Errors from `check_done` are returned untouched and leave the attempt
    /// counter where it was; classifying them is the caller's job.
    pub fn poll<F, E>(&self, state: &mut CallbackState, check_done: F) -> Result<StabilizationState, E>
    where
        F: FnOnce() -> Result<bool, E>,
    {
        let attempt = self.attempt(state);

        // A timed-out loop stays timed out
        if state.flag(&self.timed_out_key()) {
            return Ok(StabilizationState::TimedOut { attempts: attempt });
        }

        if state.timestamp(&self.started_at_key()).is_none() {
            state.set_timestamp(self.started_at_key(), Utc::now());
        }

        let done = match self.probe_threshold {
            Some(threshold) => state
                .probing_mut()
                .try_with_probing(&self.name, threshold, check_done)?,
            None => check_done()?,
        };

        if done {
            info!(stabilizer = %self.name, attempt, "Resource stabilized");
            state.clear_milestone(&self.attempt_key());
            state.clear_timestamp(&self.started_at_key());
            return Ok(StabilizationState::Confirmed { attempts: attempt });
        }

        match self.policy.next_delay(attempt) {
            Some(delay) => {
                debug!(
                    stabilizer = %self.name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    probes = state.probing().probes(&self.name),
                    "Resource not yet stabilized"
                );
                state.set_count(self.attempt_key(), i64::from(attempt) + 1);
                Ok(StabilizationState::Polling { attempt, delay })
            }
            None => {
                error!(
                    stabilizer = %self.name,
                    attempt,
                    total_timeout_s = self.policy.total_timeout().as_secs(),
                    "Resource did not stabilize within budget"
                );
                state.set_count(self.attempt_key(), i64::from(attempt));
                state.set_flag(self.timed_out_key(), true);
                Ok(StabilizationState::TimedOut { attempts: attempt })
            }
        }
    }

    /// Run one pass and render it as a [`ProgressResult`] for the host
    pub fn stabilize<M, F, E>(
        &self,
        resource_model: M,
        mut callback_state: CallbackState,
        check_done: F,
    ) -> Result<ProgressResult<M>, E>
    where
        F: FnOnce(&M) -> Result<bool, E>,
    {
        let started_at = callback_state.timestamp(&self.started_at_key());
        let outcome = self.poll(&mut callback_state, || check_done(&resource_model))?;

        Ok(match outcome {
            StabilizationState::Confirmed { .. } => {
                ProgressResult::success(resource_model, callback_state)
            }
            StabilizationState::Polling { delay, .. } => {
                ProgressResult::in_progress(resource_model, callback_state, delay_seconds(delay))
            }
            StabilizationState::TimedOut { attempts } => {
                let since = started_at
                    .map(|at| format!(" (started {})", at.to_rfc3339()))
                    .unwrap_or_default();
                let message = format!(
                    "Resource did not stabilize after {attempts} attempts within {}s{since}",
                    self.policy.total_timeout().as_secs()
                );
                ProgressResult::success(resource_model, callback_state)
                    .into_failure(HandlerErrorCode::NotStabilized, message)
            }
        })
    }
}
