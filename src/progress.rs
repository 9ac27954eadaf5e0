//! # Progress Results
//!
//! [`ProgressResult`] is the unit every component of this core hands back to
//! the handler, and the handler hands back to the host: success, "come back in
//! N seconds", or a terminal failure with a closed-set error code. Results are
//! composed with [`ProgressResult::then`]; once a failure has been classified
//! into a result it is never inspected again.

use crate::callback::CallbackState;
use crate::constants::HandlerErrorCode;
use serde::{Deserialize, Serialize};

/// Disposition reported to the host runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    Success,
    /// Re-invoke the operation after `callback_delay_seconds` with the same state
    InProgress { callback_delay_seconds: u32 },
    Failed {
        error_code: HandlerErrorCode,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResult<M> {
    #[serde(flatten)]
    pub status: ProgressStatus,
    pub resource_model: Option<M>,
    #[serde(default)]
    pub callback_state: CallbackState,
}

impl<M> ProgressResult<M> {
    pub fn success(resource_model: M, callback_state: CallbackState) -> Self {
        Self {
            status: ProgressStatus::Success,
            resource_model: Some(resource_model),
            callback_state,
        }
    }

    /// In progress with no delay: keep going within this invocation
    pub fn progress(resource_model: M, callback_state: CallbackState) -> Self {
        Self::in_progress(resource_model, callback_state, 0)
    }

    pub fn in_progress(resource_model: M, callback_state: CallbackState, delay_seconds: u32) -> Self {
        Self {
            status: ProgressStatus::InProgress {
                callback_delay_seconds: delay_seconds,
            },
            resource_model: Some(resource_model),
            callback_state,
        }
    }

    pub fn failed(error_code: HandlerErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: ProgressStatus::Failed {
                error_code,
                message: message.into(),
            },
            resource_model: None,
            callback_state: CallbackState::default(),
        }
    }

    /// Same model and state, re-marked as successful
    pub fn into_success(mut self) -> Self {
        self.status = ProgressStatus::Success;
        self
    }

    /// Same model and state, re-marked as a terminal failure
    pub fn into_failure(mut self, error_code: HandlerErrorCode, message: impl Into<String>) -> Self {
        self.status = ProgressStatus::Failed {
            error_code,
            message: message.into(),
        };
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ProgressStatus::Success)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.status, ProgressStatus::InProgress { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, ProgressStatus::Failed { .. })
    }

    pub fn error_code(&self) -> Option<HandlerErrorCode> {
        match &self.status {
            ProgressStatus::Failed { error_code, .. } => Some(*error_code),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.status {
            ProgressStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn callback_delay_seconds(&self) -> Option<u32> {
        match self.status {
            ProgressStatus::InProgress {
                callback_delay_seconds,
            } => Some(callback_delay_seconds),
            _ => None,
        }
    }

    /// In progress with no pending delay
    pub fn can_continue(&self) -> bool {
        self.callback_delay_seconds() == Some(0)
    }

    /// Run the next step of a handler chain.
    ///
    /// `next` only runs while the chain can continue within this invocation;
    /// success, scheduled re-invocations and failures are returned unchanged.
    pub fn then<F>(self, next: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if self.can_continue() {
            next(self)
        } else {
            self
        }
    }
}
