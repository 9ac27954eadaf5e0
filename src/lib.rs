#![allow(clippy::doc_markdown)] // Allow technical terms in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Resource Handler Core
//!
//! Shared machinery for resource lifecycle handlers: the create, read, update,
//! delete and list operations that drive a remote cloud resource on behalf of
//! a host runtime.
//!
//! ## Overview
//!
//! A handler invocation talks to a remote service, possibly several times, and
//! reports one [`ProgressResult`] back to the host. The host re-invokes the
//! handler with the returned [`CallbackState`] while the result is in
//! progress. This crate supplies the pieces every handler repeats:
//!
//! - [`classification`] - turns a provider [`Failure`] into success or a
//!   caller-facing [`HandlerErrorCode`] through an ordered [`ErrorRuleSet`]
//! - [`probing`] - debounces an "is it ready?" signal over consecutive checks
//! - [`stabilization`] - polls until a resource reaches its target state within
//!   a backoff budget, one pass per invocation
//! - [`tagging`] - computes and issues the minimal tag mutation, with soft and
//!   hard failure modes
//!
//! ## Module Organization
//!
//! - [`constants`] - handler and provider error codes, callback-state keys
//! - [`failure`] - the failure taxonomy handed to the classifier
//! - [`progress`] - the per-invocation result sent to the host
//! - [`callback`] - state persisted between invocations
//! - [`config`] - layered backoff and probing configuration
//! - [`logging`] - the per-request log sink and structured tracing setup
//! - [`error`] - errors raised by the core itself
//!
//! ## Quick Start
//!
//! ```rust
//! use resource_handler_core::classification::{handle_exception, rule_set_for, OperationKind};
//! use resource_handler_core::{CallbackState, Failure, HandlerErrorCode, ProgressResult};
//!
//! let rules = rule_set_for(OperationKind::Create);
//! let progress = ProgressResult::progress("bucket-1".to_string(), CallbackState::new());
//!
//! let failure = Failure::remote_service("ThrottlingException", "Rate exceeded");
//! let result = handle_exception(progress, &failure, &rules, None);
//!
//! assert_eq!(result.error_code(), Some(HandlerErrorCode::Throttling));
//! assert_eq!(result.message(), Some("Rate exceeded"));
//! ```

pub mod callback;
pub mod classification;
pub mod config;
pub mod constants;
pub mod error;
pub mod failure;
pub mod logging;
pub mod probing;
pub mod progress;
pub mod stabilization;
pub mod tagging;

pub use callback::{CallbackState, Milestone};
pub use classification::{
    default_rule_set, handle_exception, rule_set_for, tagging_rule_set, ErrorRuleSet,
    OperationKind, Outcome,
};
pub use config::{BackoffConfig, BackoffStrategy, HandlerConfig, ProbingConfig};
pub use constants::{HandlerErrorCode, ServiceErrorCode};
pub use error::{HandlerCoreError, Result};
pub use failure::{Failure, FailureKind};
pub use logging::{HandlerLogger, RecordingLogger, TracingLogger};
pub use probing::ProbingContext;
pub use progress::{ProgressResult, ProgressStatus};
pub use stabilization::{BackoffPolicy, DelayStrategy, StabilizationState, Stabilizer};
pub use tagging::{TagDiff, TagReconciler, TagSet, TaggingClient, Tags};
