//! # Failure Classification
//!
//! Maps heterogeneous provider failures onto the closed set of outcomes a
//! handler may report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ Failure         │────▶│ ErrorRuleSet    │────▶│ ProgressResult  │
//! │ + kind / code   │     │ first match     │     │ Success/Failed  │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! Classification happens once, at the call site nearest the I/O step. The
//! resulting [`ProgressResult`](crate::progress::ProgressResult) is composed by
//! callers and never re-classified.
//!
//! ## Usage
//!
//! ```rust
//! use resource_handler_core::classification::{handle_exception, rule_set_for, OperationKind};
//! use resource_handler_core::{CallbackState, Failure, FailureKind, ProgressResult};
//!
//! let rules = rule_set_for(OperationKind::Delete);
//! let progress = ProgressResult::progress("queue-1".to_string(), CallbackState::new());
//!
//! // The queue is already gone: deleting it is done
//! let failure = Failure::of(FailureKind::NotFound, "queue does not exist");
//! let result = handle_exception(progress, &failure, &rules, None);
//! assert!(result.is_success());
//! ```

pub mod classifier;
pub mod defaults;
pub mod rules;

pub use classifier::{apply_outcome, classify, handle_exception, UNEXPECTED_ERROR_TAG};
pub use defaults::{default_rule_set, rule_set_for, tagging_rule_set, OperationKind};
pub use rules::{ErrorRuleSet, Matcher, Outcome, Rule, RuleSetBuilder};
