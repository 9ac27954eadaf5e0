//! # Stabilization
//!
//! Polls a remote resource until it reaches a target state, one pass per
//! invocation, bounded by the cumulative budget of a [`BackoffPolicy`].
//!
//! ```text
//!            check_done() ──true──▶ Confirmed
//!                 │
//!               false
//!                 ▼
//!     next_delay(attempt) ──None──▶ TimedOut
//!                 │
//!              Some(d)
//!                 ▼
//!     Polling (host re-invokes after d)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use resource_handler_core::stabilization::{BackoffPolicy, Stabilizer};
//! use resource_handler_core::CallbackState;
//! use std::time::Duration;
//!
//! let stabilizer = Stabilizer::new(
//!     "cluster.available",
//!     BackoffPolicy::new(Duration::from_secs(15), Duration::from_secs(1800)),
//! )
//! .with_probing(3);
//!
//! let result = stabilizer
//!     .stabilize("cluster-1", CallbackState::with_probing_enabled(true), |_| {
//!         Ok::<_, std::io::Error>(true)
//!     })
//!     .unwrap();
//!
//! // One positive observation is not enough yet
//! assert_eq!(result.callback_delay_seconds(), Some(15));
//! ```

pub mod backoff;
pub mod stabilizer;

pub use backoff::{delay_seconds, BackoffPolicy, DelayStrategy};
pub use stabilizer::{StabilizationState, Stabilizer};
