//! Delay sequence and cumulative budget for stabilization polling.

use crate::error::{HandlerCoreError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shape of the delay sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DelayStrategy {
    /// Same delay before every re-invocation
    Constant,
    /// `initial_delay * multiplier^(attempt - 1)`, capped at `max_delay`
    Exponential { multiplier: f64, max_delay: Duration },
}

/// Delay sequence bounded by a total budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    initial_delay: Duration,
    total_timeout: Duration,
    strategy: DelayStrategy,
}

impl BackoffPolicy {
    /// Constant delay policy
    pub fn new(initial_delay: Duration, total_timeout: Duration) -> Self {
        Self {
            initial_delay,
            total_timeout,
            strategy: DelayStrategy::Constant,
        }
    }

    pub fn exponential(
        initial_delay: Duration,
        total_timeout: Duration,
        multiplier: f64,
        max_delay: Duration,
    ) -> Self {
        Self::new(initial_delay, total_timeout).with_strategy(DelayStrategy::Exponential {
            multiplier,
            max_delay,
        })
    }

    pub fn with_strategy(mut self, strategy: DelayStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn total_timeout(&self) -> Duration {
        self.total_timeout
    }

    pub fn strategy(&self) -> DelayStrategy {
        self.strategy
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_delay.is_zero() {
            return Err(HandlerCoreError::InvalidPolicy(
                "initial_delay must be greater than zero".to_string(),
            ));
        }
        if self.total_timeout < self.initial_delay {
            return Err(HandlerCoreError::InvalidPolicy(format!(
                "total_timeout {:?} is shorter than initial_delay {:?}",
                self.total_timeout, self.initial_delay
            )));
        }
        if let DelayStrategy::Exponential {
            multiplier,
            max_delay,
        } = self.strategy
        {
            if !multiplier.is_finite() || multiplier < 1.0 {
                return Err(HandlerCoreError::InvalidPolicy(format!(
                    "multiplier must be a finite value >= 1.0, got {multiplier}"
                )));
            }
            if max_delay < self.initial_delay {
                return Err(HandlerCoreError::InvalidPolicy(format!(
                    "max_delay {:?} is shorter than initial_delay {:?}",
                    max_delay, self.initial_delay
                )));
            }
        }
        Ok(())
    }

    /// Delay to wait after attempt `attempt` (1-based) fails.
    ///
    /// A multiplier that [`validate`](Self::validate) would reject (below 1.0
    /// or not finite) is treated as 1.0, so the sequence never shrinks.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.strategy {
            DelayStrategy::Constant => self.initial_delay,
            DelayStrategy::Exponential {
                multiplier,
                max_delay,
            } => {
                let multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
                    multiplier
                } else {
                    1.0
                };
                let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
                let seconds = self.initial_delay.as_secs_f64() * multiplier.powi(exponent);
                if !seconds.is_finite() || seconds >= max_delay.as_secs_f64() {
                    max_delay
                } else {
                    Duration::from_secs_f64(seconds)
                }
            }
        }
    }

    /// Sum of the delays already reported to the host before attempt `attempt`
    pub fn elapsed_before(&self, attempt: u32) -> Duration {
        let mut elapsed = Duration::ZERO;
        if self.initial_delay.is_zero() {
            return elapsed;
        }
        for previous in 1..attempt.max(1) {
            elapsed = elapsed.saturating_add(whole_seconds(self.delay_for(previous)));
            if elapsed >= self.total_timeout {
                break;
            }
        }
        elapsed
    }

    /// Delay before re-checking after attempt `attempt`, or `None` once the
    /// cumulative delay has used up the total budget.
    ///
    /// Delays are whole seconds, the same value the host is told to wait, so
    /// the budget is charged with what is actually requested.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if self.elapsed_before(attempt) >= self.total_timeout {
            return None;
        }
        let delay = self.delay_for(attempt);
        // Zero-length steps would never exhaust the budget
        if delay.is_zero() {
            return None;
        }
        Some(whole_seconds(delay))
    }
}

fn whole_seconds(delay: Duration) -> Duration {
    Duration::from_secs(u64::from(delay_seconds(delay)))
}

/// Whole seconds reported to the host, rounded up and never zero
pub fn delay_seconds(delay: Duration) -> u32 {
    let mut seconds = delay.as_secs();
    if delay.subsec_nanos() > 0 {
        seconds = seconds.saturating_add(1);
    }
    u32::try_from(seconds.max(1)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_policy_exhausts_budget() {
        let policy = BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(3));
        assert_eq!(policy.next_delay(1), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(3), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(4), None);
        assert_eq!(policy.next_delay(50), None);
    }

    #[test]
    fn test_exponential_policy_caps_delay() {
        let policy = BackoffPolicy::exponential(
            Duration::from_secs(2),
            Duration::from_secs(60),
            2.0,
            Duration::from_secs(10),
        );
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));
        assert_eq!(policy.delay_for(4), Duration::from_secs(10));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(10));
        // 2 + 4 + 8 + 10 * 4 = 54, then one more step reaches 64
        assert_eq!(policy.next_delay(8), Some(Duration::from_secs(10)));
        assert_eq!(policy.next_delay(9), None);
    }

    #[test]
    fn test_attempt_zero_behaves_like_first() {
        let policy = BackoffPolicy::new(Duration::from_secs(5), Duration::from_secs(30));
        assert_eq!(policy.next_delay(0), policy.next_delay(1));
    }

    #[test]
    fn test_validation() {
        assert!(BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(3))
            .validate()
            .is_ok());
        assert!(BackoffPolicy::new(Duration::ZERO, Duration::from_secs(3))
            .validate()
            .is_err());
        assert!(BackoffPolicy::new(Duration::from_secs(10), Duration::from_secs(3))
            .validate()
            .is_err());
        assert!(BackoffPolicy::exponential(
            Duration::from_secs(1),
            Duration::from_secs(3),
            0.5,
            Duration::from_secs(2)
        )
        .validate()
        .is_err());
    }

    #[test]
    fn test_zero_delay_policy_times_out() {
        let policy = BackoffPolicy::new(Duration::ZERO, Duration::from_secs(3));
        assert_eq!(policy.next_delay(1), None);
    }

    #[test]
    fn test_invalid_multiplier_does_not_panic() {
        let policy = BackoffPolicy::exponential(
            Duration::from_secs(1),
            Duration::from_secs(60),
            -2.0,
            Duration::from_secs(10),
        );
        assert!(policy.validate().is_err());
        for attempt in 1..=6 {
            assert_eq!(policy.delay_for(attempt), Duration::from_secs(1));
        }

        let shrinking = BackoffPolicy::exponential(
            Duration::from_secs(4),
            Duration::from_secs(60),
            0.1,
            Duration::from_secs(10),
        );
        assert_eq!(shrinking.delay_for(5), Duration::from_secs(4));
        assert_eq!(
            BackoffPolicy::exponential(Duration::from_secs(1), Duration::from_secs(5), f64::NAN, Duration::from_secs(3))
                .delay_for(3),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_sub_second_delays_charge_reported_seconds() {
        let policy = BackoffPolicy::new(Duration::from_millis(500), Duration::from_secs(3));
        let delays: Vec<Option<Duration>> = (1..=4).map(|attempt| policy.next_delay(attempt)).collect();
        assert_eq!(
            delays,
            vec![
                Some(Duration::from_secs(1)),
                Some(Duration::from_secs(1)),
                Some(Duration::from_secs(1)),
                None
            ]
        );
    }

    #[test]
    fn test_delay_seconds_rounds_up() {
        assert_eq!(delay_seconds(Duration::from_secs(5)), 5);
        assert_eq!(delay_seconds(Duration::from_millis(5_200)), 6);
        assert_eq!(delay_seconds(Duration::from_millis(10)), 1);
        assert_eq!(delay_seconds(Duration::ZERO), 1);
    }
}
