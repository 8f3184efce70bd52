//! Reputation-rating update policies
//!
//! A reputation rating is a lower-is-better value in [0, 1]: it enters the
//! auction's compound score directly, so a rating of 0 is a flawless
//! operator and 1 an operator whose recent requests all degraded. Both
//! policies consume the bidder's success window (most recent outcome at
//! the back) and evict the entries they no longer need, keeping the window
//! bounded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Declarative reputation-update configuration, as it appears in scenario
/// files. Tagged by `method`, so an unknown method name fails at
/// deserialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ReputationStrategyConfig {
    /// Sliding-window failure rate: rating = 1 - mean(last `window_size`
    /// outcomes).
    WindowedFailureRate { window_size: usize },

    /// Asymmetric penalty/decay: small fixed improvement on success, a
    /// commitment-scaled penalty on failure.
    AsymmetricPenalty { commitment: f64 },
}

impl ReputationStrategyConfig {
    /// Validate the declared parameters and bind the policy.
    pub fn bind(&self) -> Result<ReputationStrategy, ConfigError> {
        match *self {
            Self::WindowedFailureRate { window_size } => {
                if window_size == 0 {
                    return Err(ConfigError::InvalidWindowSize);
                }
                Ok(ReputationStrategy::WindowedFailureRate { window_size })
            }
            Self::AsymmetricPenalty { commitment } => {
                if !(commitment > 0.0 && commitment < 1.0) {
                    return Err(ConfigError::InvalidCommitment(commitment));
                }
                Ok(ReputationStrategy::AsymmetricPenalty { commitment })
            }
        }
    }
}

/// A bound, validated reputation-update policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReputationStrategy {
    WindowedFailureRate { window_size: usize },
    AsymmetricPenalty { commitment: f64 },
}

impl ReputationStrategy {
    /// Compute the updated rating for the given success window.
    ///
    /// Windowed failure rate: below `window_size` recorded outcomes the
    /// rating is unchanged; once the window is full the rating becomes
    /// `1 - mean(last window_size outcomes)` and exactly the oldest entry
    /// is evicted.
    ///
    /// Asymmetric penalty: only the trailing outcome is consulted. A
    /// success lowers the rating by 0.01, floored at 0; a failure raises
    /// it by `commitment / 100 / (1 - commitment)`, capped at 1. Older
    /// entries are trimmed away.
    pub fn update(&self, reputation: f64, window: &mut VecDeque<bool>) -> f64 {
        match *self {
            Self::WindowedFailureRate { window_size } => {
                if window.len() < window_size {
                    return reputation;
                }
                let successes = window.iter().rev().take(window_size).filter(|&&s| s).count();
                let rating = 1.0 - successes as f64 / window_size as f64;
                window.pop_front();
                rating
            }
            Self::AsymmetricPenalty { commitment } => {
                let Some(&latest) = window.back() else {
                    return reputation;
                };
                while window.len() > 1 {
                    window.pop_front();
                }
                if latest {
                    (reputation - 0.01).max(0.0)
                } else {
                    let penalty = commitment / 100.0 / (1.0 - commitment);
                    (reputation + penalty).min(1.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windowed_update_below_window_is_identity() {
        let strategy = ReputationStrategyConfig::WindowedFailureRate { window_size: 5 }
            .bind()
            .unwrap();
        let mut window = VecDeque::from(vec![true, false, true]);
        assert_eq!(strategy.update(0.37, &mut window), 0.37);
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn windowed_update_full_window_is_failure_rate() {
        let strategy = ReputationStrategyConfig::WindowedFailureRate { window_size: 5 }
            .bind()
            .unwrap();
        let mut window = VecDeque::from(vec![true, false, true, false, true]);
        // 3 successes out of 5 => rating 0.4, oldest entry evicted.
        assert!((strategy.update(0.5, &mut window) - 0.4).abs() < 1e-12);
        assert_eq!(window, VecDeque::from(vec![false, true, false, true]));
    }

    #[test]
    fn asymmetric_update_trims_window_to_latest() {
        let strategy = ReputationStrategyConfig::AsymmetricPenalty { commitment: 0.5 }
            .bind()
            .unwrap();
        let mut window = VecDeque::from(vec![false, false, true]);
        let rating = strategy.update(0.5, &mut window);
        assert!((rating - 0.49).abs() < 1e-12);
        assert_eq!(window, VecDeque::from(vec![true]));
    }

    #[test]
    fn bind_rejects_zero_window() {
        let err = ReputationStrategyConfig::WindowedFailureRate { window_size: 0 }
            .bind()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidWindowSize);
    }

    #[test]
    fn bind_rejects_degenerate_commitment() {
        for commitment in [0.0, 1.0, -0.5, 1.5] {
            let err = ReputationStrategyConfig::AsymmetricPenalty { commitment }
                .bind()
                .unwrap_err();
            assert_eq!(err, ConfigError::InvalidCommitment(commitment));
        }
    }
}
