//! Optimizer configuration.
//!
//! Every field has a default, so a TOML file only names what it changes:
//!
//! ```
//! use u_timetable::optimizer::OptimizerConfig;
//!
//! let config = OptimizerConfig::from_toml_str(r#"
//!     number_of_attempts = 25
//!     weight_gaps = 2.5
//!     seed = 7
//! "#).unwrap();
//!
//! assert_eq!(config.number_of_attempts, 25);
//! assert_eq!(config.min_lessons_per_day, 4);
//! assert_eq!(config.seed, Some(7));
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scheduler::SearchLimits;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Multi-attempt optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Independent attempts to run.
    pub number_of_attempts: usize,
    /// Weight of the teacher-load variance.
    pub weight_variance: f64,
    /// Weight of the idle hours between lessons.
    pub weight_gaps: f64,
    /// Weight of the short-day penalty.
    pub weight_short_days: f64,
    /// Teacher-days with fewer lessons than this are penalized.
    pub min_lessons_per_day: u32,
    /// Master seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Solver steps allowed per attempt.
    pub max_steps_per_attempt: Option<u64>,
    /// Wall-clock limit per attempt (ms).
    pub attempt_time_limit_ms: Option<u64>,
    /// Run attempts on the rayon pool.
    pub parallel: bool,
    /// Decision-log lines kept per attempt.
    pub max_log_lines: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            number_of_attempts: 10,
            weight_variance: 1.0,
            weight_gaps: 1.0,
            weight_short_days: 1.0,
            min_lessons_per_day: 4,
            seed: None,
            max_steps_per_attempt: Some(2_000_000),
            attempt_time_limit_ms: None,
            parallel: false,
            max_log_lines: 2_000,
        }
    }
}

impl OptimizerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the number of attempts.
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.number_of_attempts = attempts;
        self
    }

    /// Sets the three fitness weights.
    pub fn with_weights(mut self, variance: f64, gaps: f64, short_days: f64) -> Self {
        self.weight_variance = variance;
        self.weight_gaps = gaps;
        self.weight_short_days = short_days;
        self
    }

    /// Sets the short-day threshold.
    pub fn with_min_lessons_per_day(mut self, min: u32) -> Self {
        self.min_lessons_per_day = min;
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the per-attempt step bound.
    pub fn with_max_steps(mut self, steps: Option<u64>) -> Self {
        self.max_steps_per_attempt = steps;
        self
    }

    /// Sets the per-attempt time limit.
    pub fn with_time_limit_ms(mut self, limit_ms: Option<u64>) -> Self {
        self.attempt_time_limit_ms = limit_ms;
        self
    }

    /// Enables or disables parallel attempts.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the decision-log capacity.
    pub fn with_max_log_lines(mut self, lines: usize) -> Self {
        self.max_log_lines = lines;
        self
    }

    /// Checks the values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if there are no attempts, the
    /// short-day threshold is zero, a weight is negative or not finite, or
    /// no search bound is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_attempts == 0 {
            return Err(ConfigError::Invalid("number_of_attempts must be at least 1".into()));
        }
        if self.min_lessons_per_day == 0 {
            return Err(ConfigError::Invalid("min_lessons_per_day must be at least 1".into()));
        }
        for (name, weight) in [
            ("weight_variance", self.weight_variance),
            ("weight_gaps", self.weight_gaps),
            ("weight_short_days", self.weight_short_days),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite non-negative number, got {weight}"
                )));
            }
        }
        if self.max_steps_per_attempt.is_none() && self.attempt_time_limit_ms.is_none() {
            return Err(ConfigError::Invalid(
                "an attempt needs max_steps_per_attempt or attempt_time_limit_ms".into(),
            ));
        }
        Ok(())
    }

    /// Search bounds of one attempt.
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_steps: self.max_steps_per_attempt,
            time_limit: self.attempt_time_limit_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = OptimizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.number_of_attempts, 10);
        assert!((config.weight_variance - 1.0).abs() < 1e-10);
        assert_eq!(config.max_steps_per_attempt, Some(2_000_000));
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = OptimizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, OptimizerConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = OptimizerConfig::from_toml_str(
            r#"
            number_of_attempts = 3
            weight_variance = 0.5
            min_lessons_per_day = 3
            attempt_time_limit_ms = 1500
            parallel = true
            "#,
        )
        .unwrap();
        assert_eq!(config.number_of_attempts, 3);
        assert!((config.weight_variance - 0.5).abs() < 1e-10);
        assert_eq!(config.min_lessons_per_day, 3);
        assert!(config.parallel);

        let limits = config.search_limits();
        assert_eq!(limits.max_steps, Some(2_000_000));
        assert_eq!(limits.time_limit, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_toml_type_error() {
        let err = OptimizerConfig::from_toml_str("number_of_attempts = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = OptimizerConfig::from_toml_str("number_of_attempts = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = OptimizerConfig::new().with_weights(1.0, -1.0, 1.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weight_gaps"));
    }

    #[test]
    fn test_unbounded_search_rejected() {
        let config = OptimizerConfig::new().with_max_steps(None);
        assert!(config.validate().is_err());
        assert!(config.with_time_limit_ms(Some(100)).validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = OptimizerConfig::from_toml_file("/nonexistent/optimizer.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
