//! Multi-attempt optimization.
//!
//! Runs several independently seeded attempts, drops completed schedules
//! that leave a teacher without a free day, and keeps the one with the
//! lowest fitness.
//!
//! | Part | Module |
//! |------|--------|
//! | Settings and TOML loading | `config` |
//! | Fitness terms and free-day check | `fitness` |
//! | Attempt loop and selection | `runner` |

mod config;
mod fitness;
mod runner;

pub use config::{ConfigError, OptimizerConfig};
pub use fitness::{teachers_without_free_day, FitnessBreakdown};
pub use runner::{BestScheduleResult, Optimizer};
