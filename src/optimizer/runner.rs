//! Multi-attempt optimizer.
//!
//! # Algorithm
//!
//! 1. Derive one shuffle seed per attempt from a master ChaCha stream.
//! 2. Run the attempts, sequentially or on the rayon pool.
//! 3. For every completed attempt, in attempt order: audit the schedule,
//!    reject it if a teacher works on every day of the grid, otherwise
//!    score it.
//! 4. Keep the lowest score. Ties go to the earlier attempt, so parallel
//!    and sequential runs pick the same winner.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audit::audit_schedule;
use crate::error::TimetableError;
use crate::models::{Lesson, ScheduledEntry, SchedulerInput, Weekday};
use crate::scheduler::{AttemptResult, AttemptRunner, AttemptSource};

use super::fitness::{teachers_without_free_day, FitnessBreakdown};
use super::{ConfigError, OptimizerConfig};

/// Outcome of an optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestScheduleResult {
    /// Whether some attempt completed and passed the free-day rule.
    pub success: bool,
    /// Winning schedule (empty on failure).
    pub best_schedule: Vec<ScheduledEntry>,
    /// Every active lesson on failure, empty on success.
    pub unassigned_lessons: Vec<Lesson>,
    /// One line per attempt, then the winner's decision log.
    pub logs: Vec<String>,
    /// Attempts run.
    pub attempts_made: usize,
    /// Attempts that placed every lesson (fairness-rejected ones included).
    pub successful_attempts: usize,
    /// Completed attempts dropped by the free-day rule.
    pub rejected_attempts: usize,
    /// Index of the winning attempt.
    pub best_attempt: Option<usize>,
    /// Fitness of the winner (0 on failure).
    pub min_fitness_score: f64,
    /// Teacher-load variance of the winner.
    pub best_variance: f64,
    /// Idle hours of the winner.
    pub best_total_gaps: u32,
    /// Short-day penalty of the winner.
    pub best_short_day_penalty: u32,
    /// Why no schedule was found.
    pub error: Option<TimetableError>,
}

/// Runs independent attempts and keeps the best fair schedule.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Lesson, Location, SchedulerInput, Teacher};
/// use u_timetable::optimizer::{Optimizer, OptimizerConfig};
///
/// let input = SchedulerInput::new()
///     .with_teacher(Teacher::new("T1"))
///     .with_location(Location::classroom("R1"))
///     .with_lesson(Lesson::new("L1", "it", 10, 6).divisible().with_teacher("T1"));
///
/// let optimizer = Optimizer::new(OptimizerConfig::new().with_attempts(3).with_seed(1)).unwrap();
/// let result = optimizer.optimize(&input);
///
/// assert!(result.success);
/// assert_eq!(result.best_schedule.len(), 6);
/// assert_eq!(result.attempts_made, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: OptimizerConfig,
    runner: AttemptRunner,
}

struct Candidate {
    attempt: usize,
    schedule: Vec<ScheduledEntry>,
    logs: Vec<String>,
    fitness: FitnessBreakdown,
}

impl Optimizer {
    /// Creates an optimizer after validating `config`.
    pub fn new(config: OptimizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let runner = AttemptRunner::new()
            .with_limits(config.search_limits())
            .with_log_capacity(config.max_log_lines);
        Ok(Self { config, runner })
    }

    /// The configuration in use.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Runs the configured attempts with the backtracking solver.
    pub fn optimize(&self, input: &SchedulerInput) -> BestScheduleResult {
        self.optimize_with(&self.runner, input)
    }

    /// Runs the configured attempts through `source`.
    pub fn optimize_with<S>(&self, source: &S, input: &SchedulerInput) -> BestScheduleResult
    where
        S: AttemptSource + ?Sized,
    {
        let seeds = self.attempt_seeds();
        let results: Vec<AttemptResult> = if self.config.parallel {
            seeds
                .par_iter()
                .enumerate()
                .map(|(attempt, &seed)| source.run_attempt(input, attempt, seed))
                .collect()
        } else {
            seeds
                .iter()
                .enumerate()
                .map(|(attempt, &seed)| source.run_attempt(input, attempt, seed))
                .collect()
        };

        let days: Vec<Weekday> = input.grid().days().collect();
        let mut logs = Vec::with_capacity(results.len() + 1);
        let mut successful = 0;
        let mut rejected = 0;
        let mut best: Option<Candidate> = None;

        for (attempt, result) in results.into_iter().enumerate() {
            let seed = result.stats.seed;
            if !result.success {
                let reason = result
                    .error
                    .as_ref()
                    .map_or_else(|| "unknown failure".to_string(), ToString::to_string);
                logs.push(format!("attempt {attempt} (seed {seed}): failed: {reason}"));
                continue;
            }

            if let Err(violations) = audit_schedule(input, &result.schedule) {
                let error = TimetableError::Internal(format!(
                    "completed schedule failed audit with {} violations, first: {}",
                    violations.len(),
                    violations[0].message
                ));
                warn!(event = "attempt_audit_failed", attempt, violations = violations.len());
                logs.push(format!("attempt {attempt} (seed {seed}): failed: {error}"));
                continue;
            }
            successful += 1;

            let busy = teachers_without_free_day(&result.schedule, days.iter().copied());
            if let Some(teacher_id) = busy.into_iter().next() {
                rejected += 1;
                let error = TimetableError::FairnessRejection { attempt, teacher_id };
                info!(event = "attempt_rejected", attempt, seed, reason = %error);
                logs.push(format!("attempt {attempt} (seed {seed}): {error}"));
                continue;
            }

            let fitness = FitnessBreakdown::calculate(&result.schedule, &self.config);
            logs.push(format!(
                "attempt {attempt} (seed {seed}): fitness {:.4} (variance {:.4}, gaps {}, short days {})",
                fitness.fitness, fitness.variance, fitness.total_gap_hours, fitness.short_day_penalty
            ));
            if best.as_ref().map_or(true, |b| fitness.fitness < b.fitness.fitness) {
                best = Some(Candidate {
                    attempt,
                    schedule: result.schedule,
                    logs: result.logs,
                    fitness,
                });
            }
        }

        let attempts_made = seeds.len();
        info!(
            event = "optimize_end",
            attempts = attempts_made,
            successful,
            rejected,
            best_attempt = best.as_ref().map(|b| b.attempt),
            fitness = best.as_ref().map(|b| b.fitness.fitness),
        );

        match best {
            Some(winner) => {
                logs.push(format!("best attempt {}:", winner.attempt));
                logs.extend(winner.logs);
                BestScheduleResult {
                    success: true,
                    best_schedule: winner.schedule,
                    unassigned_lessons: Vec::new(),
                    logs,
                    attempts_made,
                    successful_attempts: successful,
                    rejected_attempts: rejected,
                    best_attempt: Some(winner.attempt),
                    min_fitness_score: winner.fitness.fitness,
                    best_variance: winner.fitness.variance,
                    best_total_gaps: winner.fitness.total_gap_hours,
                    best_short_day_penalty: winner.fitness.short_day_penalty,
                    error: None,
                }
            }
            None => {
                let error = if successful == 0 {
                    TimetableError::NoAttemptCompleted {
                        attempts: attempts_made,
                    }
                } else {
                    TimetableError::NoFreeDaySchedule {
                        attempts: attempts_made,
                        completed: successful,
                    }
                };
                logs.push(error.to_string());
                BestScheduleResult {
                    success: false,
                    best_schedule: Vec::new(),
                    unassigned_lessons: input.active_lessons().cloned().collect(),
                    logs,
                    attempts_made,
                    successful_attempts: successful,
                    rejected_attempts: rejected,
                    best_attempt: None,
                    min_fitness_score: 0.0,
                    best_variance: 0.0,
                    best_total_gaps: 0,
                    best_short_day_penalty: 0,
                    error: Some(error),
                }
            }
        }
    }

    fn attempt_seeds(&self) -> Vec<u64> {
        let master = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(master);
        (0..self.config.number_of_attempts)
            .map(|_| rng.random())
            .collect()
    }
}
