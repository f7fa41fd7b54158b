//! Single search attempt.
//!
//! An attempt builds a fresh [`AttemptContext`] (shuffled slot order,
//! empty schedule, full remaining hours), runs the backtracking solver
//! once, and converts every outcome into an [`AttemptResult`]. Nothing
//! escapes an attempt: aborts and panics become failed results.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::TimetableError;
use crate::models::{Lesson, ScheduledEntry, SchedulerInput};

use super::backtrack::solve;
use super::context::{AttemptContext, SearchLimits};

/// Default number of decision-log lines kept per attempt.
pub const DEFAULT_LOG_CAPACITY: usize = 2_000;

/// Counters of one attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptStats {
    /// Seed of the attempt's slot shuffle.
    pub seed: u64,
    /// Solver steps taken.
    pub steps: u64,
    /// Placements undone.
    pub backtracks: u64,
    /// Wall-clock time (ms).
    pub elapsed_ms: u64,
}

/// Outcome of one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// Whether every active lesson was fully placed.
    pub success: bool,
    /// Committed entries (empty on failure).
    pub schedule: Vec<ScheduledEntry>,
    /// Lessons with unplaced hours (empty exactly on success).
    pub unassigned_lessons: Vec<Lesson>,
    /// Decision log.
    pub logs: Vec<String>,
    /// Why the attempt failed.
    pub error: Option<TimetableError>,
    /// Counters.
    pub stats: AttemptStats,
}

impl AttemptResult {
    /// A successful attempt.
    pub fn completed(schedule: Vec<ScheduledEntry>, logs: Vec<String>, stats: AttemptStats) -> Self {
        Self {
            success: true,
            schedule,
            unassigned_lessons: Vec::new(),
            logs,
            error: None,
            stats,
        }
    }

    /// A failed attempt: no schedule, the given lessons unassigned.
    pub fn failed(
        unassigned_lessons: Vec<Lesson>,
        error: TimetableError,
        logs: Vec<String>,
        stats: AttemptStats,
    ) -> Self {
        Self {
            success: false,
            schedule: Vec::new(),
            unassigned_lessons,
            logs,
            error: Some(error),
            stats,
        }
    }
}

/// Anything that can produce attempt results for the optimizer.
pub trait AttemptSource: Sync {
    /// Runs attempt number `attempt` with the given shuffle seed.
    fn run_attempt(&self, input: &SchedulerInput, attempt: usize, seed: u64) -> AttemptResult;
}

/// Runs one backtracking attempt.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Lesson, Location, SchedulerInput, Teacher};
/// use u_timetable::scheduler::AttemptRunner;
///
/// let input = SchedulerInput::new()
///     .with_teacher(Teacher::new("T1"))
///     .with_location(Location::classroom("R1"))
///     .with_lesson(Lesson::new("L1", "it", 10, 2).with_teacher("T1"));
///
/// let result = AttemptRunner::new().run(&input, 42);
/// assert!(result.success);
/// assert_eq!(result.schedule.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AttemptRunner {
    limits: SearchLimits,
    log_capacity: usize,
}

impl AttemptRunner {
    /// Creates a runner without search bounds.
    pub fn new() -> Self {
        Self {
            limits: SearchLimits::unbounded(),
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }

    /// Sets the search bounds.
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the decision-log capacity.
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    /// Runs one attempt with the slot order shuffled by `seed`.
    pub fn run(&self, input: &SchedulerInput, seed: u64) -> AttemptResult {
        let started = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut stats = AttemptStats {
            seed,
            ..AttemptStats::default()
        };

        let mut ctx = match AttemptContext::new(input, &mut rng, self.limits, self.log_capacity) {
            Ok(ctx) => ctx,
            Err(err) => {
                warn!(event = "attempt_invalid", seed, error = %err);
                stats.elapsed_ms = started.elapsed().as_millis() as u64;
                let unassigned = input.active_lessons().cloned().collect();
                return AttemptResult::failed(unassigned, err.clone(), vec![err.to_string()], stats);
            }
        };
        info!(
            event = "attempt_start",
            seed,
            lessons = ctx.space.lessons.len(),
            slots = ctx.space.slot_order.len(),
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let AttemptContext { space, state } = &mut ctx;
            solve(space, state, 0)
        }));

        stats.steps = ctx.state.budget.steps();
        stats.backtracks = ctx.state.backtracks;
        stats.elapsed_ms = ctx.state.budget.elapsed().as_millis() as u64;
        let panicked = outcome.is_err();

        let error = match outcome {
            Ok(Ok(true)) => None,
            Ok(Ok(false)) => {
                let lesson_id = ctx
                    .space
                    .lessons
                    .get(ctx.state.frontier)
                    .map(|plan| plan.lesson.id.clone())
                    .unwrap_or_default();
                Some(TimetableError::ConstraintExhaustion { lesson_id })
            }
            Ok(Err(err)) => Some(err),
            Err(payload) => Some(TimetableError::Internal(panic_message(payload.as_ref()))),
        };

        info!(
            event = "attempt_end",
            seed,
            success = error.is_none(),
            steps = stats.steps,
            backtracks = stats.backtracks,
            duration_ms = stats.elapsed_ms,
            log_truncated = ctx.state.log.is_truncated(),
        );

        // Counters are restored on every failure path except a panic.
        let unassigned: Vec<Lesson> = if panicked {
            ctx.space.lessons.iter().map(|plan| plan.lesson.clone()).collect()
        } else {
            ctx.unassigned_lessons()
        };
        let state = ctx.state;
        let mut logs = state.log.into_lines();
        match error {
            None => {
                logs.push(format!(
                    "attempt completed: {} entries, {} steps, {} backtracks",
                    state.schedule.len(),
                    stats.steps,
                    stats.backtracks
                ));
                AttemptResult::completed(state.schedule.into_entries(), logs, stats)
            }
            Some(err) => {
                logs.push(format!("attempt failed: {err}"));
                AttemptResult::failed(unassigned, err, logs, stats)
            }
        }
    }
}

impl Default for AttemptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptSource for AttemptRunner {
    fn run_attempt(&self, input: &SchedulerInput, _attempt: usize, seed: u64) -> AttemptResult {
        self.run(input, seed)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("search panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("search panicked: {message}")
    } else {
        "search panicked".to_string()
    }
}
