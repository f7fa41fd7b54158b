//! Error types for timetable search.
//!
//! Expected search failure (a lesson that does not fit under the current
//! partial assignment) is reported as a plain `false` from the solver and
//! only becomes [`TimetableError::ConstraintExhaustion`] when it reaches the
//! attempt boundary. `Err` inside the solver is reserved for aborts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TimeSlot;

/// Which exclusive resource a slot conflict concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Teacher,
    Location,
    Class,
}

/// Errors raised by attempts and by the optimizer.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum TimetableError {
    /// The search exhausted every option without placing this lesson.
    #[error("lesson '{lesson_id}' could not be placed under any assignment")]
    ConstraintExhaustion { lesson_id: String },

    /// The per-attempt step budget ran out.
    #[error("search step budget exhausted after {steps} steps")]
    BudgetExhausted { steps: u64 },

    /// The per-attempt deadline passed.
    #[error("search deadline of {limit_ms} ms exceeded")]
    DeadlineExceeded { limit_ms: u64 },

    /// A completed attempt left a teacher without a free day.
    #[error("attempt {attempt} rejected: teacher '{teacher_id}' has no free day")]
    FairnessRejection { attempt: usize, teacher_id: String },

    /// No attempt placed every lesson.
    #[error("no attempt completed: all {attempts} attempts failed to place every lesson")]
    NoAttemptCompleted { attempts: usize },

    /// Some attempts completed but every one was fairness-rejected.
    #[error(
        "{completed} of {attempts} attempts completed but none gave every teacher a free day"
    )]
    NoFreeDaySchedule { attempts: usize, completed: usize },

    /// Two entries claimed the same resource in the same slot.
    #[error("{kind:?} '{resource_id}' is already booked at {slot}")]
    SlotConflict {
        kind: ResourceKind,
        resource_id: String,
        slot: TimeSlot,
    },

    /// Unexpected fault inside one attempt.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TimetableError {
    /// Whether the error means the run produced no usable schedule.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TimetableError::NoAttemptCompleted { .. } | TimetableError::NoFreeDaySchedule { .. }
        )
    }
}

/// Result alias for timetable operations.
pub type Result<T> = std::result::Result<T, TimetableError>;
