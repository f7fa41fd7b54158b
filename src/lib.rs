//! Weekly lesson timetabling for the U-Engine ecosystem.
//!
//! Places every weekly hour of every active lesson onto a teacher, a
//! location and a time slot, honouring availability, resource exclusivity
//! and divisibility rules, then picks the fairest of several randomized
//! attempts.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Lesson`, `Teacher`, `Location`, `TimeSlot`,
//!   `SlotGrid`, `ScheduledEntry`, `Schedule`, `SchedulerInput`
//! - **`scheduler`**: One backtracking attempt: availability checks, block
//!   finder, single- and dual-resource placement, `AttemptRunner`
//! - **`optimizer`**: Multi-attempt search with free-day filter and fitness
//!   scoring, `OptimizerConfig` (TOML)
//! - **`audit`**: Independent re-check of a finished schedule
//! - **`error`**: `TimetableError`
//!
//! # Example
//!
//! ```
//! use u_timetable::{Lesson, Location, Optimizer, OptimizerConfig, SchedulerInput, Teacher};
//!
//! let input = SchedulerInput::new()
//!     .with_teacher(Teacher::new("T1"))
//!     .with_teacher(Teacher::new("T2"))
//!     .with_location(Location::classroom("R1"))
//!     .with_location(Location::lab("LAB1", "computer"))
//!     .with_lesson(Lesson::new("math", "it", 10, 4).with_teacher("T1"))
//!     .with_lesson(
//!         Lesson::new("coding", "it", 10, 6)
//!             .divisible()
//!             .with_lab_type("computer")
//!             .with_teacher("T2"),
//!     );
//!
//! let config = OptimizerConfig::new().with_attempts(5).with_seed(3);
//! let result = Optimizer::new(config).unwrap().optimize(&input);
//!
//! assert!(result.success);
//! assert_eq!(result.best_schedule.len(), 10);
//! ```
//!
//! # Logging
//!
//! The crate emits `tracing` events (`attempt_start`, `attempt_end`,
//! `attempt_rejected`, `optimize_end`) and never installs a subscriber.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod audit;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod scheduler;

pub use audit::{audit_schedule, AuditViolation, AuditViolationKind};
pub use error::{Result, TimetableError};
pub use models::{
    Lesson, Location, RequiredAssignments, Schedule, ScheduledEntry, SchedulerInput, Teacher,
    TimeSlot, Weekday,
};
pub use optimizer::{BestScheduleResult, Optimizer, OptimizerConfig};
pub use scheduler::{AttemptResult, AttemptRunner, AttemptSource};
