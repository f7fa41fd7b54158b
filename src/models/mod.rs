//! Timetabling domain models.
//!
//! Provides the data types of a weekly timetabling problem and its
//! solution. All of them are immutable during search except [`Schedule`],
//! which is owned by exactly one attempt.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | Meaning |
//! |-------------|--------|---------|
//! | Lesson | Course of a class | Weekly hours to place |
//! | Teacher | Instructor | Exclusive human resource |
//! | Location | Classroom / Lab | Exclusive room resource |
//! | TimeSlot | Period | Day × lesson hour |
//! | Schedule | Timetable | Committed lesson-hours |

mod input;
mod lesson;
mod resource;
mod schedule;
mod slot;

pub use input::{RequiredAssignments, SchedulerInput};
pub use lesson::Lesson;
pub use resource::{Location, Teacher};
pub use schedule::{ClassPool, Schedule, ScheduledEntry, MERGED_GRADE_LEVEL};
pub use slot::{SlotGrid, TimeSlot, Weekday};
