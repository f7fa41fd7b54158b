//! Availability predicates over a partial schedule.
//!
//! All four checks are pure: they read the schedule and the immutable
//! domain objects and never change anything.

use crate::models::{ClassPool, Lesson, Location, Schedule, Teacher, TimeSlot};

/// Teacher is not marked unavailable and holds no entry at `slot`.
#[inline]
pub fn teacher_free(schedule: &Schedule, teacher: &Teacher, slot: TimeSlot) -> bool {
    teacher.is_available_at(slot) && schedule.teacher_entry(&teacher.id, slot).is_none()
}

/// Location holds no entry at `slot`.
#[inline]
pub fn location_free(schedule: &Schedule, location: &Location, slot: TimeSlot) -> bool {
    schedule.location_entry(&location.id, slot).is_none()
}

/// Class pool holds no entry at `slot`.
///
/// Grade-9 classes share one pool, so any grade-9 entry blocks every
/// grade-9 class regardless of branch.
#[inline]
pub fn class_free(schedule: &Schedule, pool: &ClassPool, slot: TimeSlot) -> bool {
    schedule.class_entry(pool, slot).is_none()
}

/// Location type matches the lesson.
///
/// Lab lessons need a lab of an eligible type; other lessons need a
/// location without a lab type.
pub fn location_suitable(lesson: &Lesson, location: &Location) -> bool {
    match &location.lab_type {
        None => !lesson.needs_lab(),
        Some(lab_type) => lesson.eligible_lab_types.iter().any(|t| t == lab_type),
    }
}
