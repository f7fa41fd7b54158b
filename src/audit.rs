//! Audit of a finished schedule.
//!
//! Re-checks a plain list of entries against the input from scratch,
//! without trusting the search that produced it. Detects:
//! - Double bookings of a teacher, location or class pool
//! - Lessons with too few or too many hours
//! - Blocks that are not contiguous, or halves on the same day
//! - Wrong resource counts and teacher switches within a lesson
//! - Entries in unavailable or unsuitable slots and locations
//!
//! The optimizer audits every completed attempt before scoring it.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{ClassPool, Lesson, ScheduledEntry, SchedulerInput, TimeSlot, Weekday};
use crate::scheduler::location_suitable;

/// Audit result.
pub type AuditResult = Result<(), Vec<AuditViolation>>;

/// A broken schedule property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditViolation {
    /// Violation category.
    pub kind: AuditViolationKind,
    /// Lesson, teacher, location or class concerned.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of audit violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditViolationKind {
    /// A resource holds two entries in one slot.
    ResourceConflict,
    /// Assigned hours differ from the weekly hours.
    HoursMismatch,
    /// A block lesson is not one same-day run.
    NotContiguous,
    /// A halved lesson is not two runs of the right sizes on different days.
    SplitViolation,
    /// Wrong number of teachers or locations on an hour.
    ResourceCount,
    /// A single-resource lesson changed teacher.
    TeacherSwitch,
    /// Entry for a lesson that is not active in the input.
    UnknownLesson,
    /// Teacher booked in an unavailable slot, or unknown.
    TeacherUnavailable,
    /// Location unsuitable for the lesson, or unknown.
    UnsuitableLocation,
    /// Slot outside the input's grid.
    OutsideGrid,
}

impl AuditViolation {
    fn new(kind: AuditViolationKind, entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// Audits `entries` as a complete schedule for `input`.
///
/// # Returns
/// `Ok(())` if every property holds, `Err(violations)` with all of them
/// otherwise.
pub fn audit_schedule(input: &SchedulerInput, entries: &[ScheduledEntry]) -> AuditResult {
    let mut violations = Vec::new();

    check_conflicts(entries, &mut violations);
    check_entries(input, entries, &mut violations);

    let mut by_lesson: HashMap<&str, Vec<&ScheduledEntry>> = HashMap::new();
    for entry in entries {
        by_lesson.entry(entry.lesson_id.as_str()).or_default().push(entry);
    }
    for lesson in input.active_lessons() {
        let lesson_entries = by_lesson.remove(lesson.id.as_str()).unwrap_or_default();
        check_lesson(lesson, &lesson_entries, &mut violations);
    }
    let mut unknown: Vec<&str> = by_lesson.into_keys().collect();
    unknown.sort_unstable();
    for lesson_id in unknown {
        violations.push(AuditViolation::new(
            AuditViolationKind::UnknownLesson,
            lesson_id,
            format!("Entries for lesson {lesson_id}, which is not an active input lesson"),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_conflicts(entries: &[ScheduledEntry], violations: &mut Vec<AuditViolation>) {
    let mut teachers: HashSet<(&str, TimeSlot)> = HashSet::new();
    let mut locations: HashSet<(&str, TimeSlot)> = HashSet::new();
    let mut classes: HashSet<(ClassPool, TimeSlot)> = HashSet::new();

    for entry in entries {
        for teacher in &entry.teacher_ids {
            if !teachers.insert((teacher.as_str(), entry.slot)) {
                violations.push(AuditViolation::new(
                    AuditViolationKind::ResourceConflict,
                    teacher.as_str(),
                    format!("Teacher {teacher} double-booked at {}", entry.slot),
                ));
            }
        }
        for location in &entry.location_ids {
            if !locations.insert((location.as_str(), entry.slot)) {
                violations.push(AuditViolation::new(
                    AuditViolationKind::ResourceConflict,
                    location.as_str(),
                    format!("Location {location} double-booked at {}", entry.slot),
                ));
            }
        }
        let pool = entry.class_pool();
        if !classes.insert((pool.clone(), entry.slot)) {
            violations.push(AuditViolation::new(
                AuditViolationKind::ResourceConflict,
                format!("{}/{}", entry.branch_id, entry.grade_level),
                format!("Class pool {pool:?} double-booked at {}", entry.slot),
            ));
        }
    }
}

fn check_entries(input: &SchedulerInput, entries: &[ScheduledEntry], violations: &mut Vec<AuditViolation>) {
    let grid = input.grid();
    for entry in entries {
        if !grid.contains(entry.slot) {
            violations.push(AuditViolation::new(
                AuditViolationKind::OutsideGrid,
                entry.lesson_id.as_str(),
                format!("Lesson {} booked at {}, outside the grid", entry.lesson_id, entry.slot),
            ));
        }
        for teacher_id in &entry.teacher_ids {
            let available = input
                .teacher(teacher_id)
                .is_some_and(|teacher| teacher.is_available_at(entry.slot));
            if !available {
                violations.push(AuditViolation::new(
                    AuditViolationKind::TeacherUnavailable,
                    teacher_id.as_str(),
                    format!("Teacher {teacher_id} is unknown or unavailable at {}", entry.slot),
                ));
            }
        }
        let Some(lesson) = input.lesson(&entry.lesson_id) else {
            continue;
        };
        for location_id in &entry.location_ids {
            let suitable = input
                .location(location_id)
                .is_some_and(|location| location_suitable(lesson, location));
            if !suitable {
                violations.push(AuditViolation::new(
                    AuditViolationKind::UnsuitableLocation,
                    location_id.as_str(),
                    format!("Location {location_id} is unknown or unsuitable for {}", lesson.id),
                ));
            }
        }
    }
}

fn check_lesson(lesson: &Lesson, entries: &[&ScheduledEntry], violations: &mut Vec<AuditViolation>) {
    let id = lesson.id.as_str();
    let hours = entries.len() as u32;
    if hours != lesson.weekly_hours {
        violations.push(AuditViolation::new(
            AuditViolationKind::HoursMismatch,
            id,
            format!("Lesson {id} has {hours} of {} weekly hours", lesson.weekly_hours),
        ));
        return;
    }

    let per_hour = if lesson.dual_resource { 2 } else { 1 };
    for entry in entries {
        let teachers: HashSet<&String> = entry.teacher_ids.iter().collect();
        let locations: HashSet<&String> = entry.location_ids.iter().collect();
        if entry.teacher_ids.len() != per_hour
            || teachers.len() != per_hour
            || entry.location_ids.len() != per_hour
            || locations.len() != per_hour
        {
            violations.push(AuditViolation::new(
                AuditViolationKind::ResourceCount,
                id,
                format!(
                    "Lesson {id} at {} has {} teachers and {} locations, expected {per_hour} distinct each",
                    entry.slot,
                    entry.teacher_ids.len(),
                    entry.location_ids.len()
                ),
            ));
        }
    }

    if !lesson.dual_resource {
        let teachers: HashSet<&str> = entries
            .iter()
            .filter_map(|e| e.teacher_ids.first().map(String::as_str))
            .collect();
        if teachers.len() > 1 {
            violations.push(AuditViolation::new(
                AuditViolationKind::TeacherSwitch,
                id,
                format!("Lesson {id} is taught by {} different teachers", teachers.len()),
            ));
        }
    }

    let runs = day_runs(entries);
    if lesson.splits_in_halves() {
        let (first, second) = lesson.half_sizes();
        let mut sizes: Vec<u32> = runs.iter().map(|run| run.1).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        let days: HashSet<Weekday> = runs.iter().map(|run| run.0).collect();
        if sizes != vec![first, second] || days.len() != 2 {
            violations.push(AuditViolation::new(
                AuditViolationKind::SplitViolation,
                id,
                format!("Lesson {id} must be {first}h and {second}h on two different days, got runs {sizes:?}"),
            ));
        }
    } else if !(lesson.divisible && lesson.weekly_hours <= 3) && runs.len() > 1 {
        violations.push(AuditViolation::new(
            AuditViolationKind::NotContiguous,
            id,
            format!("Lesson {id} is spread over {} runs instead of one", runs.len()),
        ));
    }
}

/// Maximal runs of consecutive hours as `(day, length)`.
fn day_runs(entries: &[&ScheduledEntry]) -> Vec<(Weekday, u32)> {
    let mut days: BTreeMap<Weekday, Vec<u8>> = BTreeMap::new();
    for entry in entries {
        days.entry(entry.slot.day).or_default().push(entry.slot.hour);
    }

    let mut runs = Vec::new();
    for (day, mut hours) in days {
        hours.sort_unstable();
        let mut length = 1;
        for pair in hours.windows(2) {
            if pair[1] == pair[0] + 1 {
                length += 1;
            } else {
                runs.push((day, length));
                length = 1;
            }
        }
        if !hours.is_empty() {
            runs.push((day, length));
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Teacher};

    fn input() -> SchedulerInput {
        SchedulerInput::new()
            .with_teacher(Teacher::new("T1"))
            .with_teacher(Teacher::new("T2").with_unavailable(TimeSlot::new(Weekday::Friday, 1)))
            .with_location(Location::classroom("R1"))
            .with_location(Location::classroom("R2"))
            .with_location(Location::lab("LAB1", "computer"))
            .with_lesson(Lesson::new("block", "it", 10, 2).with_teacher("T1"))
            .with_lesson(Lesson::new("halves", "it", 11, 6).divisible().with_teacher("T2"))
    }

    fn entry(lesson: &str, teacher: &str, location: &str, day: Weekday, hour: u8) -> ScheduledEntry {
        let grade = if lesson == "halves" { 11 } else { 10 };
        ScheduledEntry::new(
            lesson,
            vec![teacher.into()],
            vec![location.into()],
            TimeSlot::new(day, hour),
            "it",
            grade,
        )
    }

    fn valid() -> Vec<ScheduledEntry> {
        let mut entries = vec![
            entry("block", "T1", "R1", Weekday::Monday, 1),
            entry("block", "T1", "R1", Weekday::Monday, 2),
        ];
        for hour in 1..=3 {
            entries.push(entry("halves", "T2", "R2", Weekday::Tuesday, hour));
            entries.push(entry("halves", "T2", "R2", Weekday::Thursday, hour + 4));
        }
        entries
    }

    fn kinds(result: AuditResult) -> Vec<AuditViolationKind> {
        result.unwrap_err().into_iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_valid_schedule() {
        assert!(audit_schedule(&input(), &valid()).is_ok());
    }

    #[test]
    fn test_missing_hour() {
        let mut entries = valid();
        entries.remove(0);
        assert_eq!(kinds(audit_schedule(&input(), &entries)), vec![AuditViolationKind::HoursMismatch]);
    }

    #[test]
    fn test_block_not_contiguous() {
        let mut entries = valid();
        entries[1].slot = TimeSlot::new(Weekday::Monday, 4);
        assert_eq!(kinds(audit_schedule(&input(), &entries)), vec![AuditViolationKind::NotContiguous]);
    }

    #[test]
    fn test_halves_on_same_day() {
        let mut entries = valid();
        for e in entries.iter_mut().filter(|e| e.slot.day == Weekday::Thursday) {
            e.slot.day = Weekday::Tuesday;
        }
        assert_eq!(kinds(audit_schedule(&input(), &entries)), vec![AuditViolationKind::SplitViolation]);
    }

    #[test]
    fn test_double_booking() {
        let mut entries = valid();
        entries.push(entry("extra", "T1", "R2", Weekday::Monday, 1));
        let kinds = kinds(audit_schedule(&input(), &entries));
        assert!(kinds.contains(&AuditViolationKind::ResourceConflict));
        assert!(kinds.contains(&AuditViolationKind::UnknownLesson));
    }

    #[test]
    fn test_merged_grade_conflict() {
        let input = SchedulerInput::new()
            .with_teacher(Teacher::new("T1"))
            .with_teacher(Teacher::new("T2"))
            .with_location(Location::classroom("R1"))
            .with_location(Location::classroom("R2"))
            .with_lesson(Lesson::new("a", "it", 9, 1).with_teacher("T1"))
            .with_lesson(Lesson::new("b", "web", 9, 1).with_teacher("T2"));
        let slot = TimeSlot::new(Weekday::Monday, 1);
        let entries = vec![
            ScheduledEntry::new("a", vec!["T1".into()], vec!["R1".into()], slot, "it", 9),
            ScheduledEntry::new("b", vec!["T2".into()], vec!["R2".into()], slot, "web", 9),
        ];
        assert_eq!(kinds(audit_schedule(&input, &entries)), vec![AuditViolationKind::ResourceConflict]);
    }

    #[test]
    fn test_teacher_switch() {
        let mut entries = valid();
        entries[1].teacher_ids = vec!["T2".into()];
        let kinds = kinds(audit_schedule(&input(), &entries));
        assert!(kinds.contains(&AuditViolationKind::TeacherSwitch));
    }

    #[test]
    fn test_unavailable_teacher_and_lab() {
        let mut entries = valid();
        entries[0].location_ids = vec!["LAB1".into()];
        entries[2].slot = TimeSlot::new(Weekday::Friday, 1);
        let kinds = kinds(audit_schedule(&input(), &entries));
        assert!(kinds.contains(&AuditViolationKind::UnsuitableLocation));
        assert!(kinds.contains(&AuditViolationKind::TeacherUnavailable));
    }

    #[test]
    fn test_dual_needs_two_distinct() {
        let input = SchedulerInput::new()
            .with_teacher(Teacher::new("T1"))
            .with_location(Location::classroom("R1"))
            .with_location(Location::classroom("R2"))
            .with_lesson(Lesson::new("d", "it", 10, 1).dual_resource().with_teacher("T1"));
        let entries = vec![ScheduledEntry::new(
            "d",
            vec!["T1".into(), "T1".into()],
            vec!["R1".into(), "R2".into()],
            TimeSlot::new(Weekday::Monday, 1),
            "it",
            10,
        )];
        let kinds = kinds(audit_schedule(&input, &entries));
        assert!(kinds.contains(&AuditViolationKind::ResourceCount));
    }
}
