//! Schedule (solution) model.
//!
//! A schedule is the committed set of lesson-hours of one attempt. Each
//! entry books one slot for one lesson on one or two teachers and one or
//! two locations.
//!
//! # Indices
//! Three resource-scoped indices answer "who holds this resource at this
//! slot" in O(1):
//!
//! | Index | Key | Holds |
//! |-------|-----|-------|
//! | teacher | teacher id × slot | at most one entry |
//! | location | location id × slot | at most one entry |
//! | class | class pool × slot | at most one entry |
//!
//! Distinct teacher/location/class combinations may therefore share a slot.
//! A fourth index lists the entries of each lesson in commit order.
//!
//! # Undo
//! Entries are removed strictly in reverse commit order via
//! [`Schedule::mark`] and [`Schedule::rollback_to`], which is exactly what
//! backtracking needs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::TimeSlot;
use crate::error::{ResourceKind, Result, TimetableError};

/// Grade level whose classes share one pool regardless of branch.
pub const MERGED_GRADE_LEVEL: u8 = 9;

/// The group of students that can attend only one lesson per slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassPool {
    /// One class: a branch at a grade level.
    Class { branch_id: String, grade_level: u8 },
    /// All classes of a grade level, across branches.
    MergedGrade(u8),
}

impl ClassPool {
    /// The pool of a class.
    pub fn of(branch_id: &str, grade_level: u8) -> Self {
        if grade_level == MERGED_GRADE_LEVEL {
            ClassPool::MergedGrade(grade_level)
        } else {
            ClassPool::Class {
                branch_id: branch_id.to_string(),
                grade_level,
            }
        }
    }
}

/// One committed lesson-hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEntry {
    /// Scheduled lesson.
    pub lesson_id: String,
    /// One teacher, or two for dual-resource lessons.
    pub teacher_ids: Vec<String>,
    /// One location, or two for dual-resource lessons (paired with `teacher_ids`).
    pub location_ids: Vec<String>,
    /// Booked slot.
    pub slot: TimeSlot,
    /// Branch of the class (denormalized for grid rendering).
    pub branch_id: String,
    /// Grade level of the class.
    pub grade_level: u8,
}

impl ScheduledEntry {
    /// Creates an entry.
    pub fn new(
        lesson_id: impl Into<String>,
        teacher_ids: Vec<String>,
        location_ids: Vec<String>,
        slot: TimeSlot,
        branch_id: impl Into<String>,
        grade_level: u8,
    ) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            teacher_ids,
            location_ids,
            slot,
            branch_id: branch_id.into(),
            grade_level,
        }
    }

    /// Class pool of the entry.
    pub fn class_pool(&self) -> ClassPool {
        ClassPool::of(&self.branch_id, self.grade_level)
    }

    /// Whether the entry books two teachers.
    #[inline]
    pub fn is_dual(&self) -> bool {
        self.teacher_ids.len() == 2
    }

    /// Whether the given teacher teaches this hour.
    pub fn has_teacher(&self, teacher_id: &str) -> bool {
        self.teacher_ids.iter().any(|t| t == teacher_id)
    }
}

/// The committed entries of one attempt with their lookup indices.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: Vec<ScheduledEntry>,
    by_teacher: HashMap<String, HashMap<TimeSlot, usize>>,
    by_location: HashMap<String, HashMap<TimeSlot, usize>>,
    by_class: HashMap<ClassPool, HashMap<TimeSlot, usize>>,
    by_lesson: HashMap<String, Vec<usize>>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a schedule from plain entries, rejecting the first conflict.
    pub fn from_entries(entries: impl IntoIterator<Item = ScheduledEntry>) -> Result<Self> {
        let mut schedule = Self::new();
        for entry in entries {
            schedule.insert(entry)?;
        }
        Ok(schedule)
    }

    /// Commits an entry.
    ///
    /// Fails without changing the schedule if any teacher, location, or the
    /// class pool is already booked at the entry's slot.
    pub fn insert(&mut self, entry: ScheduledEntry) -> Result<usize> {
        let slot = entry.slot;
        for (i, teacher_id) in entry.teacher_ids.iter().enumerate() {
            if self.teacher_entry(teacher_id, slot).is_some()
                || entry.teacher_ids[..i].contains(teacher_id)
            {
                return Err(conflict(ResourceKind::Teacher, teacher_id, slot));
            }
        }
        for (i, location_id) in entry.location_ids.iter().enumerate() {
            if self.location_entry(location_id, slot).is_some()
                || entry.location_ids[..i].contains(location_id)
            {
                return Err(conflict(ResourceKind::Location, location_id, slot));
            }
        }
        let pool = entry.class_pool();
        if self.class_entry(&pool, slot).is_some() {
            return Err(conflict(ResourceKind::Class, &entry.branch_id, slot));
        }

        let index = self.entries.len();
        for teacher_id in &entry.teacher_ids {
            self.by_teacher
                .entry(teacher_id.clone())
                .or_default()
                .insert(slot, index);
        }
        for location_id in &entry.location_ids {
            self.by_location
                .entry(location_id.clone())
                .or_default()
                .insert(slot, index);
        }
        self.by_class.entry(pool).or_default().insert(slot, index);
        self.by_lesson
            .entry(entry.lesson_id.clone())
            .or_default()
            .push(index);
        self.entries.push(entry);
        Ok(index)
    }

    /// Current size, usable as an undo point.
    #[inline]
    pub fn mark(&self) -> usize {
        self.entries.len()
    }

    /// Removes every entry committed after `mark`, newest first.
    pub fn rollback_to(&mut self, mark: usize) {
        while self.entries.len() > mark {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            for teacher_id in &entry.teacher_ids {
                if let Some(slots) = self.by_teacher.get_mut(teacher_id) {
                    slots.remove(&entry.slot);
                }
            }
            for location_id in &entry.location_ids {
                if let Some(slots) = self.by_location.get_mut(location_id) {
                    slots.remove(&entry.slot);
                }
            }
            if let Some(slots) = self.by_class.get_mut(&entry.class_pool()) {
                slots.remove(&entry.slot);
            }
            if let Some(indices) = self.by_lesson.get_mut(&entry.lesson_id) {
                indices.pop();
            }
        }
    }

    /// Entry booking a teacher at a slot.
    pub fn teacher_entry(&self, teacher_id: &str, slot: TimeSlot) -> Option<&ScheduledEntry> {
        self.by_teacher
            .get(teacher_id)
            .and_then(|slots| slots.get(&slot))
            .map(|&i| &self.entries[i])
    }

    /// Entry booking a location at a slot.
    pub fn location_entry(&self, location_id: &str, slot: TimeSlot) -> Option<&ScheduledEntry> {
        self.by_location
            .get(location_id)
            .and_then(|slots| slots.get(&slot))
            .map(|&i| &self.entries[i])
    }

    /// Entry booking a class pool at a slot.
    pub fn class_entry(&self, pool: &ClassPool, slot: TimeSlot) -> Option<&ScheduledEntry> {
        self.by_class
            .get(pool)
            .and_then(|slots| slots.get(&slot))
            .map(|&i| &self.entries[i])
    }

    /// Entries of a lesson in commit order.
    pub fn lesson_entries<'s>(
        &'s self,
        lesson_id: &str,
    ) -> impl Iterator<Item = &'s ScheduledEntry> + 's {
        self.by_lesson
            .get(lesson_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.entries[i])
    }

    /// Hours committed for a lesson.
    pub fn lesson_hours(&self, lesson_id: &str) -> u32 {
        self.by_lesson.get(lesson_id).map_or(0, |v| v.len() as u32)
    }

    /// All entries in commit order.
    pub fn entries(&self) -> &[ScheduledEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the schedule, returning its entries.
    pub fn into_entries(self) -> Vec<ScheduledEntry> {
        self.entries
    }
}

fn conflict(kind: ResourceKind, resource_id: &str, slot: TimeSlot) -> TimetableError {
    TimetableError::SlotConflict {
        kind,
        resource_id: resource_id.to_string(),
        slot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    fn slot(hour: u8) -> TimeSlot {
        TimeSlot::new(Weekday::Monday, hour)
    }

    fn entry(lesson: &str, teacher: &str, location: &str, hour: u8, branch: &str, grade: u8) -> ScheduledEntry {
        ScheduledEntry::new(
            lesson,
            vec![teacher.to_string()],
            vec![location.to_string()],
            slot(hour),
            branch,
            grade,
        )
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut s = Schedule::new();
        s.insert(entry("L1", "T1", "R1", 1, "it", 10)).unwrap();

        assert_eq!(s.len(), 1);
        assert_eq!(s.teacher_entry("T1", slot(1)).unwrap().lesson_id, "L1");
        assert_eq!(s.location_entry("R1", slot(1)).unwrap().lesson_id, "L1");
        assert!(s.class_entry(&ClassPool::of("it", 10), slot(1)).is_some());
        assert!(s.teacher_entry("T1", slot(2)).is_none());
        assert_eq!(s.lesson_hours("L1"), 1);
    }

    #[test]
    fn test_concurrent_lessons_on_distinct_resources() {
        let mut s = Schedule::new();
        s.insert(entry("L1", "T1", "R1", 1, "it", 10)).unwrap();
        s.insert(entry("L2", "T2", "R2", 1, "electrics", 10)).unwrap();
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_teacher_conflict_rejected() {
        let mut s = Schedule::new();
        s.insert(entry("L1", "T1", "R1", 1, "it", 10)).unwrap();
        let err = s.insert(entry("L2", "T1", "R2", 1, "electrics", 11)).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::SlotConflict {
                kind: ResourceKind::Teacher,
                ..
            }
        ));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_location_and_class_conflicts_rejected() {
        let mut s = Schedule::new();
        s.insert(entry("L1", "T1", "R1", 1, "it", 10)).unwrap();
        assert!(s.insert(entry("L2", "T2", "R1", 1, "electrics", 11)).is_err());
        assert!(s.insert(entry("L3", "T3", "R3", 1, "it", 10)).is_err());
    }

    #[test]
    fn test_grade_nine_is_one_pool() {
        let mut s = Schedule::new();
        s.insert(entry("L1", "T1", "R1", 1, "it", 9)).unwrap();
        let err = s.insert(entry("L2", "T2", "R2", 1, "electrics", 9)).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::SlotConflict {
                kind: ResourceKind::Class,
                ..
            }
        ));
        assert_eq!(ClassPool::of("a", 9), ClassPool::of("b", 9));
        assert_ne!(ClassPool::of("a", 10), ClassPool::of("b", 10));
    }

    #[test]
    fn test_dual_entry_books_both_resources() {
        let mut s = Schedule::new();
        let dual = ScheduledEntry::new(
            "L1",
            vec!["T1".into(), "T2".into()],
            vec!["R1".into(), "R2".into()],
            slot(3),
            "it",
            11,
        );
        assert!(dual.is_dual());
        s.insert(dual).unwrap();
        assert!(s.teacher_entry("T2", slot(3)).is_some());
        assert!(s.location_entry("R2", slot(3)).is_some());
    }

    #[test]
    fn test_duplicate_teacher_within_entry_rejected() {
        let mut s = Schedule::new();
        let bad = ScheduledEntry::new(
            "L1",
            vec!["T1".into(), "T1".into()],
            vec!["R1".into(), "R2".into()],
            slot(3),
            "it",
            11,
        );
        assert!(s.insert(bad).is_err());
        assert!(s.is_empty());
    }

    #[test]
    fn test_rollback_restores_indices() {
        let mut s = Schedule::new();
        s.insert(entry("L1", "T1", "R1", 1, "it", 10)).unwrap();
        let mark = s.mark();
        s.insert(entry("L1", "T1", "R1", 2, "it", 10)).unwrap();
        s.insert(entry("L2", "T2", "R2", 3, "it", 10)).unwrap();

        s.rollback_to(mark);
        assert_eq!(s.len(), 1);
        assert!(s.teacher_entry("T1", slot(2)).is_none());
        assert!(s.teacher_entry("T2", slot(3)).is_none());
        assert_eq!(s.lesson_hours("L1"), 1);
        assert_eq!(s.lesson_hours("L2"), 0);

        // Freed slots are bookable again
        s.insert(entry("L3", "T1", "R1", 2, "it", 10)).unwrap();
    }

    #[test]
    fn test_from_entries_detects_conflict() {
        let ok = Schedule::from_entries(vec![
            entry("L1", "T1", "R1", 1, "it", 10),
            entry("L1", "T1", "R1", 2, "it", 10),
        ]);
        assert_eq!(ok.unwrap().lesson_entries("L1").count(), 2);

        let clash = Schedule::from_entries(vec![
            entry("L1", "T1", "R1", 1, "it", 10),
            entry("L2", "T1", "R2", 1, "web", 10),
        ]);
        assert!(clash.is_err());
    }
}
