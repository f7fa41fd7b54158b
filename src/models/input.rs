//! Problem instance handed over by the data layer.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{Lesson, Location, SlotGrid, Teacher, TimeSlot};

/// Contractual teaching obligations: teacher id → lesson ids.
///
/// Used only to prioritize candidate teachers. It never pins a location
/// or time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredAssignments(HashMap<String, HashSet<String>>);

impl RequiredAssignments {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a teacher must teach a lesson.
    pub fn with(mut self, teacher_id: impl Into<String>, lesson_id: impl Into<String>) -> Self {
        self.insert(teacher_id, lesson_id);
        self
    }

    /// Records that a teacher must teach a lesson.
    pub fn insert(&mut self, teacher_id: impl Into<String>, lesson_id: impl Into<String>) {
        self.0
            .entry(teacher_id.into())
            .or_default()
            .insert(lesson_id.into());
    }

    /// Whether the teacher is obligated to teach the lesson.
    pub fn requires(&self, teacher_id: &str, lesson_id: &str) -> bool {
        self.0
            .get(teacher_id)
            .is_some_and(|lessons| lessons.contains(lesson_id))
    }

    /// Whether no obligations are recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A fully-resolved timetabling problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerInput {
    /// Lessons to place (inactive ones are ignored).
    pub lessons: Vec<Lesson>,
    /// Teachers.
    pub teachers: Vec<Teacher>,
    /// Locations.
    pub locations: Vec<Location>,
    /// Usable slots of the week.
    pub time_slots: Vec<TimeSlot>,
    /// Contractual teacher obligations.
    #[serde(default)]
    pub required_assignments: RequiredAssignments,
}

impl SchedulerInput {
    /// Creates an input over the standard five-day, ten-period week.
    pub fn new() -> Self {
        Self {
            time_slots: TimeSlot::week(10),
            ..Self::default()
        }
    }

    /// Adds a lesson.
    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Replaces the slot grid.
    pub fn with_time_slots(mut self, time_slots: Vec<TimeSlot>) -> Self {
        self.time_slots = time_slots;
        self
    }

    /// Records a contractual obligation.
    pub fn with_required(mut self, teacher_id: impl Into<String>, lesson_id: impl Into<String>) -> Self {
        self.required_assignments.insert(teacher_id, lesson_id);
        self
    }

    /// Active lessons in input order.
    pub fn active_lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons.iter().filter(|l| l.active)
    }

    /// Looks up a lesson by ID.
    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Looks up a teacher by ID.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    /// Looks up a location by ID.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// The slot grid of this instance.
    pub fn grid(&self) -> SlotGrid {
        SlotGrid::from_slots(self.time_slots.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    #[test]
    fn test_required_assignments() {
        let req = RequiredAssignments::new().with("T1", "L1").with("T1", "L2");
        assert!(req.requires("T1", "L1"));
        assert!(req.requires("T1", "L2"));
        assert!(!req.requires("T2", "L1"));
        assert!(!req.is_empty());
    }

    #[test]
    fn test_default_grid_is_full_week() {
        let input = SchedulerInput::new();
        assert_eq!(input.grid().len(), 50);
    }

    #[test]
    fn test_active_lessons_filter() {
        let input = SchedulerInput::new()
            .with_lesson(Lesson::new("L1", "it", 10, 2))
            .with_lesson(Lesson::new("L2", "it", 10, 2).with_active(false));
        let ids: Vec<&str> = input.active_lessons().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["L1"]);
    }

    #[test]
    fn test_input_from_json() {
        let json = r#"{
            "lessons": [{
                "id": "L1", "name": "Networks", "branch_id": "it", "grade_level": 11,
                "weekly_hours": 4, "divisible": true, "dual_resource": false,
                "eligible_lab_types": ["computer"], "eligible_teacher_ids": ["T1"],
                "active": true
            }],
            "teachers": [{
                "id": "T1", "name": "Mehmet",
                "unavailable_slots": [{"day": "Friday", "hour": 1}]
            }],
            "locations": [{"id": "LAB1", "name": "Lab", "lab_type": "computer", "capacity": 24}],
            "time_slots": [{"day": "Monday", "hour": 1}, {"day": "Monday", "hour": 2}],
            "required_assignments": {"T1": ["L1"]}
        }"#;

        let input: SchedulerInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.lessons[0].weekly_hours, 4);
        assert!(!input.teachers[0].is_available_at(TimeSlot::new(Weekday::Friday, 1)));
        assert!(input.required_assignments.requires("T1", "L1"));
        assert_eq!(input.grid().len(), 2);
        assert!(input.location("LAB1").unwrap().is_lab());
    }
}
