//! Lesson model.
//!
//! A lesson is a weekly teaching obligation of one class: a subject that
//! must receive `weekly_hours` lesson-hours per week. Lessons are created
//! by the data layer before the search and never change during it.
//!
//! # Placement shape
//! - **Non-divisible**: one contiguous run of hours on a single day.
//! - **Divisible, > 5 hours**: two parts of `ceil(h/2)` and `floor(h/2)`
//!   hours on two different days.
//! - **Divisible, <= 3 hours**: one block, or several smaller contiguous
//!   blocks (tried 3 → 2 → 1 hours).
//! - **Divisible, 4-5 hours**: one contiguous block.

use serde::{Deserialize, Serialize};

/// A lesson to be timetabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique lesson identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Vocational branch (track) of the class.
    pub branch_id: String,
    /// Grade level of the class.
    pub grade_level: u8,
    /// Lesson-hours required per week.
    pub weekly_hours: u32,
    /// Whether the weekly hours may be split across blocks.
    pub divisible: bool,
    /// Whether every hour needs two teachers and two locations.
    pub dual_resource: bool,
    /// Lab types this lesson may use. Empty = non-lab locations only.
    pub eligible_lab_types: Vec<String>,
    /// Teachers qualified to teach this lesson, in preference order.
    pub eligible_teacher_ids: Vec<String>,
    /// Inactive lessons are ignored by the search.
    pub active: bool,
}

impl Lesson {
    /// Creates an active, non-divisible, single-resource lesson.
    pub fn new(
        id: impl Into<String>,
        branch_id: impl Into<String>,
        grade_level: u8,
        weekly_hours: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            branch_id: branch_id.into(),
            grade_level,
            weekly_hours,
            divisible: false,
            dual_resource: false,
            eligible_lab_types: Vec::new(),
            eligible_teacher_ids: Vec::new(),
            active: true,
        }
    }

    /// Sets the lesson name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the lesson as divisible.
    pub fn divisible(mut self) -> Self {
        self.divisible = true;
        self
    }

    /// Marks the lesson as needing two teachers and two locations.
    pub fn dual_resource(mut self) -> Self {
        self.dual_resource = true;
        self
    }

    /// Adds an eligible lab type.
    pub fn with_lab_type(mut self, lab_type: impl Into<String>) -> Self {
        self.eligible_lab_types.push(lab_type.into());
        self
    }

    /// Adds an eligible teacher.
    pub fn with_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.eligible_teacher_ids.push(teacher_id.into());
        self
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether the lesson must run in a lab.
    #[inline]
    pub fn needs_lab(&self) -> bool {
        !self.eligible_lab_types.is_empty()
    }

    /// Whether the lesson is split into two halves on different days.
    #[inline]
    pub fn splits_in_halves(&self) -> bool {
        self.divisible && self.weekly_hours > 5
    }

    /// Sizes of the two halves: `(ceil(h/2), floor(h/2))`.
    pub fn half_sizes(&self) -> (u32, u32) {
        let h = self.weekly_hours;
        (h.div_ceil(2), h / 2)
    }
}
