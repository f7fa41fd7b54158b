//! Resource models.
//!
//! Two kinds of resources carry a lesson-hour: the teacher who teaches it
//! and the location (classroom, workshop, lab) it is held in. Both are
//! exclusive: one lesson-hour per resource per slot.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::TimeSlot;

/// A teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Slots in which the teacher cannot teach.
    pub unavailable_slots: HashSet<TimeSlot>,
}

impl Teacher {
    /// Creates a teacher with no unavailability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            unavailable_slots: HashSet::new(),
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks a slot as unavailable.
    pub fn with_unavailable(mut self, slot: TimeSlot) -> Self {
        self.unavailable_slots.insert(slot);
        self
    }

    /// Whether the teacher's own availability allows the slot.
    #[inline]
    pub fn is_available_at(&self, slot: TimeSlot) -> bool {
        !self.unavailable_slots.contains(&slot)
    }
}

/// A teaching location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique location identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Lab type, or `None` for an ordinary classroom.
    pub lab_type: Option<String>,
    /// Seats.
    pub capacity: u32,
}

impl Location {
    /// Creates an ordinary classroom.
    pub fn classroom(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            lab_type: None,
            capacity: 0,
        }
    }

    /// Creates a lab of the given type.
    pub fn lab(id: impl Into<String>, lab_type: impl Into<String>) -> Self {
        Self {
            lab_type: Some(lab_type.into()),
            ..Self::classroom(id)
        }
    }

    /// Sets the location name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether this location is a lab.
    #[inline]
    pub fn is_lab(&self) -> bool {
        self.lab_type.is_some()
    }
}
