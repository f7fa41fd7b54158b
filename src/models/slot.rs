//! Weekly time grid.
//!
//! A timetable week is a set of `(day, hour)` slots. Hours are 1-based
//! lesson periods within a school day; the default grid is five weekdays
//! of ten periods each (50 slots).
//!
//! # Contiguity
//! A block of `n` hours starting at `(d, h)` occupies `(d, h)..(d, h + n - 1)`.
//! Blocks never wrap to the next day: a block whose last hour lies past the
//! day's final period, or that touches an hour missing from the grid, is
//! not representable.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// School weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All weekdays in calendar order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Three-letter abbreviation.
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// One lesson period on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Weekday.
    pub day: Weekday,
    /// Lesson period within the day (1-based).
    pub hour: u8,
}

impl TimeSlot {
    /// Creates a slot.
    pub fn new(day: Weekday, hour: u8) -> Self {
        Self { day, hour }
    }

    /// All slots of a five-day week with `hours_per_day` periods per day.
    pub fn week(hours_per_day: u8) -> Vec<TimeSlot> {
        Weekday::ALL
            .iter()
            .flat_map(|&day| (1..=hours_per_day).map(move |hour| TimeSlot::new(day, hour)))
            .collect()
    }

    /// The slot `offset` periods later on the same day.
    #[inline]
    pub fn later(self, offset: u8) -> Option<TimeSlot> {
        self.hour
            .checked_add(offset)
            .map(|hour| TimeSlot::new(self.day, hour))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.hour)
    }
}

/// The set of usable slots for one problem instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotGrid {
    slots: BTreeSet<TimeSlot>,
    last_hour: BTreeMap<Weekday, u8>,
}

impl SlotGrid {
    /// Builds a grid from an arbitrary collection of slots (duplicates ignored).
    pub fn from_slots<I: IntoIterator<Item = TimeSlot>>(slots: I) -> Self {
        let slots: BTreeSet<TimeSlot> = slots.into_iter().collect();
        let mut last_hour = BTreeMap::new();
        for slot in &slots {
            let entry = last_hour.entry(slot.day).or_insert(slot.hour);
            *entry = (*entry).max(slot.hour);
        }
        Self { slots, last_hour }
    }

    /// Standard five-day grid.
    pub fn weekly(hours_per_day: u8) -> Self {
        Self::from_slots(TimeSlot::week(hours_per_day))
    }

    /// Whether the slot belongs to the grid.
    #[inline]
    pub fn contains(&self, slot: TimeSlot) -> bool {
        self.slots.contains(&slot)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the grid has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in calendar order.
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        self.slots.iter().copied()
    }

    /// Days that have at least one slot, in calendar order.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.last_hour.keys().copied()
    }

    /// Final period of a day, if the day is part of the grid.
    pub fn last_hour(&self, day: Weekday) -> Option<u8> {
        self.last_hour.get(&day).copied()
    }

    /// The `duration` consecutive slots starting at `start`.
    ///
    /// Returns `None` if the run would cross the day's final period or
    /// touches a slot missing from the grid.
    pub fn consecutive(&self, start: TimeSlot, duration: u32) -> Option<Vec<TimeSlot>> {
        if duration == 0 {
            return None;
        }
        let last = self.last_hour(start.day)?;
        let span = u8::try_from(duration - 1).ok()?;
        if start.later(span)?.hour > last {
            return None;
        }
        (0..=span)
            .map(|offset| start.later(offset).filter(|slot| self.contains(*slot)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_has_fifty_slots() {
        let week = TimeSlot::week(10);
        assert_eq!(week.len(), 50);
        assert_eq!(week[0], TimeSlot::new(Weekday::Monday, 1));
        assert_eq!(week[49], TimeSlot::new(Weekday::Friday, 10));
    }

    #[test]
    fn test_slot_ordering_is_calendar_order() {
        let a = TimeSlot::new(Weekday::Monday, 10);
        let b = TimeSlot::new(Weekday::Tuesday, 1);
        assert!(a < b);
    }

    #[test]
    fn test_grid_last_hour() {
        let grid = SlotGrid::weekly(8);
        assert_eq!(grid.len(), 40);
        assert_eq!(grid.last_hour(Weekday::Wednesday), Some(8));
        assert_eq!(grid.days().count(), 5);
    }

    #[test]
    fn test_consecutive_within_day() {
        let grid = SlotGrid::weekly(10);
        let run = grid
            .consecutive(TimeSlot::new(Weekday::Monday, 3), 3)
            .unwrap();
        assert_eq!(
            run,
            vec![
                TimeSlot::new(Weekday::Monday, 3),
                TimeSlot::new(Weekday::Monday, 4),
                TimeSlot::new(Weekday::Monday, 5),
            ]
        );
    }

    #[test]
    fn test_consecutive_rejects_day_overflow() {
        let grid = SlotGrid::weekly(10);
        assert!(grid
            .consecutive(TimeSlot::new(Weekday::Monday, 9), 3)
            .is_none());
        assert!(grid
            .consecutive(TimeSlot::new(Weekday::Monday, 9), 2)
            .is_some());
        assert!(grid
            .consecutive(TimeSlot::new(Weekday::Monday, 1), 0)
            .is_none());
    }

    #[test]
    fn test_consecutive_rejects_holes() {
        let grid = SlotGrid::from_slots(vec![
            TimeSlot::new(Weekday::Monday, 1),
            TimeSlot::new(Weekday::Monday, 3),
        ]);
        assert!(grid
            .consecutive(TimeSlot::new(Weekday::Monday, 1), 2)
            .is_none());
        assert!(grid
            .consecutive(TimeSlot::new(Weekday::Tuesday, 1), 1)
            .is_none());
    }
}
