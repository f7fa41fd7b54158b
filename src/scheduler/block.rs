//! Contiguous block search.
//!
//! A block is `duration` consecutive hours on one day. It is usable only if
//! every hour is simultaneously free for every resource involved: one or
//! two teachers, one or two locations, and the lesson's class pool.

use crate::models::{ClassPool, Lesson, Location, Schedule, SlotGrid, Teacher, TimeSlot, Weekday};

use super::availability::{class_free, location_free, location_suitable, teacher_free};

/// A candidate placement to verify.
#[derive(Debug, Clone, Copy)]
pub struct BlockRequest<'a> {
    /// Lesson being placed.
    pub lesson: &'a Lesson,
    /// Class pool of the lesson.
    pub pool: &'a ClassPool,
    /// Teachers that must all be free (one or two).
    pub teachers: &'a [&'a Teacher],
    /// Locations that must all be free and suitable (one or two).
    pub locations: &'a [&'a Location],
    /// First hour of the block.
    pub start: TimeSlot,
    /// Block length in hours.
    pub duration: u32,
    /// Day of the lesson's first half, when placing the second half.
    pub first_half_day: Option<Weekday>,
}

/// Returns the block's slots if every hour is free for every resource.
pub fn find_block(
    schedule: &Schedule,
    grid: &SlotGrid,
    request: &BlockRequest<'_>,
) -> Option<Vec<TimeSlot>> {
    if request.first_half_day == Some(request.start.day) {
        return None;
    }
    if request
        .locations
        .iter()
        .any(|location| !location_suitable(request.lesson, location))
    {
        return None;
    }

    let block = grid.consecutive(request.start, request.duration)?;
    let all_free = block.iter().all(|&slot| {
        class_free(schedule, request.pool, slot)
            && request
                .teachers
                .iter()
                .all(|teacher| teacher_free(schedule, teacher, slot))
            && request
                .locations
                .iter()
                .all(|location| location_free(schedule, location, slot))
    });

    all_free.then_some(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduledEntry;

    struct Fixture {
        lesson: Lesson,
        pool: ClassPool,
        teacher: Teacher,
        other_teacher: Teacher,
        room: Location,
        other_room: Location,
        grid: SlotGrid,
    }

    fn fixture() -> Fixture {
        let lesson = Lesson::new("L1", "it", 10, 3);
        Fixture {
            pool: ClassPool::of(&lesson.branch_id, lesson.grade_level),
            lesson,
            teacher: Teacher::new("T1"),
            other_teacher: Teacher::new("T2"),
            room: Location::classroom("R1"),
            other_room: Location::classroom("R2"),
            grid: SlotGrid::weekly(10),
        }
    }

    fn mon(hour: u8) -> TimeSlot {
        TimeSlot::new(Weekday::Monday, hour)
    }

    #[test]
    fn test_free_block_found() {
        let f = fixture();
        let teachers = [&f.teacher];
        let locations = [&f.room];
        let request = BlockRequest {
            lesson: &f.lesson,
            pool: &f.pool,
            teachers: &teachers,
            locations: &locations,
            start: mon(1),
            duration: 3,
            first_half_day: None,
        };
        let block = find_block(&Schedule::new(), &f.grid, &request).unwrap();
        assert_eq!(block, vec![mon(1), mon(2), mon(3)]);
    }

    #[test]
    fn test_block_crossing_day_end_rejected() {
        let f = fixture();
        let teachers = [&f.teacher];
        let locations = [&f.room];
        let request = BlockRequest {
            lesson: &f.lesson,
            pool: &f.pool,
            teachers: &teachers,
            locations: &locations,
            start: mon(9),
            duration: 3,
            first_half_day: None,
        };
        assert!(find_block(&Schedule::new(), &f.grid, &request).is_none());
    }

    #[test]
    fn test_busy_hour_inside_block_rejected() {
        let f = fixture();
        let mut schedule = Schedule::new();
        schedule
            .insert(ScheduledEntry::new(
                "X",
                vec!["T1".into()],
                vec!["R9".into()],
                mon(2),
                "web",
                11,
            ))
            .unwrap();

        let teachers = [&f.teacher];
        let locations = [&f.room];
        let request = BlockRequest {
            lesson: &f.lesson,
            pool: &f.pool,
            teachers: &teachers,
            locations: &locations,
            start: mon(1),
            duration: 3,
            first_half_day: None,
        };
        assert!(find_block(&schedule, &f.grid, &request).is_none());

        let later = BlockRequest {
            start: mon(3),
            ..request
        };
        assert!(find_block(&schedule, &f.grid, &later).is_some());
    }

    #[test]
    fn test_dual_block_needs_both_teachers() {
        let f = fixture();
        let mut schedule = Schedule::new();
        schedule
            .insert(ScheduledEntry::new(
                "X",
                vec!["T2".into()],
                vec!["R9".into()],
                mon(1),
                "web",
                11,
            ))
            .unwrap();

        let teachers = [&f.teacher, &f.other_teacher];
        let locations = [&f.room, &f.other_room];
        let request = BlockRequest {
            lesson: &f.lesson,
            pool: &f.pool,
            teachers: &teachers,
            locations: &locations,
            start: mon(1),
            duration: 2,
            first_half_day: None,
        };
        assert!(find_block(&schedule, &f.grid, &request).is_none());
        assert!(find_block(&Schedule::new(), &f.grid, &request).is_some());
    }

    #[test]
    fn test_second_half_must_use_another_day() {
        let f = fixture();
        let teachers = [&f.teacher];
        let locations = [&f.room];
        let request = BlockRequest {
            lesson: &f.lesson,
            pool: &f.pool,
            teachers: &teachers,
            locations: &locations,
            start: mon(5),
            duration: 3,
            first_half_day: Some(Weekday::Monday),
        };
        assert!(find_block(&Schedule::new(), &f.grid, &request).is_none());

        let tuesday = BlockRequest {
            start: TimeSlot::new(Weekday::Tuesday, 5),
            ..request
        };
        assert!(find_block(&Schedule::new(), &f.grid, &tuesday).is_some());
    }

    #[test]
    fn test_unsuitable_location_rejected() {
        let f = fixture();
        let lab = Location::lab("LAB1", "chemistry");
        let teachers = [&f.teacher];
        let locations = [&lab];
        let request = BlockRequest {
            lesson: &f.lesson,
            pool: &f.pool,
            teachers: &teachers,
            locations: &locations,
            start: mon(1),
            duration: 1,
            first_half_day: None,
        };
        assert!(find_block(&Schedule::new(), &f.grid, &request).is_none());
    }
}
