//! Legal block durations for the next placement of a lesson.
//!
//! | Lesson | Remaining | Durations | Day rule |
//! |--------|-----------|-----------|----------|
//! | non-divisible | h | h | - |
//! | divisible, h > 5 | h | ceil(h/2) | - |
//! | divisible, h > 5 | floor(h/2) | floor(h/2) | other day than first half |
//! | divisible, h <= 3 | r | 3, 2, 1 (each <= r) | - |
//! | divisible, 4 <= h <= 5 | h | h | - |

use crate::models::Lesson;

/// Durations to try for one placement, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Block lengths in hours, tried first to last.
    pub durations: Vec<u32>,
    /// Whether the block must avoid the day of the lesson's first half.
    pub second_half: bool,
}

/// Largest chunk tried for small divisible lessons.
const MAX_SMALL_CHUNK: u32 = 3;

/// Computes the chunk plan given the lesson's remaining hours.
pub fn plan_chunks(lesson: &Lesson, remaining: u32) -> ChunkPlan {
    if remaining == 0 {
        return ChunkPlan {
            durations: Vec::new(),
            second_half: false,
        };
    }

    if lesson.splits_in_halves() {
        let (first, _) = lesson.half_sizes();
        return if remaining == lesson.weekly_hours {
            ChunkPlan {
                durations: vec![first],
                second_half: false,
            }
        } else {
            ChunkPlan {
                durations: vec![remaining],
                second_half: true,
            }
        };
    }

    if lesson.divisible && lesson.weekly_hours <= MAX_SMALL_CHUNK {
        return ChunkPlan {
            durations: (1..=MAX_SMALL_CHUNK.min(remaining)).rev().collect(),
            second_half: false,
        };
    }

    ChunkPlan {
        durations: vec![remaining],
        second_half: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_divisible_is_one_block() {
        let lesson = Lesson::new("L1", "it", 10, 4);
        let plan = plan_chunks(&lesson, 4);
        assert_eq!(plan.durations, vec![4]);
        assert!(!plan.second_half);
    }

    #[test]
    fn test_large_divisible_halves() {
        let lesson = Lesson::new("L1", "it", 10, 7).divisible();

        let first = plan_chunks(&lesson, 7);
        assert_eq!(first.durations, vec![4]);
        assert!(!first.second_half);

        let second = plan_chunks(&lesson, 3);
        assert_eq!(second.durations, vec![3]);
        assert!(second.second_half);
    }

    #[test]
    fn test_small_divisible_descending_chunks() {
        let lesson = Lesson::new("L1", "it", 10, 3).divisible();
        assert_eq!(plan_chunks(&lesson, 3).durations, vec![3, 2, 1]);
        assert_eq!(plan_chunks(&lesson, 2).durations, vec![2, 1]);
        assert_eq!(plan_chunks(&lesson, 1).durations, vec![1]);
    }

    #[test]
    fn test_medium_divisible_is_one_block() {
        let lesson = Lesson::new("L1", "it", 10, 5).divisible();
        assert_eq!(plan_chunks(&lesson, 5).durations, vec![5]);
    }

    #[test]
    fn test_nothing_remaining() {
        let lesson = Lesson::new("L1", "it", 10, 2);
        assert!(plan_chunks(&lesson, 0).durations.is_empty());
    }
}
