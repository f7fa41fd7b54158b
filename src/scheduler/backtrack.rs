//! Recursive backtracking solver.
//!
//! # Algorithm
//!
//! Lessons are visited in plan order (longest first). At lesson `i`:
//!
//! 1. Compute the legal block durations from the lesson's remaining hours.
//! 2. For each start slot (attempt-shuffled), each candidate teacher, each
//!    suitable location and each duration, ask the block finder for a free
//!    block.
//! 3. Commit the block, then recurse: to `i` again if hours remain, to
//!    `i + 1` otherwise.
//! 4. If the recursion fails, undo exactly that block and try the next
//!    candidate. If every candidate fails, return failure so the caller
//!    re-decides its own choice.
//!
//! Success propagates immediately. Every exit path (success excepted)
//! leaves the schedule and remaining-hour counters as it found them.
//!
//! # Complexity
//! Worst case exponential in the number of placements; bounded by
//! [`SearchLimits`](super::SearchLimits).

use tracing::{debug, trace};

use crate::error::Result;
use crate::models::{ScheduledEntry, TimeSlot, Weekday};

use super::block::{find_block, BlockRequest};
use super::chunking::plan_chunks;
use super::context::{AttemptState, SearchSpace};
use super::dual::place_dual;

/// Places lessons `lesson_index..` and reports whether all of them fit.
///
/// `Ok(false)` means the constraints are exhausted under the current
/// partial assignment; `Err` means the search was aborted.
pub fn solve(space: &SearchSpace<'_>, state: &mut AttemptState, lesson_index: usize) -> Result<bool> {
    state.budget.tick()?;
    state.frontier = state.frontier.max(lesson_index);

    let Some(plan) = space.lessons.get(lesson_index) else {
        return Ok(true);
    };
    if state.remaining[lesson_index] == 0 {
        return solve(space, state, lesson_index + 1);
    }

    if plan.lesson.dual_resource {
        place_dual(space, state, lesson_index)
    } else {
        place_single(space, state, lesson_index)
    }
}

fn place_single(space: &SearchSpace<'_>, state: &mut AttemptState, lesson_index: usize) -> Result<bool> {
    let plan = &space.lessons[lesson_index];
    let chunks = plan_chunks(plan.lesson, state.remaining[lesson_index]);
    let first_half_day = first_half_day_of(state, &plan.lesson.id, chunks.second_half);

    // A split lesson keeps the teacher of its earlier parts.
    let bound_teacher: Option<String> = state
        .schedule
        .lesson_entries(&plan.lesson.id)
        .next()
        .and_then(|entry| entry.teacher_ids.first().cloned());

    for &start in &space.slot_order {
        state.budget.check_deadline()?;
        for teacher in &plan.teachers {
            state.budget.check_deadline()?;
            if bound_teacher.as_deref().is_some_and(|bound| bound != teacher.id) {
                continue;
            }
            let teachers = [*teacher];
            for location in &plan.locations {
                let locations = [*location];
                for &duration in &chunks.durations {
                    let request = BlockRequest {
                        lesson: plan.lesson,
                        pool: &plan.pool,
                        teachers: &teachers,
                        locations: &locations,
                        start,
                        duration,
                        first_half_day,
                    };
                    let Some(block) = find_block(&state.schedule, &space.grid, &request) else {
                        continue;
                    };
                    let teacher_ids = [teacher.id.as_str()];
                    let location_ids = [location.id.as_str()];
                    if commit_and_descend(space, state, lesson_index, &block, &teacher_ids, &location_ids)? {
                        return Ok(true);
                    }
                }
            }
        }
    }

    debug!(
        event = "lesson_exhausted",
        lesson = %plan.lesson.id,
        remaining = state.remaining[lesson_index],
    );
    Ok(false)
}

/// Day of the lesson's first half, when the next block is its second half.
pub(super) fn first_half_day_of(
    state: &AttemptState,
    lesson_id: &str,
    second_half: bool,
) -> Option<Weekday> {
    if !second_half {
        return None;
    }
    state
        .schedule
        .lesson_entries(lesson_id)
        .next()
        .map(|entry| entry.slot.day)
}

/// Commits one block for one lesson and continues the search.
///
/// The block's entries are added atomically: if any insertion fails, the
/// ones already added are removed before the error is returned. Unless
/// the continuation succeeds, the block is undone and the lesson's
/// remaining hours restored.
pub(super) fn commit_and_descend(
    space: &SearchSpace<'_>,
    state: &mut AttemptState,
    lesson_index: usize,
    block: &[TimeSlot],
    teacher_ids: &[&str],
    location_ids: &[&str],
) -> Result<bool> {
    let lesson = space.lessons[lesson_index].lesson;
    let mark = state.schedule.mark();

    for &slot in block {
        let entry = ScheduledEntry::new(
            lesson.id.clone(),
            teacher_ids.iter().map(|id| id.to_string()).collect(),
            location_ids.iter().map(|id| id.to_string()).collect(),
            slot,
            lesson.branch_id.clone(),
            lesson.grade_level,
        );
        if let Err(err) = state.schedule.insert(entry) {
            state.schedule.rollback_to(mark);
            return Err(err);
        }
    }

    let hours = block.len() as u32;
    state.remaining[lesson_index] -= hours;
    trace!(
        event = "block_placed",
        lesson = %lesson.id,
        start = %block[0],
        hours,
    );
    state.log.record(|| {
        format!(
            "placed {} ({}h) at {} with {} in {}",
            lesson.id,
            hours,
            block[0],
            teacher_ids.join("+"),
            location_ids.join("+"),
        )
    });

    let next = if state.remaining[lesson_index] == 0 {
        lesson_index + 1
    } else {
        lesson_index
    };
    let outcome = solve(space, state, next);

    if !matches!(outcome, Ok(true)) {
        state.schedule.rollback_to(mark);
        state.remaining[lesson_index] += hours;
        if matches!(outcome, Ok(false)) {
            state.backtracks += 1;
            state.log.record(|| format!("undo {} ({}h) at {}", lesson.id, hours, block[0]));
        }
    }
    outcome
}
