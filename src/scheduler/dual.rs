//! Dual-resource placement.
//!
//! Some lessons (split practical sessions) need two teachers and two
//! locations for every hour. Candidates are unordered pairs with no
//! teacher or location repeated inside a pair; the duration and
//! different-day rules are the same as for single-resource lessons. Every
//! hour of the block is one entry carrying both pairs, so a block is
//! committed or undone as a whole.

use tracing::debug;

use crate::error::Result;

use super::backtrack::{commit_and_descend, first_half_day_of};
use super::block::{find_block, BlockRequest};
use super::chunking::plan_chunks;
use super::context::{AttemptState, SearchSpace};

/// Places the next block of a dual-resource lesson and continues the search.
pub fn place_dual(space: &SearchSpace<'_>, state: &mut AttemptState, lesson_index: usize) -> Result<bool> {
    let plan = &space.lessons[lesson_index];

    if plan.teacher_pairs.is_empty() || plan.location_pairs.is_empty() {
        let (teachers, locations) = (plan.teacher_pairs.len(), plan.location_pairs.len());
        state.log.record(|| {
            format!(
                "{} needs two teachers and two locations ({} teacher pairs, {} location pairs)",
                plan.lesson.id, teachers, locations
            )
        });
        debug!(
            event = "dual_no_pairs",
            lesson = %plan.lesson.id,
            teacher_pairs = teachers,
            location_pairs = locations,
        );
        return Ok(false);
    }

    let chunks = plan_chunks(plan.lesson, state.remaining[lesson_index]);
    let first_half_day = first_half_day_of(state, &plan.lesson.id, chunks.second_half);

    for &start in &space.slot_order {
        state.budget.check_deadline()?;
        for teacher_pair in &plan.teacher_pairs {
            state.budget.check_deadline()?;
            for location_pair in &plan.location_pairs {
                for &duration in &chunks.durations {
                    let request = BlockRequest {
                        lesson: plan.lesson,
                        pool: &plan.pool,
                        teachers: teacher_pair,
                        locations: location_pair,
                        start,
                        duration,
                        first_half_day,
                    };
                    let Some(block) = find_block(&state.schedule, &space.grid, &request) else {
                        continue;
                    };
                    let teacher_ids = [teacher_pair[0].id.as_str(), teacher_pair[1].id.as_str()];
                    let location_ids = [location_pair[0].id.as_str(), location_pair[1].id.as_str()];
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
