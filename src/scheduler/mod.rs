//! Backtracking timetable search.
//!
//! One attempt places every active lesson as contiguous blocks of hours,
//! undoing earlier placements when a later lesson has nowhere to go.
//!
//! # Algorithm
//!
//! Depth-first backtracking over lessons, longest first. Candidate start
//! slots are visited in an order shuffled once per attempt; the shuffle
//! seed is the only source of variation between attempts.
//!
//! | Step | Module |
//! |------|--------|
//! | Resource free at a slot? | [`availability`] |
//! | Legal block lengths for the remaining hours | `chunking` |
//! | Contiguous block free for every resource | [`find_block`] |
//! | Single-resource recursion | `backtrack` |
//! | Two teachers and two locations per hour | `dual` |
//! | Seeding, bounds, panic isolation, result | [`AttemptRunner`] |
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod availability;
mod attempt;
mod backtrack;
mod block;
mod chunking;
mod context;
mod dual;

pub use attempt::{AttemptResult, AttemptRunner, AttemptSource, AttemptStats, DEFAULT_LOG_CAPACITY};
pub use availability::{class_free, location_free, location_suitable, teacher_free};
pub use block::{find_block, BlockRequest};
pub use chunking::{plan_chunks, ChunkPlan};
pub use context::SearchLimits;
