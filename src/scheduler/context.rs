//! Per-attempt search context.
//!
//! Everything one attempt reads or mutates lives here, so attempts share
//! nothing and can run on separate threads.
//!
//! - [`SearchSpace`]: immutable plan built once per attempt (lesson order,
//!   candidate teachers and locations, shuffled slot order).
//! - [`AttemptState`]: mutable search state (schedule, remaining hours,
//!   decision log, step budget).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, TimetableError};
use crate::models::{ClassPool, Lesson, Location, Schedule, SchedulerInput, SlotGrid, Teacher, TimeSlot};

use super::availability::location_suitable;

/// Steps between deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Bounds on one attempt's search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    /// Maximum solver steps (recursive calls).
    pub max_steps: Option<u64>,
    /// Wall-clock limit.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    /// No bound at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounds the number of solver steps.
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Bounds the wall-clock time.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Candidate resources and shape of one lesson.
#[derive(Debug, Clone)]
pub struct LessonPlan<'a> {
    /// The lesson.
    pub lesson: &'a Lesson,
    /// Class pool of the lesson.
    pub pool: ClassPool,
    /// Single-resource candidates (required teachers only, if any exist).
    pub teachers: Vec<&'a Teacher>,
    /// Dual-resource teacher pairs.
    pub teacher_pairs: Vec<[&'a Teacher; 2]>,
    /// Suitable locations.
    pub locations: Vec<&'a Location>,
    /// Dual-resource location pairs.
    pub location_pairs: Vec<[&'a Location; 2]>,
}

/// Immutable search plan of one attempt.
#[derive(Debug, Clone)]
pub struct SearchSpace<'a> {
    /// Active lessons, longest first.
    pub lessons: Vec<LessonPlan<'a>>,
    /// Usable slots.
    pub grid: SlotGrid,
    /// Start slots in this attempt's shuffled order.
    pub slot_order: Vec<TimeSlot>,
}

impl<'a> SearchSpace<'a> {
    /// Builds the plan, shuffling the slot order with `rng`.
    ///
    /// Fails if a lesson names a teacher missing from the input.
    pub fn build<R: Rng + ?Sized>(input: &'a SchedulerInput, rng: &mut R) -> Result<Self> {
        let grid = input.grid();
        let mut slot_order: Vec<TimeSlot> = grid.slots().collect();
        slot_order.shuffle(rng);

        let teachers: HashMap<&str, &'a Teacher> =
            input.teachers.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut active: Vec<&'a Lesson> = input.active_lessons().collect();
        active.sort_by(|a, b| b.weekly_hours.cmp(&a.weekly_hours));

        let lessons = active
            .into_iter()
            .map(|lesson| plan_lesson(input, &teachers, lesson))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            lessons,
            grid,
            slot_order,
        })
    }
}

fn plan_lesson<'a>(
    input: &'a SchedulerInput,
    teachers: &HashMap<&str, &'a Teacher>,
    lesson: &'a Lesson,
) -> Result<LessonPlan<'a>> {
    let mut eligible: Vec<&'a Teacher> = Vec::with_capacity(lesson.eligible_teacher_ids.len());
    for id in &lesson.eligible_teacher_ids {
        let teacher = teachers.get(id.as_str()).copied().ok_or_else(|| {
            TimetableError::Internal(format!(
                "lesson '{}' names unknown teacher '{}'",
                lesson.id, id
            ))
        })?;
        if !eligible.iter().any(|t| t.id == teacher.id) {
            eligible.push(teacher);
        }
    }

    let (required, others): (Vec<&'a Teacher>, Vec<&'a Teacher>) = eligible
        .into_iter()
        .partition(|t| input.required_assignments.requires(&t.id, &lesson.id));

    let locations: Vec<&'a Location> = input
        .locations
        .iter()
        .filter(|location| location_suitable(lesson, location))
        .collect();

    let (teacher_pairs, location_pairs) = if lesson.dual_resource {
        let teacher_pairs = match required.len() {
            0 => pairs(&others),
            1 => others.iter().map(|&other| [required[0], other]).collect(),
            _ => pairs(&required),
        };
        (teacher_pairs, pairs(&locations))
    } else {
        (Vec::new(), Vec::new())
    };

    let single = if required.is_empty() { others } else { required };

    Ok(LessonPlan {
        lesson,
        pool: ClassPool::of(&lesson.branch_id, lesson.grade_level),
        teachers: single,
        teacher_pairs,
        locations,
        location_pairs,
    })
}

/// All unordered pairs of distinct items, in index order.
fn pairs<T: Copy>(items: &[T]) -> Vec<[T; 2]> {
    let mut out = Vec::new();
    for (i, &a) in items.iter().enumerate() {
        for &b in &items[i + 1..] {
            out.push([a, b]);
        }
    }
    out
}

/// Step and deadline accounting for one attempt.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    limits: SearchLimits,
    started: Instant,
    steps: u64,
}

impl SearchBudget {
    /// Starts the clock.
    pub fn start(limits: SearchLimits) -> Self {
        Self {
            limits,
            started: Instant::now(),
            steps: 0,
        }
    }

    /// Counts one step, failing once a bound is exceeded.
    pub fn tick(&mut self) -> Result<()> {
        self.steps += 1;
        if let Some(max) = self.limits.max_steps {
            if self.steps > max {
                return Err(TimetableError::BudgetExhausted { steps: max });
            }
        }
        if self.steps % DEADLINE_CHECK_INTERVAL == 0 {
            self.check_deadline()?;
        }
        Ok(())
    }

    /// Fails once the wall-clock limit has passed, whatever the step count.
    pub fn check_deadline(&self) -> Result<()> {
        match self.limits.time_limit {
            Some(limit) if self.started.elapsed() > limit => {
                Err(TimetableError::DeadlineExceeded {
                    limit_ms: limit.as_millis() as u64,
                })
            }
            _ => Ok(()),
        }
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Time since the attempt started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Bounded, human-readable record of search decisions.
#[derive(Debug, Clone, Default)]
pub struct DecisionLog {
    lines: Vec<String>,
    capacity: usize,
    truncated: bool,
}

impl DecisionLog {
    /// Creates a log holding at most `capacity` decision lines.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::new(),
            capacity,
            truncated: false,
        }
    }

    /// Records a line; the message is only built while there is room.
    pub fn record<F: FnOnce() -> String>(&mut self, message: F) {
        if self.lines.len() < self.capacity {
            self.lines.push(message());
        } else if !self.truncated {
            self.truncated = true;
            self.lines
                .push(format!("decision log truncated after {} lines", self.capacity));
        }
    }

    /// Whether lines were dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Consumes the log.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Mutable state of one attempt.
#[derive(Debug, Clone)]
pub struct AttemptState {
    /// Committed entries.
    pub schedule: Schedule,
    /// Unplaced hours per lesson plan (same order as `SearchSpace::lessons`).
    pub remaining: Vec<u32>,
    /// Decision log.
    pub log: DecisionLog,
    /// Step budget.
    pub budget: SearchBudget,
    /// Number of undone placements.
    pub backtracks: u64,
    /// Deepest lesson index the search reached.
    pub frontier: usize,
}

impl AttemptState {
    /// Fresh state: empty schedule, every lesson at its full weekly hours.
    pub fn fresh(space: &SearchSpace<'_>, limits: SearchLimits, log_capacity: usize) -> Self {
        Self {
            schedule: Schedule::new(),
            remaining: space.lessons.iter().map(|p| p.lesson.weekly_hours).collect(),
            log: DecisionLog::with_capacity(log_capacity),
            budget: SearchBudget::start(limits),
            backtracks: 0,
            frontier: 0,
        }
    }
}

/// The search space and state of one attempt, owned by the attempt runner.
#[derive(Debug, Clone)]
pub struct AttemptContext<'a> {
    pub space: SearchSpace<'a>,
    pub state: AttemptState,
}

impl<'a> AttemptContext<'a> {
    /// Builds a fresh context.
    pub fn new<R: Rng + ?Sized>(
        input: &'a SchedulerInput,
        rng: &mut R,
        limits: SearchLimits,
        log_capacity: usize,
    ) -> Result<Self> {
        let space = SearchSpace::build(input, rng)?;
        let state = AttemptState::fresh(&space, limits, log_capacity);
        Ok(Self { space, state })
    }

    /// Lessons that still carry unplaced hours.
    pub fn unassigned_lessons(&self) -> Vec<Lesson> {
        self.space
            .lessons
            .iter()
            .zip(&self.state.remaining)
            .filter(|&(_, &remaining)| remaining > 0)
            .map(|(plan, _)| plan.lesson.clone())
            .collect()
    }
}
