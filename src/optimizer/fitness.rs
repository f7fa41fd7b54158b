//! Schedule quality metrics.
//!
//! Scores a complete schedule from the teachers' point of view. Lower is
//! better for every term.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Variance | Population variance of weekly hours per teacher |
//! | Total gaps | Idle hours between lessons, summed over teacher-days |
//! | Short-day penalty | `(min - n)^2` for each teacher-day with `0 < n < min` hours |
//! | Fitness | Weighted sum of the three |
//!
//! Only teachers appearing in the schedule are counted. A dual-resource
//! hour counts once for each of its two teachers.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Sec. 2.1 (soft constraints)

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{ScheduledEntry, Weekday};

use super::OptimizerConfig;

/// Fitness terms of one schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    /// Population variance of hours per teacher.
    pub variance: f64,
    /// Idle hours between lessons.
    pub total_gap_hours: u32,
    /// Short-day penalty.
    pub short_day_penalty: u32,
    /// Weighted total.
    pub fitness: f64,
}

impl FitnessBreakdown {
    /// Scores `entries` with the weights and threshold of `config`.
    pub fn calculate(entries: &[ScheduledEntry], config: &OptimizerConfig) -> Self {
        let days = teacher_days(entries);

        let mut totals: HashMap<&str, u32> = HashMap::new();
        let mut total_gap_hours = 0;
        let mut short_day_penalty = 0;
        for ((teacher, _), hours) in &days {
            let count = hours.len() as u32;
            *totals.entry(*teacher).or_insert(0) += count;

            total_gap_hours += hours
                .windows(2)
                .map(|pair| u32::from(pair[1] - pair[0]).saturating_sub(1))
                .sum::<u32>();

            if count > 0 && count < config.min_lessons_per_day {
                let short = config.min_lessons_per_day - count;
                short_day_penalty += short * short;
            }
        }

        let variance = population_variance(totals.values().map(|&h| f64::from(h)));
        let fitness = config.weight_variance * variance
            + config.weight_gaps * f64::from(total_gap_hours)
            + config.weight_short_days * f64::from(short_day_penalty);

        Self {
            variance,
            total_gap_hours,
            short_day_penalty,
            fitness,
        }
    }
}

/// Teachers in the schedule who work on every one of `days`.
///
/// Sorted by id.
pub fn teachers_without_free_day(
    entries: &[ScheduledEntry],
    days: impl IntoIterator<Item = Weekday>,
) -> Vec<String> {
    let days: Vec<Weekday> = days.into_iter().collect();
    let teachers: BTreeSet<&str> = entries
        .iter()
        .flat_map(|entry| entry.teacher_ids.iter().map(String::as_str))
        .collect();

    teachers
        .into_iter()
        .filter(|teacher| {
            days.iter().all(|&day| {
                entries
                    .iter()
                    .any(|entry| entry.slot.day == day && entry.has_teacher(teacher))
            })
        })
        .map(str::to_string)
        .collect()
}

/// Sorted hours per (teacher, day).
fn teacher_days(entries: &[ScheduledEntry]) -> BTreeMap<(&str, Weekday), Vec<u8>> {
    let mut days: BTreeMap<(&str, Weekday), Vec<u8>> = BTreeMap::new();
    for entry in entries {
        for teacher in &entry.teacher_ids {
            days.entry((teacher.as_str(), entry.slot.day))
                .or_default()
                .push(entry.slot.hour);
        }
    }
    for hours in days.values_mut() {
        hours.sort_unstable();
    }
    days
}

fn population_variance(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
