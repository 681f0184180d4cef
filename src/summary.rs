//! Reduces a day's activity records to the figures shown on the summary
//! cards.

use crate::models::{ActivityRecord, DailySummary};
use std::collections::HashSet;

/// Scores at or above this count as productive time.
pub const PRODUCTIVE_SCORE: f64 = 7.0;

/// Daily totals never report more than a full day.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Minutes-weighted daily summary. Total over any input: an empty slice
/// yields all zeros and record order does not matter.
pub fn summarize(records: &[ActivityRecord]) -> DailySummary {
    let total_minutes = records
        .iter()
        .map(ActivityRecord::minutes)
        .sum::<f64>()
        .min(MINUTES_PER_DAY);
    let productive_minutes = records
        .iter()
        .filter(|record| is_productive(record))
        .map(ActivityRecord::minutes)
        .sum::<f64>()
        .min(MINUTES_PER_DAY);

    let clients: HashSet<&str> = records.iter().filter_map(ActivityRecord::client).collect();

    let average_productivity = if total_minutes > 0.0 {
        round1(productive_minutes / total_minutes * 10.0)
    } else {
        0.0
    };

    DailySummary {
        total_time: round2(total_minutes / 60.0),
        productive_time: round2(productive_minutes / 60.0),
        clients_worked_with: clients.len(),
        average_productivity,
    }
}

/// Unweighted mean of the raw scores over every record, rounded to one
/// decimal.
///
/// Not the same figure as [`DailySummary::average_productivity`]: a
/// five-minute record weighs as much as a five-hour one here. A record
/// without a score adds nothing to the sum but still counts.
pub fn mean_productivity_score(records: &[ActivityRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records
        .iter()
        .filter_map(|record| record.productivity_score)
        .filter(|score| score.is_finite())
        .sum();
    round1(sum / records.len() as f64)
}

pub fn is_productive(record: &ActivityRecord) -> bool {
    record
        .productivity_score
        .is_some_and(|score| score >= PRODUCTIVE_SCORE)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
