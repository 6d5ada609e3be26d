use std::collections::BTreeMap;

use crate::metrics::round2;
use crate::models::{Category, ClassifiedRecord, RetryDepthRow};

#[derive(Default)]
struct RetryGroup {
    multi_attempt: usize,
    successful_attempts: Vec<u32>,
    callbacks_total: usize,
    callbacks_system: usize,
}

pub fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: u64 = values.iter().map(|v| u64::from(*v)).sum();
    Some(total as f64 / values.len() as f64)
}

pub fn median(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0)
    } else {
        Some(f64::from(sorted[mid]))
    }
}

/// "at attempt k: n bookings" for each observed k, ascending.
pub fn distribution(attempts: &[u32]) -> String {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for attempt in attempts {
        *counts.entry(*attempt).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(attempt, bookings)| format!("at attempt {attempt}: {bookings} bookings"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One row per source that has at least one record dialed more than once.
pub fn analyze_retry_depth(records: &[ClassifiedRecord]) -> Vec<RetryDepthRow> {
    let mut groups: BTreeMap<&str, RetryGroup> = BTreeMap::new();

    for classified in records {
        let group = groups.entry(classified.record.source.as_str()).or_default();
        if classified.is(Category::CallbackAgent) || classified.is(Category::CallbackSystem) {
            group.callbacks_total += 1;
        }
        if classified.is(Category::CallbackSystem) {
            group.callbacks_system += 1;
        }

        let attempts = classified.record.attempts();
        if attempts <= 1 {
            continue;
        }
        group.multi_attempt += 1;
        if classified.is(Category::Booked) {
            group.successful_attempts.push(attempts);
        }
    }

    groups
        .into_iter()
        .filter(|(_, group)| group.multi_attempt > 0)
        .map(|(source, group)| RetryDepthRow {
            source: source.to_string(),
            multi_attempt_records: group.multi_attempt,
            bookings: group.successful_attempts.len(),
            mean_attempt: mean(&group.successful_attempts).map(round2),
            median_attempt: median(&group.successful_attempts).map(round2),
            distribution: distribution(&group.successful_attempts),
            callbacks_total: group.callbacks_total,
            callbacks_system: group.callbacks_system,
        })
        .collect()
}
