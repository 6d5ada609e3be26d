use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::alert::{alert_bucket, narrative, usage_status};
use crate::models::{Category, SourceAggregate, SourceSummary};

const SECONDS_PER_DAY: i64 = 86_400;

/// Rounds to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

pub fn percent(part: f64, whole: f64) -> Option<f64> {
    ratio(part, whole).map(|value| round2(value * 100.0))
}

/// Attempts per booking. Lower is better.
pub fn contact_to_booking(attempts: u64, bookings: usize) -> Option<f64> {
    ratio(attempts as f64, bookings as f64).map(round2)
}

pub fn utilization(unconsumed: usize, records: usize) -> Option<f64> {
    ratio(unconsumed as f64, records as f64).map(|share| round2(100.0 * (1.0 - share)))
}

/// Whole days between import and last contact, floored.
pub fn reaction_days(imported: Option<NaiveDateTime>, last_contact: Option<NaiveDateTime>) -> Option<i64> {
    let elapsed = last_contact? - imported?;
    Some(elapsed.num_seconds().div_euclid(SECONDS_PER_DAY))
}

pub fn summarize(aggregate: &SourceAggregate) -> SourceSummary {
    let records = aggregate.records as f64;
    let bookings = aggregate.count(Category::Booked);
    let callback_agent = aggregate.count(Category::CallbackAgent);
    let callback_system = aggregate.count(Category::CallbackSystem);

    let utilization = utilization(aggregate.unconsumed, aggregate.records);
    let ctr = contact_to_booking(aggregate.attempts, bookings);
    let booking_rate = percent(bookings as f64, aggregate.attempts as f64);

    SourceSummary {
        source: aggregate.source.clone(),
        l100r: percent(bookings as f64, records),
        ctr,
        booking_rate,
        utilization,
        unconsumed: utilization.map(|used| round2(100.0 - used)),
        status: usage_status(utilization),
        retry_rate: percent((callback_agent + callback_system) as f64, records),
        system_retry_rate: percent(callback_system as f64, records),
        avg_attempts: ratio(aggregate.attempts as f64, records)
            .map(round2)
            .unwrap_or(0.0),
        records: aggregate.records,
        open: aggregate.count(Category::Open),
        callback_agent,
        callback_system,
        closed_by_agent: aggregate.count(Category::ClosedByAgent),
        closed_by_system: aggregate.count(Category::ClosedBySystem),
        unusable: aggregate.count(Category::Unusable),
        attempts: aggregate.attempts,
        bookings,
        last_contact: aggregate.last_contact,
        imported: aggregate.imported,
        reaction_days: reaction_days(aggregate.imported, aggregate.last_contact),
        alert: alert_bucket(ctr, utilization),
        narrative: narrative(bookings, ctr, booking_rate, utilization),
    }
}

fn undefined_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Best sources first: ascending CTR, then descending utilization.
pub fn sort_summaries(summaries: &mut [SourceSummary]) {
    summaries.sort_by(|a, b| {
        undefined_last(a.ctr, b.ctr, false)
            .then_with(|| undefined_last(a.utilization, b.utilization, true))
            .then_with(|| a.source.cmp(&b.source))
    });
}
