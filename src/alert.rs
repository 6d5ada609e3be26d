use crate::models::{AlertBucket, UsageStatus};

/// Below this utilization a source is still being worked and CTR is not yet meaningful.
pub const MIN_UTILIZATION: f64 = 40.0;
pub const WORKED_THROUGH_UTILIZATION: f64 = 90.0;
pub const BURNED_OUT_CTR: f64 = 1000.0;
pub const RICH_SOURCE_CTR: f64 = 300.0;
pub const EFFECTIVE_BOOKING_RATE: f64 = 5.0;

pub const NO_BOOKINGS: &str = "no bookings, likely dead source";

pub fn ctr_tier(ctr: f64) -> AlertBucket {
    match ctr {
        c if c < 150.0 => AlertBucket::Outstanding,
        c if c < 300.0 => AlertBucket::VeryGood,
        c if c < 500.0 => AlertBucket::Solid,
        c if c < 700.0 => AlertBucket::Average,
        c if c < BURNED_OUT_CTR => AlertBucket::Weak,
        _ => AlertBucket::BurnedOut,
    }
}

/// The utilization gate pre-empts any CTR tier.
pub fn alert_bucket(ctr: Option<f64>, utilization: Option<f64>) -> AlertBucket {
    match (ctr, utilization) {
        (_, Some(used)) if used < MIN_UTILIZATION => AlertBucket::TooEarly,
        (Some(ctr), Some(_)) => ctr_tier(ctr),
        _ => AlertBucket::NoData,
    }
}

pub fn usage_status(utilization: Option<f64>) -> UsageStatus {
    match utilization {
        None => UsageStatus::NoData,
        Some(used) if used < MIN_UTILIZATION => UsageStatus::Early,
        Some(used) if used < WORKED_THROUGH_UTILIZATION => UsageStatus::InProgress,
        Some(_) => UsageStatus::WorkedThrough,
    }
}

/// First matching rule wins; an empty string means nothing worth saying.
pub fn narrative(
    bookings: usize,
    ctr: Option<f64>,
    booking_rate: Option<f64>,
    utilization: Option<f64>,
) -> String {
    if bookings == 0 {
        return NO_BOOKINGS.to_string();
    }
    if let Some(used) = utilization.filter(|used| *used < MIN_UTILIZATION) {
        // floored so the figure never reaches the gate it is reported under
        return format!(
            "in progress, premature to conclude, utilization {:.0}%",
            used.floor()
        );
    }
    if ctr.is_some_and(|ctr| ctr >= BURNED_OUT_CTR) {
        return "burned out, consider retiring/filtering".to_string();
    }
    if booking_rate.is_some_and(|rate| rate > EFFECTIVE_BOOKING_RATE) {
        return "highly effective, continue".to_string();
    }
    if ctr.is_some_and(|ctr| ctr < RICH_SOURCE_CTR) {
        return "rich source, fast results".to_string();
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_ctr_thresholds() {
        assert_eq!(ctr_tier(0.0), AlertBucket::Outstanding);
        assert_eq!(ctr_tier(149.99), AlertBucket::Outstanding);
        assert_eq!(ctr_tier(150.0), AlertBucket::VeryGood);
        assert_eq!(ctr_tier(300.0), AlertBucket::Solid);
        assert_eq!(ctr_tier(500.0), AlertBucket::Average);
        assert_eq!(ctr_tier(700.0), AlertBucket::Weak);
        assert_eq!(ctr_tier(999.99), AlertBucket::Weak);
        assert_eq!(ctr_tier(1000.0), AlertBucket::BurnedOut);
    }

    #[test]
    fn low_utilization_pre_empts_best_tier() {
        assert_eq!(alert_bucket(Some(120.0), Some(30.0)), AlertBucket::TooEarly);
        assert_eq!(alert_bucket(None, Some(30.0)), AlertBucket::TooEarly);
        assert_eq!(alert_bucket(Some(120.0), Some(40.0)), AlertBucket::Outstanding);
    }

    #[test]
    fn undefined_inputs_have_no_bucket() {
        assert_eq!(alert_bucket(None, Some(80.0)), AlertBucket::NoData);
        assert_eq!(alert_bucket(Some(80.0), None), AlertBucket::NoData);
    }

    #[test]
    fn narrative_precedence() {
        assert_eq!(narrative(0, None, Some(0.0), Some(10.0)), NO_BOOKINGS);
        assert_eq!(
            narrative(3, Some(1500.0), Some(0.1), Some(25.4)),
            "in progress, premature to conclude, utilization 25%"
        );
        assert_eq!(
            narrative(3, Some(1500.0), Some(0.1), Some(80.0)),
            "burned out, consider retiring/filtering"
        );
        assert_eq!(
            narrative(3, Some(10.0), Some(10.0), Some(80.0)),
            "highly effective, continue"
        );
        assert_eq!(
            narrative(3, Some(250.0), Some(0.4), Some(80.0)),
            "rich source, fast results"
        );
        assert_eq!(narrative(3, Some(450.0), Some(0.2), Some(80.0)), "");
    }

    #[test]
    fn utilization_just_under_the_gate_is_not_rounded_up() {
        assert_eq!(
            narrative(3, Some(120.0), Some(2.0), Some(39.5)),
            "in progress, premature to conclude, utilization 39%"
        );
        assert_eq!(
            narrative(3, Some(120.0), Some(2.0), Some(39.99)),
            "in progress, premature to conclude, utilization 39%"
        );
    }

    #[test]
    fn usage_status_stages() {
        assert_eq!(usage_status(None), UsageStatus::NoData);
        assert_eq!(usage_status(Some(39.9)), UsageStatus::Early);
        assert_eq!(usage_status(Some(40.0)), UsageStatus::InProgress);
        assert_eq!(usage_status(Some(90.0)), UsageStatus::WorkedThrough);
    }
}
