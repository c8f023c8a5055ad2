/// Apparent Tardiness Cost scoring.
///
/// For a study `s` and a doctor available at instant `t`, with processing
/// time `p` in hours:
///
/// ```text
/// slack       = hours(s.deadline - t) - p
/// index(s, t) = (s.weight / p) * exp(-max(0, slack) / (k * p))
/// ```
///
/// The index multiplies weighted processing-rate urgency by a decay term that
/// saturates to 1 as slack approaches zero, favoring studies that are both
/// high-weight and near-due.
use crate::config::{DistributionConfig, MIN_PROCESSING_HOURS};
use crate::scheduler::types::PendingStudy;
use chrono::{DateTime, Utc};

/// Processing time in hours, clamped away from zero.
pub fn processing_hours(study: &PendingStudy) -> f64 {
    let p = study.duration_minutes / 60.0;
    if p > 0.0 {
        p
    } else {
        MIN_PROCESSING_HOURS
    }
}

/// Hours between "start now" plus processing and the deadline. Negative when
/// the study cannot finish in time.
pub fn slack_hours(study: &PendingStudy, at: DateTime<Utc>) -> f64 {
    hours_between(at, study.deadline) - processing_hours(study)
}

/// The ATC priority index; higher means schedule sooner.
pub fn atc_index(study: &PendingStudy, at: DateTime<Utc>, config: &DistributionConfig) -> f64 {
    let p = processing_hours(study);
    let slack = slack_hours(study, at);
    (study.weight / p) * (-slack.max(0.0) / (config.atc_k * p)).exp()
}

/// Whether two indices are equal to machine precision; ties fall through to
/// the deterministic ordering rules.
pub fn indices_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON * a.abs().max(b.abs()).max(1.0)
}

pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeSet;

    fn study(priority: Priority, up: f64, deadline_in_hours: i64) -> (PendingStudy, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let config = DistributionConfig::default();
        let study = PendingStudy {
            id: 1,
            research_number: "R-1".to_string(),
            priority,
            created_at: now,
            modalities: BTreeSet::new(),
            up_value: up,
            duration_minutes: up * config.minutes_per_up,
            deadline: now + Duration::hours(deadline_in_hours),
            weight: config.weight_for(priority),
        };
        (study, now)
    }

    #[test]
    fn index_is_weight_over_p_when_slack_is_zero_or_negative() {
        let config = DistributionConfig::default();
        // 1 UP = 0.25h processing; deadline now, so slack < 0 and the decay
        // term saturates to 1
        let (study, now) = study(Priority::Cito, 1.0, 0);
        let index = atc_index(&study, now, &config);
        assert!((index - 100.0 / 0.25).abs() < 1e-9);
    }

    #[test]
    fn index_decays_with_slack() {
        let config = DistributionConfig::default();
        let (near, now) = study(Priority::Normal, 1.0, 1);
        let (far, _) = study(Priority::Normal, 1.0, 48);
        assert!(atc_index(&near, now, &config) > atc_index(&far, now, &config));
    }

    #[test]
    fn index_grows_as_time_passes() {
        let config = DistributionConfig::default();
        let (study, now) = study(Priority::Asap, 2.0, 24);
        let earlier = atc_index(&study, now, &config);
        let later = atc_index(&study, now + Duration::hours(12), &config);
        assert!(later > earlier);
    }

    #[test]
    fn higher_weight_dominates_equal_slack() {
        let config = DistributionConfig::default();
        let (cito, now) = study(Priority::Cito, 1.0, 2);
        let (normal, _) = study(Priority::Normal, 1.0, 2);
        assert!(atc_index(&cito, now, &config) > atc_index(&normal, now, &config));
    }

    #[test]
    fn degenerate_processing_time_is_clamped() {
        let config = DistributionConfig::default();
        let (mut study, now) = study(Priority::Normal, 1.0, 24);
        study.duration_minutes = 0.0;
        assert_eq!(processing_hours(&study), MIN_PROCESSING_HOURS);
        assert!(atc_index(&study, now, &config).is_finite());
    }

    #[test]
    fn slack_is_negative_past_deadline() {
        let (study, now) = study(Priority::Normal, 1.0, 0);
        assert!(slack_hours(&study, now + Duration::hours(1)) < 0.0);
    }
}
