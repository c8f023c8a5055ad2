//! Property tests for the distribution run invariants.
//!
//! Random snapshots are resolved through the public loader types and pushed
//! through the assignment loop; every run must conserve the backlog, respect
//! capacity and modality, and keep per-doctor completion times strictly
//! increasing.
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use proptest::prelude::*;
use radflow_core::scheduler;
use radflow_core::{
    DistributionConfig, DoctorRecord, DoctorState, ModalityField, PendingStudy, ShiftRecord,
    StudyRecord,
};
use std::collections::HashMap;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn config() -> DistributionConfig {
    DistributionConfig {
        local_offset: chrono::FixedOffset::east_opt(0).unwrap(),
        ..DistributionConfig::default()
    }
}

fn modality_strategy() -> impl Strategy<Value = ModalityField> {
    prop_oneof![
        Just(ModalityField::Empty),
        prop::sample::select(vec!["CT", "MRI", "XRAY", "US"])
            .prop_map(|m| ModalityField::Single(m.to_string())),
        prop::sample::subsequence(vec!["CT", "MRI", "XRAY", "US"], 1..=3)
            .prop_map(|ms| ModalityField::Many(ms.into_iter().map(String::from).collect())),
    ]
}

fn study_strategy(id: i64) -> impl Strategy<Value = StudyRecord> {
    (
        prop::sample::select(vec!["cito", "asap", "normal", "garbage"]),
        -90i64..240,
        prop::option::of(0.0f64..6.0),
        modality_strategy(),
    )
        .prop_map(move |(priority, created_offset_min, up_value, modality)| StudyRecord {
            id,
            research_number: format!("RN-{id:04}"),
            priority: Some(priority.to_string()),
            created_at: Some(now() + Duration::minutes(created_offset_min)),
            study_type_id: Some(1),
            modality,
            up_value,
        })
}

fn studies_strategy() -> impl Strategy<Value = Vec<StudyRecord>> {
    (1usize..25).prop_flat_map(|n| {
        (0..n as i64)
            .map(|i| study_strategy(i + 1).boxed())
            .collect::<Vec<_>>()
    })
}

fn doctor_strategy(id: i64) -> impl Strategy<Value = (DoctorRecord, ShiftRecord)> {
    (modality_strategy(), 2i64..40, 8u32..11, 15u32..19).prop_map(
        move |(modality, max_up, start_hour, end_hour)| {
            (
                DoctorRecord {
                    id,
                    fio_alias: Some(format!("Doctor {id}")),
                    modality,
                    max_up_per_day: Some(max_up),
                },
                ShiftRecord {
                    work_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    time_start: NaiveTime::from_hms_opt(start_hour, 0, 0),
                    time_end: NaiveTime::from_hms_opt(end_hour, 0, 0),
                },
            )
        },
    )
}

fn doctors_strategy() -> impl Strategy<Value = Vec<(DoctorRecord, ShiftRecord)>> {
    (1usize..5).prop_flat_map(|n| {
        (0..n as i64)
            .map(|i| doctor_strategy(i + 1).boxed())
            .collect::<Vec<_>>()
    })
}

fn resolve(
    studies: &[StudyRecord],
    doctors: &[(DoctorRecord, ShiftRecord)],
) -> (Vec<PendingStudy>, Vec<DoctorState>) {
    let cfg = config();
    let studies = studies
        .iter()
        .cloned()
        .map(|r| PendingStudy::from_record(r, &cfg, now()))
        .collect();
    let doctors = doctors
        .iter()
        .cloned()
        .map(|(d, s)| DoctorState::from_record(d, &s, &cfg, now()))
        .collect();
    (studies, doctors)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn run_invariants_hold(
        raw_studies in studies_strategy(),
        raw_doctors in doctors_strategy(),
    ) {
        let cfg = config();
        let (studies, doctors) = resolve(&raw_studies, &raw_doctors);
        let by_id: HashMap<i64, PendingStudy> =
            studies.iter().map(|s| (s.id, s.clone())).collect();

        let outcome = scheduler::run(studies, doctors, &cfg).unwrap();

        // Conservation: every snapshot study is either assigned or unassigned
        prop_assert_eq!(
            outcome.assignments.len() + outcome.unassigned.len(),
            raw_studies.len()
        );

        // No study committed twice
        let mut seen = std::collections::HashSet::new();
        for a in &outcome.assignments {
            prop_assert!(seen.insert(a.study_id));
        }

        // Capacity and minutes budgets
        let slack_minutes = cfg.overtime_slack.num_minutes() as f64;
        for d in &outcome.doctors {
            prop_assert!(d.current_load <= d.max_up_per_day + 1e-9);
            prop_assert!(d.current_minutes <= d.max_minutes + slack_minutes + 1e-9);
        }

        // Per-doctor completion times strictly increase in commit order
        let mut last_completion: HashMap<i64, DateTime<Utc>> = HashMap::new();
        for a in &outcome.assignments {
            if let Some(prev) = last_completion.get(&a.doctor_id) {
                prop_assert!(a.completion_time > *prev);
            }
            last_completion.insert(a.doctor_id, a.completion_time);
        }

        // Modality compatibility, and weighted tardiness arithmetic
        let doctors_by_id: HashMap<i64, _> =
            outcome.doctors.iter().map(|d| (d.id, d)).collect();
        for a in &outcome.assignments {
            let study = &by_id[&a.study_id];
            let doctor = doctors_by_id[&a.doctor_id];
            prop_assert!(
                study.modalities.is_empty()
                    || doctor.modalities.is_empty()
                    || !study.modalities.is_disjoint(&doctor.modalities)
            );
            prop_assert!(a.tardiness_hours >= 0.0);
            prop_assert!((a.weighted_tardiness - a.weight * a.tardiness_hours).abs() < 1e-9);
            // Rule 3: the deadline was still reachable when the study started
            prop_assert!(a.completion_time - study.duration() <= a.deadline);
        }
    }

    #[test]
    fn runs_are_deterministic(
        raw_studies in studies_strategy(),
        raw_doctors in doctors_strategy(),
    ) {
        let cfg = config();
        let (studies_a, doctors_a) = resolve(&raw_studies, &raw_doctors);
        let (studies_b, doctors_b) = resolve(&raw_studies, &raw_doctors);

        let a = scheduler::run(studies_a, doctors_a, &cfg).unwrap();
        let b = scheduler::run(studies_b, doctors_b, &cfg).unwrap();

        prop_assert_eq!(a.assignments, b.assignments);
        prop_assert_eq!(a.doctors, b.doctors);
    }
}
