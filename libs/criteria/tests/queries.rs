//! End-to-end compilation scenarios.

use chrono::NaiveDate;
use cohort_criteria::{compile, ActorContext, BindValue, CompiledQuery, SubjectSnapshot};

fn criteria(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn actor() -> ActorContext {
    ActorContext::new(7, 23159, 23162)
}

fn build(pairs: &[(&str, &str)]) -> CompiledQuery {
    compile(&criteria(pairs), &actor(), None, None).unwrap()
}

/// Every `:name` placeholder in the text has a bind entry and vice versa.
fn assert_binds_match_placeholders(query: &CompiledQuery) {
    let mut placeholders = std::collections::BTreeSet::new();
    let bytes = query.text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b':' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len()
                && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
            {
                end += 1;
            }
            if end > start {
                placeholders.insert(query.text[start..end].to_string());
            }
            i = end;
        } else {
            i += 1;
        }
    }
    let bound: std::collections::BTreeSet<String> = query.binds.keys().cloned().collect();
    assert_eq!(placeholders, bound, "bind map must match placeholders exactly");
}

#[test]
fn screening_status_equality() {
    let query = build(&[("screening status", "Ceased")]);
    assert!(query.text.contains("ss.screening_status_id = :status_id"));
    assert_eq!(query.binds.get("status_id"), Some(&BindValue::Int(4008)));
    assert_binds_match_placeholders(&query);
}

#[test]
fn screening_status_negated() {
    let query = build(&[("screening status", "NOT: Ceased")]);
    assert!(query.text.contains("ss.screening_status_id != :status_id"));
    assert_eq!(query.binds.get("status_id"), Some(&BindValue::Int(4008)));
}

#[test]
fn age_equates_whole_years_for_every_age() {
    for n in 0..=120 {
        let query = build(&[("subject age", &n.to_string())]);
        assert!(
            query.text.contains(
                "c.date_of_birth <= ADD_MONTHS(TRUNC(SYSDATE), -12 * :age_years)"
            ),
            "age {}",
            n
        );
        assert!(query
            .text
            .contains("c.date_of_birth > ADD_MONTHS(TRUNC(SYSDATE), -12 * (:age_years + 1))"));
        assert_eq!(query.binds.get("age_years"), Some(&BindValue::Int(n)));
        assert_binds_match_placeholders(&query);
    }
}

#[test]
fn age_range_binds_both_bounds() {
    let query = build(&[("subject age", "Between 60 and 71")]);
    assert_eq!(query.binds.get("age_from"), Some(&BindValue::Int(60)));
    assert_eq!(query.binds.get("age_to"), Some(&BindValue::Int(71)));
    assert!(query.text.contains("-12 * :age_from"));
    assert!(query.text.contains("-12 * (:age_to + 1)"));
}

#[test]
fn age_range_rejects_inverted_bounds() {
    let err = compile(
        &criteria(&[("subject age", "between 71 and 60")]),
        &actor(),
        None,
        None,
    )
    .unwrap_err();
    assert!(err.reason.contains("lower bound"));
}

#[test]
fn due_date_two_years_ago() {
    let query = build(&[("screening due date", "2 years ago")]);
    assert!(query
        .text
        .contains("ss.screening_due_date = ADD_MONTHS(TRUNC(SYSDATE), :due_date_months)"));
    assert_eq!(query.binds.get("due_date_months"), Some(&BindValue::Int(-24)));
    assert_binds_match_placeholders(&query);
}

#[test]
fn relative_dates_are_mirror_images() {
    let past = build(&[("screening due date", "3 years ago")]);
    let future = build(&[("screening due date", "3 years later")]);
    assert_eq!(past.binds.get("due_date_months"), Some(&BindValue::Int(-36)));
    assert_eq!(future.binds.get("due_date_months"), Some(&BindValue::Int(36)));
    assert_eq!(past.text, future.text);
}

#[test]
fn more_than_n_ago_never_crosses_today() {
    let query = build(&[("screening due date", "> 3 years ago")]);
    assert!(query.text.contains(
        "(ss.screening_due_date < ADD_MONTHS(TRUNC(SYSDATE), :due_date_months) \
         AND ss.screening_due_date <= TRUNC(SYSDATE))"
    ));
    assert_eq!(query.binds.get("due_date_months"), Some(&BindValue::Int(-36)));
}

#[test]
fn less_than_n_days_later_is_bounded_below_by_today() {
    let query = build(&[("surveillance due date", "less than 30 days later")]);
    assert!(query.text.contains(
        "(ss.surveillance_due_date < TRUNC(SYSDATE) + :surveillance_date_days \
         AND ss.surveillance_due_date >= TRUNC(SYSDATE))"
    ));
    assert_eq!(
        query.binds.get("surveillance_date_days"),
        Some(&BindValue::Int(30))
    );
}

#[test]
fn nth_birthday_offsets_the_date_of_birth() {
    let query = build(&[("screening due date", "65th birthday")]);
    assert!(query.text.contains(
        "ss.screening_due_date = ADD_MONTHS(c.date_of_birth, 12 * :due_date_years)"
    ));
    assert_eq!(query.binds.get("due_date_years"), Some(&BindValue::Int(65)));
    assert_binds_match_placeholders(&query);
}

#[test]
fn named_day_anchors_compare_against_the_database_clock() {
    let query = build(&[("screening due date", "today")]);
    assert!(query.text.contains("ss.screening_due_date = TRUNC(SYSDATE)"));
    assert!(query.binds.is_empty());

    let query = build(&[("screening due date", "yesterday")]);
    assert!(query.text.contains("ss.screening_due_date = TRUNC(SYSDATE) - 1"));
    assert!(query.binds.is_empty());

    let query = build(&[("screening due date", "tomorrow")]);
    assert!(query.text.contains("ss.screening_due_date = TRUNC(SYSDATE) + 1"));
    assert!(query.binds.is_empty());
}

#[test]
fn before_and_after_today_are_open_ended_windows() {
    let query = build(&[("screening due date", "< today")]);
    assert!(query.text.contains("ss.screening_due_date < TRUNC(SYSDATE)"));
    assert!(query.binds.is_empty());

    let query = build(&[("screening due date", "> today")]);
    assert!(query.text.contains("ss.screening_due_date > TRUNC(SYSDATE)"));
    assert!(query.binds.is_empty());
}

#[test]
fn last_birthday_counts_completed_years_since_birth() {
    let query = build(&[("screening due date", "last birthday")]);
    assert!(query.text.contains(
        "ss.screening_due_date = ADD_MONTHS(c.date_of_birth, \
         12 * FLOOR(MONTHS_BETWEEN(TRUNC(SYSDATE), c.date_of_birth) / 12))"
    ));
    assert!(query.binds.is_empty());
}

#[test]
fn literal_dates_bind_iso_text() {
    let iso = build(&[("screening due date", "2024-02-29")]);
    let uk = build(&[("screening due date", "29/02/2024")]);
    assert!(iso
        .text
        .contains("ss.screening_due_date = TO_DATE(:due_date, 'YYYY-MM-DD')"));
    assert_eq!(iso.binds.get("due_date"), Some(&BindValue::text("2024-02-29")));
    assert_eq!(iso, uk);
}

#[test]
fn users_hub_resolves_from_the_actor() {
    let query = build(&[("subject hub code", "user's hub")]);
    assert!(query.text.contains("ss.hub_id = :hub_id"));
    assert_eq!(query.binds.get("hub_id"), Some(&BindValue::Int(23159)));
    assert_binds_match_placeholders(&query);
}

#[test]
fn literal_org_code_uses_a_correlated_sub_select() {
    let query = build(&[("subject screening centre code", "BCS001")]);
    assert!(query
        .text
        .contains("ss.sc_id = (SELECT o.org_id FROM org_t o WHERE o.org_code = :org_code)"));
    assert_eq!(query.binds.get("org_code"), Some(&BindValue::text("BCS001")));
}

#[test]
fn unchanged_without_snapshot_fails() {
    for key in [
        "screening status",
        "cease reason",
        "screening due date",
        "surveillance due date",
    ] {
        let err = compile(&criteria(&[(key, "unchanged")]), &actor(), None, None).unwrap_err();
        assert_eq!(err.key, key);
        assert!(err.reason.contains("snapshot"), "{}", key);
    }
}

#[test]
fn unchanged_status_compares_the_snapshot_code() {
    let snapshot = SubjectSnapshot {
        screening_status_id: Some(4003),
        ..Default::default()
    };
    let query = compile(
        &criteria(&[("screening status", "unchanged")]),
        &actor(),
        Some(&snapshot),
        None,
    )
    .unwrap();
    assert!(query.text.contains("ss.screening_status_id = :status_id"));
    assert_eq!(query.binds.get("status_id"), Some(&BindValue::Int(4003)));
}

#[test]
fn unchanged_with_absent_snapshot_field_is_a_null_test() {
    let snapshot = SubjectSnapshot::default();
    let query = compile(
        &criteria(&[("cease reason", "unchanged")]),
        &actor(),
        Some(&snapshot),
        None,
    )
    .unwrap();
    assert!(query.text.contains("ss.cease_reason_id IS NULL"));
    assert!(query.binds.is_empty());
}

#[test]
fn unchanged_due_date_compares_the_snapshot_date() {
    let snapshot = SubjectSnapshot {
        screening_due_date: NaiveDate::from_ymd_opt(2023, 6, 1),
        ..Default::default()
    };
    let query = compile(
        &criteria(&[("screening due date", "unchanged")]),
        &actor(),
        Some(&snapshot),
        None,
    )
    .unwrap();
    assert!(query
        .text
        .contains("ss.screening_due_date = TO_DATE(:due_date, 'YYYY-MM-DD')"));
    assert_eq!(query.binds.get("due_date"), Some(&BindValue::text("2023-06-01")));
}

#[test]
fn status_sentinels_short_circuit_to_null_tests() {
    let query = build(&[("cease reason", "Null")]);
    assert!(query.text.contains("ss.cease_reason_id IS NULL"));

    let query = build(&[("cease reason", "Not Null")]);
    assert!(query.text.contains("ss.cease_reason_id IS NOT NULL"));

    let query = build(&[("cease reason", "NOT: Null")]);
    assert!(query.text.contains("ss.cease_reason_id IS NOT NULL"));
}

#[test]
fn event_existence_uses_correlated_sub_queries() {
    let query = build(&[
        ("has event status", "Abnormal Result"),
        ("does not have event status", "Colonoscopy Performed"),
    ]);
    assert!(query.text.contains(
        "EXISTS (SELECT 1 FROM subject_epis_event_t ev \
         WHERE ev.screening_subject_id = ss.screening_subject_id \
         AND ev.event_status_id = :event_status_id)"
    ));
    assert!(query.text.contains("NOT EXISTS (SELECT 1 FROM subject_epis_event_t ev"));
    assert_eq!(query.binds.get("event_status_id"), Some(&BindValue::Int(2006)));
    assert_eq!(
        query.binds.get("event_status_id_2"),
        Some(&BindValue::Int(2009))
    );
    assert_binds_match_placeholders(&query);
}

#[test]
fn event_anchor_joins_nothing_but_binds_the_event_code() {
    let query = build(&[(
        "screening due date",
        "2 years from latest colonoscopy performed event",
    )]);
    assert!(query.text.contains("SELECT MAX(ev.event_datestamp)"));
    assert!(query.text.contains("ADD_MONTHS((SELECT MAX(ev.event_datestamp)"));
    assert!(!query.text.contains("LEFT JOIN"));
    assert_eq!(query.binds.get("event_status_id"), Some(&BindValue::Int(2009)));
    assert_eq!(query.binds.get("due_date_years"), Some(&BindValue::Int(2)));
}

#[test]
fn earliest_event_anchor_takes_the_minimum_event_date() {
    let query = build(&[(
        "surveillance due date",
        "10 years from earliest abnormal result event",
    )]);
    assert!(query.text.contains("ADD_MONTHS((SELECT MIN(ev.event_datestamp)"));
    assert_eq!(query.binds.get("event_status_id"), Some(&BindValue::Int(2006)));
    assert_eq!(
        query.binds.get("surveillance_date_years"),
        Some(&BindValue::Int(10))
    );
    assert_binds_match_placeholders(&query);
}

#[test]
fn diagnosis_anchor_adds_the_genetic_join_once() {
    let query = build(&[
        ("screening due date", "5 years from diagnosis"),
        ("surveillance due date", "3 years from diagnosis"),
    ]);
    assert_eq!(
        query
            .text
            .matches("LEFT JOIN genetic_condition_diagnosis_t gcd")
            .count(),
        1
    );
    assert_eq!(query.binds.get("due_date_years"), Some(&BindValue::Int(5)));
    assert_eq!(
        query.binds.get("surveillance_date_years"),
        Some(&BindValue::Int(3))
    );
    assert_binds_match_placeholders(&query);
}

#[test]
fn calculated_due_date_compares_columns_without_binds() {
    let query = build(&[("screening due date", "calculated due date")]);
    assert!(query.text.contains("ss.screening_due_date = ss.calculated_sdd"));
    assert!(query.binds.is_empty());
}

#[test]
fn pending_flag_criteria_emit_fixed_existence_tests() {
    let query = build(&[
        ("has unprocessed sspi updates", "Yes"),
        ("has active supporting notes", "no"),
    ]);
    assert!(query.text.contains("EXISTS (SELECT 1 FROM sspi_update_queue_t q"));
    assert!(query.text.contains("NOT EXISTS (SELECT 1 FROM supporting_note_t n"));
    assert!(query.binds.is_empty());
}

#[test]
fn unrecognised_date_phrase_carries_key_and_value() {
    let err = compile(
        &criteria(&[("screening due date", "whenever")]),
        &actor(),
        None,
        None,
    )
    .unwrap_err();
    assert_eq!(err.key, "screening due date");
    assert_eq!(err.value, "whenever");
    assert!(err.reason.contains("date phrase"));
}

#[test]
fn map_form_compiles_in_key_order() {
    let mut map = std::collections::BTreeMap::new();
    map.insert("screening status".to_string(), "Ceased".to_string());
    map.insert("subject age".to_string(), "65".to_string());
    let from_map = cohort_criteria::compile_map(&map, &actor(), None, None).unwrap();
    let from_pairs = build(&[("screening status", "Ceased"), ("subject age", "65")]);
    assert_eq!(from_map, from_pairs);
}

#[test]
fn key_normalisation_accepts_prefixed_and_mixed_case_keys() {
    let query = build(&[("+Screening   Status", "Recall")]);
    assert!(query.text.contains("ss.screening_status_id = :status_id"));
    assert_eq!(query.binds.get("status_id"), Some(&BindValue::Int(4003)));
}
