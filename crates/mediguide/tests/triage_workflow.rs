use std::path::PathBuf;

use mediguide::privacy::sanitize;
use mediguide::triage::{
    is_critical, score, CriticalConditions, RuleTable, RulesStore, SeverityBand, TriageEngine,
    TriageRequest,
};

fn shipped_rules_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../rules.json")
}

fn shipped_engine() -> TriageEngine {
    let engine = TriageEngine::from_store(
        &RulesStore::new(shipped_rules_path()),
        CriticalConditions::default(),
    );
    assert!(!engine.source().is_fallback(), "shipped rules should load");
    engine
}

#[test]
fn shipped_rule_file_is_valid() {
    let table = RuleTable::load(Some(&shipped_rules_path())).expect("shipped rules load");

    assert!(table.len() >= 20);
    assert!(table.contains("chest pain"));
    assert!(table.tokens().all(|token| token == token.trim().to_lowercase()));
}

#[test]
fn respiratory_symptoms_rank_without_emergency() {
    let engine = shipped_engine();

    let report = engine
        .assess(TriageRequest {
            symptom_text: Some("Fever, cough".to_string()),
            severity: 3,
            ..TriageRequest::default()
        })
        .expect("assessment succeeds");

    let ranked: Vec<(&str, f64)> = report
        .ranked
        .iter()
        .map(|entry| (entry.condition.as_str(), entry.percentage))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Community-Acquired Pneumonia", 100.0),
            ("Influenza", 100.0),
            ("Sepsis", 40.0),
            ("Urinary Tract Infection", 20.0),
            ("Asthma", 20.0),
        ]
    );
    assert_eq!(report.severity_band, SeverityBand::Mild);
    assert!(!report.critical);
}

#[test]
fn stroke_signs_are_flagged_critical_at_low_severity() {
    let engine = shipped_engine();

    let report = engine
        .assess(TriageRequest {
            symptoms: vec!["Facial Droop".to_string(), "speech difficulty".to_string()],
            severity: 2,
            location: Some("Riverside".to_string()),
            ..TriageRequest::default()
        })
        .expect("assessment succeeds");

    assert_eq!(report.ranked[0].condition, "Ischemic Stroke");
    assert_eq!(report.ranked[0].percentage, 100.0);
    assert!(report.critical);
    assert!(report
        .ambulance_link
        .as_deref()
        .unwrap_or_default()
        .ends_with("ambulance+near+Riverside"));
}

#[test]
fn scoring_and_detection_compose_as_free_functions() {
    let table = RuleTable::load(Some(&shipped_rules_path())).expect("shipped rules load");

    let ranked = score(["low blood pressure", "confusion"], &table);

    assert_eq!(ranked[0].condition, "Septic Shock");
    assert!(is_critical(&ranked, 0));
}

#[test]
fn sanitizer_is_independent_of_rules() {
    let (cleaned, redacted) = sanitize("Contact me at a@b.com or 555-123-4567, ID 123456789");
    assert!(redacted);
    for token in ["[REDACTED_EMAIL]", "[REDACTED_PHONE]", "[REDACTED_ID]"] {
        assert_eq!(cleaned.matches(token).count(), 1, "{token}");
    }
}
