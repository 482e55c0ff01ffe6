use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::privacy::TextSanitizer;
use crate::triage::{CriticalConditions, RuleSource, RuleTable, TriageEngine, TriageRequest};

pub(super) const SAMPLE_RULES: &str = r#"{
    "version": "1.0",
    "metadata": {"author": "clinical team"},
    "rules": {
        "Fever": {"Community-Acquired Pneumonia": 3, "Influenza": 3, "Sepsis": 2},
        " cough ": {"Community-Acquired Pneumonia": 2, "Influenza": 1},
        "chest pain": {"Ischemic Heart Disease": 5, "Pulmonary Embolism": 3},
        "shortness of breath": {"Pulmonary Embolism": 3, "Ischemic Heart Disease": 2},
        "facial droop": {" Ischemic Stroke ": 6},
        "headache": {"Migraine": 2}
    }
}"#;

pub(super) fn sample_table() -> RuleTable {
    RuleTable::from_json_str(SAMPLE_RULES).expect("sample rules parse")
}

pub(super) fn rules_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write rules");
    file
}

pub(super) fn engine() -> TriageEngine {
    TriageEngine::new(
        Arc::new(sample_table()),
        RuleSource::File {
            path: PathBuf::from("rules.json"),
        },
        CriticalConditions::default(),
        TextSanitizer::default(),
    )
}

pub(super) fn request(symptoms: &[&str], severity: i64) -> TriageRequest {
    TriageRequest {
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        severity,
        ..TriageRequest::default()
    }
}

pub(super) fn percentages(ranked: &[crate::triage::RankedCondition]) -> Vec<(&str, f64)> {
    ranked
        .iter()
        .map(|entry| (entry.condition.as_str(), entry.percentage))
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
