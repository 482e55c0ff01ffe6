//! Rule-based symptom triage: rule loading, weighted scoring, and emergency detection.

pub mod critical;
pub mod router;
pub mod rules;
pub mod scorer;
pub mod severity;
pub mod symptoms;

#[cfg(test)]
mod tests;

pub use critical::{is_critical, CriticalConditions, DEFAULT_CRITICAL_CONDITIONS};
pub use router::triage_router;
pub use rules::{
    normalize_token, ConditionWeight, RuleSource, RuleTable, RulesLoadError, RulesStore,
    DEFAULT_RULES_PATH,
};
pub use scorer::{score, RankedCondition};
pub use severity::{SeverityBand, MAX_SEVERITY};
pub use symptoms::collect_symptoms;

use crate::emergency::ambulance_map_link;
use crate::privacy::TextSanitizer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Caller input for one assessment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TriageRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Comma-separated symptoms typed by the user.
    #[serde(default)]
    pub symptom_text: Option<String>,
    pub severity: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriageError {
    #[error("severity must be between 0 and 10, got {0}")]
    SeverityOutOfRange(i64),
    #[error("at least one symptom is required")]
    NoSymptoms,
}

/// Result of one assessment, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct TriageReport {
    pub symptoms: Vec<String>,
    pub unmatched_symptoms: Vec<String>,
    pub severity: u8,
    pub severity_band: SeverityBand,
    pub ranked: Vec<RankedCondition>,
    pub critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub redacted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambulance_link: Option<String>,
    pub rule_source: RuleSource,
    pub assessed_at: DateTime<Utc>,
}

impl TriageReport {
    /// Highest-ranked conditions, at most `limit`.
    pub fn top_conditions(&self, limit: usize) -> impl Iterator<Item = &RankedCondition> {
        self.ranked.iter().take(limit)
    }
}

/// Stateless assessor over a frozen rule table.
pub struct TriageEngine {
    rules: Arc<RuleTable>,
    source: RuleSource,
    critical: CriticalConditions,
    sanitizer: TextSanitizer,
}

impl TriageEngine {
    pub fn new(
        rules: Arc<RuleTable>,
        source: RuleSource,
        critical: CriticalConditions,
        sanitizer: TextSanitizer,
    ) -> Self {
        Self {
            rules,
            source,
            critical,
            sanitizer,
        }
    }

    /// Load rules through the store, degrading to the fallback table on error.
    pub fn from_store(store: &RulesStore, critical: CriticalConditions) -> Self {
        let (table, source) = store.load_or_fallback();
        Self::new(Arc::new(table), source, critical, TextSanitizer::default())
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn source(&self) -> &RuleSource {
        &self.source
    }

    pub fn critical_conditions(&self) -> &CriticalConditions {
        &self.critical
    }

    pub fn sanitizer(&self) -> &TextSanitizer {
        &self.sanitizer
    }

    pub fn score<I, S>(&self, tokens: I) -> Vec<RankedCondition>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        score(tokens, &self.rules)
    }

    pub fn assess(&self, request: TriageRequest) -> Result<TriageReport, TriageError> {
        let severity = u8::try_from(request.severity)
            .ok()
            .filter(|severity| *severity <= MAX_SEVERITY)
            .ok_or(TriageError::SeverityOutOfRange(request.severity))?;

        let symptoms = collect_symptoms(request.symptom_text.as_deref(), &request.symptoms);
        if symptoms.is_empty() {
            return Err(TriageError::NoSymptoms);
        }

        let ranked = self.score(&symptoms);
        let critical = self.critical.is_critical(&ranked, severity);
        let unmatched_symptoms = symptoms
            .iter()
            .filter(|token| !self.rules.contains(token))
            .cloned()
            .collect::<Vec<_>>();

        let (notes, redacted) = match request.notes.as_deref().map(str::trim) {
            Some(notes) if !notes.is_empty() => {
                let (cleaned, redacted) = self.sanitizer.sanitize(notes);
                (Some(cleaned), redacted)
            }
            _ => (None, false),
        };

        let ambulance_link = critical.then(|| ambulance_map_link(request.location.as_deref()));

        info!(
            symptoms = symptoms.len(),
            unmatched = unmatched_symptoms.len(),
            conditions = ranked.len(),
            severity,
            critical,
            redacted,
            fallback_rules = self.source.is_fallback(),
            "triage assessment completed"
        );

        Ok(TriageReport {
            symptoms,
            unmatched_symptoms,
            severity,
            severity_band: SeverityBand::from_severity(severity),
            ranked,
            critical,
            notes,
            redacted,
            ambulance_link,
            rule_source: self.source.clone(),
            assessed_at: Utc::now(),
        })
    }
}
