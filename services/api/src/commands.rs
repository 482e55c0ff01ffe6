use crate::infra::{chat_state, triage_engine};
use clap::Args;
use mediguide::chat::triage_messages;
use mediguide::config::AppConfig;
use mediguide::error::AppError;
use mediguide::privacy::TextSanitizer;
use mediguide::triage::{RulesStore, TriageReport, TriageRequest};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Symptom to include; repeat for several
    #[arg(long = "symptom")]
    pub(crate) symptom: Vec<String>,
    /// Comma-separated symptoms, e.g. "fever, cough"
    #[arg(long)]
    pub(crate) symptoms: Option<String>,
    /// Self-reported severity from 0 to 10
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) severity: i64,
    /// Free-text details; sanitized before display
    #[arg(long)]
    pub(crate) notes: Option<String>,
    /// Location used for the emergency map link
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Rule file to use instead of the configured one
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
    /// Ask the chat model for a detailed analysis of the result
    #[arg(long)]
    pub(crate) analyze: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SanitizeArgs {
    /// Text to redact
    pub(crate) text: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RulesCheckArgs {
    /// Rule file to validate; defaults to the configured path
    pub(crate) path: Option<PathBuf>,
}

pub(crate) async fn run_assess(config: &AppConfig, args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        symptom,
        symptoms,
        severity,
        notes,
        location,
        rules,
        json,
        analyze,
    } = args;

    let engine = triage_engine(config, rules);
    let report = engine.assess(TriageRequest {
        symptoms: symptom,
        symptom_text: symptoms,
        severity,
        notes,
        location,
    })?;

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Report payload unavailable: {}", err),
        }
    } else {
        print!("{}", render_report(&report));
    }

    if analyze {
        let chat = chat_state(&config.chat)?;
        let reply = chat.gateway.reply(&triage_messages(&report)).await;
        println!("\nDetailed analysis ({:?})", reply.source);
        println!("{}", reply.text);
    }

    Ok(())
}

pub(crate) fn run_sanitize(args: SanitizeArgs) -> Result<(), AppError> {
    let outcome = TextSanitizer::default().sanitize_with_counts(&args.text);
    println!("{}", outcome.text);
    for count in outcome.counts.iter().filter(|count| count.count > 0) {
        eprintln!("redacted {} x{}", count.rule, count.count);
    }
    Ok(())
}

pub(crate) fn run_rules_check(config: &AppConfig, args: RulesCheckArgs) -> Result<(), AppError> {
    let path = args.path.unwrap_or_else(|| config.rules.path.clone());
    let store = RulesStore::new(path);
    let table = store.load()?;

    let conditions: BTreeSet<&str> = table
        .tokens()
        .filter_map(|token| table.get(token))
        .flatten()
        .map(|entry| entry.condition.as_str())
        .collect();

    println!("Rule file {} is valid", store.path().display());
    println!(
        "- {} symptom tokens | {} distinct conditions",
        table.len(),
        conditions.len()
    );
    Ok(())
}

pub(crate) fn render_report(report: &TriageReport) -> String {
    let mut out = String::new();

    if report.critical {
        writeln!(&mut out, "EMERGENCY: these symptoms may need immediate care.")
            .expect("write emergency banner");
        writeln!(&mut out, "Call your local emergency number now.").expect("write call advice");
        if let Some(link) = &report.ambulance_link {
            writeln!(&mut out, "Nearest ambulance: {}", link).expect("write ambulance link");
        }
        out.push('\n');
    }

    writeln!(&mut out, "Symptoms: {}", report.symptoms.join(", ")).expect("write symptoms");
    writeln!(
        &mut out,
        "Severity: {}/10 ({})",
        report.severity,
        report.severity_band.label()
    )
    .expect("write severity");
    if let Some(notes) = &report.notes {
        writeln!(&mut out, "Notes: {}", notes).expect("write notes");
    }

    if report.ranked.is_empty() {
        writeln!(&mut out, "No matching conditions found in the rule table.")
            .expect("write empty ranking");
    } else {
        writeln!(&mut out, "Possible conditions:").expect("write ranking header");
        for entry in &report.ranked {
            writeln!(&mut out, "  - {}: {:.1}%", entry.condition, entry.percentage)
                .expect("write ranked condition");
        }
    }

    if !report.unmatched_symptoms.is_empty() {
        writeln!(
            &mut out,
            "Not in rule table: {}",
            report.unmatched_symptoms.join(", ")
        )
        .expect("write unmatched symptoms");
    }
    if report.rule_source.is_fallback() {
        writeln!(&mut out, "(using built-in fallback rules)").expect("write rule source");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediguide::privacy::TextSanitizer;
    use mediguide::triage::{CriticalConditions, RuleSource, RuleTable, TriageEngine};
    use std::sync::Arc;

    fn fallback_engine() -> TriageEngine {
        TriageEngine::new(
            Arc::new(RuleTable::fallback()),
            RuleSource::Fallback {
                reason: "test".to_string(),
            },
            CriticalConditions::default(),
            TextSanitizer::default(),
        )
    }

    #[test]
    fn render_report_leads_with_emergency_banner() {
        let report = fallback_engine()
            .assess(TriageRequest {
                symptoms: vec!["Chest Pain".to_string(), "itchy toes".to_string()],
                severity: 2,
                location: Some("Leeds".to_string()),
                ..TriageRequest::default()
            })
            .expect("valid request");

        let rendered = render_report(&report);

        assert!(rendered.starts_with("EMERGENCY"));
        assert!(rendered.contains("Nearest ambulance: https://www.google.com/maps/search/"));
        assert!(rendered.contains("  - Ischemic Heart Disease: 100.0%\n"));
        assert!(rendered.contains("Not in rule table: itchy toes\n"));
        assert!(rendered.contains("(using built-in fallback rules)"));
    }

    #[test]
    fn render_report_without_matches() {
        let report = fallback_engine()
            .assess(TriageRequest {
                symptoms: vec!["hiccups".to_string()],
                severity: 1,
                notes: Some("call me at 555 123 4567".to_string()),
                ..TriageRequest::default()
            })
            .expect("valid request");

        let rendered = render_report(&report);

        assert!(!rendered.contains("EMERGENCY"));
        assert!(rendered.contains("Severity: 1/10 (Mild)\n"));
        assert!(rendered.contains("Notes: call me at [REDACTED_PHONE]\n"));
        assert!(rendered.contains("No matching conditions found"));
    }
}
