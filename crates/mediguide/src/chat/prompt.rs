use super::{ChatMessage, ChatRole};
use crate::privacy::TextSanitizer;
use crate::triage::TriageReport;

pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are a cautious, evidence-based medical assistant. \
Provide helpful information but always remind users to consult healthcare professionals.";

pub const TRIAGE_SYSTEM_PROMPT: &str = "You are an expert medical assistant. \
Provide detailed, evidence-based analysis with proper precautions and recommendations.";

const TRIAGE_INSTRUCTIONS: &str = "Provide:
1. Detailed symptom analysis
2. Possible causes and risk factors
3. Recommended precautions and self-care
4. When to seek immediate medical attention
5. Preventive measures

Be thorough but remind users to consult healthcare professionals.";

/// Analysis request for a finished assessment. Notes are already sanitized by the engine.
pub fn triage_prompt(report: &TriageReport) -> String {
    let mut prompt = String::from("Provide a comprehensive medical analysis for:\n\n");
    prompt.push_str(&format!("Symptoms: {}\n", report.symptoms.join(", ")));
    prompt.push_str(&format!(
        "Severity: {}/10 ({})\n",
        report.severity,
        report.severity_band.label()
    ));
    prompt.push_str(&format!(
        "Additional Details: {}\n",
        report.notes.as_deref().unwrap_or("None provided")
    ));

    let top: Vec<&str> = report
        .top_conditions(3)
        .map(|entry| entry.condition.as_str())
        .collect();
    if !top.is_empty() {
        prompt.push_str(&format!("Possible Conditions: {}\n", top.join(", ")));
    }

    prompt.push('\n');
    prompt.push_str(TRIAGE_INSTRUCTIONS);
    prompt
}

pub fn triage_messages(report: &TriageReport) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TRIAGE_SYSTEM_PROMPT),
        ChatMessage::user(triage_prompt(report)),
    ]
}

/// Build the outbound conversation for free-form chat.
///
/// Caller-supplied system turns are dropped in favor of the assistant prompt,
/// and every user turn is sanitized. Returns whether anything was redacted.
pub fn assistant_conversation(
    history: &[ChatMessage],
    sanitizer: &TextSanitizer,
) -> (Vec<ChatMessage>, bool) {
    let mut redacted_any = false;
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(ASSISTANT_SYSTEM_PROMPT));

    for message in history {
        match message.role {
            ChatRole::System => continue,
            ChatRole::User => {
                let (content, redacted) = sanitizer.sanitize(&message.content);
                redacted_any |= redacted;
                messages.push(ChatMessage::user(content));
            }
            ChatRole::Assistant => messages.push(message.clone()),
        }
    }

    (messages, redacted_any)
}
