use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern compiles")
});

static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("phone pattern compiles")
});

static RE_LONG_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{6,}\b").expect("id pattern compiles"));

/// A single pattern and the placeholder that replaces each of its matches.
#[derive(Clone, Copy)]
pub struct RedactionRule {
    pub name: &'static str,
    pattern: &'static LazyLock<Regex>,
    pub placeholder: &'static str,
}

impl std::fmt::Debug for RedactionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedactionRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("placeholder", &self.placeholder)
            .finish()
    }
}

impl RedactionRule {
    pub fn email() -> Self {
        Self {
            name: "email",
            pattern: &RE_EMAIL,
            placeholder: "[REDACTED_EMAIL]",
        }
    }

    pub fn phone() -> Self {
        Self {
            name: "phone",
            pattern: &RE_PHONE,
            placeholder: "[REDACTED_PHONE]",
        }
    }

    pub fn long_id() -> Self {
        Self {
            name: "long_id",
            pattern: &RE_LONG_ID,
            placeholder: "[REDACTED_ID]",
        }
    }

    /// Replace every match, returning the new text and the number of replacements.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let regex: &Regex = self.pattern;
        let count = regex.find_iter(text).count();
        if count == 0 {
            return (text.to_string(), 0);
        }
        let replaced = regex
            .replace_all(text, regex::NoExpand(self.placeholder))
            .into_owned();
        (replaced, count)
    }
}

/// How many substitutions one rule made during a sanitize pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactionCount {
    pub rule: &'static str,
    pub count: usize,
}

/// Outcome of sanitizing one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedText {
    pub text: String,
    pub redacted: bool,
    pub counts: Vec<RedactionCount>,
}

/// Ordered list of redaction rules applied one after another.
///
/// Each rule sees the output of the previous one, so the order is part of
/// the contract: email, then phone, then long digit runs.
#[derive(Debug, Clone)]
pub struct TextSanitizer {
    rules: Vec<RedactionRule>,
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new(vec![
            RedactionRule::email(),
            RedactionRule::phone(),
            RedactionRule::long_id(),
        ])
    }
}

impl TextSanitizer {
    pub fn new(rules: Vec<RedactionRule>) -> Self {
        Self { rules }
    }

    /// Redact PII, returning the cleaned text and whether anything changed.
    pub fn sanitize(&self, text: &str) -> (String, bool) {
        let SanitizedText { text, redacted, .. } = self.sanitize_with_counts(text);
        (text, redacted)
    }

    pub fn sanitize_with_counts(&self, text: &str) -> SanitizedText {
        if text.is_empty() {
            return SanitizedText {
                text: String::new(),
                redacted: false,
                counts: Vec::new(),
            };
        }

        let mut current = text.to_string();
        let mut counts = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let (next, count) = rule.apply(&current);
            current = next;
            counts.push(RedactionCount {
                rule: rule.name,
                count,
            });
        }

        let redacted = counts.iter().any(|entry| entry.count > 0);
        SanitizedText {
            text: current,
            redacted,
            counts,
        }
    }
}

/// Sanitize with the default rule order.
pub fn sanitize(text: &str) -> (String, bool) {
    TextSanitizer::default().sanitize(text)
}
