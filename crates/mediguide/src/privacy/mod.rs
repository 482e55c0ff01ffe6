//! PII redaction applied to free text before it is displayed or sent to a chat model.

mod sanitizer;

pub use sanitizer::{sanitize, RedactionCount, RedactionRule, SanitizedText, TextSanitizer};
