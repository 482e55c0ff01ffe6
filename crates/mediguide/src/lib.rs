//! Symptom triage against a weighted rule table, with PII redaction for any
//! text that is displayed or forwarded to a chat model.

pub mod chat;
pub mod config;
pub mod emergency;
pub mod error;
pub mod privacy;
pub mod telemetry;
pub mod triage;
