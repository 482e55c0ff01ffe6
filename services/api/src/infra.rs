use mediguide::chat::{ChatCompletion, ChatGateway, OpenRouterClient};
use mediguide::config::{AppConfig, ChatConfig};
use mediguide::error::AppError;
use mediguide::privacy::TextSanitizer;
use mediguide::triage::{CriticalConditions, RulesStore, TriageEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Chat dependencies shared by the chat and analysis endpoints.
pub(crate) struct ChatState<C> {
    pub(crate) gateway: Arc<ChatGateway<C>>,
    pub(crate) sanitizer: TextSanitizer,
}

impl<C> Clone for ChatState<C> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            sanitizer: self.sanitizer.clone(),
        }
    }
}

impl<C: ChatCompletion> ChatState<C> {
    pub(crate) fn new(client: C) -> Self {
        Self {
            gateway: Arc::new(ChatGateway::new(client)),
            sanitizer: TextSanitizer::default(),
        }
    }
}

pub(crate) fn chat_state(config: &ChatConfig) -> Result<ChatState<OpenRouterClient>, AppError> {
    let client = OpenRouterClient::new(config)?;
    Ok(ChatState::new(client))
}

/// Build the engine once at startup; a broken rule file degrades to the fallback table.
pub(crate) fn triage_engine(config: &AppConfig, rules_override: Option<PathBuf>) -> TriageEngine {
    let path = rules_override.unwrap_or_else(|| config.rules.path.clone());
    let critical = CriticalConditions::default().with_extra(&config.rules.critical_extra);
    TriageEngine::from_store(&RulesStore::new(path), critical)
}
