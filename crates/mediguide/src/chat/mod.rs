//! Gateway to a remote chat-completion model.
//!
//! The model itself is an external collaborator. This module owns the
//! message shapes, prompt construction, and the text users see when the
//! model cannot be reached.

mod openrouter;
mod prompt;

pub use openrouter::OpenRouterClient;
pub use prompt::{
    assistant_conversation, triage_messages, triage_prompt, ASSISTANT_SYSTEM_PROMPT,
    TRIAGE_SYSTEM_PROMPT,
};

use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat API key is not configured")]
    MissingApiKey,
    #[error("chat API rejected the credentials")]
    Authentication,
    #[error("chat API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("chat request failed: {0}")]
    Transport(String),
    #[error("chat response could not be read: {0}")]
    InvalidResponse(String),
}

/// A model that turns a conversation into the next assistant message.
pub trait ChatCompletion {
    fn complete(
        &self,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String, ChatError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
}

/// Wraps a [`ChatCompletion`] so callers always receive displayable text.
pub struct ChatGateway<C> {
    client: C,
}

impl<C: ChatCompletion> ChatGateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn reply(&self, messages: &[ChatMessage]) -> ChatReply {
        match self.client.complete(messages).await {
            Ok(text) => ChatReply {
                text,
                source: ReplySource::Model,
            },
            Err(error) => {
                warn!(error = %error, "chat completion unavailable, using fallback reply");
                ChatReply {
                    text: fallback_reply(&error),
                    source: ReplySource::Fallback,
                }
            }
        }
    }
}

/// User-facing text for a failed completion.
pub fn fallback_reply(error: &ChatError) -> String {
    match error {
        ChatError::MissingApiKey => [
            "**API Key Required**\n\n",
            "To use the AI chat, set OPENROUTER_API_KEY for this service.\n",
            "Keys are issued at https://openrouter.ai/keys.\n\n",
            "Until then, replies are limited to general guidance: ",
            "for proper diagnosis and treatment, consult a healthcare provider.",
        ]
        .concat(),
        ChatError::Authentication => [
            "**Authentication Error (401)**\n\n",
            "The configured API key is invalid or expired.\n\n",
            "Please check that the OpenRouter key is correct, ",
            "has not expired, and has sufficient credits.\n",
            "Get a new key from: https://openrouter.ai/keys",
        ]
        .concat(),
        ChatError::Api { status, body } => format!(
            "**API Error ({status})**\n\n{body}\n\nPlease try again or check your OpenRouter account."
        ),
        ChatError::Transport(detail) | ChatError::InvalidResponse(detail) => {
            format!("**Error:** {detail}\n\nPlease try again later or contact support.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedClient {
        outcome: Mutex<Option<Result<String, ChatError>>>,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedClient {
        fn new(outcome: Result<String, ChatError>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatCompletion for ScriptedClient {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
            self.seen
                .lock()
                .expect("seen mutex poisoned")
                .extend_from_slice(messages);
            self.outcome
                .lock()
                .expect("outcome mutex poisoned")
                .take()
                .unwrap_or(Err(ChatError::Transport("exhausted".to_string())))
        }
    }

    #[tokio::test]
    async fn model_text_is_passed_through() {
        let gateway = ChatGateway::new(ScriptedClient::new(Ok("Rest and hydrate.".to_string())));

        let reply = gateway.reply(&[ChatMessage::user("fever")]).await;

        assert_eq!(reply.source, ReplySource::Model);
        assert_eq!(reply.text, "Rest and hydrate.");
        let seen = gateway.client().seen.lock().expect("seen mutex poisoned");
        assert_eq!(seen.as_slice(), &[ChatMessage::user("fever")]);
    }

    #[tokio::test]
    async fn missing_key_falls_back_to_guidance() {
        let gateway = ChatGateway::new(ScriptedClient::new(Err(ChatError::MissingApiKey)));

        let reply = gateway.reply(&[ChatMessage::user("hello")]).await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(reply.text.contains("API Key Required"));
        assert!(reply.text.contains("consult a healthcare provider"));
    }

    #[tokio::test]
    async fn authentication_failure_explains_key_problem() {
        let gateway = ChatGateway::new(ScriptedClient::new(Err(ChatError::Authentication)));

        let reply = gateway.reply(&[ChatMessage::user("hello")]).await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(reply.text.contains("401"));
    }

    #[test]
    fn api_errors_surface_status_and_body() {
        let text = fallback_reply(&ChatError::Api {
            status: 429,
            body: "rate limited".to_string(),
        });
        assert!(text.contains("429"));
        assert!(text.contains("rate limited"));
        assert!(text.contains("try again"));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::assistant("ok")).expect("serializes");
        assert_eq!(json["role"], "assistant");
    }
}
