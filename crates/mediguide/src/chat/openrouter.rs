use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{ChatCompletion, ChatError, ChatMessage};
use crate::config::ChatConfig;

/// OpenAI-compatible chat completion client for OpenRouter.
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    referer: Option<String>,
    title: Option<String>,
    timeout_secs: u64,
}

impl OpenRouterClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            referer: config.referer.clone(),
            title: config.title.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for `/chat/completions`
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// Response body from `/chat/completions`
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletion for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let mut request = self.client.post(&url).bearer_auth(api_key).json(&body);
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::Transport(format!("request timed out after {}s", self.timeout_secs))
            } else {
                ChatError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ChatError::Authentication);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or_else(|| ChatError::InvalidResponse("response contained no message".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_short_circuits_without_network() {
        let client = OpenRouterClient::new(&ChatConfig::default()).expect("client builds");
        assert!(!client.has_api_key());
        assert_eq!(client.model(), ChatConfig::default().model);

        let result = client.complete(&[ChatMessage::user("hi")]).await;
        assert!(matches!(result, Err(ChatError::MissingApiKey)));
    }

    #[test]
    fn request_body_matches_completion_schema() {
        let messages = [ChatMessage::system("be careful"), ChatMessage::user("fever")];
        let body = CompletionRequest {
            model: "test/model",
            messages: &messages,
            stream: false,
        };

        let json = serde_json::to_value(&body).expect("serializes");
        assert_eq!(json["model"], "test/model");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "fever");
    }

    #[test]
    fn response_parsing_takes_first_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Stay hydrated."}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).expect("parses");
        let text = parsed.choices.into_iter().find_map(|c| c.message.content);
        assert_eq!(text.as_deref(), Some("Stay hydrated."));
    }
}
