//! OpenAI provider
//!
//! Plain calls go through Chat Completions. Profiles with `web_search`
//! go through the Responses API with the `web_search` tool enabled.

use super::{ProviderAdapter, ProviderKind, map_http_error, map_transport_error, resolve_api_key};
use async_trait::async_trait;
use namesmith_application::ports::llm_gateway::{AgentProfile, GatewayError, LlmSession};
use namesmith_domain::Model;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI HTTP adapter
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build from config; `None` when no API key can be found
    pub fn from_settings(api_key: Option<&str>, api_key_env: &str, base_url: &str) -> Option<Self> {
        resolve_api_key(api_key, api_key_env).map(|key| Self::new(key, base_url))
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn supports_model(&self, model: &Model) -> bool {
        model.is_openai()
    }

    async fn create_session_with_system_prompt(
        &self,
        profile: &AgentProfile,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession {
            provider: self.clone(),
            profile: profile.clone(),
            system_prompt: system_prompt.to_string(),
        }))
    }
}

struct OpenAiSession {
    provider: OpenAiProvider,
    profile: AgentProfile,
    system_prompt: String,
}

impl OpenAiSession {
    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.provider.base_url, path);
        let response = self
            .provider
            .client
            .post(&url)
            .bearer_auth(&self.provider.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| map_transport_error("OpenAI", e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error("OpenAI", status, &body_text));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(format!("OpenAI response: {}", e)))
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &Model {
        &self.profile.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        debug!(model = %self.profile.model, web_search = self.profile.web_search, "OpenAI request");
        if self.profile.web_search {
            let body = build_responses_request(&self.profile, &self.system_prompt, content);
            let value = self.post("/v1/responses", &body).await?;
            extract_responses_text(&value)
        } else {
            let body = build_chat_request(&self.profile, &self.system_prompt, content);
            let value = self.post("/v1/chat/completions", &body).await?;
            extract_chat_text(&value)
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

pub(crate) fn build_chat_request<'a>(
    profile: &'a AgentProfile,
    system_prompt: &'a str,
    content: &'a str,
) -> ChatCompletionRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if !system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: system_prompt,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content,
    });

    ChatCompletionRequest {
        model: profile.model.as_str(),
        messages,
        temperature: profile
            .model
            .accepts_temperature()
            .then_some(profile.temperature),
        response_format: profile.json_output.then_some(ResponseFormat {
            kind: "json_object",
        }),
    }
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponsesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    instructions: &'a str,
    input: &'a str,
    tools: Vec<Tool>,
}

pub(crate) fn build_responses_request<'a>(
    profile: &'a AgentProfile,
    system_prompt: &'a str,
    content: &'a str,
) -> ResponsesRequest<'a> {
    ResponsesRequest {
        model: profile.model.as_str(),
        instructions: system_prompt,
        input: content,
        tools: vec![Tool { kind: "web_search" }],
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub(crate) fn extract_chat_text(value: &Value) -> Result<String, GatewayError> {
    let parsed: ChatCompletionResponse = serde_json::from_value(value.clone())
        .map_err(|e| GatewayError::MalformedResponse(format!("OpenAI chat response: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .ok_or_else(|| GatewayError::MalformedResponse("OpenAI returned no message content".into()))
}

/// Concatenate every `output_text` part of every message item
pub(crate) fn extract_responses_text(value: &Value) -> Result<String, GatewayError> {
    if let Some(text) = value.get("output_text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    let text: String = value
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("message"))
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        Err(GatewayError::MalformedResponse(
            "OpenAI response contained no output text".into(),
        ))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_for_json_creator() {
        let profile = AgentProfile::new(Model::Gpt4o, 1.3).json();
        let body = serde_json::to_value(build_chat_request(&profile, "sys", "brief")).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "brief");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!((body["temperature"].as_f64().unwrap() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_chat_request_omits_temperature_for_reasoning_models() {
        let profile = AgentProfile::new(Model::O4Mini, 0.5);
        let body = serde_json::to_value(build_chat_request(&profile, "", "hi")).unwrap();

        assert!(body.get("temperature").is_none());
        assert!(body.get("response_format").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_responses_request_enables_web_search() {
        let profile = AgentProfile::new(Model::O4Mini, 0.0).with_web_search();
        let body =
            serde_json::to_value(build_responses_request(&profile, "checker", "Domains: a.com"))
                .unwrap();

        assert_eq!(body["tools"][0]["type"], "web_search");
        assert_eq!(body["instructions"], "checker");
        assert_eq!(body["input"], "Domains: a.com");
    }

    #[test]
    fn test_extract_chat_text() {
        let value = json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"domains\": []}"}}]
        });
        assert_eq!(extract_chat_text(&value).unwrap(), "{\"domains\": []}");

        let empty = json!({"choices": []});
        assert!(matches!(
            extract_chat_text(&empty),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_responses_text_from_output_items() {
        let value = json!({
            "output": [
                {"type": "web_search_call", "status": "completed"},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "{\"a.com\": \"OK\"}"}
                ]}
            ]
        });
        assert_eq!(extract_responses_text(&value).unwrap(), "{\"a.com\": \"OK\"}");
        assert!(extract_responses_text(&json!({"output": []})).is_err());
    }

    #[test]
    fn test_from_settings_without_key() {
        assert!(
            OpenAiProvider::from_settings(None, "NAMESMITH_TEST_UNSET_OPENAI", DEFAULT_BASE_URL)
                .is_none()
        );
        let provider =
            OpenAiProvider::from_settings(Some("sk-x"), "UNUSED", "https://example.test/").unwrap();
        assert_eq!(provider.base_url, "https://example.test");
    }
}
