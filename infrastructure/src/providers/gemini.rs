//! Gemini provider (`generateContent` REST endpoint)

use super::{ProviderAdapter, ProviderKind, map_http_error, map_transport_error, resolve_api_key};
use async_trait::async_trait;
use namesmith_application::ports::llm_gateway::{AgentProfile, GatewayError, LlmSession};
use namesmith_domain::Model;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini HTTP adapter
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
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
impl ProviderAdapter for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn supports_model(&self, model: &Model) -> bool {
        model.is_gemini()
    }

    async fn create_session_with_system_prompt(
        &self,
        profile: &AgentProfile,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession {
            provider: self.clone(),
            profile: profile.clone(),
            system_prompt: system_prompt.to_string(),
        }))
    }
}

struct GeminiSession {
    provider: GeminiProvider,
    profile: AgentProfile,
    system_prompt: String,
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &Model {
        &self.profile.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.provider.base_url,
            self.profile.model.as_str()
        );
        let body = build_request(&self.profile, &self.system_prompt, content);
        debug!(model = %self.profile.model, "Gemini request");

        let response = self
            .provider
            .client
            .post(&url)
            .query(&[("key", self.provider.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport_error("Gemini", e))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error("Gemini", status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(format!("Gemini response: {}", e)))?;

        extract_text(parsed)
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

pub(crate) fn build_request<'a>(
    profile: &AgentProfile,
    system_prompt: &'a str,
    content: &'a str,
) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part { text: content }],
        }],
        system_instruction: (!system_prompt.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: system_prompt,
            }],
        }),
        generation_config: GenerationConfig {
            temperature: profile.temperature,
            response_mime_type: profile.json_output.then_some("application/json"),
        },
    }
}

#[derive(Deserialize)]
pub(crate) struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

pub(crate) fn extract_text(response: GenerateContentResponse) -> Result<String, GatewayError> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        Err(GatewayError::MalformedResponse(
            "Gemini returned no text in the response candidates".into(),
        ))
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let profile = AgentProfile::new(Model::Gemini15Flash, 0.2).json();
        let body = serde_json::to_value(build_request(&profile, "clarify", "brief")).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "brief");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "clarify");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_request_without_system_prompt() {
        let profile = AgentProfile::new(Model::Gemini25Flash, 0.4);
        let body = serde_json::to_value(build_request(&profile, "", "brief")).unwrap();

        assert!(body.get("systemInstruction").is_none());
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"q1\": "}, {"text": "\"Tone?\"}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), r#"{"q1": "Tone?"}"#);
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(GatewayError::MalformedResponse(_))
        ));
    }
}
