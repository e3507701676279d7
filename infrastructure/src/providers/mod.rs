//! Text-generation provider adapters
//!
//! Each provider speaks one HTTP API. [`routing::RoutingGateway`] picks the
//! provider for a model and is what the application sees as its
//! [`LlmGateway`](namesmith_application::LlmGateway).

pub mod gemini;
pub mod openai;
pub mod routing;

use async_trait::async_trait;
use namesmith_application::ports::llm_gateway::{AgentProfile, GatewayError, LlmSession};
use namesmith_domain::Model;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "gemini" | "google" => Some(ProviderKind::Gemini),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;
    fn supports_model(&self, model: &Model) -> bool;
    async fn create_session_with_system_prompt(
        &self,
        profile: &AgentProfile,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// Resolve an API key: explicit value first, then the named env var
pub(crate) fn resolve_api_key(explicit: Option<&str>, env_var: &str) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|key| !key.trim().is_empty())
}

pub(crate) fn map_transport_error(provider: &str, err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(format!("{} API unreachable: {}", provider, err))
    } else {
        GatewayError::RequestFailed(format!("{} API request failed: {}", provider, err))
    }
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Turn a non-success response body into a readable error
pub(crate) fn map_http_error(provider: &str, status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let msg = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            })
        })
        .unwrap_or_else(|| body.trim().to_string());

    GatewayError::RequestFailed(format!("{} API returned {}: {}", provider, status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(ProviderKind::parse("OpenAI"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::parse("google"), Some(ProviderKind::Gemini));
        assert_eq!(ProviderKind::parse("anthropic"), None);
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let key = resolve_api_key(Some("sk-test"), "NAMESMITH_TEST_UNSET_KEY_VAR");
        assert_eq!(key.as_deref(), Some("sk-test"));
        assert!(resolve_api_key(None, "NAMESMITH_TEST_UNSET_KEY_VAR").is_none());
        assert!(resolve_api_key(Some("  "), "NAMESMITH_TEST_UNSET_KEY_VAR").is_none());
    }

    #[test]
    fn test_http_error_uses_api_message() {
        let body = r#"{"error": {"message": "Invalid API key", "status": "UNAUTHENTICATED"}}"#;
        let err = map_http_error("Gemini", StatusCode::UNAUTHORIZED, body);
        let text = err.to_string();
        assert!(text.contains("UNAUTHENTICATED: Invalid API key"));
        assert!(text.contains("401"));

        let err = map_http_error("OpenAI", StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.to_string().contains("upstream down"));
    }
}
