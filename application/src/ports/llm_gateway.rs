//! LLM Gateway port
//!
//! Defines the interface for communicating with text-generation providers.

use async_trait::async_trait;
use namesmith_domain::Model;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// How one agent role talks to its model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub model: Model,
    pub temperature: f32,
    /// Ask the provider for a JSON object response
    #[serde(default)]
    pub json_output: bool,
    /// Let the provider run a web search before answering
    #[serde(default)]
    pub web_search: bool,
}

impl AgentProfile {
    pub fn new(model: Model, temperature: f32) -> Self {
        Self {
            model,
            temperature,
            json_output: false,
            web_search: false,
        }
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new session for the given agent profile
    async fn create_session(&self, profile: &AgentProfile) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.create_session_with_system_prompt(profile, "").await
    }

    /// Create a new session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        profile: &AgentProfile,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &Model;

    /// Send a message and get a response
    async fn send(&self, content: &str) -> Result<String, GatewayError>;
}
