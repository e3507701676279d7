//! Web-search availability check
//!
//! Asks a search-capable model about one name at a time. The answer is
//! `{name: "OK"}` for registered and `{name: "NOT"}` for free; anything
//! else comes back as `Unknown`.

use async_trait::async_trait;
use namesmith_application::ports::availability_oracle::{AvailabilityOracle, OracleError};
use namesmith_application::ports::llm_gateway::{AgentProfile, GatewayError, LlmGateway};
use namesmith_domain::{DomainName, Model, OracleVerdict, PromptTemplate, parse_status};
use std::sync::Arc;
use tracing::debug;

/// Oracle backed by a web-search model
pub struct SearchOracle<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    profile: Option<AgentProfile>,
}

impl<G: LlmGateway + 'static> SearchOracle<G> {
    /// `None` for the model leaves the oracle unconfigured: every check fails
    pub fn new(gateway: Arc<G>, search_model: Option<Model>) -> Self {
        Self {
            gateway,
            profile: search_model.map(|model| AgentProfile::new(model, 0.0).with_web_search()),
        }
    }
}

fn map_gateway_error(err: GatewayError) -> OracleError {
    match err {
        GatewayError::Timeout => OracleError::Timeout,
        GatewayError::NotConfigured(what) => OracleError::NotConfigured(what),
        GatewayError::MalformedResponse(what) => OracleError::Malformed(what),
        other => OracleError::Network(other.to_string()),
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> AvailabilityOracle for SearchOracle<G> {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn check(&self, name: &DomainName) -> Result<OracleVerdict, OracleError> {
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| OracleError::NotConfigured("no search model".to_string()))?;

        let session = self
            .gateway
            .create_session_with_system_prompt(profile, PromptTemplate::checker_system())
            .await
            .map_err(map_gateway_error)?;
        let raw = session
            .send(&PromptTemplate::checker_prompt(name.as_str()))
            .await
            .map_err(map_gateway_error)?;

        debug!(name = %name, "Search check response: {}", raw);
        Ok(parse_status(&raw, name.as_str()))
    }
}
