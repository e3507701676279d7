use super::{ProviderAdapter, ProviderKind};
use async_trait::async_trait;
use namesmith_application::ports::llm_gateway::{
    AgentProfile, GatewayError, LlmGateway, LlmSession,
};
use namesmith_domain::Model;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Routing settings from the `[providers]` config section
#[derive(Debug, Clone, Default)]
pub struct ProviderRouting {
    /// Provider used for models with no known family
    pub default: Option<String>,
    /// Explicit model name → provider name overrides
    pub routing: HashMap<String, String>,
}

pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    /// Model name to provider index, from the explicit routing table
    explicit_model_routing: HashMap<String, usize>,
    default_kind: ProviderKind,
}

impl RoutingGateway {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>, config: &ProviderRouting) -> Self {
        let mut explicit_model_routing = HashMap::new();

        for (model_name, provider_name) in &config.routing {
            let Some(target_kind) = ProviderKind::parse(provider_name) else {
                continue;
            };
            if let Some(idx) = providers.iter().position(|p| p.kind() == target_kind) {
                explicit_model_routing.insert(model_name.clone(), idx);
            }
        }

        Self {
            providers,
            explicit_model_routing,
            default_kind: config
                .default
                .as_deref()
                .and_then(ProviderKind::parse)
                .unwrap_or_default(),
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Routing priority:
    ///  1. explicit routing table entry for the model name
    ///  2. the provider of the model's family (OpenAI, Gemini); a known family
    ///     with no registered provider is `NotConfigured`
    ///  3. the default provider kind
    ///  4. the first registered provider
    fn resolve_provider(&self, model: &Model) -> Result<&dyn ProviderAdapter, GatewayError> {
        if let Some(&idx) = self.explicit_model_routing.get(model.as_str()) {
            let provider = self.providers[idx].as_ref();
            if !provider.supports_model(model) {
                debug!(
                    model = %model,
                    provider = provider.kind().as_str(),
                    "Explicit route outside the provider's model family"
                );
            }
            return Ok(provider);
        }

        let inferred_kind = if model.is_openai() {
            Some(ProviderKind::OpenAi)
        } else if model.is_gemini() {
            Some(ProviderKind::Gemini)
        } else {
            None
        };
        if let Some(kind) = inferred_kind {
            return self
                .providers
                .iter()
                .find(|p| p.kind() == kind)
                .map(|p| p.as_ref())
                .ok_or_else(|| {
                    GatewayError::NotConfigured(format!(
                        "{} (needed for {})",
                        kind.as_str(),
                        model
                    ))
                });
        }

        if let Some(p) = self
            .providers
            .iter()
            .find(|p| p.kind() == self.default_kind)
        {
            return Ok(p.as_ref());
        }

        self.providers
            .first()
            .map(|p| p.as_ref())
            .ok_or(GatewayError::ModelNotAvailable(
                "No providers available".to_string(),
            ))
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn create_session_with_system_prompt(
        &self,
        profile: &AgentProfile,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let provider = self.resolve_provider(&profile.model)?;
        debug!(model = %profile.model, provider = provider.kind().as_str(), "Routing session");
        provider
            .create_session_with_system_prompt(profile, system_prompt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Mock ProviderAdapter --------------------------------------------------

    struct MockProvider {
        kind: ProviderKind,
    }

    impl MockProvider {
        fn new(kind: ProviderKind) -> Arc<dyn ProviderAdapter> {
            Arc::new(Self { kind })
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn supports_model(&self, _model: &Model) -> bool {
            true
        }

        async fn create_session_with_system_prompt(
            &self,
            _profile: &AgentProfile,
            _system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            Err(GatewayError::RequestFailed(format!("{:?}", self.kind)))
        }
    }

    // -- Helpers ---------------------------------------------------------------

    fn both() -> Vec<Arc<dyn ProviderAdapter>> {
        vec![
            MockProvider::new(ProviderKind::OpenAi),
            MockProvider::new(ProviderKind::Gemini),
        ]
    }

    fn config_with_default(default: &str) -> ProviderRouting {
        ProviderRouting {
            default: Some(default.to_string()),
            ..Default::default()
        }
    }

    // -- resolve_provider routing priority tests -------------------------------

    #[test]
    fn explicit_routing_takes_highest_priority() {
        let mut routing = HashMap::new();
        routing.insert("gpt-4o".to_string(), "gemini".to_string());
        let config = ProviderRouting {
            routing,
            ..Default::default()
        };
        let gw = RoutingGateway::new(both(), &config);

        let provider = gw.resolve_provider(&Model::Gpt4o).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Gemini);
    }

    #[test]
    fn model_family_routes_to_matching_provider() {
        let gw = RoutingGateway::new(both(), &ProviderRouting::default());

        assert_eq!(
            gw.resolve_provider(&Model::Gpt4oMini).unwrap().kind(),
            ProviderKind::OpenAi
        );
        assert_eq!(
            gw.resolve_provider(&Model::Gemini15Flash).unwrap().kind(),
            ProviderKind::Gemini
        );
    }

    #[test]
    fn missing_family_provider_is_not_configured() {
        let providers = vec![MockProvider::new(ProviderKind::OpenAi)];
        let gw = RoutingGateway::new(providers, &ProviderRouting::default());

        let result = gw.resolve_provider(&Model::Gemini15Flash);
        assert!(matches!(result, Err(GatewayError::NotConfigured(_))));
    }

    #[test]
    fn unknown_model_uses_default_kind() {
        let gw = RoutingGateway::new(both(), &config_with_default("gemini"));

        let provider = gw
            .resolve_provider(&Model::Custom("local-llm".to_string()))
            .unwrap();
        assert_eq!(provider.kind(), ProviderKind::Gemini);
    }

    #[test]
    fn unknown_model_falls_back_to_first_provider() {
        let providers = vec![MockProvider::new(ProviderKind::Gemini)];
        let gw = RoutingGateway::new(providers, &config_with_default("openai"));

        let provider = gw
            .resolve_provider(&Model::Custom("local-llm".to_string()))
            .unwrap();
        assert_eq!(provider.kind(), ProviderKind::Gemini);
    }

    #[test]
    fn empty_providers_returns_model_not_available() {
        let gw = RoutingGateway::new(vec![], &ProviderRouting::default());

        let result = gw.resolve_provider(&Model::Custom("local-llm".to_string()));
        assert!(matches!(result, Err(GatewayError::ModelNotAvailable(_))));
    }

    #[test]
    fn unknown_routing_provider_name_is_ignored() {
        let mut routing = HashMap::new();
        routing.insert("gpt-4o".to_string(), "nonexistent-provider".to_string());
        let config = ProviderRouting {
            routing,
            ..Default::default()
        };
        let gw = RoutingGateway::new(both(), &config);

        assert!(gw.explicit_model_routing.is_empty());
    }

    // -- LlmGateway trait integration tests ------------------------------------

    #[tokio::test]
    async fn session_creation_is_delegated() {
        let gw = RoutingGateway::new(both(), &ProviderRouting::default());
        let profile = AgentProfile::new(Model::Gemini25Flash, 0.4);

        let err = gw
            .create_session_with_system_prompt(&profile, "sys")
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Request failed: Gemini");
    }
}
