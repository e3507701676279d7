//! Provider configuration from TOML (`[providers]` section)

use crate::providers::routing::ProviderRouting;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// OpenAI API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended; use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API.
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: crate::providers::openai::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Gemini API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GOOGLE_API_KEY").
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_API_KEY".to_string(),
            api_key: None,
            base_url: crate::providers::gemini::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Provider for models outside the known families: "openai" or "gemini".
    pub default: Option<String>,
    pub openai: FileOpenAiConfig,
    pub gemini: FileGeminiConfig,
    /// Explicit model → provider routing overrides.
    pub routing: HashMap<String, String>,
}

impl FileProvidersConfig {
    pub fn to_routing(&self) -> ProviderRouting {
        ProviderRouting {
            default: self.default.clone(),
            routing: self.routing.clone(),
        }
    }
}
