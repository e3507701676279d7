//! Creator strategies from TOML (`[[creators]]` array)

use namesmith_application::CreatorProfile;
use namesmith_domain::Model;
use serde::{Deserialize, Serialize};

fn default_temperature() -> f32 {
    1.0
}

fn default_quota() -> usize {
    1
}

/// One `[[creators]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCreatorConfig {
    /// Provenance tag recorded with every name this creator produces
    pub tag: String,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Names requested per generation call; 0 disables the creator
    #[serde(default = "default_quota")]
    pub quota: usize,
}

impl FileCreatorConfig {
    pub fn to_profile(&self) -> CreatorProfile {
        let Ok(model) = self.model.trim().parse::<Model>();
        CreatorProfile::new(self.tag.trim(), model, self.temperature, self.quota)
    }
}

/// Balanced, creative and conservative creators
pub fn default_creators() -> Vec<FileCreatorConfig> {
    CreatorProfile::defaults()
        .into_iter()
        .map(|c| FileCreatorConfig {
            tag: c.tag.to_string(),
            model: c.agent.model.to_string(),
            temperature: c.agent.temperature,
            quota: c.quota,
        })
        .collect()
}
