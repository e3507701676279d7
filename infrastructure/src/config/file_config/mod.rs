//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod checker;
mod creators;
mod output;
mod providers;
mod search;
mod session;

pub use agents::{FileAgentConfig, FileAgentsConfig};
pub use checker::{CheckerMode, FileCheckerConfig};
pub use creators::{FileCreatorConfig, default_creators};
pub use output::FileOutputConfig;
pub use providers::{FileGeminiConfig, FileOpenAiConfig, FileProvidersConfig};
pub use search::FileSearchConfig;
pub use session::FileSessionConfig;

use super::validation::{ConfigIssue, ConfigIssueCode};
use namesmith_application::NamesmithConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Non-creator agent roles
    pub agents: FileAgentsConfig,
    /// Generation strategies
    pub creators: Vec<FileCreatorConfig>,
    /// Convergence budget and failure cap
    pub search: FileSearchConfig,
    /// Availability checking
    pub checker: FileCheckerConfig,
    /// Provider credentials and routing
    pub providers: FileProvidersConfig,
    /// Session persistence
    pub session: FileSessionConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            agents: FileAgentsConfig::default(),
            creators: default_creators(),
            search: FileSearchConfig::default(),
            checker: FileCheckerConfig::default(),
            providers: FileProvidersConfig::default(),
            session: FileSessionConfig::default(),
            output: FileOutputConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.agents.validate());
        issues.extend(self.checker.parse_mode().1);
        issues.extend(self.checker.parse_search_model().1);

        let mut tags = HashSet::new();
        for (i, creator) in self.creators.iter().enumerate() {
            if creator.model.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: format!("creators[{}].model", i),
                    },
                    format!("creators[{}].model: model name cannot be empty", i),
                ));
            }
            if !tags.insert(creator.tag.trim()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateCreator {
                        tag: creator.tag.clone(),
                    },
                    format!("creators: tag '{}' is declared more than once", creator.tag),
                ));
            }
        }
        if self.creators.iter().all(|c| c.quota == 0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoActiveCreator,
                "creators: at least one creator needs a quota above zero",
            ));
        }

        for (field, value) in [
            ("search.target_count", self.search.target_count as u64),
            ("search.max_attempts", self.search.max_attempts as u64),
            ("search.max_failures", self.search.max_failures as u64),
            ("search.call_timeout_secs", self.search.call_timeout_secs),
            ("checker.request_timeout_secs", self.checker.request_timeout_secs),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroValue {
                        field: field.to_string(),
                    },
                    format!("{}: must be greater than zero", field),
                ));
            }
        }
        if self.checker.concurrency == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "checker.concurrency".to_string(),
                },
                "checker.concurrency: 0 is treated as 1",
            ));
        }

        issues
    }

    pub fn checker_mode(&self) -> CheckerMode {
        self.checker.parse_mode().0
    }

    /// Runtime configuration for the use cases
    pub fn to_namesmith_config(&self) -> NamesmithConfig {
        let search = self.search.to_params();
        let checker = self
            .checker
            .to_params(self.checker_mode(), search.call_timeout);

        NamesmithConfig {
            agents: self.agents.to_roster(),
            creators: self.creators.iter().map(FileCreatorConfig::to_profile).collect(),
            search,
            checker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use namesmith_domain::{Model, OutputFormat};
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[agents.synthesizer]
model = "gpt-4.1"
temperature = 0.1

[[creators]]
tag = "Short"
model = "gpt-4o-mini"
temperature = 0.7
quota = 2

[[creators]]
tag = "Wild"
model = "gemini-2.5-pro"

[search]
target_count = 3
max_failures = 4

[checker]
mode = "search"
search_model = "o4-mini"

[providers]
default = "gemini"

[providers.routing]
"gpt-4.1" = "openai"

[session]
persist = true
dir = "/tmp/names"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());
        assert_eq!(config.checker_mode(), CheckerMode::Search);
        assert!(config.session.persist);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert_eq!(config.providers.to_routing().routing["gpt-4.1"], "openai");

        let runtime = config.to_namesmith_config();
        assert_eq!(runtime.agents.synthesizer.model, Model::Gpt41);
        assert_eq!(runtime.creators.len(), 2);
        assert_eq!(runtime.creators[1].quota, 1);
        assert!((runtime.creators[1].agent.temperature - 1.0).abs() < f32::EPSILON);
        assert_eq!(runtime.search.target_count, 3);
        assert_eq!(runtime.search.max_attempts, 5);
        assert_eq!(runtime.checker.check_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.checker_mode(), CheckerMode::Rdap);
        assert!(!config.session.persist);
        assert!(config.output.color);

        let runtime = config.to_namesmith_config();
        assert_eq!(runtime, NamesmithConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_default_creators() {
        let config: FileConfig = toml::from_str("[search]\ntarget_count = 2\n").unwrap();
        assert_eq!(config.creators.len(), 3);
        assert_eq!(config.search.max_failures, 20);
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let toml_str = r#"
[[creators]]
tag = "A"
model = ""
quota = 0

[[creators]]
tag = "A"
model = "gpt-4o"
quota = 0

[search]
max_attempts = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let codes: Vec<_> = config.validate().into_iter().map(|i| i.code).collect();

        assert!(codes.contains(&ConfigIssueCode::EmptyModelName {
            field: "creators[0].model".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::DuplicateCreator {
            tag: "A".to_string()
        }));
        assert!(codes.contains(&ConfigIssueCode::NoActiveCreator));
        assert!(codes.contains(&ConfigIssueCode::ZeroValue {
            field: "search.max_attempts".to_string()
        }));
    }
}
