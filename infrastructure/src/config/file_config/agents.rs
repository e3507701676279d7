//! Agent role configuration from TOML (`[agents]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use namesmith_application::ports::llm_gateway::AgentProfile;
use namesmith_application::AgentRoster;
use namesmith_domain::Model;
use serde::{Deserialize, Serialize};

/// Model and temperature override for one role; unset fields keep the default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl FileAgentConfig {
    /// Apply this override on top of `base`
    fn apply(&self, mut base: AgentProfile) -> AgentProfile {
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            let Ok(model) = model.trim().parse::<Model>();
            base.model = model;
        }
        if let Some(temperature) = self.temperature {
            base.temperature = temperature;
        }
        base
    }

    fn validate(&self, field: &str) -> Option<ConfigIssue> {
        match &self.model {
            Some(model) if model.trim().is_empty() => Some(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: format!("agents.{}.model", field),
                },
                format!("agents.{}.model: model name cannot be empty", field),
            )),
            _ => None,
        }
    }
}

/// Raw `[agents]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Clarifying questions on the first round
    pub question: FileAgentConfig,
    /// Brief + answers → generation prompt
    pub synthesizer: FileAgentConfig,
    /// Follow-up questions on later rounds
    pub refinement: FileAgentConfig,
    /// Brief rewrite from feedback
    pub directionist: FileAgentConfig,
}

impl FileAgentsConfig {
    pub fn to_roster(&self) -> AgentRoster {
        let base = AgentRoster::default();
        AgentRoster {
            question: self.question.apply(base.question),
            synthesizer: self.synthesizer.apply(base.synthesizer),
            refinement: self.refinement.apply(base.refinement),
            directionist: self.directionist.apply(base.directionist),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        [
            self.question.validate("question"),
            self.synthesizer.validate("synthesizer"),
            self.refinement.validate("refinement"),
            self.directionist.validate("directionist"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_role_defaults() {
        let config: FileAgentsConfig = toml::from_str(
            r#"
[question]
model = "gemini-2.5-flash"

[directionist]
temperature = 0.9
"#,
        )
        .unwrap();
        let roster = config.to_roster();

        assert_eq!(roster.question.model, Model::Gemini25Flash);
        assert!((roster.question.temperature - 0.2).abs() < f32::EPSILON);
        assert!(roster.question.json_output);
        assert_eq!(roster.directionist.model, Model::Gpt4oMini);
        assert!((roster.directionist.temperature - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_model_is_reported() {
        let config = FileAgentsConfig {
            synthesizer: FileAgentConfig {
                model: Some(" ".to_string()),
                temperature: None,
            },
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("agents.synthesizer.model"));
    }
}
