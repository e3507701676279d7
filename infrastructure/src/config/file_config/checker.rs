//! Availability checker configuration from TOML (`[checker]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use namesmith_application::CheckerParams;
use namesmith_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which availability oracle backs the filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckerMode {
    /// RDAP lookup against the TLD's registry
    #[default]
    Rdap,
    /// Ask a web-search model
    Search,
}

impl CheckerMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rdap" | "local" | "fast" => Some(Self::Rdap),
            "search" | "model" => Some(Self::Search),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rdap => "rdap",
            Self::Search => "search",
        }
    }
}

impl std::fmt::Display for CheckerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `[checker]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCheckerConfig {
    /// "rdap" or "search"
    pub mode: String,
    /// Web-search model for `search` mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_model: Option<String>,
    /// Timeout for one RDAP request
    pub request_timeout_secs: u64,
    /// Pause after each check
    pub check_sleep_ms: u64,
    /// Checks in flight at once
    pub concurrency: usize,
    /// RDAP bootstrap file location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_url: Option<String>,
}

impl Default for FileCheckerConfig {
    fn default() -> Self {
        Self {
            mode: CheckerMode::default().as_str().to_string(),
            search_model: Some(Model::O4Mini.to_string()),
            request_timeout_secs: 10,
            check_sleep_ms: 500,
            concurrency: 1,
            bootstrap_url: None,
        }
    }
}

impl FileCheckerConfig {
    /// Parse the mode, falling back to RDAP with a warning
    pub fn parse_mode(&self) -> (CheckerMode, Vec<ConfigIssue>) {
        match CheckerMode::parse(&self.mode) {
            Some(mode) => (mode, Vec::new()),
            None => (
                CheckerMode::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "checker.mode".to_string(),
                        value: self.mode.clone(),
                        valid_values: vec!["rdap".to_string(), "search".to_string()],
                    },
                    format!(
                        "checker.mode: unknown value '{}', falling back to 'rdap'",
                        self.mode
                    ),
                )],
            ),
        }
    }

    /// `None` when unset or blank; a blank name is reported
    pub fn parse_search_model(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        match self.search_model.as_deref().map(str::trim) {
            None => (None, Vec::new()),
            Some("") => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: "checker.search_model".to_string(),
                    },
                    "checker.search_model: model name cannot be empty",
                )],
            ),
            Some(name) => {
                let Ok(model) = name.parse::<Model>();
                (Some(model), Vec::new())
            }
        }
    }

    pub fn to_params(&self, mode: CheckerMode, search_call_timeout: Duration) -> CheckerParams {
        let check_timeout = match mode {
            CheckerMode::Rdap => Duration::from_secs(self.request_timeout_secs),
            CheckerMode::Search => search_call_timeout,
        };
        CheckerParams {
            check_sleep: Duration::from_millis(self.check_sleep_ms),
            concurrency: self.concurrency.max(1),
            check_timeout,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
