//! Convergence budget from TOML (`[search]` section)

use namesmith_application::SearchParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw `[search]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// Available names wanted per generation call
    pub target_count: usize,
    /// Generation attempts per call
    pub max_attempts: usize,
    /// Consecutive empty rounds before a session aborts
    pub max_failures: u32,
    /// Timeout for one text-generation call
    pub call_timeout_secs: u64,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        let params = SearchParams::default();
        Self {
            target_count: params.target_count,
            max_attempts: params.max_attempts,
            max_failures: params.max_failures,
            call_timeout_secs: params.call_timeout.as_secs(),
        }
    }
}

impl FileSearchConfig {
    pub fn to_params(&self) -> SearchParams {
        SearchParams {
            target_count: self.target_count,
            max_attempts: self.max_attempts,
            max_failures: self.max_failures,
            call_timeout: Duration::from_secs(self.call_timeout_secs),
        }
    }
}
