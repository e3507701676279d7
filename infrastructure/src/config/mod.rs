//! Configuration file loading for namesmith
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `NAMESMITH_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./namesmith.toml` or `./.namesmith.toml`
//! 4. Global: `<config dir>/namesmith/config.toml`
//! 5. Default values

mod file_config;
mod loader;
pub mod validation;

pub use file_config::{
    CheckerMode, FileAgentConfig, FileAgentsConfig, FileCheckerConfig, FileConfig,
    FileCreatorConfig, FileGeminiConfig, FileOpenAiConfig, FileOutputConfig, FileProvidersConfig,
    FileSearchConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
