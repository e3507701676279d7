//! Presentation-level configuration
//!
//! Configuration for output formatting and REPL behavior.

use namesmith_domain::OutputFormat;
use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// How rounds are rendered
    pub format: OutputFormat,
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: dirs::data_dir().map(|p| p.join("namesmith").join("history.txt")),
        }
    }
}
