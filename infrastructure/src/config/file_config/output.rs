//! Output configuration from TOML (`[output]` section)

use namesmith_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// Raw `[output]` section; command-line flags win over both fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Round rendering: "full", "names" or "json"
    pub format: Option<OutputFormat>,
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// `--format` if given, else the configured format, else full
    pub fn resolve_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }

    /// `--no-color` always disables color
    pub fn resolve_color(&self, no_color_flag: bool) -> bool {
        self.color && !no_color_flag
    }
}
