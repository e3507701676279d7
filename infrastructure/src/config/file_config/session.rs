//! Session persistence configuration from TOML (`[session]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Write each session to `<dir>/session_<id>.json`
    pub persist: bool,
    /// Session file directory
    pub dir: PathBuf,
    /// Transcript and log directory
    pub logs_dir: PathBuf,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            persist: false,
            dir: PathBuf::from("sessions"),
            logs_dir: PathBuf::from("logs"),
        }
    }
}
