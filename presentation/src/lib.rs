//! Presentation layer for namesmith
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive session driver.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
pub use session::{FeedbackChoice, SessionRepl};
