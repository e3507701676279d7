//! Interactive session driver
//!
//! Provides a readline-based loop over one naming session.

mod repl;

pub use repl::{FeedbackChoice, SessionRepl};
