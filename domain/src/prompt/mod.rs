//! Prompt domain
//!
//! Templates for every agent role in a round.

mod template;

pub use template::PromptTemplate;
