//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod ask_questions;
pub mod converge;
pub mod filter_availability;
pub mod generate_candidates;
pub mod ledger;
pub mod refine_feedback;
pub mod session_service;
pub(crate) mod shared;
pub mod synthesize_prompt;
