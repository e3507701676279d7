//! Domain layer for namesmith
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Rounds
//!
//! A [`Session`] runs a sequence of rounds. Each round turns the current
//! brief into a generation prompt, runs the convergence loop until enough
//! available names are found (or the attempt budget runs out), and folds
//! user feedback into the next round's brief.
//!
//! ## Ledger
//!
//! - **Seen set**: every name ever generated; never shrinks, never repeats
//! - **History**: first classification of each name; later ones are ignored
//!
//! ## Safety bias
//!
//! Availability uncertainty always resolves to [`Availability::Taken`].

pub mod availability;
pub mod candidate;
pub mod config;
pub mod convergence;
pub mod core;
pub mod feedback;
pub mod ledger;
pub mod parsing;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use availability::{Availability, OracleVerdict, Partition};
pub use candidate::{CandidateBatch, CreatorTag, DomainName, StrategyMix, StrategyQuota};
pub use config::OutputFormat;
pub use convergence::{
    ConvergenceBudget, ConvergenceOutcome, ConvergenceState, ConvergenceStatus, ConvergenceTracker,
};
pub use core::{error::DomainError, model::Model, question::Question};
pub use feedback::{FeedbackSignal, empty_round_critique};
pub use ledger::{History, HistoryRecord, SeenSet};
pub use prompt::PromptTemplate;
pub use session::entities::{
    ABORT_REASON_EMPTY_ROUNDS, RoundVerdict, Session, SessionId, SessionSettings, SessionStatus,
};

// Re-export response decoders
pub use parsing::{parse_domain_list, parse_questions, parse_refinement_questions, parse_status};
