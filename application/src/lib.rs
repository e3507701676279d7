//! Application layer for namesmith
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{AgentRoster, CheckerParams, CreatorProfile, NamesmithConfig, SearchParams};
pub use ports::{
    availability_oracle::{AvailabilityOracle, OracleError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{AgentProfile, GatewayError, LlmGateway, LlmSession},
    progress::{NoProgress, ProgressNotifier},
    session_store::{SessionStore, StoreError},
};
pub use use_cases::converge::{ConvergeUseCase, ConvergenceInput};
pub use use_cases::filter_availability::FilterAvailabilityUseCase;
pub use use_cases::generate_candidates::{GenerateCandidatesUseCase, GenerateInput};
pub use use_cases::ledger::SessionLedger;
pub use use_cases::refine_feedback::{Refinement, RefineFeedbackUseCase, RefinementOutcome};
pub use use_cases::session_service::{
    FeedbackInput, GenerationReport, RefinementReport, SessionError, SessionService,
    new_session_id,
};
