//! Infrastructure layer for namesmith
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod availability;
pub mod config;
pub mod logging;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use availability::{RdapOracle, SearchOracle};
pub use config::{CheckerMode, ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use logging::{JsonlConversationLogger, SessionLogRouter};
pub use providers::{
    ProviderAdapter, ProviderKind,
    gemini::GeminiProvider,
    openai::OpenAiProvider,
    routing::{ProviderRouting, RoutingGateway},
};
pub use store::{FileSessionStore, MemorySessionStore};
