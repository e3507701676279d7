//! Logging infrastructure — structured conversation logging.
//!
//! Provides [`JsonlConversationLogger`], a JSONL file writer that implements
//! the [`ConversationLogger`](namesmith_application::ConversationLogger) port,
//! and [`SessionLogRouter`], which keeps one such file per session.

mod jsonl_logger;
mod session_router;

pub use jsonl_logger::JsonlConversationLogger;
pub use session_router::SessionLogRouter;
