//! Session persistence port
//!
//! A keyed store of session snapshots. Reading an id that was never
//! written yields `None`; [`SessionStore::load_or_empty`] turns that into
//! an empty session.

use async_trait::async_trait;
use namesmith_domain::{Session, SessionId};
use thiserror::Error;

/// Errors that can occur in a session store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Port for reading and writing session state
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Last written snapshot for `id`, if any
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Replace the snapshot for `session.id`
    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Last written snapshot, or an empty session if never written
    async fn load_or_empty(&self, id: &SessionId) -> Result<Session, StoreError> {
        Ok(self
            .load(id)
            .await?
            .unwrap_or_else(|| Session::empty(id.clone())))
    }
}
