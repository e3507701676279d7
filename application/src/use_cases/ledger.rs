//! Seen-set ledger
//!
//! Writes through to the session store on every change, so a name counts
//! as seen as soon as it has been generated, even if the round never
//! finishes.

use crate::ports::session_store::{SessionStore, StoreError};
use namesmith_domain::{DomainName, Partition, Session, SessionId};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Durable seen set and history for sessions
pub struct SessionLedger {
    store: Arc<dyn SessionStore>,
}

impl SessionLedger {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Union `names` into the session's seen set and persist.
    ///
    /// Returns how many names were new. Overlapping calls never grow the
    /// set past the number of distinct names.
    pub async fn register<'a, I>(&self, session: &mut Session, names: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = &'a DomainName>,
    {
        let added = session.register_generated(names);
        if added > 0 {
            self.store.save(session).await?;
        }
        debug!(session = %session.id, "Registered {} new names ({} seen)", added, session.seen.len());
        Ok(added)
    }

    /// Record a classified batch into history (first write wins) and persist
    pub async fn record(&self, session: &mut Session, partition: &Partition) -> Result<usize, StoreError> {
        let written = session.record_classified(partition);
        if written > 0 {
            self.store.save(session).await?;
        }
        Ok(written)
    }

    /// Full accumulated seen set for a session; empty if never written
    pub async fn contains_any(&self, id: &SessionId) -> Result<BTreeSet<DomainName>, StoreError> {
        let session = self.store.load_or_empty(id).await?;
        Ok(session.seen.as_set().clone())
    }
}
