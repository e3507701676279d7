//! Availability filter use case
//!
//! Partitions a candidate batch into available and taken. Names are
//! checked independently with bounded concurrency; an error, a timeout or
//! an `UNKNOWN` verdict puts the name on the taken side.

use crate::config::CheckerParams;
use crate::ports::availability_oracle::{AvailabilityOracle, OracleError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use futures::StreamExt;
use namesmith_domain::{
    Availability, CandidateBatch, CreatorTag, DomainName, OracleVerdict, Partition, SessionId,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Use case for classifying a candidate batch
pub struct FilterAvailabilityUseCase {
    oracle: Arc<dyn AvailabilityOracle>,
    params: CheckerParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl FilterAvailabilityUseCase {
    pub fn new(oracle: Arc<dyn AvailabilityOracle>, params: CheckerParams) -> Self {
        Self {
            oracle,
            params,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, session: &SessionId, batch: CandidateBatch) -> Partition {
        self.execute_with_progress(session, batch, &NoProgress).await
    }

    /// Every input name lands on exactly one side of the result
    pub async fn execute_with_progress(
        &self,
        session: &SessionId,
        batch: CandidateBatch,
        progress: &dyn ProgressNotifier,
    ) -> Partition {
        if batch.is_empty() {
            return Partition::new();
        }

        info!(
            session = %session,
            "Checking {} names via {}",
            batch.len(),
            self.oracle.name()
        );
        progress.on_check_start(batch.len());

        let concurrency = self.params.concurrency.max(1);
        let mut results = futures::stream::iter(batch)
            .map(|(name, tag)| self.classify(session, name, tag))
            .buffer_unordered(concurrency);

        let mut partition = Partition::new();
        while let Some((name, tag, availability)) = results.next().await {
            progress.on_name_checked(&name, availability);
            partition.insert(name, tag, availability);
        }

        info!(
            session = %session,
            "Check complete: {} available, {} taken",
            partition.available.len(),
            partition.taken.len()
        );
        partition
    }

    async fn classify(
        &self,
        session: &SessionId,
        name: DomainName,
        tag: CreatorTag,
    ) -> (DomainName, CreatorTag, Availability) {
        let outcome = match tokio::time::timeout(self.params.check_timeout, self.oracle.check(&name)).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout),
        };

        let (verdict, error) = match outcome {
            Ok(verdict) => (verdict, None),
            Err(e) => {
                warn!(session = %session, name = %name, "Check failed: {}, assuming TAKEN", e);
                (OracleVerdict::Unknown, Some(e.to_string()))
            }
        };
        if verdict == OracleVerdict::Unknown && error.is_none() {
            warn!(session = %session, name = %name, "Ambiguous verdict, assuming TAKEN");
        }

        let availability = verdict.resolve();
        info!(session = %session, name = %name, creator = %tag, "{}", availability);

        self.conversation_logger.log(
            ConversationEvent::new(
                "availability",
                json!({
                    "name": name.as_str(),
                    "creator": tag.as_str(),
                    "oracle": self.oracle.name(),
                    "verdict": verdict,
                    "status": availability,
                    "error": error,
                }),
            )
            .for_session(session),
        );

        if !self.params.check_sleep.is_zero() {
            tokio::time::sleep(self.params.check_sleep).await;
        }

        (name, tag, availability)
    }
}
