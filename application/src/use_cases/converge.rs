//! Convergence loop use case
//!
//! Repeats generate → register → classify → record until the target count
//! of available names is reached or the attempt budget runs out.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::session_store::StoreError;
use crate::use_cases::filter_availability::FilterAvailabilityUseCase;
use crate::use_cases::generate_candidates::{GenerateCandidatesUseCase, GenerateInput};
use crate::use_cases::ledger::SessionLedger;
use namesmith_domain::{
    ConvergenceBudget, ConvergenceOutcome, ConvergenceTracker, Session, StrategyMix,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Parameters threaded through one convergence call
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceInput<'a> {
    pub prompt: &'a str,
    pub mix: &'a StrategyMix,
    pub budget: ConvergenceBudget,
}

/// Use case driving the generator and the filter to convergence
pub struct ConvergeUseCase<G: LlmGateway + 'static> {
    generator: Arc<GenerateCandidatesUseCase<G>>,
    filter: Arc<FilterAvailabilityUseCase>,
    ledger: Arc<SessionLedger>,
}

impl<G: LlmGateway + 'static> ConvergeUseCase<G> {
    pub fn new(
        generator: Arc<GenerateCandidatesUseCase<G>>,
        filter: Arc<FilterAvailabilityUseCase>,
        ledger: Arc<SessionLedger>,
    ) -> Self {
        Self {
            generator,
            filter,
            ledger,
        }
    }

    /// Execute with default (no-op) progress
    pub async fn execute(
        &self,
        session: &mut Session,
        input: ConvergenceInput<'_>,
    ) -> Result<ConvergenceOutcome, StoreError> {
        self.execute_with_progress(session, input, &NoProgress).await
    }

    /// Always terminates within `budget.max_attempts` attempts and returns
    /// the partition of everything generated during the call.
    ///
    /// Only store failures are returned as errors; generation and
    /// classification failures degrade to empty or taken results.
    pub async fn execute_with_progress(
        &self,
        session: &mut Session,
        input: ConvergenceInput<'_>,
        progress: &dyn ProgressNotifier,
    ) -> Result<ConvergenceOutcome, StoreError> {
        let mut tracker = ConvergenceTracker::new(input.budget);

        if input.mix.is_idle() {
            warn!(session = %session.id, "No active creators, nothing to generate");
        }

        while let Some(attempt) = tracker.begin_attempt() {
            info!(
                session = %session.id,
                attempt,
                "Generation attempt {}/{}",
                attempt,
                input.budget.max_attempts
            );
            progress.on_attempt_start(attempt, input.budget.max_attempts);

            let excluded = tracker.excluded(&session.seen);
            let batch = self
                .generator
                .execute_with_progress(
                    &session.id,
                    GenerateInput {
                        prompt: input.prompt,
                        excluded: &excluded,
                        mix: input.mix,
                    },
                    progress,
                )
                .await;

            if batch.is_empty() {
                warn!(session = %session.id, attempt, "Generator returned no new names");
            }

            tracker.note_generated(batch.keys());
            self.ledger.register(session, batch.keys()).await?;

            let partition = self
                .filter
                .execute_with_progress(&session.id, batch, progress)
                .await;
            self.ledger.record(session, &partition).await?;

            tracker.absorb(partition);
            progress.on_attempt_complete(attempt, tracker.accumulated().available.len());
        }

        let outcome = tracker.finish();
        info!(
            session = %session.id,
            "Convergence finished ({:?}) after {} attempts: {} available, {} taken",
            outcome.status,
            outcome.attempts,
            outcome.partition.available.len(),
            outcome.partition.taken.len()
        );
        Ok(outcome)
    }
}
