//! Session-driving service
//!
//! Owns the round cycle for every session: questions, prompt synthesis,
//! convergence, feedback. Rounds of one session are serialized behind a
//! per-session lock; different sessions run independently.

use crate::config::NamesmithConfig;
use crate::ports::availability_oracle::AvailabilityOracle;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::session_store::{SessionStore, StoreError};
use crate::use_cases::ask_questions::AskQuestionsUseCase;
use crate::use_cases::converge::{ConvergeUseCase, ConvergenceInput};
use crate::use_cases::filter_availability::FilterAvailabilityUseCase;
use crate::use_cases::generate_candidates::GenerateCandidatesUseCase;
use crate::use_cases::ledger::SessionLedger;
use crate::use_cases::refine_feedback::RefineFeedbackUseCase;
use crate::use_cases::synthesize_prompt::SynthesizePromptUseCase;
use chrono::Utc;
use namesmith_domain::{
    ConvergenceOutcome, CreatorTag, DomainError, DomainName, FeedbackSignal, History, Question,
    RoundVerdict, Session, SessionId, SessionSettings, SessionStatus, empty_round_critique,
};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Errors surfaced to the driving layer
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Session {0} has no generation prompt yet; submit answers first")]
    NoPrompt(SessionId),

    #[error("Session aborted: {0}")]
    Aborted(String),

    #[error("Session stopped")]
    Stopped,

    #[error(transparent)]
    Domain(DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// The session can no longer run rounds
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionError::Aborted(_) | SessionError::Stopped)
    }
}

impl From<DomainError> for SessionError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::SessionAborted(reason) => SessionError::Aborted(reason),
            DomainError::SessionStopped => SessionError::Stopped,
            other => SessionError::Domain(other),
        }
    }
}

/// Feedback collected from the user after a round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackInput {
    pub liked: BTreeMap<String, String>,
    pub disliked: BTreeMap<String, String>,
    /// Why the whole batch missed, if the user said so
    pub critique: Option<String>,
}

/// Result of one generation call on a session
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub outcome: ConvergenceOutcome,
    pub verdict: RoundVerdict,
    pub loop_count: u32,
    pub status: SessionStatus,
    pub history: History,
}

impl GenerationReport {
    pub fn available(&self) -> impl Iterator<Item = (&DomainName, &CreatorTag)> {
        self.outcome.partition.available.iter()
    }

    pub fn taken(&self) -> impl Iterator<Item = (&DomainName, &CreatorTag)> {
        self.outcome.partition.taken.iter()
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.verdict, RoundVerdict::Aborted { .. })
    }
}

/// Result of submitting feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinementReport {
    pub brief: String,
    pub summary: String,
    pub questions: Vec<Question>,
    pub loop_count: u32,
}

/// Generate a fresh `<unix-seconds>_<6 hex>` session id
pub fn new_session_id() -> SessionId {
    let suffix = Uuid::new_v4().simple().to_string();
    SessionId::from_parts(Utc::now().timestamp(), &suffix[..6])
}

/// Drives sessions through their rounds
pub struct SessionService<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    oracle: Arc<dyn AvailabilityOracle>,
    store: Arc<dyn SessionStore>,
    config: NamesmithConfig,
    questions: Arc<AskQuestionsUseCase<G>>,
    synthesizer: SynthesizePromptUseCase<G>,
    converge: ConvergeUseCase<G>,
    refiner: RefineFeedbackUseCase<G>,
    conversation_logger: Arc<dyn ConversationLogger>,
    locks: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl<G: LlmGateway + 'static> SessionService<G> {
    pub fn new(
        gateway: Arc<G>,
        oracle: Arc<dyn AvailabilityOracle>,
        store: Arc<dyn SessionStore>,
        config: NamesmithConfig,
    ) -> Self {
        Self::assemble(gateway, oracle, store, config, Arc::new(NoConversationLogger))
    }

    /// Rebuild the round use cases around a transcript logger
    pub fn with_conversation_logger(self, logger: Arc<dyn ConversationLogger>) -> Self {
        Self::assemble(self.gateway, self.oracle, self.store, self.config, logger)
    }

    fn assemble(
        gateway: Arc<G>,
        oracle: Arc<dyn AvailabilityOracle>,
        store: Arc<dyn SessionStore>,
        config: NamesmithConfig,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        let questions = Arc::new(
            AskQuestionsUseCase::new(Arc::clone(&gateway), config.agents.clone(), &config.search)
                .with_conversation_logger(Arc::clone(&logger)),
        );
        let synthesizer =
            SynthesizePromptUseCase::new(Arc::clone(&gateway), &config.agents, &config.search)
                .with_conversation_logger(Arc::clone(&logger));
        let generator = Arc::new(
            GenerateCandidatesUseCase::new(
                Arc::clone(&gateway),
                config.creators.clone(),
                &config.search,
            )
            .with_conversation_logger(Arc::clone(&logger)),
        );
        let filter = Arc::new(
            FilterAvailabilityUseCase::new(Arc::clone(&oracle), config.checker.clone())
                .with_conversation_logger(Arc::clone(&logger)),
        );
        let ledger = Arc::new(SessionLedger::new(Arc::clone(&store)));
        let converge = ConvergeUseCase::new(generator, filter, ledger);
        let refiner = RefineFeedbackUseCase::new(
            Arc::clone(&gateway),
            &config.agents,
            &config.search,
            Arc::clone(&questions),
        )
        .with_conversation_logger(Arc::clone(&logger));

        Self {
            gateway,
            oracle,
            store,
            config,
            questions,
            synthesizer,
            converge,
            refiner,
            conversation_logger: logger,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &NamesmithConfig {
        &self.config
    }

    /// Round lock for one session.
    ///
    /// Entries nobody holds a handle to are dropped on the way in, so the
    /// table only grows with sessions that are busy right now.
    fn lock_for(&self, id: &SessionId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.retain(|key, lock| key == id || Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(id.clone()).or_default())
    }

    async fn load(&self, id: &SessionId) -> Result<Session, SessionError> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Start a session from a brief and issue the first questions
    pub async fn create_session(
        &self,
        brief: &str,
    ) -> Result<(SessionId, Vec<Question>), SessionError> {
        let id = new_session_id();
        let mut session = Session::start(id.clone(), brief)?;

        let lock = self.lock_for(&id);
        let _guard = lock.lock().await;

        let questions = self.questions.initial(&id, brief).await;
        session.issue_questions(questions.clone());
        self.store.save(&session).await?;

        info!(session = %id, "Session created with {} questions", questions.len());
        self.conversation_logger.log(
            ConversationEvent::new(
                "session_created",
                json!({ "brief": brief, "questions": questions }),
            )
            .for_session(&id),
        );

        Ok((id, questions))
    }

    /// Override generation settings for one session
    pub async fn configure_session(
        &self,
        id: &SessionId,
        settings: SessionSettings,
    ) -> Result<(), SessionError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        settings.validate()?;
        let mut session = self.load(id).await?;
        if let Some(active) = &settings.active_creators {
            for tag in active {
                if self.config.creator(tag).is_none() {
                    warn!(session = %id, "Unknown creator {} in session settings", tag);
                }
            }
        }
        session.settings = settings;
        self.store.save(&session).await?;
        Ok(())
    }

    /// Turn answers into the generation prompt for this round
    pub async fn submit_answers(
        &self,
        id: &SessionId,
        answers: &BTreeMap<String, String>,
    ) -> Result<String, SessionError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut session = self.load(id).await?;
        match &session.status {
            SessionStatus::AwaitingAnswers | SessionStatus::ReadyToGenerate => {}
            SessionStatus::Aborted { reason } => return Err(SessionError::Aborted(reason.clone())),
            SessionStatus::Stopped => return Err(SessionError::Stopped),
            SessionStatus::AwaitingFeedback => {
                return Err(SessionError::Domain(DomainError::InvalidTransition {
                    from: session.status.to_string(),
                    action: "submit answers".to_string(),
                }));
            }
        }

        let prompt = self
            .synthesizer
            .execute(id, &session.brief, &session.questions, answers)
            .await;
        session.accept_prompt(prompt.clone())?;
        self.store.save(&session).await?;

        info!(session = %id, loop_count = session.loop_count, "Generation prompt ready");
        Ok(prompt)
    }

    /// Run one convergence call with default (no-op) progress
    pub async fn generate(&self, id: &SessionId) -> Result<GenerationReport, SessionError> {
        self.generate_with_progress(id, &NoProgress).await
    }

    /// Run one convergence call and close the round.
    ///
    /// An empty round counts toward the failure cap; reaching it aborts the
    /// session and the report carries `RoundVerdict::Aborted`.
    pub async fn generate_with_progress(
        &self,
        id: &SessionId,
        progress: &dyn ProgressNotifier,
    ) -> Result<GenerationReport, SessionError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut session = self.load(id).await?;
        let prompt = match session.generation_prompt() {
            Ok(prompt) => prompt.to_string(),
            Err(DomainError::InvalidTransition { .. }) => {
                return Err(SessionError::NoPrompt(id.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let mix = self.config.strategy_mix(&session.settings);
        let budget = self.config.budget(&session.settings);
        let outcome = self
            .converge
            .execute_with_progress(
                &mut session,
                ConvergenceInput {
                    prompt: &prompt,
                    mix: &mix,
                    budget,
                },
                progress,
            )
            .await?;

        let verdict = session.complete_round(outcome.clone(), self.config.search.max_failures)?;
        self.store.save(&session).await?;

        match verdict {
            RoundVerdict::Found => info!(
                session = %id,
                loop_count = session.loop_count,
                "Round found {} available names",
                outcome.partition.available.len()
            ),
            RoundVerdict::Empty { failures } => warn!(
                session = %id,
                "Round found nothing available ({}/{} failures)",
                failures,
                self.config.search.max_failures
            ),
            RoundVerdict::Aborted { failures } => warn!(
                session = %id,
                "Aborting after {} consecutive empty rounds",
                failures
            ),
        }

        self.conversation_logger.log(
            ConversationEvent::new(
                "round_complete",
                json!({
                    "loop": session.loop_count,
                    "attempts": outcome.attempts,
                    "available": outcome.partition.available.keys().map(|n| n.as_str()).collect::<Vec<_>>(),
                    "taken": outcome.partition.taken.keys().map(|n| n.as_str()).collect::<Vec<_>>(),
                    "failures": session.failures,
                    "status": session.status.as_str(),
                }),
            )
            .for_session(id),
        );

        Ok(GenerationReport {
            outcome,
            verdict,
            loop_count: session.loop_count,
            status: session.status.clone(),
            history: session.history.clone(),
        })
    }

    /// Fold feedback into the brief and open the next round.
    ///
    /// Taken names always come from the last round. When that round found
    /// nothing and the user gave no critique, one is generated from the
    /// taken names so the brief still moves.
    pub async fn submit_feedback(
        &self,
        id: &SessionId,
        input: FeedbackInput,
    ) -> Result<RefinementReport, SessionError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut session = self.load(id).await?;
        if session.status != SessionStatus::AwaitingFeedback {
            return Err(match &session.status {
                SessionStatus::Aborted { reason } => SessionError::Aborted(reason.clone()),
                SessionStatus::Stopped => SessionError::Stopped,
                _ => SessionError::Domain(DomainError::InvalidTransition {
                    from: session.status.to_string(),
                    action: "submit feedback".to_string(),
                }),
            });
        }

        let taken = session.last_taken();
        let critique = match input.critique {
            Some(critique) => critique,
            None if session.last_round_empty() => {
                info!(session = %id, "Empty round, refining with an automatic critique");
                empty_round_critique(&taken)
            }
            None => String::new(),
        };
        let signal = FeedbackSignal::new(input.liked, input.disliked, taken).with_critique(critique);

        let outcome = self.refiner.execute(id, &session.brief, &signal).await;
        session.apply_refinement(
            outcome.refinement.brief.clone(),
            outcome.refinement.summary.clone(),
            outcome.questions.clone(),
        )?;
        self.store.save(&session).await?;

        info!(session = %id, loop_count = session.loop_count, "Advanced to next round");
        self.conversation_logger.log(
            ConversationEvent::new(
                "refinement",
                json!({
                    "loop": session.loop_count,
                    "brief": outcome.refinement.brief,
                    "summary": outcome.refinement.summary,
                    "questions": outcome.questions,
                }),
            )
            .for_session(id),
        );

        Ok(RefinementReport {
            brief: outcome.refinement.brief,
            summary: outcome.refinement.summary,
            questions: outcome.questions,
            loop_count: session.loop_count,
        })
    }

    /// Full session snapshot
    pub async fn get_state(&self, id: &SessionId) -> Result<Session, SessionError> {
        self.load(id).await
    }

    /// External stop signal
    pub async fn stop(&self, id: &SessionId) -> Result<SessionStatus, SessionError> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut session = self.load(id).await?;
        session.stop();
        self.store.save(&session).await?;
        info!(session = %id, "Session {}", session.status);
        Ok(session.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CheckerParams, CreatorProfile, SearchParams};
    use crate::testing::{ScriptedGateway, ScriptedOracle, TestStore, domains_json};
    use namesmith_domain::{Model, OracleVerdict};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers every agent role; the creator yields a fresh `nameN.com`
    fn role_gateway() -> ScriptedGateway {
        let counter = Arc::new(AtomicUsize::new(0));
        ScriptedGateway::new(move |_, system, _| {
            if system.contains("clarifier") {
                Ok(r#"{"q1": "What tone?", "q2": "Which TLD?", "q3": "Any length limit?"}"#.to_string())
            } else if system.contains("prompt engineer") {
                Ok("A playful brief for an eco bakery.".to_string())
            } else if system.contains("domain name generator") && !system.contains("optimizer") {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(domains_json(&[format!("name{}.com", n)]))
            } else if system.contains("prompt optimizer") {
                Ok("A refined brief.".to_string())
            } else {
                Ok(r#"{"q1": "Shorter?", "q2": "Other TLDs?"}"#.to_string())
            }
        })
    }

    fn config(max_failures: u32) -> NamesmithConfig {
        NamesmithConfig::default()
            .with_creators(vec![CreatorProfile::new("CreatorA", Model::Gpt4o, 1.0, 1)])
            .with_search(SearchParams {
                target_count: 1,
                max_attempts: 1,
                max_failures,
                call_timeout: Duration::from_secs(5),
            })
            .with_checker(CheckerParams {
                check_sleep: Duration::ZERO,
                concurrency: 1,
                check_timeout: Duration::from_secs(1),
            })
    }

    fn service(
        gateway: ScriptedGateway,
        oracle: ScriptedOracle,
        max_failures: u32,
    ) -> SessionService<ScriptedGateway> {
        SessionService::new(
            Arc::new(gateway),
            Arc::new(oracle),
            Arc::new(TestStore::default()),
            config(max_failures),
        )
    }

    async fn ready_session(service: &SessionService<ScriptedGateway>) -> SessionId {
        let (id, _) = service.create_session("eco bakery").await.unwrap();
        let mut answers = BTreeMap::new();
        answers.insert("q1".to_string(), "playful".to_string());
        service.submit_answers(&id, &answers).await.unwrap();
        id
    }

    #[test]
    fn test_session_id_format() {
        let id = new_session_id();
        let (secs, suffix) = id.as_str().split_once('_').unwrap();
        assert!(secs.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_create_session_issues_questions() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let (id, questions) = service.create_session("eco bakery").await.unwrap();

        assert_eq!(questions.len(), 3);
        let state = service.get_state(&id).await.unwrap();
        assert_eq!(state.status, SessionStatus::AwaitingAnswers);
        assert_eq!(state.loop_count, 1);
        assert_eq!(state.questions, questions);
    }

    #[tokio::test]
    async fn test_empty_brief_rejected() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let err = service.create_session("   ").await.unwrap_err();
        assert!(matches!(err, SessionError::Domain(DomainError::EmptyBrief)));
    }

    #[tokio::test]
    async fn test_unanswered_questions_use_brief_as_prompt() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let (id, _) = service.create_session("eco bakery").await.unwrap();

        let mut answers = BTreeMap::new();
        answers.insert("q1".to_string(), "no comment".to_string());
        let prompt = service.submit_answers(&id, &answers).await.unwrap();
        assert_eq!(prompt, "eco bakery");
    }

    #[tokio::test]
    async fn test_generate_requires_prompt() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let (id, _) = service.create_session("eco bakery").await.unwrap();
        let err = service.generate(&id).await.unwrap_err();
        assert!(matches!(err, SessionError::NoPrompt(_)));
    }

    #[tokio::test]
    async fn test_full_round_advances_loop() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let id = ready_session(&service).await;

        let report = service.generate(&id).await.unwrap();
        assert_eq!(report.verdict, RoundVerdict::Found);
        assert_eq!(report.available().count(), 1);
        assert_eq!(report.status, SessionStatus::AwaitingFeedback);
        assert_eq!(report.history.len(), 1);

        let mut liked = BTreeMap::new();
        liked.insert("name1.com".to_string(), "short".to_string());
        let refinement = service
            .submit_feedback(&id, FeedbackInput { liked, ..Default::default() })
            .await
            .unwrap();

        assert_eq!(refinement.brief, "A refined brief.");
        assert_eq!(refinement.questions.len(), 2);
        assert_eq!(refinement.loop_count, 2);

        let state = service.get_state(&id).await.unwrap();
        assert_eq!(state.brief, "A refined brief.");
        assert_eq!(state.initial_brief, "eco bakery");
        assert_eq!(state.status, SessionStatus::AwaitingAnswers);
        assert!(state.prompt.is_none());
    }

    #[tokio::test]
    async fn test_three_empty_rounds_abort() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Taken), 3);
        let id = ready_session(&service).await;

        assert_eq!(
            service.generate(&id).await.unwrap().verdict,
            RoundVerdict::Empty { failures: 1 }
        );
        assert_eq!(
            service.generate(&id).await.unwrap().verdict,
            RoundVerdict::Empty { failures: 2 }
        );
        let third = service.generate(&id).await.unwrap();
        assert!(third.is_aborted());
        assert_eq!(
            third.status,
            SessionStatus::Aborted {
                reason: "too many empty rounds".to_string()
            }
        );

        let err = service.generate(&id).await.unwrap_err();
        assert!(err.is_terminal());
    }

    #[tokio::test]
    async fn test_success_resets_failure_counter() {
        let oracle = ScriptedOracle::new(|name| {
            Ok(if name.as_str() == "name3.com" {
                OracleVerdict::Free
            } else {
                OracleVerdict::Taken
            })
        });
        let service = service(role_gateway(), oracle, 3);
        let id = ready_session(&service).await;

        service.generate(&id).await.unwrap();
        service.generate(&id).await.unwrap();
        let third = service.generate(&id).await.unwrap();

        assert_eq!(third.verdict, RoundVerdict::Found);
        let state = service.get_state(&id).await.unwrap();
        assert_eq!(state.failures, 0);
        assert_eq!(state.status, SessionStatus::AwaitingFeedback);
    }

    #[tokio::test]
    async fn test_names_never_repeat_across_rounds() {
        let gateway = ScriptedGateway::new(|_, system, _| {
            if system.contains("creative domain name generator") {
                Ok(domains_json(&["same.com".to_string()]))
            } else {
                Ok(r#"{"q1": "What tone?", "q2": "Which TLD?"}"#.to_string())
            }
        });
        let service = service(gateway, ScriptedOracle::always(OracleVerdict::Free), 5);
        let id = ready_session(&service).await;

        let first = service.generate(&id).await.unwrap();
        assert_eq!(first.available().count(), 1);

        let second = service.generate(&id).await.unwrap();
        assert_eq!(second.available().count(), 0);
        assert_eq!(second.verdict, RoundVerdict::Empty { failures: 1 });

        let state = service.get_state(&id).await.unwrap();
        assert_eq!(state.seen.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_round_feedback_adds_critique() {
        let gateway = role_gateway();
        let service = service(gateway.clone(), ScriptedOracle::always(OracleVerdict::Taken), 5);
        let id = ready_session(&service).await;

        service.generate(&id).await.unwrap();
        service
            .submit_feedback(&id, FeedbackInput::default())
            .await
            .unwrap();

        let directionist = gateway
            .calls()
            .into_iter()
            .find(|c| c.system.contains("prompt optimizer"))
            .unwrap();
        assert!(directionist.prompt.contains("The following ideas were all taken: name1.com"));
    }

    #[tokio::test]
    async fn test_feedback_without_signal_keeps_brief() {
        let gateway = role_gateway();
        let service = service(gateway.clone(), ScriptedOracle::always(OracleVerdict::Free), 5);
        let id = ready_session(&service).await;

        service.generate(&id).await.unwrap();
        let refinement = service
            .submit_feedback(&id, FeedbackInput::default())
            .await
            .unwrap();

        assert_eq!(refinement.brief, "eco bakery");
        assert_eq!(refinement.summary, "");
        assert!(!gateway.calls().iter().any(|c| c.system.contains("prompt optimizer")));
    }

    #[tokio::test]
    async fn test_feedback_before_generation_rejected() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let id = ready_session(&service).await;
        let err = service
            .submit_feedback(&id, FeedbackInput::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Domain(DomainError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_stop_blocks_generation() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let id = ready_session(&service).await;

        assert_eq!(service.stop(&id).await.unwrap(), SessionStatus::Stopped);
        assert!(matches!(
            service.generate(&id).await.unwrap_err(),
            SessionError::Stopped
        ));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let err = service
            .get_state(&SessionId::from_parts(1, "ffffff"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_session_settings_override_target() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let id = ready_session(&service).await;
        service
            .configure_session(
                &id,
                SessionSettings {
                    target_count: Some(1),
                    generation_count: Some(1),
                    active_creators: Some(vec!["CreatorA".into()]),
                },
            )
            .await
            .unwrap();

        let state = service.get_state(&id).await.unwrap();
        assert_eq!(state.settings.target_count, Some(1));
        let report = service.generate(&id).await.unwrap();
        assert_eq!(report.available().count(), 1);
    }

    #[tokio::test]
    async fn test_zero_target_override_rejected() {
        let gateway = role_gateway();
        let service = service(gateway.clone(), ScriptedOracle::always(OracleVerdict::Free), 1);
        let id = ready_session(&service).await;

        let err = service
            .configure_session(
                &id,
                SessionSettings {
                    target_count: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Domain(DomainError::InvalidSetting(_))
        ));

        let state = service.get_state(&id).await.unwrap();
        assert_eq!(state.settings, SessionSettings::default());
        assert_eq!(state.status, SessionStatus::ReadyToGenerate);

        let report = service.generate(&id).await.unwrap();
        assert_eq!(report.verdict, RoundVerdict::Found);
        assert_eq!(report.outcome.attempts, 1);
    }

    #[tokio::test]
    async fn test_concurrent_generations_on_one_session_run_in_turn() {
        let gateway = role_gateway().with_delay(Duration::from_millis(20));
        let service = service(gateway, ScriptedOracle::always(OracleVerdict::Taken), 5);
        let id = ready_session(&service).await;

        let (first, second) = tokio::join!(service.generate(&id), service.generate(&id));
        let mut verdicts = vec![first.unwrap().verdict, second.unwrap().verdict];
        verdicts.sort_by_key(|v| match v {
            RoundVerdict::Empty { failures } => *failures,
            _ => u32::MAX,
        });
        assert_eq!(
            verdicts,
            vec![
                RoundVerdict::Empty { failures: 1 },
                RoundVerdict::Empty { failures: 2 },
            ]
        );

        let state = service.get_state(&id).await.unwrap();
        assert_eq!(state.seen.len(), 2);
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.failures, 2);
    }

    #[tokio::test]
    async fn test_idle_session_locks_are_pruned() {
        let service = service(role_gateway(), ScriptedOracle::always(OracleVerdict::Free), 3);
        let first = ready_session(&service).await;
        let second = ready_session(&service).await;
        service.stop(&first).await.unwrap();

        let held = service.lock_for(&second);
        let locks = service.locks.lock().unwrap();
        assert_eq!(locks.len(), 1);
        assert!(Arc::ptr_eq(&locks[&second], &held));
    }
}
