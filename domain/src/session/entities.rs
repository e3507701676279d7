//! Session aggregate and its round-by-round state machine

use crate::availability::Partition;
use crate::candidate::{CreatorTag, DomainName};
use crate::convergence::ConvergenceOutcome;
use crate::core::error::DomainError;
use crate::core::question::Question;
use crate::ledger::{History, SeenSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reason recorded when the failure cap ends a session
pub const ABORT_REASON_EMPTY_ROUNDS: &str = "too many empty rounds";

/// Opaque session identifier, `<unix-seconds>_<suffix>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn from_parts(unix_secs: i64, suffix: &str) -> Self {
        Self(format!("{}_{}", unix_secs, suffix))
    }

    /// Accept an externally supplied id. Ids end up in file names, so only
    /// ASCII alphanumerics, `_` and `-` are allowed.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::InvalidSessionId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session sits in its round cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    /// Questions issued, waiting for answers
    AwaitingAnswers,
    /// Prompt synthesized, generation can run
    ReadyToGenerate,
    /// Round finished, waiting for feedback
    AwaitingFeedback,
    /// Failure cap reached
    Aborted { reason: String },
    /// Driver declined to continue
    Stopped,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Aborted { .. } | SessionStatus::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::AwaitingAnswers => "awaiting_answers",
            SessionStatus::ReadyToGenerate => "ready_to_generate",
            SessionStatus::AwaitingFeedback => "awaiting_feedback",
            SessionStatus::Aborted { .. } => "aborted",
            SessionStatus::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-session overrides of the configured generation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Creators to run; `None` keeps the configured mix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_creators: Option<Vec<CreatorTag>>,
    /// Names each active creator is asked for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_count: Option<usize>,
    /// Available names wanted per generation call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_count: Option<usize>,
}

impl SessionSettings {
    /// Reject overrides that would leave a round with nothing to do
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.target_count == Some(0) {
            return Err(DomainError::InvalidSetting(
                "target_count must be at least 1".to_string(),
            ));
        }
        if self.generation_count == Some(0) {
            return Err(DomainError::InvalidSetting(
                "generation_count must be at least 1".to_string(),
            ));
        }
        if self.active_creators.as_ref().is_some_and(|a| a.is_empty()) {
            return Err(DomainError::InvalidSetting(
                "active_creators cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Verdict on a completed round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundVerdict {
    /// At least one available name; failure counter reset
    Found,
    /// Nothing available, still under the cap
    Empty { failures: u32 },
    /// Nothing available and the cap was reached
    Aborted { failures: u32 },
}

/// A name-search session (Aggregate Root)
///
/// Owns the evolving brief, the monotone ledger (seen set and history),
/// and the loop/failure counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    #[serde(default)]
    pub initial_brief: String,
    #[serde(default)]
    pub brief: String,
    pub loop_count: u32,
    #[serde(default)]
    pub failures: u32,
    pub status: SessionStatus,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_round: Option<ConvergenceOutcome>,
    #[serde(default)]
    pub last_feedback_summary: String,
    #[serde(default)]
    pub settings: SessionSettings,
    #[serde(default)]
    pub seen: SeenSet,
    #[serde(default)]
    pub history: History,
}

impl Session {
    /// A session that was never written: empty ledger, first loop
    pub fn empty(id: SessionId) -> Self {
        Self {
            id,
            initial_brief: String::new(),
            brief: String::new(),
            loop_count: 1,
            failures: 0,
            status: SessionStatus::AwaitingAnswers,
            questions: Vec::new(),
            prompt: None,
            last_round: None,
            last_feedback_summary: String::new(),
            settings: SessionSettings::default(),
            seen: SeenSet::new(),
            history: History::new(),
        }
    }

    /// Start a session from the user's initial brief
    pub fn start(id: SessionId, brief: impl Into<String>) -> Result<Self, DomainError> {
        let brief = brief.into();
        if brief.trim().is_empty() {
            return Err(DomainError::EmptyBrief);
        }
        let mut session = Self::empty(id);
        session.initial_brief = brief.clone();
        session.brief = brief;
        Ok(session)
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        match &self.status {
            SessionStatus::Aborted { reason } => Err(DomainError::SessionAborted(reason.clone())),
            SessionStatus::Stopped => Err(DomainError::SessionStopped),
            _ => Ok(()),
        }
    }

    fn invalid(&self, action: &str) -> DomainError {
        DomainError::InvalidTransition {
            from: self.status.to_string(),
            action: action.to_string(),
        }
    }

    /// Replace the current question set
    pub fn issue_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    /// question id → question text for the current set
    pub fn question_map(&self) -> BTreeMap<String, String> {
        self.questions
            .iter()
            .map(|q| (q.id().to_string(), q.text().to_string()))
            .collect()
    }

    /// Store the synthesized generation prompt for this round
    pub fn accept_prompt(&mut self, prompt: impl Into<String>) -> Result<(), DomainError> {
        self.ensure_active()?;
        self.prompt = Some(prompt.into());
        self.status = SessionStatus::ReadyToGenerate;
        Ok(())
    }

    /// Prompt for the next generation call, if one may run now
    pub fn generation_prompt(&self) -> Result<&str, DomainError> {
        self.ensure_active()?;
        self.prompt
            .as_deref()
            .ok_or_else(|| self.invalid("generate without a prompt"))
    }

    /// Add freshly generated names to the seen set; returns how many were new
    pub fn register_generated<'a, I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = &'a DomainName>,
    {
        self.seen.register(names)
    }

    /// Record a classified batch into history (first write wins)
    pub fn record_classified(&mut self, partition: &Partition) -> usize {
        self.history.record_partition(partition)
    }

    /// Close the round with its convergence outcome and apply the failure cap
    pub fn complete_round(
        &mut self,
        outcome: ConvergenceOutcome,
        max_failures: u32,
    ) -> Result<RoundVerdict, DomainError> {
        self.ensure_active()?;
        let found = outcome.found_any();
        self.last_round = Some(outcome);

        if found {
            self.failures = 0;
            self.status = SessionStatus::AwaitingFeedback;
            return Ok(RoundVerdict::Found);
        }

        self.failures += 1;
        if self.failures >= max_failures {
            self.status = SessionStatus::Aborted {
                reason: ABORT_REASON_EMPTY_ROUNDS.to_string(),
            };
            Ok(RoundVerdict::Aborted {
                failures: self.failures,
            })
        } else {
            self.status = SessionStatus::AwaitingFeedback;
            Ok(RoundVerdict::Empty {
                failures: self.failures,
            })
        }
    }

    /// Names the last round found taken
    pub fn last_taken(&self) -> Vec<String> {
        self.last_round
            .as_ref()
            .map(|o| o.partition.taken.keys().map(|n| n.to_string()).collect())
            .unwrap_or_default()
    }

    /// Whether the last completed round produced no available names
    pub fn last_round_empty(&self) -> bool {
        self.last_round.as_ref().is_some_and(|o| !o.found_any())
    }

    /// Move to the next round with a refined brief and new questions
    pub fn apply_refinement(
        &mut self,
        brief: impl Into<String>,
        feedback_summary: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<(), DomainError> {
        self.ensure_active()?;
        if self.status != SessionStatus::AwaitingFeedback {
            return Err(self.invalid("submit feedback"));
        }
        self.brief = brief.into();
        self.last_feedback_summary = feedback_summary.into();
        self.questions = questions;
        self.prompt = None;
        self.last_round = None;
        self.loop_count += 1;
        self.status = SessionStatus::AwaitingAnswers;
        Ok(())
    }

    /// External stop signal; an aborted session stays aborted
    pub fn stop(&mut self) {
        if !matches!(self.status, SessionStatus::Aborted { .. }) {
            self.status = SessionStatus::Stopped;
        }
    }
}
