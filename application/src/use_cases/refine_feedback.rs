//! Feedback refinement use case
//!
//! Folds a round's feedback into a new brief and asks the two follow-up
//! questions for the next round. Without any signal the brief is returned
//! unchanged and the rewrite agent is not called. A failed rewrite keeps
//! the current brief.

use crate::config::{AgentRoster, SearchParams};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{AgentProfile, LlmGateway};
use crate::use_cases::ask_questions::AskQuestionsUseCase;
use crate::use_cases::shared::{AgentRequest, ask_agent};
use namesmith_domain::{FeedbackSignal, PromptTemplate, Question, SessionId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// New brief plus the summary it was derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refinement {
    pub brief: String,
    pub summary: String,
}

/// Refinement plus the next round's questions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinementOutcome {
    pub refinement: Refinement,
    pub questions: Vec<Question>,
}

/// Use case for refining the brief from feedback
pub struct RefineFeedbackUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    profile: AgentProfile,
    questions: Arc<AskQuestionsUseCase<G>>,
    call_timeout: Duration,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> RefineFeedbackUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        agents: &AgentRoster,
        search: &SearchParams,
        questions: Arc<AskQuestionsUseCase<G>>,
    ) -> Self {
        Self {
            gateway,
            profile: agents.directionist.clone(),
            questions,
            call_timeout: search.call_timeout,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Rewrite `current_brief` from the feedback signal
    pub async fn refine(
        &self,
        session: &SessionId,
        current_brief: &str,
        signal: &FeedbackSignal,
    ) -> Refinement {
        let summary = signal.summary();
        if summary.is_empty() {
            info!(session = %session, "No feedback signal, brief unchanged");
            return Refinement {
                brief: current_brief.to_string(),
                summary,
            };
        }

        let prompt = PromptTemplate::directionist_prompt(current_brief, &summary);
        let request = AgentRequest {
            session,
            role: "directionist",
            profile: &self.profile,
            system: PromptTemplate::directionist_system(),
            prompt: &prompt,
        };

        let brief = match ask_agent(&*self.gateway, &*self.conversation_logger, request, self.call_timeout).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(session = %session, "Brief refined from feedback");
                text.trim().to_string()
            }
            Ok(_) => {
                warn!(session = %session, "Directionist returned nothing, brief unchanged");
                current_brief.to_string()
            }
            Err(e) => {
                warn!(session = %session, "Directionist failed: {}, brief unchanged", e);
                current_brief.to_string()
            }
        };

        Refinement { brief, summary }
    }

    /// Refine and ask the next round's two questions
    pub async fn execute(
        &self,
        session: &SessionId,
        current_brief: &str,
        signal: &FeedbackSignal,
    ) -> RefinementOutcome {
        let refinement = self.refine(session, current_brief, signal).await;
        let questions = self
            .questions
            .refinement(session, &refinement.brief, &refinement.summary)
            .await;
        RefinementOutcome {
            refinement,
            questions,
        }
    }
}
