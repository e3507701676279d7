//! Clarifying question use case
//!
//! First round: 2-10 questions derived from the brief. Later rounds:
//! exactly two follow-ups derived from the refined brief and the feedback
//! summary. Any failure falls back to a fixed generic pair.

use crate::config::{AgentRoster, SearchParams};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::shared::{AgentRequest, ask_agent};
use namesmith_domain::{
    PromptTemplate, Question, SessionId, parse_questions, parse_refinement_questions,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Upper bound on first-round questions
pub const MAX_INITIAL_QUESTIONS: usize = 10;

/// Use case for issuing clarifying questions
pub struct AskQuestionsUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    agents: AgentRoster,
    call_timeout: Duration,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> AskQuestionsUseCase<G> {
    pub fn new(gateway: Arc<G>, agents: AgentRoster, search: &SearchParams) -> Self {
        Self {
            gateway,
            agents,
            call_timeout: search.call_timeout,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Questions for the first round
    pub async fn initial(&self, session: &SessionId, brief: &str) -> Vec<Question> {
        let prompt = PromptTemplate::initial_questions(brief);
        let request = AgentRequest {
            session,
            role: "question",
            profile: &self.agents.question,
            system: PromptTemplate::question_system(),
            prompt: &prompt,
        };

        let response =
            ask_agent(&*self.gateway, &*self.conversation_logger, request, self.call_timeout).await;

        match response.map(|text| parse_questions(&text)) {
            Ok(Some(mut questions)) => {
                questions.truncate(MAX_INITIAL_QUESTIONS);
                info!(session = %session, "Generated {} initial questions", questions.len());
                questions
            }
            Ok(None) => {
                warn!(session = %session, "Question response was unreadable, using fallback questions");
                Question::initial_fallback()
            }
            Err(e) => {
                warn!(session = %session, "Question agent failed: {}, using fallback questions", e);
                Question::initial_fallback()
            }
        }
    }

    /// Exactly two follow-up questions for a later round
    pub async fn refinement(
        &self,
        session: &SessionId,
        refined_brief: &str,
        feedback_summary: &str,
    ) -> Vec<Question> {
        let prompt = PromptTemplate::refinement_questions(refined_brief, feedback_summary);
        let request = AgentRequest {
            session,
            role: "refinement",
            profile: &self.agents.refinement,
            system: PromptTemplate::refinement_questions_system(),
            prompt: &prompt,
        };

        let response =
            ask_agent(&*self.gateway, &*self.conversation_logger, request, self.call_timeout).await;

        match response.map(|text| parse_refinement_questions(&text)) {
            Ok(Some(questions)) => {
                info!(session = %session, "Generated {} refinement questions", questions.len());
                questions
            }
            Ok(None) => {
                warn!(session = %session, "Refinement questions unreadable, using fallback questions");
                Question::refinement_fallback()
            }
            Err(e) => {
                warn!(session = %session, "Refinement question agent failed: {}, using fallback questions", e);
                Question::refinement_fallback()
            }
        }
    }
}
