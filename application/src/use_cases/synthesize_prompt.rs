//! Prompt synthesis use case
//!
//! Joins the user's answers to the issued questions and asks the
//! synthesizer agent for a single narrative generation prompt.

use crate::config::{AgentRoster, SearchParams};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{AgentProfile, LlmGateway};
use crate::use_cases::shared::{AgentRequest, ask_agent};
use namesmith_domain::{PromptTemplate, Question, SessionId};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Answers that carry no information
const IGNORED_ANSWERS: &[&str] = &["no", "none", "n/a", "", "no comment"];

fn is_meaningful(answer: &str) -> bool {
    !IGNORED_ANSWERS.contains(&answer.trim().to_lowercase().as_str())
}

/// Pair each meaningful answer with its question text.
///
/// Answers follow the order of `questions`; answers keyed by an unknown id
/// are kept after them, with the id standing in for the question text.
pub fn join_answers(
    questions: &[Question],
    answers: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = questions
        .iter()
        .filter_map(|q| {
            answers
                .get(q.id())
                .map(|a| (q.text().to_string(), a.trim().to_string()))
        })
        .collect();

    pairs.extend(
        answers
            .iter()
            .filter(|(id, _)| !questions.iter().any(|q| q.id() == id.as_str()))
            .map(|(id, a)| (id.clone(), a.trim().to_string())),
    );

    pairs.retain(|(_, a)| is_meaningful(a));
    pairs
}

/// Use case for turning brief + answers into a generation prompt
pub struct SynthesizePromptUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    profile: AgentProfile,
    call_timeout: Duration,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> SynthesizePromptUseCase<G> {
    pub fn new(gateway: Arc<G>, agents: &AgentRoster, search: &SearchParams) -> Self {
        Self {
            gateway,
            profile: agents.synthesizer.clone(),
            call_timeout: search.call_timeout,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Build the generation prompt.
    ///
    /// With no meaningful answers the brief is used as-is. If the
    /// synthesizer fails, the brief and raw Q&A are concatenated.
    pub async fn execute(
        &self,
        session: &SessionId,
        brief: &str,
        questions: &[Question],
        answers: &BTreeMap<String, String>,
    ) -> String {
        let pairs = join_answers(questions, answers);
        if pairs.is_empty() {
            info!(session = %session, "No meaningful answers, using the brief as prompt");
            return brief.to_string();
        }

        let qa_text = PromptTemplate::qa_text(&pairs);
        let prompt = PromptTemplate::synthesis_prompt(brief, &qa_text);
        let request = AgentRequest {
            session,
            role: "synthesizer",
            profile: &self.profile,
            system: PromptTemplate::synthesizer_system(),
            prompt: &prompt,
        };

        match ask_agent(&*self.gateway, &*self.conversation_logger, request, self.call_timeout).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!(session = %session, "Synthesizer returned nothing, using raw Q&A");
                PromptTemplate::synthesis_fallback(brief, &qa_text)
            }
            Err(e) => {
                warn!(session = %session, "Synthesizer failed: {}, using raw Q&A", e);
                PromptTemplate::synthesis_fallback(brief, &qa_text)
            }
        }
    }
}
