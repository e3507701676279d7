//! Candidate generation use case
//!
//! Fans out one call per active creator, merges the results, and drops
//! every name the caller has already seen. A creator that fails, times out,
//! or returns unreadable output contributes nothing; the others still count.

use crate::config::{CreatorProfile, SearchParams};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{AgentRequest, ask_agent};
use namesmith_domain::core::string::truncate;
use namesmith_domain::{
    CandidateBatch, DomainName, PromptTemplate, SessionId, StrategyMix, parse_domain_list,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Most already-seen names listed back to a creator as "do not suggest".
///
/// The hint takes the alphabetically first names of the excluded set, not
/// the most recent ones. Names past the cap are still dropped from the
/// result; they just are not mentioned in the prompt.
const MAX_AVOID_HINT: usize = 200;

/// Input for one generation call
#[derive(Debug, Clone, Copy)]
pub struct GenerateInput<'a> {
    pub prompt: &'a str,
    /// Names the result must not contain
    pub excluded: &'a BTreeSet<DomainName>,
    pub mix: &'a StrategyMix,
}

/// Use case for producing a batch of candidates
pub struct GenerateCandidatesUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    creators: Vec<CreatorProfile>,
    call_timeout: Duration,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> GenerateCandidatesUseCase<G> {
    pub fn new(gateway: Arc<G>, creators: Vec<CreatorProfile>, search: &SearchParams) -> Self {
        Self {
            gateway,
            creators,
            call_timeout: search.call_timeout,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, session: &SessionId, input: GenerateInput<'_>) -> CandidateBatch {
        self.execute_with_progress(session, input, &NoProgress).await
    }

    /// Execute with progress callbacks
    pub async fn execute_with_progress(
        &self,
        session: &SessionId,
        input: GenerateInput<'_>,
        progress: &dyn ProgressNotifier,
    ) -> CandidateBatch {
        let avoid: Vec<String> = input
            .excluded
            .iter()
            .take(MAX_AVOID_HINT)
            .map(|n| n.to_string())
            .collect();

        let mut join_set = JoinSet::new();

        for share in input.mix.active() {
            let Some(creator) = self.creators.iter().find(|c| c.tag == share.tag) else {
                warn!(session = %session, "Unknown creator {} in strategy mix, skipping", share.tag);
                continue;
            };

            let gateway = Arc::clone(&self.gateway);
            let logger = Arc::clone(&self.conversation_logger);
            let creator = creator.clone();
            let count = share.quota;
            let session = session.clone();
            let prompt = input.prompt.to_string();
            let avoid = avoid.clone();
            let timeout = self.call_timeout;

            join_set.spawn(async move {
                let result = Self::run_creator(
                    &*gateway, &*logger, &session, &creator, count, &prompt, &avoid, timeout,
                )
                .await;
                (creator.tag, result)
            });
        }

        let mut batch = CandidateBatch::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((tag, Ok(names))) => {
                    info!(session = %session, creator = %tag, "Creator returned {} names", names.len());
                    progress.on_creator_complete(&tag, names.len(), true);
                    for name in names {
                        if input.excluded.contains(&name) {
                            debug!(session = %session, creator = %tag, "Dropping already-seen {}", name);
                            continue;
                        }
                        batch.insert(name, tag.clone());
                    }
                }
                Ok((tag, Err(e))) => {
                    warn!(session = %session, creator = %tag, "Creator failed: {}", e);
                    progress.on_creator_complete(&tag, 0, false);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        batch
    }

    /// Ask one creator for `count` names
    #[allow(clippy::too_many_arguments)]
    async fn run_creator(
        gateway: &G,
        logger: &dyn ConversationLogger,
        session: &SessionId,
        creator: &CreatorProfile,
        count: usize,
        prompt: &str,
        avoid: &[String],
        timeout: Duration,
    ) -> Result<Vec<DomainName>, GatewayError> {
        let avoid: Vec<&str> = avoid.iter().map(String::as_str).collect();
        let system = PromptTemplate::creator_system(count);
        let user = PromptTemplate::creator_prompt(prompt, &avoid);
        let request = AgentRequest {
            session,
            role: creator.tag.as_str(),
            profile: &creator.agent,
            system: &system,
            prompt: &user,
        };

        let text = ask_agent(gateway, logger, request, timeout).await?;
        parse_domain_list(&text, count)
            .ok_or_else(|| GatewayError::MalformedResponse(truncate(&text, 200)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedGateway, domains_json, test_session_id};
    use namesmith_domain::{CreatorTag, Model};

    fn creators() -> Vec<CreatorProfile> {
        vec![
            CreatorProfile::new("CreatorA", Model::Gpt4o, 1.0, 2),
            CreatorProfile::new("CreatorB", Model::Gpt4oMini, 1.3, 2),
            CreatorProfile::new("CreatorC", Model::Gpt41, 0.2, 2),
        ]
    }

    fn mix(a: usize, b: usize, c: usize) -> StrategyMix {
        StrategyMix::new()
            .with_quota("CreatorA", a)
            .with_quota("CreatorB", b)
            .with_quota("CreatorC", c)
    }

    fn use_case(gateway: ScriptedGateway) -> GenerateCandidatesUseCase<ScriptedGateway> {
        GenerateCandidatesUseCase::new(Arc::new(gateway), creators(), &SearchParams::default())
    }

    fn name(s: &str) -> DomainName {
        DomainName::parse(s).unwrap()
    }

    /// Each model answers with its own pair of names
    fn per_model_gateway() -> ScriptedGateway {
        ScriptedGateway::new(|profile, _, _| {
            let names = match profile.model {
                Model::Gpt4o => vec!["alpha.com".to_string(), "shared.com".to_string()],
                Model::Gpt4oMini => vec!["beta.io".to_string(), "shared.com".to_string()],
                _ => vec!["gamma.net".to_string(), "delta.net".to_string()],
            };
            Ok(domains_json(&names))
        })
    }

    #[tokio::test]
    async fn test_merges_all_creators() {
        let excluded = BTreeSet::new();
        let mix = mix(2, 2, 2);
        let batch = use_case(per_model_gateway())
            .execute(
                &test_session_id(),
                GenerateInput { prompt: "p", excluded: &excluded, mix: &mix },
            )
            .await;

        assert_eq!(batch.len(), 5);
        assert_eq!(batch[&name("alpha.com")], CreatorTag::from("CreatorA"));
        assert!(batch.contains_key(&name("shared.com")));
    }

    #[tokio::test]
    async fn test_drops_excluded_names() {
        let excluded: BTreeSet<DomainName> = [name("alpha.com"), name("gamma.net")].into();
        let mix = mix(2, 0, 2);
        let batch = use_case(per_model_gateway())
            .execute(
                &test_session_id(),
                GenerateInput { prompt: "p", excluded: &excluded, mix: &mix },
            )
            .await;

        let names: Vec<&str> = batch.keys().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["delta.net", "shared.com"]);
    }

    #[tokio::test]
    async fn test_zero_quota_creator_is_not_called() {
        let gateway = per_model_gateway();
        let excluded = BTreeSet::new();
        let mix = mix(1, 0, 0);
        let batch = use_case(gateway.clone())
            .execute(
                &test_session_id(),
                GenerateInput { prompt: "p", excluded: &excluded, mix: &mix },
            )
            .await;

        assert_eq!(gateway.call_count(), 1);
        assert_eq!(batch.len(), 1, "output truncated to the quota");
    }

    #[tokio::test]
    async fn test_failing_creator_is_isolated() {
        let gateway = ScriptedGateway::new(|profile, _, _| match profile.model {
            Model::Gpt4o => Err(GatewayError::Timeout),
            Model::Gpt4oMini => Ok("no json, no names".to_string()),
            _ => Ok(domains_json(&["ok.com".to_string()])),
        });
        let excluded = BTreeSet::new();
        let mix = mix(2, 2, 2);
        let batch = use_case(gateway)
            .execute(
                &test_session_id(),
                GenerateInput { prompt: "p", excluded: &excluded, mix: &mix },
            )
            .await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[&name("ok.com")], CreatorTag::from("CreatorC"));
    }

    #[tokio::test]
    async fn test_creator_prompt_carries_count_and_avoid_list() {
        let gateway = per_model_gateway();
        let excluded: BTreeSet<DomainName> = [name("old.com")].into();
        let mix = mix(0, 0, 2);
        use_case(gateway.clone())
            .execute(
                &test_session_id(),
                GenerateInput { prompt: "eco bakery", excluded: &excluded, mix: &mix },
            )
            .await;

        let call = &gateway.calls()[0];
        assert!(call.system.contains("exactly 2 domain"));
        assert!(call.prompt.starts_with("eco bakery"));
        assert!(call.prompt.contains("old.com"));
    }

    #[tokio::test]
    async fn test_avoid_hint_is_capped_but_dedup_is_not() {
        let gateway = ScriptedGateway::new(|_, _, _| Ok(domains_json(&["zzz999.com".to_string()])));
        let mut excluded: BTreeSet<DomainName> = (0..MAX_AVOID_HINT)
            .map(|i| name(&format!("aaa{:03}.com", i)))
            .collect();
        excluded.insert(name("zzz999.com"));
        let mix = mix(0, 0, 1);

        let batch = use_case(gateway.clone())
            .execute(
                &test_session_id(),
                GenerateInput { prompt: "p", excluded: &excluded, mix: &mix },
            )
            .await;

        assert!(batch.is_empty());
        let prompt = &gateway.calls()[0].prompt;
        assert!(prompt.contains("aaa000.com"));
        assert!(!prompt.contains("zzz999.com"));
    }
}
