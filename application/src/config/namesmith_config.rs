//! Runtime configuration for the round use cases.

use crate::ports::llm_gateway::AgentProfile;
use namesmith_domain::{
    ConvergenceBudget, CreatorTag, Model, SessionSettings, StrategyMix,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model profile for each non-creator agent role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRoster {
    /// Clarifying questions on the first round
    pub question: AgentProfile,
    /// Brief + answers → generation prompt
    pub synthesizer: AgentProfile,
    /// Two follow-up questions on later rounds
    pub refinement: AgentProfile,
    /// Brief rewrite from feedback
    pub directionist: AgentProfile,
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self {
            question: AgentProfile::new(Model::Gemini15Flash, 0.2).json(),
            synthesizer: AgentProfile::new(Model::Gpt4oMini, 0.3),
            refinement: AgentProfile::new(Model::Gemini15Flash, 0.4).json(),
            directionist: AgentProfile::new(Model::Gpt4oMini, 0.5),
        }
    }
}

/// One generation strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    pub tag: CreatorTag,
    pub agent: AgentProfile,
    /// Names requested per generation call unless a session overrides it
    pub quota: usize,
}

impl CreatorProfile {
    pub fn new(tag: impl Into<CreatorTag>, model: Model, temperature: f32, quota: usize) -> Self {
        Self {
            tag: tag.into(),
            agent: AgentProfile::new(model, temperature).json(),
            quota,
        }
    }

    /// Balanced, creative and conservative creators, one name each
    pub fn defaults() -> Vec<CreatorProfile> {
        vec![
            CreatorProfile::new("CreatorA", Model::Gpt4o, 1.0, 1),
            CreatorProfile::new("CreatorB", Model::Gpt4o, 1.3, 1),
            CreatorProfile::new("CreatorC", Model::Gpt4o, 0.2, 1),
        ]
    }
}

/// Convergence budget and the session failure cap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Available names wanted per generation call
    pub target_count: usize,
    /// Generation attempts per call
    pub max_attempts: usize,
    /// Consecutive empty rounds before the session aborts
    pub max_failures: u32,
    /// Timeout for a single text-generation call
    pub call_timeout: Duration,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            target_count: 5,
            max_attempts: 5,
            max_failures: 20,
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// Availability check pacing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerParams {
    /// Delay after each check
    pub check_sleep: Duration,
    /// Checks in flight at once
    pub concurrency: usize,
    /// Upper bound on a single check
    pub check_timeout: Duration,
}

impl Default for CheckerParams {
    fn default() -> Self {
        Self {
            check_sleep: Duration::from_millis(500),
            concurrency: 1,
            check_timeout: Duration::from_secs(10),
        }
    }
}

/// Explicit configuration handed to every use case at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamesmithConfig {
    pub agents: AgentRoster,
    pub creators: Vec<CreatorProfile>,
    pub search: SearchParams,
    pub checker: CheckerParams,
}

impl Default for NamesmithConfig {
    fn default() -> Self {
        Self {
            agents: AgentRoster::default(),
            creators: CreatorProfile::defaults(),
            search: SearchParams::default(),
            checker: CheckerParams::default(),
        }
    }
}

impl NamesmithConfig {
    pub fn with_search(mut self, search: SearchParams) -> Self {
        self.search = search;
        self
    }

    pub fn with_checker(mut self, checker: CheckerParams) -> Self {
        self.checker = checker;
        self
    }

    pub fn with_creators(mut self, creators: Vec<CreatorProfile>) -> Self {
        self.creators = creators;
        self
    }

    pub fn creator(&self, tag: &CreatorTag) -> Option<&CreatorProfile> {
        self.creators.iter().find(|c| &c.tag == tag)
    }

    /// Configured strategy mix with any per-session overrides applied
    pub fn strategy_mix(&self, settings: &SessionSettings) -> StrategyMix {
        let base = self
            .creators
            .iter()
            .fold(StrategyMix::new(), |mix, c| mix.with_quota(c.tag.clone(), c.quota));

        match (&settings.active_creators, settings.generation_count) {
            (Some(active), Some(count)) => base.restricted_to(active, count),
            (Some(active), None) => {
                let mut mix = StrategyMix::new();
                for c in &self.creators {
                    let quota = if active.contains(&c.tag) { c.quota } else { 0 };
                    mix = mix.with_quota(c.tag.clone(), quota);
                }
                mix
            }
            (None, Some(count)) => self
                .creators
                .iter()
                .fold(StrategyMix::new(), |mix, c| mix.with_quota(c.tag.clone(), count)),
            (None, None) => base,
        }
    }

    /// Convergence budget with any per-session target override applied
    pub fn budget(&self, settings: &SessionSettings) -> ConvergenceBudget {
        ConvergenceBudget::new(
            settings.target_count.unwrap_or(self.search.target_count),
            self.search.max_attempts,
        )
    }
}
