//! Generation strategies ("creators") and their per-call quotas

use serde::{Deserialize, Serialize};

/// Provenance tag identifying which creator produced a candidate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatorTag(String);

impl CreatorTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CreatorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CreatorTag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One creator's share of a generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyQuota {
    pub tag: CreatorTag,
    /// Number of names to request; 0 disables the creator for the call
    pub quota: usize,
}

/// Which creators run for a generation call and how many names each attempts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyMix {
    quotas: Vec<StrategyQuota>,
}

impl StrategyMix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a creator's quota, replacing any existing entry for the tag
    pub fn with_quota(mut self, tag: impl Into<CreatorTag>, quota: usize) -> Self {
        let tag = tag.into();
        match self.quotas.iter_mut().find(|q| q.tag == tag) {
            Some(entry) => entry.quota = quota,
            None => self.quotas.push(StrategyQuota { tag, quota }),
        }
        self
    }

    /// Creators with a non-zero quota, in insertion order
    pub fn active(&self) -> impl Iterator<Item = &StrategyQuota> {
        self.quotas.iter().filter(|q| q.quota > 0)
    }

    pub fn quota_for(&self, tag: &CreatorTag) -> usize {
        self.quotas
            .iter()
            .find(|q| &q.tag == tag)
            .map(|q| q.quota)
            .unwrap_or(0)
    }

    /// Total names requested across all active creators
    pub fn total_requested(&self) -> usize {
        self.active().map(|q| q.quota).sum()
    }

    pub fn is_idle(&self) -> bool {
        self.total_requested() == 0
    }

    /// Keep only the listed creators active, and give each the same quota
    pub fn restricted_to(&self, active: &[CreatorTag], quota: usize) -> Self {
        Self {
            quotas: self
                .quotas
                .iter()
                .map(|q| StrategyQuota {
                    tag: q.tag.clone(),
                    quota: if active.contains(&q.tag) { quota } else { 0 },
                })
                .collect(),
        }
    }
}
