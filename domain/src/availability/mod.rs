//! Availability classification.
//!
//! An oracle answers with an [`OracleVerdict`] (three-valued). The
//! classification that the rest of the system sees is two-valued
//! ([`Availability`]): anything other than an explicit `Free` resolves to
//! `Taken`, so uncertainty never produces a false "available" claim.

use crate::candidate::{CandidateBatch, CreatorTag, DomainName};
use serde::{Deserialize, Serialize};

/// Raw answer from an availability oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OracleVerdict {
    Taken,
    Free,
    Unknown,
}

impl OracleVerdict {
    /// Collapse to a two-valued classification, biased toward `Taken`
    pub fn resolve(self) -> Availability {
        match self {
            OracleVerdict::Free => Availability::Available,
            OracleVerdict::Taken | OracleVerdict::Unknown => Availability::Taken,
        }
    }
}

/// Final classification of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Availability {
    Available,
    Taken,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "AVAILABLE",
            Availability::Taken => "TAKEN",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Disjoint split of a set of candidates into available and taken
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub available: CandidateBatch,
    pub taken: CandidateBatch,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a name on one side. A name already present on either side
    /// keeps its first placement; returns whether the insert happened.
    pub fn insert(&mut self, name: DomainName, tag: CreatorTag, availability: Availability) -> bool {
        if self.contains(&name) {
            return false;
        }
        match availability {
            Availability::Available => self.available.insert(name, tag),
            Availability::Taken => self.taken.insert(name, tag),
        };
        true
    }

    /// Fold another partition into this one (first placement wins)
    pub fn merge(&mut self, other: Partition) {
        for (name, tag) in other.available {
            self.insert(name, tag, Availability::Available);
        }
        for (name, tag) in other.taken {
            self.insert(name, tag, Availability::Taken);
        }
    }

    pub fn contains(&self, name: &DomainName) -> bool {
        self.available.contains_key(name) || self.taken.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.available.len() + self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every name on either side
    pub fn names(&self) -> impl Iterator<Item = &DomainName> {
        self.available.keys().chain(self.taken.keys())
    }
}
