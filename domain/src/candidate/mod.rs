//! Name candidates and the strategies that produce them.
//!
//! A candidate is a [`DomainName`] tagged with the [`CreatorTag`] of the
//! strategy that proposed it. Candidates only live inside one generation
//! batch; once classified they are absorbed into the session ledger.

pub mod domain_name;
pub mod strategy;

use std::collections::BTreeMap;

pub use domain_name::DomainName;
pub use strategy::{CreatorTag, StrategyMix, StrategyQuota};

/// One generation batch: name → the creator that produced it
pub type CandidateBatch = BTreeMap<DomainName, CreatorTag>;
