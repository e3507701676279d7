//! Application-level configuration.
//!
//! [`NamesmithConfig`] is built once at startup (from the file/env layers in
//! infrastructure) and injected into the use cases:
//!
//! - [`AgentRoster`] — model profile per agent role
//! - [`CreatorProfile`] — one generation strategy and its default quota
//! - [`SearchParams`] — convergence budget and failure cap
//! - [`CheckerParams`] — availability check pacing and limits

pub mod namesmith_config;

pub use namesmith_config::{
    AgentRoster, CheckerParams, CreatorProfile, NamesmithConfig, SearchParams,
};
