//! Availability oracle port
//!
//! An oracle answers whether a single domain name is registered. Errors are
//! returned as-is; the availability filter turns them into `TAKEN`.

use async_trait::async_trait;
use namesmith_domain::{DomainName, OracleVerdict};
use thiserror::Error;

/// Errors that can occur while checking a name
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("No lookup service known for TLD: {0}")]
    UnknownTld(String),

    #[error("Unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Oracle not configured: {0}")]
    NotConfigured(String),

    #[error("Timeout")]
    Timeout,
}

/// Port for domain availability lookups
#[async_trait]
pub trait AvailabilityOracle: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Check one name
    async fn check(&self, name: &DomainName) -> Result<OracleVerdict, OracleError>;
}
