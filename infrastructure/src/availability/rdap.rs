//! RDAP fast probe
//!
//! The IANA bootstrap file maps TLDs to RDAP servers. It is fetched once,
//! on the first check, and cached for the life of the oracle. A failed
//! fetch is not cached, so the next check retries it.

use async_trait::async_trait;
use namesmith_application::ports::availability_oracle::{AvailabilityOracle, OracleError};
use namesmith_domain::{DomainName, OracleVerdict};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

pub const DEFAULT_BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";

/// TLD → RDAP base URL
pub(crate) type BootstrapTable = HashMap<String, String>;

#[derive(Deserialize)]
struct BootstrapFile {
    services: Vec<(Vec<String>, Vec<String>)>,
}

/// Parse the IANA `dns.json` bootstrap file, preferring `https` servers
pub(crate) fn parse_bootstrap(text: &str) -> Result<BootstrapTable, OracleError> {
    let file: BootstrapFile = serde_json::from_str(text)
        .map_err(|e| OracleError::Malformed(format!("RDAP bootstrap: {}", e)))?;

    let mut table = BootstrapTable::new();
    for (tlds, urls) in file.services {
        let Some(base) = urls
            .iter()
            .find(|u| u.starts_with("https://"))
            .or_else(|| urls.first())
        else {
            continue;
        };
        for tld in tlds {
            table.insert(tld.to_lowercase(), base.clone());
        }
    }
    Ok(table)
}

/// `{base}/domain/{name}` for the name's TLD
pub(crate) fn lookup_url(table: &BootstrapTable, name: &DomainName) -> Result<String, OracleError> {
    let base = table
        .get(name.tld())
        .ok_or_else(|| OracleError::UnknownTld(name.tld().to_string()))?;
    Ok(format!("{}/domain/{}", base.trim_end_matches('/'), name))
}

/// 200 means registered, 404 means free; anything else is an error
pub(crate) fn verdict_for_status(status: StatusCode) -> Result<OracleVerdict, OracleError> {
    match status {
        StatusCode::OK => Ok(OracleVerdict::Taken),
        StatusCode::NOT_FOUND => Ok(OracleVerdict::Free),
        other => Err(OracleError::UnexpectedStatus(other.as_u16())),
    }
}

fn map_request_error(err: reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout
    } else {
        OracleError::Network(err.to_string())
    }
}

/// Oracle backed by RDAP lookups
pub struct RdapOracle {
    client: Client,
    bootstrap_url: String,
    bootstrap: OnceCell<BootstrapTable>,
}

impl RdapOracle {
    pub fn new(request_timeout: Duration) -> Result<Self, OracleError> {
        Self::with_bootstrap_url(request_timeout, DEFAULT_BOOTSTRAP_URL)
    }

    pub fn with_bootstrap_url(
        request_timeout: Duration,
        bootstrap_url: impl Into<String>,
    ) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| OracleError::NotConfigured(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            bootstrap_url: bootstrap_url.into(),
            bootstrap: OnceCell::new(),
        })
    }

    /// Oracle with a preloaded bootstrap table
    pub(crate) fn with_table(table: BootstrapTable) -> Self {
        Self {
            client: Client::new(),
            bootstrap_url: DEFAULT_BOOTSTRAP_URL.to_string(),
            bootstrap: OnceCell::new_with(Some(table)),
        }
    }

    async fn table(&self) -> Result<&BootstrapTable, OracleError> {
        self.bootstrap
            .get_or_try_init(|| async {
                info!("Loading RDAP bootstrap from {}", self.bootstrap_url);
                let response = self
                    .client
                    .get(&self.bootstrap_url)
                    .send()
                    .await
                    .map_err(map_request_error)?;
                if !response.status().is_success() {
                    return Err(OracleError::UnexpectedStatus(response.status().as_u16()));
                }
                let text = response.text().await.map_err(map_request_error)?;
                let table = parse_bootstrap(&text)?;
                info!("RDAP bootstrap loaded for {} TLDs", table.len());
                Ok(table)
            })
            .await
    }
}

#[async_trait]
impl AvailabilityOracle for RdapOracle {
    fn name(&self) -> &'static str {
        "rdap"
    }

    async fn check(&self, name: &DomainName) -> Result<OracleVerdict, OracleError> {
        let url = lookup_url(self.table().await?, name)?;
        debug!(name = %name, "RDAP lookup {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/rdap+json")
            .send()
            .await
            .map_err(map_request_error)?;

        verdict_for_status(response.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOTSTRAP: &str = r#"{
        "version": "1.0",
        "services": [
            [["com", "net"], ["http://rdap.verisign.com/com/v1/", "https://rdap.verisign.com/com/v1/"]],
            [["io"], ["https://rdap.nic.io/"]],
            [["empty"], []]
        ]
    }"#;

    fn name(s: &str) -> DomainName {
        DomainName::parse(s).unwrap()
    }

    #[test]
    fn test_bootstrap_prefers_https() {
        let table = parse_bootstrap(BOOTSTRAP).unwrap();
        assert_eq!(table["com"], "https://rdap.verisign.com/com/v1/");
        assert_eq!(table["net"], "https://rdap.verisign.com/com/v1/");
        assert_eq!(table["io"], "https://rdap.nic.io/");
        assert!(!table.contains_key("empty"));
    }

    #[test]
    fn test_malformed_bootstrap() {
        assert!(matches!(
            parse_bootstrap("<html>"),
            Err(OracleError::Malformed(_))
        ));
    }

    #[test]
    fn test_lookup_url() {
        let table = parse_bootstrap(BOOTSTRAP).unwrap();
        assert_eq!(
            lookup_url(&table, &name("Leafly.io")).unwrap(),
            "https://rdap.nic.io/domain/leafly.io"
        );
        assert_eq!(
            lookup_url(&table, &name("acme.com")).unwrap(),
            "https://rdap.verisign.com/com/v1/domain/acme.com"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(verdict_for_status(StatusCode::OK).unwrap(), OracleVerdict::Taken);
        assert_eq!(
            verdict_for_status(StatusCode::NOT_FOUND).unwrap(),
            OracleVerdict::Free
        );
        assert!(matches!(
            verdict_for_status(StatusCode::TOO_MANY_REQUESTS),
            Err(OracleError::UnexpectedStatus(429))
        ));
    }

    #[tokio::test]
    async fn test_unknown_tld_is_an_error() {
        let oracle = RdapOracle::with_table(parse_bootstrap(BOOTSTRAP).unwrap());
        let result = oracle.check(&name("bakery.zz")).await;
        assert!(matches!(result, Err(OracleError::UnknownTld(tld)) if tld == "zz"));
    }
}
