//! Availability oracle adapters
//!
//! - [`RdapOracle`]: fast protocol probe against the registry's RDAP server
//! - [`SearchOracle`]: best-effort web-search check through a text model

mod rdap;
mod search;

pub use rdap::{DEFAULT_BOOTSTRAP_URL, RdapOracle};
pub use search::SearchOracle;
