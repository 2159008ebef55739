//! Environment configuration.
//!
//! Read once at startup; see [`ApiConfig::from_env`] for the variables.

use crate::server::ServerConfig;
use lpfolio_data::MarketDataError;
use lpfolio_data::providers::CMC_API_KEY_ENV;
use lpfolio_domain::chain::DEFAULT_CHAINS;
use lpfolio_domain::{Chain, ChainRegistry};
use lpfolio_execution::{AggregatorConfig, BalanceFailurePolicy, ZeroBalancePolicy};
use lpfolio_protocols::ProtocolError;
use std::num::NonZeroUsize;
use std::str::FromStr;

pub const INFURA_KEY_ENV: &str = "INFURA_KEY";
pub const CHAINS_ENV: &str = "LPFOLIO_CHAINS";
pub const MAX_CONCURRENT_CHAINS_ENV: &str = "LPFOLIO_MAX_CONCURRENT_CHAINS";
pub const MAX_IN_FLIGHT_ENV: &str = "LPFOLIO_MAX_IN_FLIGHT";
pub const BALANCE_FAILURE_ENV: &str = "LPFOLIO_BALANCE_FAILURE";
pub const ZERO_BALANCE_ENV: &str = "LPFOLIO_ZERO_BALANCE";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} must be set in .env or environment")]
    Missing(&'static str),
    /// A variable could not be parsed.
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    /// Chain bindings could not be built.
    #[error("chain setup failed: {0}")]
    Protocol(#[from] ProtocolError),
    /// The quote provider could not be built.
    #[error("market data setup failed: {0}")]
    MarketData(#[from] MarketDataError),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Appended to every chain's RPC endpoint template.
    pub infura_key: String,
    pub coinmarketcap_api_key: Option<String>,
    /// Enabled chains in scan order.
    pub chains: Vec<Chain>,
    pub aggregator: AggregatorConfig,
    pub server: ServerConfig,
}

impl ApiConfig {
    /// Loads the configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `INFURA_KEY` | required |
    /// | `COINMARKETCAP_API_KEY` | unset |
    /// | `LPFOLIO_CHAINS` | `Arbitrum,Base` |
    /// | `LPFOLIO_MAX_CONCURRENT_CHAINS` | `1` |
    /// | `LPFOLIO_MAX_IN_FLIGHT` | unbounded |
    /// | `LPFOLIO_BALANCE_FAILURE` | `abort` |
    /// | `LPFOLIO_ZERO_BALANCE` | `stop` |
    /// | `HOST` / `PORT` | `0.0.0.0` / `3000` |
    ///
    /// # Errors
    /// Returns an error if `INFURA_KEY` is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through `lookup`.
    ///
    /// # Errors
    /// See [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let infura_key = var(INFURA_KEY_ENV).ok_or(ConfigError::Missing(INFURA_KEY_ENV))?;

        let chains = match var(CHAINS_ENV) {
            Some(value) => parse_chains(&value)?,
            None => DEFAULT_CHAINS.to_vec(),
        };

        let defaults = AggregatorConfig::default();
        let aggregator = AggregatorConfig {
            max_concurrent_chains: var(MAX_CONCURRENT_CHAINS_ENV)
                .map(|v| parse_value::<NonZeroUsize>(MAX_CONCURRENT_CHAINS_ENV, &v))
                .transpose()?
                .unwrap_or(defaults.max_concurrent_chains),
            max_in_flight: var(MAX_IN_FLIGHT_ENV)
                .map(|v| parse_value::<NonZeroUsize>(MAX_IN_FLIGHT_ENV, &v))
                .transpose()?,
            balance_failure: var(BALANCE_FAILURE_ENV)
                .map(|v| parse_value::<BalanceFailurePolicy>(BALANCE_FAILURE_ENV, &v))
                .transpose()?
                .unwrap_or(defaults.balance_failure),
            zero_balance: var(ZERO_BALANCE_ENV)
                .map(|v| parse_value::<ZeroBalancePolicy>(ZERO_BALANCE_ENV, &v))
                .transpose()?
                .unwrap_or(defaults.zero_balance),
        };

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: var(HOST_ENV).unwrap_or(server_defaults.host),
            port: var(PORT_ENV)
                .map(|v| parse_value::<u16>(PORT_ENV, &v))
                .transpose()?
                .unwrap_or(server_defaults.port),
        };

        Ok(Self {
            infura_key,
            coinmarketcap_api_key: var(CMC_API_KEY_ENV),
            chains,
            aggregator,
            server,
        })
    }

    /// Registry of the enabled chains.
    ///
    /// # Errors
    /// Returns an error if a chain is listed twice.
    pub fn registry(&self) -> Result<ChainRegistry, ConfigError> {
        ChainRegistry::from_chains(&self.chains).map_err(|e| ConfigError::Invalid {
            var: CHAINS_ENV,
            value: self
                .chains
                .iter()
                .map(Chain::as_str)
                .collect::<Vec<_>>()
                .join(","),
            reason: e.to_string(),
        })
    }
}

fn parse_chains(value: &str) -> Result<Vec<Chain>, ConfigError> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_value::<Chain>(CHAINS_ENV, s))
        .collect()
}

fn parse_value<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("INFURA_KEY", "abc")]).unwrap();
        assert_eq!(config.infura_key, "abc");
        assert_eq!(config.coinmarketcap_api_key, None);
        assert_eq!(config.chains, vec![Chain::Arbitrum, Chain::Base]);
        assert_eq!(config.aggregator, AggregatorConfig::default());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_missing_infura_key() {
        let err = load(&[("INFURA_KEY", " ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("INFURA_KEY")));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("INFURA_KEY", "abc"),
            ("COINMARKETCAP_API_KEY", "cmc"),
            ("LPFOLIO_CHAINS", "base, ethereum,arbitrum"),
            ("LPFOLIO_MAX_CONCURRENT_CHAINS", "2"),
            ("LPFOLIO_MAX_IN_FLIGHT", "8"),
            ("LPFOLIO_BALANCE_FAILURE", "empty"),
            ("LPFOLIO_ZERO_BALANCE", "continue"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.coinmarketcap_api_key.as_deref(), Some("cmc"));
        assert_eq!(config.chains, vec![Chain::Base, Chain::Ethereum, Chain::Arbitrum]);
        assert_eq!(config.aggregator.max_concurrent_chains.get(), 2);
        assert_eq!(config.aggregator.max_in_flight.map(NonZeroUsize::get), Some(8));
        assert_eq!(
            config.aggregator.balance_failure,
            BalanceFailurePolicy::TreatAsEmpty
        );
        assert_eq!(config.aggregator.zero_balance, ZeroBalancePolicy::Continue);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.registry().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("INFURA_KEY", "abc"), ("LPFOLIO_CHAINS", "arbitrum,solana")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LPFOLIO_CHAINS", .. }));

        let err = load(&[("INFURA_KEY", "abc"), ("LPFOLIO_MAX_IN_FLIGHT", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "LPFOLIO_MAX_IN_FLIGHT", .. }));

        let config = load(&[("INFURA_KEY", "abc"), ("LPFOLIO_CHAINS", "base,base")]).unwrap();
        assert!(config.registry().is_err());
    }
}
