//! Supported networks and the static chain registry.
//!
//! The registry is built once at startup and shared read-only; its order is
//! the order in which chains are scanned and merged into a result.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Uniswap V3 `NonfungiblePositionManager` on Ethereum, Arbitrum, Optimism and Polygon.
pub const UNISWAP_V3_POSITION_MANAGER: &str = "0xC36442b4a4522E871399CD717aBDD847Ab11FE88";

/// Uniswap V3 `NonfungiblePositionManager` on Base.
pub const UNISWAP_V3_POSITION_MANAGER_BASE: &str = "0x03a520b32C04BF3bEEf7BEb72E919cf822Ed34f1";

/// Chains enabled when nothing else is configured.
pub const DEFAULT_CHAINS: [Chain; 2] = [Chain::Arbitrum, Chain::Base];

/// An EVM network with a position manager deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chain {
    Ethereum,
    Arbitrum,
    Optimism,
    Polygon,
    Base,
}

impl Chain {
    /// All known chains.
    pub const ALL: [Chain; 5] = [
        Chain::Ethereum,
        Chain::Arbitrum,
        Chain::Optimism,
        Chain::Polygon,
        Chain::Base,
    ];

    /// Display name, also used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Arbitrum => "Arbitrum",
            Self::Optimism => "Optimism",
            Self::Polygon => "Polygon",
            Self::Base => "Base",
        }
    }

    /// Infura endpoint prefix; the API key is appended to it.
    #[must_use]
    pub fn default_rpc_template(&self) -> &'static str {
        match self {
            Self::Ethereum => "https://mainnet.infura.io/v3/",
            Self::Arbitrum => "https://arbitrum-mainnet.infura.io/v3/",
            Self::Optimism => "https://optimism-mainnet.infura.io/v3/",
            Self::Polygon => "https://polygon-mainnet.infura.io/v3/",
            Self::Base => "https://base-mainnet.infura.io/v3/",
        }
    }

    /// Address of the canonical position manager deployment.
    #[must_use]
    pub fn default_position_manager(&self) -> &'static str {
        match self {
            Self::Base => UNISWAP_V3_POSITION_MANAGER_BASE,
            _ => UNISWAP_V3_POSITION_MANAGER,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ethereum" | "mainnet" => Ok(Self::Ethereum),
            "arbitrum" => Ok(Self::Arbitrum),
            "optimism" => Ok(Self::Optimism),
            "polygon" => Ok(Self::Polygon),
            "base" => Ok(Self::Base),
            _ => Err(DomainError::UnknownChainName(s.to_string())),
        }
    }
}

/// Connection details for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain identifier.
    pub id: Chain,
    /// RPC endpoint prefix, completed by the provider API key.
    pub rpc_endpoint_template: String,
    /// Position manager contract address.
    pub contract_address: String,
}

impl ChainConfig {
    /// Creates a chain configuration.
    pub fn new(
        id: Chain,
        rpc_endpoint_template: impl Into<String>,
        contract_address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            rpc_endpoint_template: rpc_endpoint_template.into(),
            contract_address: contract_address.into(),
        }
    }

    /// Configuration using the built-in endpoint and deployment for `chain`.
    #[must_use]
    pub fn default_for(chain: Chain) -> Self {
        Self::new(
            chain,
            chain.default_rpc_template(),
            chain.default_position_manager(),
        )
    }

    /// Full RPC URL for the given provider API key.
    #[must_use]
    pub fn rpc_url(&self, api_key: &str) -> String {
        format!("{}{}", self.rpc_endpoint_template, api_key)
    }
}

/// Ordered, immutable set of enabled chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: Vec<ChainConfig>,
}

impl ChainRegistry {
    /// Creates a registry from explicit configurations, keeping their order.
    ///
    /// # Errors
    /// Returns [`DomainError::DuplicateChain`] if a chain appears twice.
    pub fn new(chains: Vec<ChainConfig>) -> Result<Self, DomainError> {
        for (i, config) in chains.iter().enumerate() {
            if chains[..i].iter().any(|c| c.id == config.id) {
                return Err(DomainError::DuplicateChain(config.id));
            }
        }
        Ok(Self { chains })
    }

    /// Creates a registry of built-in configurations for `chains`.
    ///
    /// # Errors
    /// Returns [`DomainError::DuplicateChain`] if a chain appears twice.
    pub fn from_chains(chains: &[Chain]) -> Result<Self, DomainError> {
        Self::new(chains.iter().copied().map(ChainConfig::default_for).collect())
    }

    /// Looks up the configuration of a chain.
    ///
    /// # Errors
    /// Returns [`DomainError::UnknownChain`] if the chain is not enabled.
    pub fn resolve(&self, chain: Chain) -> Result<&ChainConfig, DomainError> {
        self.chains
            .iter()
            .find(|c| c.id == chain)
            .ok_or(DomainError::UnknownChain(chain))
    }

    /// Iterates the enabled chains in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.iter()
    }

    /// Enabled chain identifiers in scan order.
    #[must_use]
    pub fn chains(&self) -> Vec<Chain> {
        self.chains.iter().map(|c| c.id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self {
            chains: DEFAULT_CHAINS
                .iter()
                .copied()
                .map(ChainConfig::default_for)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = ChainRegistry::default();
        assert_eq!(registry.chains(), vec![Chain::Arbitrum, Chain::Base]);
    }

    #[test]
    fn test_resolve_configured_chain() {
        let registry = ChainRegistry::default();
        let base = registry.resolve(Chain::Base).unwrap();
        assert_eq!(base.contract_address, UNISWAP_V3_POSITION_MANAGER_BASE);
        assert_eq!(
            base.rpc_url("secret"),
            "https://base-mainnet.infura.io/v3/secret"
        );
    }

    #[test]
    fn test_resolve_unconfigured_chain() {
        let registry = ChainRegistry::default();
        assert_eq!(
            registry.resolve(Chain::Polygon),
            Err(DomainError::UnknownChain(Chain::Polygon))
        );
    }

    #[test]
    fn test_duplicate_chain_rejected() {
        let result = ChainRegistry::from_chains(&[Chain::Base, Chain::Arbitrum, Chain::Base]);
        assert_eq!(result, Err(DomainError::DuplicateChain(Chain::Base)));
    }

    #[test]
    fn test_custom_order_preserved() {
        let registry =
            ChainRegistry::from_chains(&[Chain::Base, Chain::Ethereum, Chain::Arbitrum]).unwrap();
        let ids: Vec<Chain> = registry.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![Chain::Base, Chain::Ethereum, Chain::Arbitrum]);
    }

    #[test]
    fn test_chain_from_str() {
        assert_eq!("arbitrum".parse::<Chain>().unwrap(), Chain::Arbitrum);
        assert_eq!(" Base ".parse::<Chain>().unwrap(), Chain::Base);
        assert_eq!("mainnet".parse::<Chain>().unwrap(), Chain::Ethereum);
        assert!("solana".parse::<Chain>().is_err());
    }
}
