use super::position_manager::AlloyPositionManager;
use crate::error::ProtocolError;
use crate::{PositionManager, PositionManagerConnector};
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use lpfolio_domain::{Chain, ChainConfig, ChainRegistry};
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds one HTTP provider per registered chain, once.
pub struct AlloyConnector {
    managers: HashMap<Chain, Arc<AlloyPositionManager>>,
}

impl AlloyConnector {
    /// Creates bindings for every chain in `registry`.
    ///
    /// # Errors
    /// Returns an error if an endpoint URL or contract address is malformed.
    pub fn new(registry: &ChainRegistry, rpc_api_key: &str) -> Result<Self, ProtocolError> {
        let mut managers = HashMap::with_capacity(registry.len());

        for chain in registry.iter() {
            let url = Url::parse(&chain.rpc_url(rpc_api_key)).map_err(|e| {
                ProtocolError::InvalidEndpoint {
                    chain: chain.id,
                    reason: e.to_string(),
                }
            })?;
            let address: Address = chain
                .contract_address
                .parse()
                .map_err(|_| ProtocolError::InvalidAddress(chain.contract_address.clone()))?;

            let provider = ProviderBuilder::new().on_http(url).erased();
            managers.insert(chain.id, Arc::new(AlloyPositionManager::new(address, provider)));

            debug!(chain = %chain.id, contract = %address, "Position manager bound");
        }

        info!(chains = managers.len(), "RPC connector initialized");
        Ok(Self { managers })
    }
}

impl PositionManagerConnector for AlloyConnector {
    fn connect(&self, chain: &ChainConfig) -> Result<Arc<dyn PositionManager>, ProtocolError> {
        self.managers
            .get(&chain.id)
            .cloned()
            .map(|m| m as Arc<dyn PositionManager>)
            .ok_or(ProtocolError::UnknownChain(chain.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connects_every_registered_chain() {
        let registry = ChainRegistry::default();
        let connector = AlloyConnector::new(&registry, "test-key").unwrap();

        for chain in registry.iter() {
            assert!(connector.connect(chain).is_ok());
        }
    }

    #[test]
    fn test_unregistered_chain_is_rejected() {
        let registry = ChainRegistry::default();
        let connector = AlloyConnector::new(&registry, "test-key").unwrap();

        let polygon = ChainConfig::default_for(Chain::Polygon);
        assert!(matches!(
            connector.connect(&polygon),
            Err(ProtocolError::UnknownChain(Chain::Polygon))
        ));
    }

    #[test]
    fn test_malformed_contract_address() {
        let registry =
            ChainRegistry::new(vec![ChainConfig::new(Chain::Base, "https://rpc.invalid/", "0x12")])
                .unwrap();
        assert!(matches!(
            AlloyConnector::new(&registry, "k"),
            Err(ProtocolError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_malformed_endpoint() {
        let registry = ChainRegistry::new(vec![ChainConfig::new(
            Chain::Base,
            "not a url/",
            Chain::Base.default_position_manager(),
        )])
        .unwrap();
        assert!(matches!(
            AlloyConnector::new(&registry, "k"),
            Err(ProtocolError::InvalidEndpoint { chain: Chain::Base, .. })
        ));
    }
}
