//! Deployment settings loaded from a TOML file
//!
//! ```toml
//! release = "v1.4.1"
//! proxy-creation-code = "0x608060..."
//!
//! [[chain]]
//! chain-id = 10
//! rpc-url = "https://mainnet.optimism.io"
//!
//! [[singleton]]
//! variant = "l2-delegate-protected"
//! address = "0x..."
//! ```
//!
//! Everything is optional; omitted addresses fall back to the canonical
//! deployments of the selected release.

use std::path::Path;

use alloy::primitives::{Address, Bytes};
use serde::Deserialize;
use tokio::fs;
use url::Url;

use crate::chain::{ChainAddresses, ChainConfig, Singleton, SingletonRegistry};
use crate::create2::ProxyFactory;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Release {
    #[default]
    #[serde(rename = "v1.3.0")]
    V1_3_0,
    #[serde(rename = "v1.4.1")]
    V1_4_1,
}

impl Release {
    pub fn addresses(self) -> ChainAddresses {
        match self {
            Release::V1_3_0 => ChainAddresses::v1_3_0(),
            Release::V1_4_1 => ChainAddresses::v1_4_1(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct File {
    #[serde(default)]
    release: Release,
    proxy_factory: Option<Address>,
    proxy_creation_code: Option<Bytes>,
    fallback_handler: Option<Address>,
    multicall: Option<Address>,
    #[serde(default, rename = "chain")]
    chains: Vec<ChainFile>,
    #[serde(default, rename = "singleton")]
    singletons: Vec<SingletonFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ChainFile {
    chain_id: u64,
    rpc_url: Url,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SingletonFile {
    variant: Singleton,
    address: Address,
}

/// Resolved deployment settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub release: Release,
    pub addresses: ChainAddresses,
    /// Proxy bytecode; fetched from the factory when absent
    pub proxy_creation_code: Option<Bytes>,
    pub chains: Vec<ChainConfig>,
    pub registry: SingletonRegistry,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_file(File::default())
    }
}

impl Settings {
    /// Loads settings from a TOML file
    pub async fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .await
            .map_err(|e| Error::Settings(format!("reading {}: {}", path.display(), e)))?;
        Self::from_toml(&data)
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        let file: File = toml::from_str(data).map_err(|e| Error::Settings(e.to_string()))?;
        if let Some(entry) = file.singletons.iter().find(|e| !e.variant.is_known()) {
            return Err(Error::Settings(format!(
                "singleton {} needs a known variant",
                entry.address
            )));
        }
        Ok(Self::from_file(file))
    }

    fn from_file(file: File) -> Self {
        let mut addresses = file.release.addresses();
        if let Some(factory) = file.proxy_factory {
            addresses.proxy_factory = factory;
        }
        if let Some(handler) = file.fallback_handler {
            addresses.fallback_handler = handler;
        }
        if let Some(multicall) = file.multicall {
            addresses.multicall = multicall;
        }

        let mut registry = SingletonRegistry::for_release(&addresses);
        for entry in file.singletons {
            registry.register(entry.variant, entry.address);
        }

        Self {
            release: file.release,
            addresses,
            proxy_creation_code: file.proxy_creation_code,
            chains: file
                .chains
                .into_iter()
                .map(|c| ChainConfig::new(c.chain_id, c.rpc_url))
                .collect(),
            registry,
        }
    }

    /// Endpoint for a chain
    pub fn chain(&self, chain_id: u64) -> Result<&ChainConfig> {
        self.chains
            .iter()
            .find(|c| c.chain_id == chain_id)
            .ok_or(Error::UnconfiguredChain(chain_id))
    }

    /// The factory, if its creation code is configured
    pub fn proxy_factory(&self) -> Option<ProxyFactory> {
        self.proxy_creation_code
            .as_ref()
            .map(|code| ProxyFactory::new(self.addresses.proxy_factory, code.clone()))
    }
}
