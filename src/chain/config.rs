//! Canonical Safe contract addresses and per-chain endpoints

use alloy::primitives::{address, Address};
use url::Url;

/// Multicall3, deployed at the same address on every EVM chain
pub const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

/// Canonical Safe deployment addresses.
/// These are identical across all supported chains (CREATE2 deployment), which is what
/// makes a predicted Safe address portable between chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainAddresses {
    /// Safe singleton (L1 variant)
    pub safe_singleton: Address,
    /// Safe singleton emitting events for L2 indexers
    pub safe_singleton_l2: Address,
    /// Safe proxy factory address
    pub proxy_factory: Address,
    /// Compatibility fallback handler
    pub fallback_handler: Address,
    /// Multicall contract used to batch auxiliary calls with the deployment
    pub multicall: Address,
}

impl Default for ChainAddresses {
    fn default() -> Self {
        Self::v1_3_0()
    }
}

impl ChainAddresses {
    /// Returns the canonical Safe v1.3.0 addresses
    pub fn v1_3_0() -> Self {
        Self {
            safe_singleton: address!("d9Db270c1B5E3Bd161E8c8503c55cEABeE709552"),
            safe_singleton_l2: address!("3E5c63644E683549055b9Be8653de26E0B4CD36E"),
            proxy_factory: address!("a6B71E26C5e0845f74c812102Ca7114b6a896AB2"),
            fallback_handler: address!("f48f2B2d2a534e402487b3ee7C18c33Aec0Fe5e4"),
            multicall: MULTICALL3,
        }
    }

    /// Returns the canonical Safe v1.4.1 addresses
    pub fn v1_4_1() -> Self {
        Self {
            safe_singleton: address!("41675C099F32341bf84BFc5382aF534df5C7461a"),
            safe_singleton_l2: address!("29fcB43b46531BcA003ddC8FCB67FFE91900C762"),
            proxy_factory: address!("4e1DCf7AD4e460CfD30791CCC4F9c8a4f820ec67"),
            fallback_handler: address!("fd0732Dc9E303f09fCEf3a7388Ad10A83459Ec99"),
            multicall: MULTICALL3,
        }
    }
}

/// A chain the deployment can be submitted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// JSON-RPC endpoint for this chain
    pub rpc_url: Url,
}

impl ChainConfig {
    /// Creates a new chain configuration
    pub fn new(chain_id: u64, rpc_url: Url) -> Self {
        Self { chain_id, rpc_url }
    }

    /// Human readable chain name, if the chain is well known
    pub fn name(&self) -> Option<&'static str> {
        chain_ids::name(self.chain_id)
    }
}

/// Well-known chain IDs
pub mod chain_ids {
    pub const MAINNET: u64 = 1;
    pub const SEPOLIA: u64 = 11155111;
    pub const ARBITRUM: u64 = 42161;
    pub const OPTIMISM: u64 = 10;
    pub const BASE: u64 = 8453;
    pub const POLYGON: u64 = 137;
    pub const BSC: u64 = 56;
    pub const AVALANCHE: u64 = 43114;
    pub const GNOSIS: u64 = 100;

    /// Returns the display name of a well-known chain
    pub fn name(chain_id: u64) -> Option<&'static str> {
        Some(match chain_id {
            MAINNET => "mainnet",
            SEPOLIA => "sepolia",
            ARBITRUM => "arbitrum",
            OPTIMISM => "optimism",
            BASE => "base",
            POLYGON => "polygon",
            BSC => "bsc",
            AVALANCHE => "avalanche",
            GNOSIS => "gnosis",
            _ => return None,
        })
    }
}
