//! Chain addresses, endpoints and the singleton registry

mod config;
mod registry;

pub use config::{chain_ids, ChainAddresses, ChainConfig, MULTICALL3};
pub use registry::{RegistryEntry, Singleton, SingletonRegistry, LEGACY_PRIORITY};
