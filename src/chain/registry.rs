//! Singleton registry: maps Safe implementation contracts to named variants
//!
//! A Safe proxy delegates to a singleton. The L1, L2 and delegate-protected variants are
//! not interchangeable, so both encoding (variant -> address) and decoding
//! (address -> variant) go through this table.

use std::fmt;
use std::str::FromStr;

use alloy::hex;
use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

use super::ChainAddresses;
use crate::contracts::ISafeProxyFactory;
use crate::encoding::{find_selector, WordReader};
use crate::error::{Error, Result};

/// Safe implementation variant a proxy delegates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Singleton {
    /// Safe without event emission for every transaction
    L1,
    /// Safe emitting events for indexers on L2 chains
    L2,
    /// L2 Safe with delegate-call protection
    L2DelegateProtected,
    /// Implementation not present in the registry; compatibility cannot be verified
    Unknown(Address),
}

impl Singleton {
    /// Returns true if the singleton is a recognized variant
    pub fn is_known(&self) -> bool {
        !matches!(self, Singleton::Unknown(_))
    }
}

impl Default for Singleton {
    fn default() -> Self {
        Singleton::L2
    }
}

impl fmt::Display for Singleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Singleton::L1 => f.write_str("L1"),
            Singleton::L2 => f.write_str("L2"),
            Singleton::L2DelegateProtected => f.write_str("L2DelegateProtected"),
            Singleton::Unknown(address) => write!(f, "Unknown({address})"),
        }
    }
}

impl FromStr for Singleton {
    type Err = String;

    /// Accepts `l1`, `l2`, `l2-delegate-protected` (any case) or a raw address
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l1" => Ok(Singleton::L1),
            "l2" => Ok(Singleton::L2),
            "l2-delegate-protected" | "l2delegateprotected" => Ok(Singleton::L2DelegateProtected),
            other => other
                .parse::<Address>()
                .map(Singleton::Unknown)
                .map_err(|_| format!("unknown singleton '{s}'")),
        }
    }
}

/// Legacy substring matching order. A payload can contain more than one
/// fingerprint only by coincidence, so the first variant in this list wins.
pub const LEGACY_PRIORITY: [Singleton; 3] = [
    Singleton::L2DelegateProtected,
    Singleton::L1,
    Singleton::L2,
];

/// A singleton address known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub singleton: Singleton,
    pub address: Address,
}

/// Fixed table of known singleton deployments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingletonRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::canonical()
    }
}

impl SingletonRegistry {
    /// Canonical Safe v1.3.0 and v1.4.1 singletons.
    /// The first entry for a variant is the one used when encoding.
    pub fn canonical() -> Self {
        let v1_3_0 = ChainAddresses::v1_3_0();
        let v1_4_1 = ChainAddresses::v1_4_1();
        Self {
            entries: vec![
                RegistryEntry {
                    singleton: Singleton::L2,
                    address: v1_3_0.safe_singleton_l2,
                },
                RegistryEntry {
                    singleton: Singleton::L1,
                    address: v1_3_0.safe_singleton,
                },
                RegistryEntry {
                    singleton: Singleton::L2,
                    address: v1_4_1.safe_singleton_l2,
                },
                RegistryEntry {
                    singleton: Singleton::L1,
                    address: v1_4_1.safe_singleton,
                },
            ],
        }
    }

    /// Canonical registry encoding with the singletons of `addresses`
    pub fn for_release(addresses: &ChainAddresses) -> Self {
        Self::canonical()
            .with_entry(Singleton::L1, addresses.safe_singleton)
            .with_entry(Singleton::L2, addresses.safe_singleton_l2)
    }

    /// Creates an empty registry
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Registers an address as the primary address of a variant.
    /// Previously registered addresses stay recognizable when decoding.
    pub fn with_entry(mut self, singleton: Singleton, address: Address) -> Self {
        self.register(singleton, address);
        self
    }

    /// In-place version of [`SingletonRegistry::with_entry`]
    pub fn register(&mut self, singleton: Singleton, address: Address) {
        debug_assert!(singleton.is_known(), "cannot register an unknown singleton");
        self.entries.retain(|e| e.address != address);
        self.entries.insert(0, RegistryEntry { singleton, address });
    }

    /// Returns all entries in lookup order
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Returns the address used to deploy the given variant
    pub fn address_of(&self, singleton: Singleton) -> Result<Address> {
        if let Singleton::Unknown(address) = singleton {
            return Ok(address);
        }
        self.entries
            .iter()
            .find(|e| e.singleton == singleton)
            .map(|e| e.address)
            .ok_or(Error::UnregisteredSingleton(singleton))
    }

    /// Maps an implementation address to its variant
    pub fn lookup(&self, address: Address) -> Singleton {
        self.entries
            .iter()
            .find(|e| e.address == address)
            .map(|e| e.singleton)
            .unwrap_or(Singleton::Unknown(address))
    }

    /// Classifies raw deployment calldata.
    ///
    /// The singleton word of the `createProxyWithNonce` call is compared against the
    /// registry first. Only if that fails (no factory call, or an unregistered address)
    /// the legacy hex substring search runs. Returns `None` when the payload has
    /// neither a factory call nor a known fingerprint.
    pub fn identify(&self, raw_calldata: &[u8]) -> Option<Singleton> {
        let selector = ISafeProxyFactory::createProxyWithNonceCall::SELECTOR;
        let embedded = find_selector(raw_calldata, selector, 0)
            .and_then(|pos| WordReader::new(&raw_calldata[pos + 4..]).address(0).ok());

        if let Some(address) = embedded {
            let singleton = self.lookup(address);
            if singleton.is_known() {
                return Some(singleton);
            }
        }

        self.identify_legacy(&hex::encode(raw_calldata))
            .or(embedded.map(Singleton::Unknown))
    }

    /// Legacy fingerprint search over a hex payload (case-insensitive), in
    /// [`LEGACY_PRIORITY`] order.
    pub fn identify_legacy(&self, hex_payload: &str) -> Option<Singleton> {
        let payload = hex_payload.to_ascii_lowercase();
        LEGACY_PRIORITY.into_iter().find(|variant| {
            self.entries
                .iter()
                .filter(|e| e.singleton == *variant)
                .any(|e| payload.contains(&hex::encode(e.address)))
        })
    }
}
