//! CREATE2 address computation for Safe proxy deployment
//!
//! This module provides utilities for computing deterministic Safe proxy addresses
//! using CREATE2. The Safe proxy factory deploys proxies at deterministic addresses
//! based on the singleton address, initializer data, and salt nonce. Nothing here
//! touches the network: the chain ID is not an input, which is why the same
//! configuration lands on the same address on every chain.

use alloy::hex;
use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::SingletonRegistry;
use crate::config::SafeConfiguration;
use crate::encoding::{encode_setup, DecodedDeployment};
use crate::error::{Error, Result};
use crate::validation::{has_errors, validate};

/// A proxy factory together with the proxy creation bytecode it deploys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyFactory {
    /// Address of the SafeProxyFactory contract
    pub address: Address,
    /// Bytecode returned by `SafeProxyFactory.proxyCreationCode()`
    pub creation_code: Bytes,
}

impl ProxyFactory {
    pub fn new(address: Address, creation_code: impl Into<Bytes>) -> Self {
        Self {
            address,
            creation_code: creation_code.into(),
        }
    }

    /// Computes the address this factory deploys the configuration to
    pub fn derive(&self, config: &SafeConfiguration, registry: &SingletonRegistry) -> Result<Address> {
        derive_safe_address(self, config, registry)
    }
}

/// `keccak256(keccak256(initializer) ++ saltNonce)`
pub fn compute_salt(initializer: &[u8], salt_nonce: U256) -> B256 {
    salt_from_hash(keccak256(initializer), salt_nonce)
}

fn salt_from_hash(initializer_hash: B256, salt_nonce: U256) -> B256 {
    let mut salt_input = [0u8; 64];
    salt_input[..32].copy_from_slice(initializer_hash.as_slice());
    salt_input[32..64].copy_from_slice(&salt_nonce.to_be_bytes::<32>());
    keccak256(salt_input)
}

/// `keccak256(creation_code ++ singleton_padded)`
pub fn init_code_hash(creation_code: &[u8], singleton: Address) -> B256 {
    let mut init_code = Vec::with_capacity(creation_code.len() + 32);
    init_code.extend_from_slice(creation_code);
    // singleton is the proxy constructor argument, as a 32-byte padded value
    init_code.extend_from_slice(singleton.into_word().as_slice());
    keccak256(&init_code)
}

/// `keccak256(0xff ++ factory ++ salt ++ init_code_hash)[12:]`
pub fn create2_address(factory: Address, salt: B256, init_code_hash: B256) -> Address {
    let mut create2_input = [0u8; 1 + 20 + 32 + 32];
    create2_input[0] = 0xff;
    create2_input[1..21].copy_from_slice(factory.as_slice());
    create2_input[21..53].copy_from_slice(salt.as_slice());
    create2_input[53..].copy_from_slice(init_code_hash.as_slice());

    let hash = keccak256(create2_input);
    Address::from_slice(&hash[12..])
}

/// Computes the CREATE2 address for a Safe proxy
///
/// The Safe proxy factory uses a specific CREATE2 formula:
/// ```text
/// salt = keccak256(keccak256(initializer) ++ saltNonce)
/// init_code = proxyCreationCode ++ singleton_address_padded
/// address = keccak256(0xff ++ factory ++ salt ++ keccak256(init_code))[12:]
/// ```
///
/// # Arguments
/// * `factory` - Address of the SafeProxyFactory contract
/// * `singleton` - Address of the Safe singleton (implementation) contract
/// * `initializer` - ABI-encoded Safe.setup() call data
/// * `salt_nonce` - User-provided nonce for address derivation
/// * `creation_code` - Proxy creation bytecode from SafeProxyFactory.proxyCreationCode()
pub fn compute_create2_address(
    factory: Address,
    singleton: Address,
    initializer: &[u8],
    salt_nonce: U256,
    creation_code: &[u8],
) -> Address {
    create2_address(
        factory,
        compute_salt(initializer, salt_nonce),
        init_code_hash(creation_code, singleton),
    )
}

/// Derives the Safe address for a configuration.
///
/// The configuration must pass validation; deriving from an invalid one is a
/// caller bug and panics in debug builds.
pub fn derive_safe_address(
    factory: &ProxyFactory,
    config: &SafeConfiguration,
    registry: &SingletonRegistry,
) -> Result<Address> {
    debug_assert!(
        !has_errors(&validate(config)),
        "deriving an address from an invalid configuration"
    );
    let singleton = registry.address_of(config.singleton)?;
    let initializer = encode_setup(config).to_bytes();
    let address = compute_create2_address(
        factory.address,
        singleton,
        &initializer,
        config.salt_nonce,
        &factory.creation_code,
    );
    debug!(%address, factory = %factory.address, %singleton, "derived safe address");
    Ok(address)
}

/// Address a decoded deployment produces, using the exact singleton address it carries
pub fn derive_decoded_address(decoded: &DecodedDeployment, factory: &ProxyFactory) -> Address {
    let initializer = encode_setup(&decoded.configuration).to_bytes();
    compute_create2_address(
        factory.address,
        decoded.singleton_address,
        &initializer,
        decoded.configuration.salt_nonce,
        &factory.creation_code,
    )
}

/// Re-derives the address of a decoded deployment and compares it to the address
/// the original transaction created. A mismatch points at a decoding bug.
pub fn verify_reproduces(
    decoded: &DecodedDeployment,
    factory: &ProxyFactory,
    original: Address,
) -> Result<Address> {
    let derived = derive_decoded_address(decoded, factory);
    if derived != original {
        return Err(Error::AddressMismatch {
            expected: original,
            derived,
        });
    }
    Ok(derived)
}

/// Hex prefix/suffix an address should match, case-insensitive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VanityPattern {
    prefix: String,
    suffix: String,
}

impl VanityPattern {
    pub fn new(prefix: &str, suffix: &str) -> Self {
        let normalize = |s: &str| s.trim_start_matches("0x").to_ascii_lowercase();
        Self {
            prefix: normalize(prefix),
            suffix: suffix.to_ascii_lowercase(),
        }
    }

    pub fn matches(&self, address: &Address) -> bool {
        let encoded = hex::encode(address);
        encoded.starts_with(&self.prefix) && encoded.ends_with(&self.suffix)
    }
}

/// Searches salt nonces `start, start + 1, ...` for an address matching `pattern`.
///
/// Returns the salt nonce and the resulting address. The initializer does not
/// depend on the salt nonce, so it is hashed once.
pub fn search_vanity_salt(
    factory: &ProxyFactory,
    config: &SafeConfiguration,
    registry: &SingletonRegistry,
    pattern: &VanityPattern,
    start: U256,
    max_attempts: u64,
) -> Result<(U256, Address)> {
    let initializer_hash = keccak256(encode_setup(config).to_bytes());
    let code_hash = init_code_hash(&factory.creation_code, registry.address_of(config.singleton)?);

    let mut nonce = start;
    for _ in 0..max_attempts {
        let address = create2_address(factory.address, salt_from_hash(initializer_hash, nonce), code_hash);
        if pattern.matches(&address) {
            debug!(%nonce, %address, "found vanity salt nonce");
            return Ok((nonce, address));
        }
        nonce = nonce.wrapping_add(U256::from(1));
    }
    Err(Error::VanityNotFound {
        start,
        attempts: max_attempts,
    })
}
