//! Safe `setup` initializer and proxy factory call encoding

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;

use super::words::{EncodedArgs, WordBuilder, WORD};
use crate::chain::SingletonRegistry;
use crate::config::SafeConfiguration;
use crate::contracts::{ISafeProxyFactory, ISafeSetup};
use crate::error::Result;

/// Byte offset of the owners array: the eight static `setup` parameters precede it
pub const OWNERS_OFFSET: u64 = 0x100;

/// Size of the fixed header: eight parameters plus the owner count word
pub const SETUP_HEADER: u64 = 0x120;

/// Encodes the `Safe.setup` initializer for a configuration.
///
/// Layout after the selector, one right-aligned word each:
/// ```text
/// 0x000  owners offset (0x100)
/// 0x020  threshold
/// 0x040  to (zero, no setup call)
/// 0x060  data offset (0x120 + 0x20 * owners)
/// 0x080  fallback handler
/// 0x0a0  payment token
/// 0x0c0  payment
/// 0x0e0  payment receiver
/// 0x100  owner count
/// 0x120  owners[0..n]
/// ....   data length (zero)
/// ```
pub fn encode_setup(config: &SafeConfiguration) -> EncodedArgs {
    let owner_count = config.owners.len() as u64;
    WordBuilder::new(ISafeSetup::setupCall::SELECTOR)
        .small(OWNERS_OFFSET)
        .small(config.threshold)
        .address(Address::ZERO)
        .small(SETUP_HEADER + WORD as u64 * owner_count)
        .address(config.fallback_handler)
        .address(config.payment_token)
        .uint(config.payment)
        .address(config.payment_receiver)
        .small(owner_count)
        .addresses(&config.owners)
        .small(0)
        .build()
}

/// Encodes the full `createProxyWithNonce(singleton, initializer, saltNonce)` call:
/// the calldata a deployment transaction carries and [`super::decode`] reads back.
pub fn encode_deployment(config: &SafeConfiguration, registry: &SingletonRegistry) -> Result<Bytes> {
    let call = create_proxy_call(config, registry)?;
    Ok(Bytes::from(call.abi_encode()))
}

/// Typed factory call for a configuration
pub fn create_proxy_call(
    config: &SafeConfiguration,
    registry: &SingletonRegistry,
) -> Result<ISafeProxyFactory::createProxyWithNonceCall> {
    Ok(ISafeProxyFactory::createProxyWithNonceCall {
        _singleton: registry.address_of(config.singleton)?,
        initializer: encode_setup(config).to_bytes(),
        saltNonce: config.salt_nonce,
    })
}
