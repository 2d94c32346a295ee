//! Recovers a Safe configuration from a historical deployment transaction
//!
//! The input is the transaction's calldata: either a direct
//! `createProxyWithNonce` call or a batch (e.g. a multicall) that embeds one. The
//! factory call is located by its selector, then the `setup` initializer inside it.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde::Serialize;
use tracing::{debug, warn};

use super::words::{find_selector, WordReader, SELECTOR};
use crate::chain::SingletonRegistry;
use crate::config::SafeConfiguration;
use crate::contracts::{ISafeProxyFactory, ISafeSetup};
use crate::error::DecodeError;

/// Every parameter of a `Safe.setup` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupParameters {
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub to: Address,
    pub data: Bytes,
    pub fallback_handler: Address,
    pub payment_token: Address,
    pub payment: U256,
    pub payment_receiver: Address,
}

/// Setup values present in the payload that [`SafeConfiguration`] cannot carry.
/// Re-encoding a configuration that dropped them yields a different address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnparsedField {
    /// Non-zero delegate call target executed during setup
    SetupTarget(Address),
    /// Non-empty data for the setup delegate call
    SetupData(Bytes),
}

/// Result of decoding a deployment transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDeployment {
    pub configuration: SafeConfiguration,
    /// Singleton address exactly as found in the calldata
    pub singleton_address: Address,
    /// Fields that could not be represented in `configuration`
    pub unparsed: Vec<UnparsedField>,
}

impl DecodedDeployment {
    /// True if the configuration does not capture the whole payload
    pub fn is_partial(&self) -> bool {
        !self.unparsed.is_empty()
    }
}

/// Decodes deployment calldata against the canonical singleton registry
pub fn decode(calldata: &[u8]) -> Result<DecodedDeployment, DecodeError> {
    decode_with(&SingletonRegistry::canonical(), calldata)
}

/// Decodes deployment calldata, classifying the singleton with `registry`
pub fn decode_with(
    registry: &SingletonRegistry,
    calldata: &[u8],
) -> Result<DecodedDeployment, DecodeError> {
    if calldata.len() < SELECTOR {
        return Err(DecodeError::Malformed("calldata shorter than a selector"));
    }
    WordReader::aligned(&calldata[SELECTOR..])?;

    let selector = ISafeProxyFactory::createProxyWithNonceCall::SELECTOR;
    let mut error = DecodeError::SignatureNotFound(selector);
    let mut from = 0;
    // the selector bytes may also occur by chance inside other arguments
    while let Some(pos) = find_selector(calldata, selector, from) {
        match decode_factory_args(registry, &calldata[pos + SELECTOR..]) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => {
                debug!(position = pos, %err, "skipping factory selector candidate");
                error = err;
            }
        }
        from = pos + 1;
    }
    Err(error)
}

/// Decodes a bare `setup` initializer (selector included)
pub fn decode_initializer(initializer: &[u8]) -> Result<SetupParameters, DecodeError> {
    let selector = ISafeSetup::setupCall::SELECTOR;
    let pos = find_selector(initializer, selector, 0).ok_or(DecodeError::SignatureNotFound(selector))?;
    decode_setup_args(&initializer[pos + SELECTOR..])
}

fn decode_factory_args(
    registry: &SingletonRegistry,
    args: &[u8],
) -> Result<DecodedDeployment, DecodeError> {
    let outer = WordReader::new(args);
    let singleton_address = outer.address(0)?;
    let initializer_index = outer.offset(1)?;
    let salt_nonce = outer.uint(2)?;

    let initializer_len = usize::try_from(outer.small(initializer_index)?)
        .map_err(|_| DecodeError::Malformed("initializer length out of range"))?;
    let initializer = outer.bytes(initializer_index + 1, initializer_len)?;
    let setup = decode_initializer(initializer)?;

    let singleton = registry.lookup(singleton_address);
    if !singleton.is_known() {
        warn!(%singleton_address, "deployment uses an unrecognized singleton");
    }

    let mut unparsed = Vec::new();
    if setup.to != Address::ZERO {
        unparsed.push(UnparsedField::SetupTarget(setup.to));
    }
    if !setup.data.is_empty() {
        unparsed.push(UnparsedField::SetupData(setup.data.clone()));
    }

    debug!(
        owners = setup.owners.len(),
        threshold = setup.threshold,
        %singleton,
        %salt_nonce,
        partial = !unparsed.is_empty(),
        "decoded deployment"
    );

    Ok(DecodedDeployment {
        configuration: SafeConfiguration {
            owners: setup.owners,
            threshold: setup.threshold,
            salt_nonce,
            singleton,
            fallback_handler: setup.fallback_handler,
            payment_token: setup.payment_token,
            payment: setup.payment,
            payment_receiver: setup.payment_receiver,
        },
        singleton_address,
        unparsed,
    })
}

fn decode_setup_args(args: &[u8]) -> Result<SetupParameters, DecodeError> {
    let reader = WordReader::aligned(args)?;

    let owners_index = reader.offset(0)?;
    let threshold = reader.small(1)?;
    let to = reader.address(2)?;
    let data_index = reader.offset(3)?;
    let fallback_handler = reader.address(4)?;
    let payment_token = reader.address(5)?;
    let payment = reader.uint(6)?;
    let payment_receiver = reader.address(7)?;

    let owner_count = reader.small(owners_index)?;
    if owner_count > reader.len() as u64 {
        return Err(DecodeError::Malformed("owner count exceeds calldata"));
    }
    let owners = (0..owner_count as usize)
        .map(|i| reader.address(owners_index + 1 + i))
        .collect::<Result<Vec<_>, _>>()?;

    let data_len = usize::try_from(reader.small(data_index)?)
        .map_err(|_| DecodeError::Malformed("data length out of range"))?;
    let data = Bytes::copy_from_slice(reader.bytes(data_index + 1, data_len)?);

    Ok(SetupParameters {
        owners,
        threshold,
        to,
        data,
        fallback_handler,
        payment_token,
        payment,
        payment_receiver,
    })
}
