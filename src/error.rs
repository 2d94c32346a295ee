//! Error types for safe-deployer

use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::chain::Singleton;
use crate::validation::Issue;

/// Result type alias for safe-deployer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or submitting Safe deployments
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to connect to the RPC provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// Failed to fetch data from the blockchain
    #[error("Failed to fetch {what}: {reason}")]
    Fetch { what: &'static str, reason: String },

    /// The provider is connected to a different chain than the target
    #[error("Chain ID mismatch: expected {expected}, provider reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// No chain was selected for deployment
    #[error("No target chains selected")]
    NoChains,

    /// Chain not present in the deployment settings
    #[error("Chain {0} is not configured")]
    UnconfiguredChain(u64),

    /// Configuration has blocking validation issues
    #[error("Configuration has {} blocking issue(s)", .issues.iter().filter(|i| i.is_error()).count())]
    Validation { issues: Vec<Issue> },

    /// Transaction input could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Decoded deployment carries setup fields a configuration cannot reproduce
    #[error("Decoded deployment is partial, {fields} setup field(s) cannot be reproduced")]
    PartialDecode { fields: usize },

    /// The singleton variant has no address in the registry
    #[error("No address registered for singleton {0}")]
    UnregisteredSingleton(Singleton),

    /// Re-derived address does not match the known deployment
    #[error("Derived address {derived} does not match original {expected}")]
    AddressMismatch { expected: Address, derived: Address },

    /// The sum of batched call values overflows
    #[error("Total call value overflows uint256")]
    ValueOverflow,

    /// Vanity search exhausted its attempts
    #[error("No salt nonce found after {attempts} attempts starting at {start}")]
    VanityNotFound { start: U256, attempts: u64 },

    /// Transaction execution failed
    #[error("Execution failed: {reason}")]
    ExecutionFailed { reason: String },

    /// Deployment settings could not be loaded
    #[error("Settings error: {0}")]
    Settings(String),

    /// Creation flow received an action that is not valid in its current state
    #[error("Cannot {action} while in state {state}")]
    InvalidTransition { state: String, action: &'static str },
}

/// Reasons a transaction input is not a compatible Safe deployment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input is truncated, misaligned, or a word holds an out-of-range value
    #[error("Malformed deployment calldata: {0}")]
    Malformed(&'static str),

    /// The expected function selector does not occur in the input
    #[error("Function selector 0x{} not found in calldata", alloy::hex::encode(.0))]
    SignatureNotFound([u8; 4]),
}

impl From<alloy::transports::RpcError<alloy::transports::TransportErrorKind>> for Error {
    fn from(err: alloy::transports::RpcError<alloy::transports::TransportErrorKind>) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<alloy::contract::Error> for Error {
    fn from(err: alloy::contract::Error) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for Error {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        Error::ExecutionFailed {
            reason: err.to_string(),
        }
    }
}
