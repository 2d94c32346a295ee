//! Call types for batched deployment transactions

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

/// A single call inside a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Target address
    pub to: Address,
    /// Value to send (in wei)
    pub value: U256,
    /// Calldata
    pub data: Bytes,
    /// Whether the batch continues if this call reverts
    pub allow_failure: bool,
}

impl Call {
    /// Creates a new call that must succeed
    pub fn new(to: Address, value: U256, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            value,
            data: data.into(),
            allow_failure: false,
        }
    }

    /// Creates a new call with zero value
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self::new(to, U256::ZERO, data)
    }

    /// Creates a plain native currency transfer
    pub fn transfer(to: Address, value: U256) -> Self {
        Self::new(to, value, Bytes::new())
    }

    /// Lets the batch continue if this call reverts
    pub fn allow_failure(mut self) -> Self {
        self.allow_failure = true;
        self
    }
}

/// A typed call wrapping a sol! macro generated call type
#[derive(Debug, Clone)]
pub struct TypedCall<C: SolCall> {
    /// Target address
    pub to: Address,
    /// Value to send
    pub value: U256,
    /// The typed call data
    pub call: C,
}

impl<C: SolCall> TypedCall<C> {
    /// Creates a new TypedCall
    pub fn new(to: Address, call: C) -> Self {
        Self {
            to,
            value: U256::ZERO,
            call,
        }
    }

    /// Sets the value
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

impl<C: SolCall> From<TypedCall<C>> for Call {
    fn from(typed: TypedCall<C>) -> Self {
        Call::new(typed.to, typed.value, typed.call.abi_encode())
    }
}
