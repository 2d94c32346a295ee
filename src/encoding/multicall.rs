//! Multicall3 `aggregate3Value` encoding
//!
//! Each call becomes a `(target, allowFailure, value, callData)` tuple. The outer
//! transaction must carry exactly the sum of the inner values, otherwise Multicall3
//! reverts the whole batch.

use alloy::primitives::{Bytes, U256};
use alloy::sol_types::SolCall;

use crate::contracts::IMulticall3;
use crate::error::{Error, Result};
use crate::types::Call;

/// Sum of all call values; fails on overflow
pub fn total_value(calls: &[Call]) -> Result<U256> {
    calls
        .iter()
        .try_fold(U256::ZERO, |sum, call| sum.checked_add(call.value))
        .ok_or(Error::ValueOverflow)
}

/// Converts a call into its Multicall3 tuple
pub fn encode_call(call: &Call) -> IMulticall3::Call3Value {
    IMulticall3::Call3Value {
        target: call.to,
        allowFailure: call.allow_failure,
        value: call.value,
        callData: call.data.clone(),
    }
}

/// Encodes calls for `aggregate3Value`, returning the calldata and the value the
/// outer transaction has to send
pub fn encode_multicall_data(calls: &[Call]) -> Result<(Bytes, U256)> {
    let value = total_value(calls)?;
    let aggregate = IMulticall3::aggregate3ValueCall {
        calls: calls.iter().map(encode_call).collect(),
    };
    Ok((Bytes::from(aggregate.abi_encode()), value))
}
