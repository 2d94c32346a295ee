//! Reads the chain state a deployment depends on

use alloy::consensus::Transaction as _;
use alloy::network::AnyNetwork;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::Provider;

use crate::contracts::{ISafe, ISafeProxyFactory};
use crate::create2::ProxyFactory;
use crate::error::{Error, Result};

/// Loads the proxy creation code from a deployed factory
pub async fn fetch_proxy_factory<P>(provider: &P, address: Address) -> Result<ProxyFactory>
where
    P: Provider<AnyNetwork>,
{
    let factory = ISafeProxyFactory::new(address, provider);
    let creation_code = factory
        .proxyCreationCode()
        .call()
        .await
        .map_err(|e| Error::Fetch {
            what: "proxy creation code",
            reason: e.to_string(),
        })?;
    Ok(ProxyFactory::new(address, creation_code))
}

/// Input data of a mined transaction, typically a past deployment to clone
pub async fn fetch_transaction_input<P>(provider: &P, tx_hash: TxHash) -> Result<Bytes>
where
    P: Provider<AnyNetwork>,
{
    let tx = provider
        .get_transaction_by_hash(tx_hash)
        .await
        .map_err(|e| Error::Fetch {
            what: "transaction",
            reason: e.to_string(),
        })?
        .ok_or_else(|| Error::Fetch {
            what: "transaction",
            reason: format!("{} not found", tx_hash),
        })?;
    Ok(tx.input().clone())
}

/// Owners and threshold of a deployed Safe
pub async fn fetch_safe_setup<P>(provider: &P, safe: Address) -> Result<(Vec<Address>, u64)>
where
    P: Provider<AnyNetwork>,
{
    let safe = ISafe::new(safe, provider);
    let owners = safe.getOwners().call().await.map_err(|e| Error::Fetch {
        what: "owners",
        reason: e.to_string(),
    })?;
    let threshold = safe.getThreshold().call().await.map_err(|e| Error::Fetch {
        what: "threshold",
        reason: e.to_string(),
    })?;
    Ok((owners, threshold.saturating_to::<u64>()))
}
