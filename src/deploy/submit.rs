//! Broadcasting deployment transactions and tracking their outcome per chain

use std::future::Future;

use alloy::network::primitives::ReceiptResponse;
use alloy::network::{AnyNetwork, TransactionBuilder};
use alloy::primitives::{Address, TxHash};
use alloy::providers::{PendingTransactionBuilder, Provider};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};

use super::plan::{DeploymentOrchestrator, DeploymentPlan, DeploymentTarget, DeploymentTransaction};
use crate::error::{Error, Result};
use crate::types::Call;

/// Chain-bound transaction sender.
///
/// Implemented over an RPC provider by [`RpcSubmitter`]; tests substitute their own.
pub trait Submitter {
    /// Chain this submitter broadcasts to
    fn chain_id(&self) -> u64;

    /// Whether contract code already exists at `address`
    fn is_deployed(&self, address: Address) -> impl Future<Output = Result<bool>> + Send;

    /// Broadcasts a transaction and returns its hash without waiting for inclusion
    fn send(&self, tx: DeploymentTransaction) -> impl Future<Output = Result<TxHash>> + Send;

    /// Waits for the receipt of a previously sent transaction
    fn confirm(&self, tx_hash: TxHash) -> impl Future<Output = Result<TxStatus>> + Send;
}

/// A broadcast deployment transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TxHandle {
    pub chain_id: u64,
    pub tx_hash: TxHash,
    pub expected_address: Address,
}

/// Lifecycle of a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Reverted,
}

/// What happened on one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ChainOutcome {
    /// Code already exists at the expected address; nothing was sent
    AlreadyDeployed { address: Address },
    /// The deployment transaction was broadcast
    Submitted(TxHandle),
}

/// Outcome of one chain in a multi-chain submission
#[derive(Debug)]
pub struct ChainResult {
    pub chain_id: u64,
    pub outcome: Result<ChainOutcome>,
}

impl DeploymentOrchestrator {
    /// Submits the plan to a single target.
    ///
    /// A target whose expected address already holds code is reported as
    /// [`ChainOutcome::AlreadyDeployed`] without sending anything.
    pub async fn submit<S: Submitter>(
        &self,
        plan: &DeploymentPlan,
        target: &DeploymentTarget,
        submitter: &S,
        extra_calls: &[Call],
    ) -> Result<ChainOutcome> {
        if submitter.chain_id() != target.chain_id {
            return Err(Error::ChainMismatch {
                expected: target.chain_id,
                actual: submitter.chain_id(),
            });
        }

        if submitter.is_deployed(target.expected_address).await? {
            info!(address = %target.expected_address, "safe already deployed, skipping");
            return Ok(ChainOutcome::AlreadyDeployed {
                address: target.expected_address,
            });
        }

        let tx = self.transaction(plan, extra_calls)?;
        let tx_hash = submitter.send(tx).await?;
        info!(%tx_hash, "deployment transaction sent");

        Ok(ChainOutcome::Submitted(TxHandle {
            chain_id: target.chain_id,
            tx_hash,
            expected_address: target.expected_address,
        }))
    }

    /// Submits the plan to every target concurrently.
    ///
    /// Chains fail independently; a failed chain is reported in its result and
    /// never retried or rolled back. Targets without a matching submitter fail
    /// with [`Error::UnconfiguredChain`].
    pub async fn submit_all<S: Submitter + Sync>(
        &self,
        plan: &DeploymentPlan,
        submitters: &[S],
        extra_calls: &[Call],
    ) -> Vec<ChainResult> {
        let submissions = plan.targets.iter().map(|target| {
            let span = info_span!(
                "deploy",
                chain_id = target.chain_id,
                expected = %target.expected_address
            );
            async move {
                let outcome = match submitters.iter().find(|s| s.chain_id() == target.chain_id) {
                    Some(submitter) => self.submit(plan, target, submitter, extra_calls).await,
                    None => Err(Error::UnconfiguredChain(target.chain_id)),
                };
                if let Err(err) = &outcome {
                    warn!(%err, "deployment failed");
                }
                ChainResult {
                    chain_id: target.chain_id,
                    outcome,
                }
            }
            .instrument(span)
        });

        join_all(submissions).await
    }

    /// Waits for a submitted deployment and checks that the Safe exists afterwards
    pub async fn confirm<S: Submitter>(&self, submitter: &S, handle: &TxHandle) -> Result<TxStatus> {
        let status = submitter.confirm(handle.tx_hash).await?;
        if status == TxStatus::Confirmed && !submitter.is_deployed(handle.expected_address).await? {
            return Err(Error::ExecutionFailed {
                reason: format!(
                    "transaction {} confirmed but no code at {}",
                    handle.tx_hash, handle.expected_address
                ),
            });
        }
        info!(chain_id = handle.chain_id, tx_hash = %handle.tx_hash, ?status, "deployment settled");
        Ok(status)
    }
}

/// [`Submitter`] backed by an RPC provider with a wallet attached
pub struct RpcSubmitter<P> {
    provider: P,
    from: Address,
    chain_id: u64,
}

impl<P> RpcSubmitter<P>
where
    P: Provider<AnyNetwork> + Clone + 'static,
{
    /// Creates a submitter without checking the provider's chain
    pub fn new(provider: P, from: Address, chain_id: u64) -> Self {
        Self {
            provider,
            from,
            chain_id,
        }
    }

    /// Creates a submitter, failing if the provider is on a different chain
    pub async fn connect(provider: P, from: Address, expected_chain_id: u64) -> Result<Self> {
        let actual = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;

        if actual != expected_chain_id {
            return Err(Error::ChainMismatch {
                expected: expected_chain_id,
                actual,
            });
        }
        Ok(Self::new(provider, from, actual))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn from(&self) -> Address {
        self.from
    }
}

impl<P> Submitter for RpcSubmitter<P>
where
    P: Provider<AnyNetwork> + Clone + Send + Sync + 'static,
{
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn is_deployed(&self, address: Address) -> Result<bool> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|e| Error::Fetch {
                what: "contract code",
                reason: e.to_string(),
            })?;
        Ok(!code.is_empty())
    }

    async fn send(&self, tx: DeploymentTransaction) -> Result<TxHash> {
        let request = <AnyNetwork as alloy::network::Network>::TransactionRequest::default()
            .with_from(self.from)
            .with_to(tx.to)
            .with_value(tx.value)
            .with_input(tx.data);

        let gas_limit = self
            .provider
            .estimate_gas(request.clone())
            .await
            .map_err(|e| Error::ExecutionFailed {
                reason: format!("gas estimation failed: {}", e),
            })?;

        let pending = self
            .provider
            .send_transaction(request.with_gas_limit(gas_limit + gas_limit / 10))
            .await
            .map_err(|e| Error::ExecutionFailed {
                reason: e.to_string(),
            })?;

        Ok(*pending.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<TxStatus> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await?;

        Ok(if receipt.status() {
            TxStatus::Confirmed
        } else {
            TxStatus::Reverted
        })
    }
}
