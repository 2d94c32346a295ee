//! Multi-chain deployment planning and submission

mod onchain;
mod plan;
mod submit;

pub use onchain::{fetch_proxy_factory, fetch_safe_setup, fetch_transaction_input};
pub use plan::{
    batch_transaction, DeploymentOrchestrator, DeploymentPlan, DeploymentTarget,
    DeploymentTransaction,
};
pub use submit::{ChainOutcome, ChainResult, RpcSubmitter, Submitter, TxHandle, TxStatus};
