//! # safe-deployer
//!
//! Deterministic multi-chain deployment of Safe smart accounts.
//!
//! ## Features
//!
//! - Word-exact encoding of the Safe `setup` initializer and the factory call
//! - Decoding of past deployment transactions (also nested in multicalls) for cloning
//! - Offline CREATE2 address prediction, identical on every chain
//! - Optional funding of the new Safe in the same atomic Multicall3 transaction
//! - Concurrent per-chain submission with independent outcomes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_deployer::{DeploymentOrchestrator, SafeConfiguration, Settings};
//! use alloy::primitives::{address, U256};
//!
//! let config = SafeConfiguration::new(vec![alice, bob], 2).with_salt_label("treasury");
//!
//! let settings = Settings::load(path).await?;
//! let factory = fetch_proxy_factory(&provider, settings.addresses.proxy_factory).await?;
//! let orchestrator = DeploymentOrchestrator::new(factory, settings.registry.clone());
//!
//! // Same address on every chain
//! let plan = orchestrator.plan(&config, &[1, 10, 8453])?;
//! println!("Safe will be deployed at {}", plan.expected_address());
//!
//! let funding = plan.funding_call(U256::from(10u64.pow(16)));
//! for result in orchestrator.submit_all(&plan, &submitters, &[funding]).await {
//!     println!("{}: {:?}", result.chain_id, result.outcome);
//! }
//! ```
//!
//! ## Cloning
//!
//! ```rust,ignore
//! let input = fetch_transaction_input(&provider, tx_hash).await?;
//! let decoded = decode_with(orchestrator.registry(), &input)?;
//! verify_reproduces(&decoded, orchestrator.factory(), original_safe)?;
//! let plan = orchestrator.plan_clone(&decoded, &[42161])?;
//! ```

pub mod chain;
pub mod config;
pub mod contracts;
pub mod create2;
pub mod deploy;
pub mod encoding;
pub mod error;
pub mod flow;
pub mod settings;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use chain::{ChainAddresses, ChainConfig, Singleton, SingletonRegistry, MULTICALL3};
pub use config::{ConfigurationDraft, OwnerInput, SafeConfiguration};
pub use contracts::{IMulticall3, ISafe, ISafeProxyFactory, ISafeSetup};
pub use create2::{
    compute_create2_address, derive_decoded_address, derive_safe_address, search_vanity_salt,
    verify_reproduces, ProxyFactory, VanityPattern,
};
pub use deploy::{
    batch_transaction, fetch_proxy_factory, fetch_safe_setup, fetch_transaction_input,
    ChainOutcome, ChainResult, DeploymentOrchestrator, DeploymentPlan, DeploymentTarget,
    DeploymentTransaction, RpcSubmitter, Submitter, TxHandle, TxStatus,
};
pub use encoding::{
    decode, decode_with, encode_deployment, encode_setup, DecodedDeployment, EncodedArgs,
};
pub use error::{DecodeError, Error, Result};
pub use flow::{ChainProgress, CreationFlow, FlowKind, FlowState};
pub use settings::{Release, Settings};
pub use types::{Call, TypedCall};
pub use validation::{validate, Issue, IssueKind, Severity};

// Re-export alloy types that are commonly used
pub use alloy::network::AnyNetwork;
pub use alloy::primitives::{Address, Bytes, U256};
pub use alloy::providers::Provider;
