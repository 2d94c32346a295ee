//! Common test utilities for E2E tests

use std::collections::HashSet;
use std::sync::Mutex;

use alloy::network::{AnyNetwork, EthereumWallet};
use alloy::node_bindings::{Anvil, AnvilInstance};
use alloy::primitives::{address, keccak256, Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use safe_deployer::{
    fetch_proxy_factory, Call, ChainAddresses, ChainOutcome, DeploymentOrchestrator,
    DeploymentTransaction, Error, ProxyFactory, Result, RpcSubmitter, SafeConfiguration,
    SingletonRegistry, Submitter, TxHandle, TxStatus,
};

/// Macro to skip tests when ETH_RPC_URL is not set
#[macro_export]
macro_rules! skip_if_no_rpc {
    () => {
        if std::env::var("ETH_RPC_URL").is_err() {
            eprintln!("Skipping test: ETH_RPC_URL not set");
            return;
        }
    };
}

pub const OWNER_A: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1");
pub const OWNER_B: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2");

/// Orchestrator over the canonical v1.3.0 factory with placeholder proxy bytecode
pub fn offline_orchestrator() -> DeploymentOrchestrator {
    DeploymentOrchestrator::new(
        ProxyFactory::new(
            ChainAddresses::v1_3_0().proxy_factory,
            vec![0x60, 0x80, 0x60, 0x40, 0x52],
        ),
        SingletonRegistry::canonical(),
    )
}

/// In-memory submitter recording what it was asked to send
pub struct FakeSubmitter {
    chain_id: u64,
    deployed: Mutex<HashSet<Address>>,
    sent: Mutex<Vec<DeploymentTransaction>>,
    /// Address that receives code once a sent transaction confirms
    creates: Option<Address>,
    send_error: Option<String>,
    status: TxStatus,
    /// Never answers, like an endpoint that accepts the connection and hangs
    stalled: bool,
}

impl FakeSubmitter {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            deployed: Mutex::new(HashSet::new()),
            sent: Mutex::new(Vec::new()),
            creates: None,
            send_error: None,
            status: TxStatus::Confirmed,
            stalled: false,
        }
    }

    pub fn creating(mut self, address: Address) -> Self {
        self.creates = Some(address);
        self
    }

    pub fn with_code_at(self, address: Address) -> Self {
        self.deployed.lock().unwrap().insert(address);
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.send_error = Some(reason.to_string());
        self
    }

    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }

    pub fn reverting(mut self) -> Self {
        self.status = TxStatus::Reverted;
        self
    }

    pub fn sent(&self) -> Vec<DeploymentTransaction> {
        self.sent.lock().unwrap().clone()
    }
}

impl Submitter for FakeSubmitter {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn is_deployed(&self, address: Address) -> Result<bool> {
        if self.stalled {
            futures::future::pending::<()>().await;
        }
        Ok(self.deployed.lock().unwrap().contains(&address))
    }

    async fn send(&self, tx: DeploymentTransaction) -> Result<TxHash> {
        if let Some(reason) = &self.send_error {
            return Err(Error::ExecutionFailed {
                reason: reason.clone(),
            });
        }
        let hash = keccak256(&tx.data);
        self.sent.lock().unwrap().push(tx);
        Ok(hash)
    }

    async fn confirm(&self, _tx_hash: TxHash) -> Result<TxStatus> {
        if self.status == TxStatus::Confirmed {
            if let Some(address) = self.creates {
                self.deployed.lock().unwrap().insert(address);
            }
        }
        Ok(self.status)
    }
}

/// Type alias for the wallet provider used in tests
pub type TestProvider = alloy::providers::fillers::FillProvider<
    alloy::providers::fillers::JoinFill<
        alloy::providers::fillers::JoinFill<
            alloy::providers::Identity,
            alloy::providers::fillers::JoinFill<
                alloy::providers::fillers::GasFiller,
                alloy::providers::fillers::JoinFill<
                    alloy::providers::fillers::BlobGasFiller,
                    alloy::providers::fillers::JoinFill<
                        alloy::providers::fillers::NonceFiller,
                        alloy::providers::fillers::ChainIdFiller,
                    >,
                >,
            >,
        >,
        alloy::providers::fillers::WalletFiller<EthereumWallet>,
    >,
    alloy::providers::RootProvider<AnyNetwork>,
    AnyNetwork,
>;

/// Test harness that spawns Anvil with forking and provides a provider + signer
pub struct TestHarness {
    pub provider: TestProvider,
    pub signer: PrivateKeySigner,
    pub addresses: ChainAddresses,
    pub chain_id: u64,
    pub _anvil: AnvilInstance,
}

impl TestHarness {
    /// Creates a new test harness with Anvil forking from ETH_RPC_URL
    ///
    /// Supports optional environment variables for rate limiting:
    /// - `ANVIL_COMPUTE_UNITS_PER_SECOND`: Compute units per second
    /// - `ANVIL_RETRIES`: Number of retries for RPC requests
    /// - `ANVIL_TIMEOUT`: Timeout in milliseconds for RPC requests
    pub async fn new() -> Self {
        let rpc_url = std::env::var("ETH_RPC_URL").expect("ETH_RPC_URL must be set");

        let mut args = vec!["--hardfork".to_string(), "cancun".to_string()];

        if let Ok(cus) = std::env::var("ANVIL_COMPUTE_UNITS_PER_SECOND") {
            args.push("--compute-units-per-second".to_string());
            args.push(cus);
        }

        if let Ok(retries) = std::env::var("ANVIL_RETRIES") {
            args.push("--retries".to_string());
            args.push(retries);
        }

        if let Ok(timeout) = std::env::var("ANVIL_TIMEOUT") {
            args.push("--timeout".to_string());
            args.push(timeout);
        }

        let args_ref: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let anvil = Anvil::new().fork(rpc_url).args(args_ref).spawn();

        let signer: PrivateKeySigner = anvil.keys()[0].clone().into();

        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .network::<AnyNetwork>()
            .wallet(wallet)
            .connect_http(anvil.endpoint_url());

        let chain_id = provider
            .get_chain_id()
            .await
            .expect("Failed to get chain id");

        Self {
            provider,
            signer,
            addresses: ChainAddresses::v1_3_0(),
            chain_id,
            _anvil: anvil,
        }
    }

    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    /// Orchestrator over the forked canonical factory
    pub async fn orchestrator(&self) -> DeploymentOrchestrator {
        let factory = fetch_proxy_factory(&self.provider, self.addresses.proxy_factory)
            .await
            .expect("Failed to fetch proxy creation code");
        DeploymentOrchestrator::new(factory, SingletonRegistry::for_release(&self.addresses))
    }

    pub async fn submitter(&self) -> RpcSubmitter<TestProvider> {
        RpcSubmitter::connect(self.provider.clone(), self.signer_address(), self.chain_id)
            .await
            .expect("Failed to connect submitter")
    }

    /// Deploys a Safe on the fork and waits until it is confirmed
    pub async fn deploy_safe(
        &self,
        orchestrator: &DeploymentOrchestrator,
        config: &SafeConfiguration,
        extra_calls: &[Call],
    ) -> std::result::Result<TxHandle, Box<dyn std::error::Error>> {
        let plan = orchestrator.plan(config, &[self.chain_id])?;
        let submitter = self.submitter().await;

        let handle = match orchestrator
            .submit(&plan, &plan.targets[0], &submitter, extra_calls)
            .await?
        {
            ChainOutcome::Submitted(handle) => handle,
            ChainOutcome::AlreadyDeployed { address } => {
                return Err(format!("Safe already deployed at {}", address).into())
            }
        };

        match orchestrator.confirm(&submitter, &handle).await? {
            TxStatus::Confirmed => Ok(handle),
            status => Err(format!("Deployment settled as {:?}", status).into()),
        }
    }

    /// Gets the ETH balance of an address
    pub async fn get_balance(
        &self,
        address: Address,
    ) -> std::result::Result<U256, Box<dyn std::error::Error>> {
        let balance = self.provider.get_balance(address).await?;
        Ok(balance)
    }
}
