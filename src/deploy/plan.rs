//! Turns a configuration into per-chain deployment targets and transactions

use alloy::primitives::{Address, Bytes, U256};
use serde::Serialize;
use tracing::{info, warn};

use crate::chain::{SingletonRegistry, MULTICALL3};
use crate::config::SafeConfiguration;
use crate::contracts::ISafeProxyFactory;
use crate::create2::{compute_create2_address, ProxyFactory};
use crate::encoding::{encode_multicall_data, encode_setup, DecodedDeployment};
use crate::error::{Error, Result};
use crate::types::{Call, TypedCall};
use crate::validation::{has_errors, validate, Issue};

/// One chain the Safe is deployed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeploymentTarget {
    pub chain_id: u64,
    pub factory: Address,
    /// Address the Safe will have; identical for every target of a plan
    pub expected_address: Address,
}

/// A validated configuration and the chains it is deployed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentPlan {
    pub configuration: SafeConfiguration,
    /// Implementation the proxies delegate to, resolved once for all targets
    pub singleton_address: Address,
    pub targets: Vec<DeploymentTarget>,
    /// Non-blocking validation issues
    pub warnings: Vec<Issue>,
}

impl DeploymentPlan {
    /// The address shared by all targets
    pub fn expected_address(&self) -> Address {
        self.targets
            .first()
            .map(|t| t.expected_address)
            .unwrap_or_default()
    }

    /// Target for a chain, if planned
    pub fn target(&self, chain_id: u64) -> Option<&DeploymentTarget> {
        self.targets.iter().find(|t| t.chain_id == chain_id)
    }

    /// Native currency transfer seeding the new Safe
    pub fn funding_call(&self, amount: U256) -> Call {
        Call::transfer(self.expected_address(), amount)
    }
}

/// Transaction to broadcast on one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Plans deployments and builds their transactions
#[derive(Debug, Clone)]
pub struct DeploymentOrchestrator {
    factory: ProxyFactory,
    registry: SingletonRegistry,
    multicall: Address,
}

impl DeploymentOrchestrator {
    pub fn new(factory: ProxyFactory, registry: SingletonRegistry) -> Self {
        Self {
            factory,
            registry,
            multicall: MULTICALL3,
        }
    }

    /// Overrides the Multicall3 address used for batched deployments
    pub fn with_multicall(mut self, multicall: Address) -> Self {
        self.multicall = multicall;
        self
    }

    pub fn factory(&self) -> &ProxyFactory {
        &self.factory
    }

    pub fn registry(&self) -> &SingletonRegistry {
        &self.registry
    }

    /// Validates the configuration and derives one target per distinct chain.
    ///
    /// Chain IDs never enter the derivation, so every target shares the same
    /// expected address.
    pub fn plan(&self, config: &SafeConfiguration, chains: &[u64]) -> Result<DeploymentPlan> {
        let singleton_address = self.registry.address_of(config.singleton)?;
        self.plan_with_singleton(config, singleton_address, chains)
    }

    /// Plans redeploying a decoded deployment verbatim: same salt nonce and the
    /// exact singleton address the original used, even if the registry would pick
    /// another address for that variant. Partial decodes are refused since they
    /// would deploy to a different address.
    pub fn plan_clone(&self, decoded: &DecodedDeployment, chains: &[u64]) -> Result<DeploymentPlan> {
        if decoded.is_partial() {
            return Err(Error::PartialDecode {
                fields: decoded.unparsed.len(),
            });
        }
        self.plan_with_singleton(&decoded.configuration, decoded.singleton_address, chains)
    }

    fn plan_with_singleton(
        &self,
        config: &SafeConfiguration,
        singleton_address: Address,
        chains: &[u64],
    ) -> Result<DeploymentPlan> {
        if chains.is_empty() {
            return Err(Error::NoChains);
        }

        let issues = validate(config);
        if has_errors(&issues) {
            return Err(Error::Validation { issues });
        }
        for issue in &issues {
            warn!(%issue, "configuration warning");
        }

        let expected_address = compute_create2_address(
            self.factory.address,
            singleton_address,
            &encode_setup(config).to_bytes(),
            config.salt_nonce,
            &self.factory.creation_code,
        );

        let mut targets: Vec<DeploymentTarget> = Vec::with_capacity(chains.len());
        for &chain_id in chains {
            if targets.iter().any(|t| t.chain_id == chain_id) {
                continue;
            }
            targets.push(DeploymentTarget {
                chain_id,
                factory: self.factory.address,
                expected_address,
            });
        }

        info!(
            %expected_address,
            chains = ?targets.iter().map(|t| t.chain_id).collect::<Vec<_>>(),
            singleton = %config.singleton,
            %singleton_address,
            "planned deployment"
        );

        Ok(DeploymentPlan {
            configuration: config.clone(),
            singleton_address,
            targets,
            warnings: issues,
        })
    }

    /// The factory call deploying the plan's configuration
    pub fn deployment_call(&self, plan: &DeploymentPlan) -> Call {
        let call = ISafeProxyFactory::createProxyWithNonceCall {
            _singleton: plan.singleton_address,
            initializer: encode_setup(&plan.configuration).to_bytes(),
            saltNonce: plan.configuration.salt_nonce,
        };
        TypedCall::new(self.factory.address, call).into()
    }

    /// Builds the transaction for a target.
    ///
    /// Without extra calls this is the plain factory call. Otherwise the deployment
    /// and the extra calls are batched atomically through Multicall3, with the
    /// deployment first and never allowed to fail.
    pub fn transaction(&self, plan: &DeploymentPlan, extra_calls: &[Call]) -> Result<DeploymentTransaction> {
        let deployment = self.deployment_call(plan);
        batch_transaction(self.multicall, deployment, extra_calls)
    }
}

/// Packages a deployment call with auxiliary calls
pub fn batch_transaction(
    multicall: Address,
    deployment: Call,
    extra_calls: &[Call],
) -> Result<DeploymentTransaction> {
    if extra_calls.is_empty() {
        return Ok(DeploymentTransaction {
            to: deployment.to,
            value: deployment.value,
            data: deployment.data,
        });
    }

    let mut calls = Vec::with_capacity(extra_calls.len() + 1);
    calls.push(Call {
        allow_failure: false,
        ..deployment
    });
    calls.extend_from_slice(extra_calls);

    let (data, value) = encode_multicall_data(&calls)?;
    Ok(DeploymentTransaction {
        to: multicall,
        value,
        data,
    })
}
