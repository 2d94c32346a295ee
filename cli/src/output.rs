use std::collections::BTreeMap;

use alloy::primitives::{Address, U256};
use safe_deployer::flow::ChainProgress;
use safe_deployer::encoding::UnparsedField;
use safe_deployer::{DecodedDeployment, Issue, SafeConfiguration, Singleton};
use serde::Serialize;

#[derive(Serialize)]
pub struct PredictOutput {
    pub safe_address: Address,
    pub factory: Address,
    pub singleton: Singleton,
    pub singleton_address: Address,
    pub salt_nonce: U256,
    pub owners: Vec<Address>,
    pub threshold: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Issue>,
}

impl PredictOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Safe Address: {}", self.safe_address);
            println!("  Factory: {}", self.factory);
            println!("  Singleton: {} ({})", self.singleton, self.singleton_address);
            println!("  Salt Nonce: {}", self.salt_nonce);
            println!("  Threshold: {}", self.threshold);
            println!("  Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("    {}: {}", i + 1, owner);
            }
            print_issues(&self.warnings);
        }
    }
}

#[derive(Serialize)]
pub struct DeployOutput {
    pub safe_address: Address,
    pub chains: BTreeMap<u64, ChainProgress>,
}

impl DeployOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Safe Address: {}", self.safe_address);
            for (chain_id, progress) in &self.chains {
                match progress {
                    ChainProgress::AlreadyDeployed => {
                        println!("  Chain {}: already deployed", chain_id)
                    }
                    ChainProgress::Sent { handle, status } => {
                        println!("  Chain {}: {:?} ({})", chain_id, status, handle.tx_hash)
                    }
                    ChainProgress::Failed { reason } => {
                        println!("  Chain {}: failed: {}", chain_id, reason)
                    }
                }
            }
        }
    }

    pub fn all_succeeded(&self) -> bool {
        !self
            .chains
            .values()
            .any(|p| matches!(p, ChainProgress::Failed { .. }))
    }
}

#[derive(Serialize)]
pub struct DecodeOutput {
    #[serde(flatten)]
    pub configuration: SafeConfiguration,
    pub singleton_address: Address,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unparsed: Vec<UnparsedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_address: Option<Address>,
}

impl DecodeOutput {
    pub fn new(decoded: DecodedDeployment, predicted_address: Option<Address>) -> Self {
        Self {
            configuration: decoded.configuration,
            singleton_address: decoded.singleton_address,
            unparsed: decoded.unparsed,
            predicted_address,
        }
    }

    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            let config = &self.configuration;
            println!("Decoded Deployment:");
            if let Some(address) = self.predicted_address {
                println!("  Safe Address: {}", address);
            }
            println!("  Singleton: {} ({})", config.singleton, self.singleton_address);
            println!("  Salt Nonce: {}", config.salt_nonce);
            println!("  Threshold: {}", config.threshold);
            println!("  Owners:");
            for (i, owner) in config.owners.iter().enumerate() {
                println!("    {}: {}", i + 1, owner);
            }
            println!("  Fallback Handler: {}", config.fallback_handler);
            if !config.payment.is_zero() {
                println!("  Payment: {} (token {})", config.payment, config.payment_token);
            }
            if config.payment_receiver != Address::ZERO {
                println!("  Payment Receiver: {}", config.payment_receiver);
            }
            for field in &self.unparsed {
                println!("  Not reproducible: {:?}", field);
            }
        }
    }
}

pub fn print_issues(issues: &[Issue]) {
    for issue in issues {
        eprintln!("{}", issue);
    }
}

pub fn confirm_prompt(message: &str) -> bool {
    use dialoguer::Confirm;

    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}
