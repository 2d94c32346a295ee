//! Safe configuration: the single value every encoding and derivation step consumes

use alloy::primitives::{keccak256, Address, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chain::{ChainAddresses, Singleton};
use crate::error::{Error, Result};
use crate::validation::{has_errors, validate_draft};

/// Configuration of a Safe to deploy.
///
/// Every field ends up in the encoded initializer or the CREATE2 salt, so two
/// configurations differing in any field (including `singleton` and
/// `fallback_handler`) yield different addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeConfiguration {
    /// Owners in setup order; order is part of the encoding
    pub owners: Vec<Address>,
    /// Number of required confirmations
    pub threshold: u64,
    /// Salt nonce for CREATE2; must be identical on every target chain
    pub salt_nonce: U256,
    /// Implementation variant the proxy delegates to
    pub singleton: Singleton,
    /// Fallback handler set during setup
    pub fallback_handler: Address,
    /// Token used for the deployment refund (zero for native currency)
    pub payment_token: Address,
    /// Deployment refund amount
    pub payment: U256,
    /// Receiver of the deployment refund (zero if unused)
    pub payment_receiver: Address,
}

impl SafeConfiguration {
    /// Creates a configuration with the canonical fallback handler, the L2 singleton,
    /// no deployment refund and salt nonce 0
    pub fn new(owners: Vec<Address>, threshold: u64) -> Self {
        Self {
            owners,
            threshold,
            salt_nonce: U256::ZERO,
            singleton: Singleton::default(),
            fallback_handler: ChainAddresses::default().fallback_handler,
            payment_token: Address::ZERO,
            payment: U256::ZERO,
            payment_receiver: Address::ZERO,
        }
    }

    /// Sets the salt nonce for CREATE2 address computation
    pub fn with_salt_nonce(mut self, salt_nonce: U256) -> Self {
        self.salt_nonce = salt_nonce;
        self
    }

    /// Derives the salt nonce from a human readable label
    pub fn with_salt_label(self, label: &str) -> Self {
        self.with_salt_nonce(salt_nonce_from_label(label))
    }

    /// Sets the singleton variant
    pub fn with_singleton(mut self, singleton: Singleton) -> Self {
        self.singleton = singleton;
        self
    }

    /// Sets a custom fallback handler
    pub fn with_fallback_handler(mut self, handler: Address) -> Self {
        self.fallback_handler = handler;
        self
    }

    /// Sets the deployment refund token and amount
    pub fn with_payment(mut self, token: Address, amount: U256) -> Self {
        self.payment_token = token;
        self.payment = amount;
        self
    }

    /// Sets the deployment refund receiver
    pub fn with_payment_receiver(mut self, receiver: Address) -> Self {
        self.payment_receiver = receiver;
        self
    }
}

/// Stable salt nonce for a label: `keccak256(label)` read as a big-endian integer
pub fn salt_nonce_from_label(label: &str) -> U256 {
    U256::from_be_bytes(keccak256(label.as_bytes()).0)
}

/// One owner row as typed by the user.
///
/// The id only exists so a UI can diff its list; it never reaches the encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerInput {
    pub id: Uuid,
    pub address: String,
}

impl OwnerInput {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: address.into(),
        }
    }

    /// Parses the typed address, tolerating surrounding whitespace.
    /// Mixed-case input must carry a valid EIP-55 checksum.
    pub fn parse(&self) -> Option<Address> {
        let input = self.address.trim();
        let digits = input.strip_prefix("0x").unwrap_or(input);
        let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
            && digits.chars().any(|c| c.is_ascii_lowercase());

        if mixed_case {
            Address::parse_checksummed(format!("0x{digits}"), None).ok()
        } else {
            input.parse().ok()
        }
    }
}

/// Unvalidated configuration input ("new safe" path)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDraft {
    pub owners: Vec<OwnerInput>,
    pub threshold: u64,
}

impl ConfigurationDraft {
    pub fn new(owners: impl IntoIterator<Item = impl Into<String>>, threshold: u64) -> Self {
        Self {
            owners: owners.into_iter().map(OwnerInput::new).collect(),
            threshold,
        }
    }

    /// Converts the draft into a configuration if validation reports no errors.
    /// Warnings do not block.
    pub fn into_configuration(self) -> Result<SafeConfiguration> {
        let issues = validate_draft(&self);
        if has_errors(&issues) {
            return Err(Error::Validation { issues });
        }
        let owners = self.owners.iter().filter_map(OwnerInput::parse).collect();
        Ok(SafeConfiguration::new(owners, self.threshold))
    }
}
