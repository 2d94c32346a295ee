//! Owner-set and threshold checks
//!
//! Validation never fails: it returns every issue found so a caller can render them
//! all, and is cheap enough to run on each keystroke. Only [`Severity::Error`] issues
//! block submission.

use std::collections::HashMap;
use std::fmt;

use alloy::primitives::{address, Address};
use serde::Serialize;
use uuid::Uuid;

use crate::config::{ConfigurationDraft, SafeConfiguration};
use crate::chain::Singleton;

/// Head of the Safe owner linked list; rejected as an owner by the contract
pub const SENTINEL_OWNERS: Address = address!("0000000000000000000000000000000000000001");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IssueKind {
    /// Owner input is not a valid address
    InvalidOwner { input: String },
    /// Owner is the zero address or the owner list sentinel
    ReservedOwner { address: Address },
    NoOwners,
    /// Fewer than two owners
    SingleOwner,
    ThresholdZero,
    ThresholdTooHigh { threshold: u64, owners: usize },
    DuplicateOwner { address: Address },
    /// Singleton not in the registry, compatibility cannot be verified
    UnknownSingleton { address: Address },
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Position of the offending owner in the list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Row id of the offending owner when validating a draft
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
}

impl Issue {
    fn error(kind: IssueKind) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            position: None,
            owner_id: None,
        }
    }

    fn warning(kind: IssueKind) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind)
        }
    }

    fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{prefix}: ")?;
        match &self.kind {
            IssueKind::InvalidOwner { input } => write!(f, "'{input}' is not a valid address"),
            IssueKind::ReservedOwner { address } => write!(f, "{address} cannot be an owner"),
            IssueKind::NoOwners => f.write_str("at least one owner is required"),
            IssueKind::SingleOwner => f.write_str("recommend at least two owners"),
            IssueKind::ThresholdZero => f.write_str("threshold must be at least 1"),
            IssueKind::ThresholdTooHigh { threshold, owners } => {
                write!(f, "threshold {threshold} exceeds owner count {owners}")
            }
            IssueKind::DuplicateOwner { address } => write!(f, "duplicate owner {address}"),
            IssueKind::UnknownSingleton { address } => write!(
                f,
                "singleton {address} is not a known Safe implementation, compatibility cannot be verified"
            ),
        }
    }
}

/// Returns true if any issue blocks submission
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(Issue::is_error)
}

/// Validates a typed configuration
pub fn validate(config: &SafeConfiguration) -> Vec<Issue> {
    let mut issues = check_owners(config.owners.iter().copied().map(Some), config.threshold);
    if let Singleton::Unknown(address) = config.singleton {
        issues.push(Issue::warning(IssueKind::UnknownSingleton { address }));
    }
    issues
}

/// Validates raw user input, reporting unparsable owners against their row id
pub fn validate_draft(draft: &ConfigurationDraft) -> Vec<Issue> {
    let mut issues = Vec::new();
    let parsed: Vec<Option<Address>> = draft.owners.iter().map(|o| o.parse()).collect();

    for (position, (input, address)) in draft.owners.iter().zip(&parsed).enumerate() {
        if address.is_none() {
            issues.push(
                Issue::error(IssueKind::InvalidOwner {
                    input: input.address.clone(),
                })
                .at(position),
            );
        }
    }
    issues.extend(check_owners(parsed, draft.threshold));

    for issue in &mut issues {
        issue.owner_id = issue.position.map(|p| draft.owners[p].id);
    }
    issues
}

/// Shared owner and threshold rules. `None` entries are unparsable owners: they count
/// towards the threshold bound but are otherwise reported by the caller.
fn check_owners(owners: impl IntoIterator<Item = Option<Address>>, threshold: u64) -> Vec<Issue> {
    let owners: Vec<Option<Address>> = owners.into_iter().collect();
    let mut issues = Vec::new();

    if owners.is_empty() {
        issues.push(Issue::error(IssueKind::NoOwners));
    } else if owners.len() < 2 {
        issues.push(Issue::warning(IssueKind::SingleOwner));
    }

    let mut first_seen: HashMap<Address, usize> = HashMap::new();
    for (position, owner) in owners.iter().enumerate() {
        let Some(address) = *owner else { continue };
        if address == Address::ZERO || address == SENTINEL_OWNERS {
            issues.push(Issue::error(IssueKind::ReservedOwner { address }).at(position));
            continue;
        }
        if first_seen.insert(address, position).is_some() {
            issues.push(Issue::error(IssueKind::DuplicateOwner { address }).at(position));
        }
    }

    if threshold == 0 {
        issues.push(Issue::error(IssueKind::ThresholdZero));
    } else if threshold > owners.len() as u64 {
        issues.push(Issue::error(IssueKind::ThresholdTooHigh {
            threshold,
            owners: owners.len(),
        }));
    }

    issues
}
