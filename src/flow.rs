//! Creation flow state machine
//!
//! `FlowSelect -> FlowData(New | Existing) -> Deploy -> Done`. The configuration
//! either comes from validated input (new) or from decoding an existing
//! deployment (clone). Per-chain results are tracked without moving the state;
//! only an explicit [`CreationFlow::dismiss`] reaches `Done`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::chain::SingletonRegistry;
use crate::config::{ConfigurationDraft, SafeConfiguration};
use crate::deploy::{ChainOutcome, TxHandle, TxStatus};
use crate::encoding::{decode_with, DecodedDeployment};
use crate::error::{Error, Result};
use crate::validation::{has_errors, validate, validate_draft, Issue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    /// Create a Safe from owner input
    New,
    /// Clone a Safe from an existing deployment transaction
    Existing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "kind", rename_all = "kebab-case")]
pub enum FlowState {
    #[default]
    FlowSelect,
    FlowData(FlowKind),
    Deploy,
    Done,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowState::FlowSelect => write!(f, "flow-select"),
            FlowState::FlowData(FlowKind::New) => write!(f, "flow-data(new)"),
            FlowState::FlowData(FlowKind::Existing) => write!(f, "flow-data(existing)"),
            FlowState::Deploy => write!(f, "deploy"),
            FlowState::Done => write!(f, "done"),
        }
    }
}

/// Last known state of one chain's deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ChainProgress {
    AlreadyDeployed,
    Sent { handle: TxHandle, status: TxStatus },
    Failed { reason: String },
}

#[derive(Debug, Default)]
pub struct CreationFlow {
    state: FlowState,
    configuration: Option<SafeConfiguration>,
    decoded: Option<DecodedDeployment>,
    issues: Vec<Issue>,
    decode_error: Option<Error>,
    chains: BTreeMap<u64, ChainProgress>,
}

impl CreationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Configuration accepted for deployment, once past `FlowData`
    pub fn configuration(&self) -> Option<&SafeConfiguration> {
        self.configuration.as_ref()
    }

    /// The decoded source deployment in the clone flow
    pub fn decoded(&self) -> Option<&DecodedDeployment> {
        self.decoded.as_ref()
    }

    /// Validation issues of the last submitted input
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Why the last calldata could not be used
    pub fn decode_error(&self) -> Option<&Error> {
        self.decode_error.as_ref()
    }

    pub fn chains(&self) -> &BTreeMap<u64, ChainProgress> {
        &self.chains
    }

    pub fn select(&mut self, kind: FlowKind) -> Result<()> {
        self.expect(FlowState::FlowSelect, "select a flow")?;
        self.state = FlowState::FlowData(kind);
        Ok(())
    }

    /// Submits raw owner input. Advances to `Deploy` only if validation reports
    /// no errors; returns whether it advanced.
    pub fn submit_draft(&mut self, draft: ConfigurationDraft) -> Result<bool> {
        self.expect(FlowState::FlowData(FlowKind::New), "submit owners")?;
        self.issues = validate_draft(&draft);
        if has_errors(&self.issues) {
            return Ok(false);
        }
        let configuration = draft.into_configuration()?;
        self.issues = validate(&configuration);
        self.accept(configuration)
    }

    /// Submits an already built configuration on the new-Safe path
    pub fn submit_configuration(&mut self, configuration: SafeConfiguration) -> Result<bool> {
        self.expect(FlowState::FlowData(FlowKind::New), "submit a configuration")?;
        self.issues = validate(&configuration);
        self.accept(configuration)
    }

    /// Decodes the calldata of an existing deployment.
    ///
    /// A decode failure or a partial decode keeps the flow in place and is
    /// available from [`decode_error`](Self::decode_error); it is not an error of
    /// this call.
    pub fn submit_calldata(&mut self, registry: &SingletonRegistry, calldata: &[u8]) -> Result<bool> {
        self.expect(FlowState::FlowData(FlowKind::Existing), "submit calldata")?;
        self.decode_error = None;
        self.issues.clear();

        let decoded = match decode_with(registry, calldata) {
            Ok(decoded) => decoded,
            Err(err) => {
                self.decode_error = Some(err.into());
                return Ok(false);
            }
        };
        if decoded.is_partial() {
            self.decode_error = Some(Error::PartialDecode {
                fields: decoded.unparsed.len(),
            });
            return Ok(false);
        }

        self.issues = validate(&decoded.configuration);
        let configuration = decoded.configuration.clone();
        self.decoded = Some(decoded);
        self.accept(configuration)
    }

    /// Steps back one state. Leaving `Deploy` is refused once any chain has a result.
    pub fn back(&mut self) -> Result<()> {
        match self.state {
            FlowState::FlowData(_) => {
                *self = Self::default();
                Ok(())
            }
            FlowState::Deploy if self.chains.is_empty() => {
                let kind = if self.decoded.is_some() {
                    FlowKind::Existing
                } else {
                    FlowKind::New
                };
                self.configuration = None;
                self.decoded = None;
                self.state = FlowState::FlowData(kind);
                Ok(())
            }
            state => Err(Error::InvalidTransition {
                state: state.to_string(),
                action: "go back",
            }),
        }
    }

    /// Records the result of submitting to one chain
    pub fn record_submission(&mut self, chain_id: u64, outcome: &Result<ChainOutcome>) -> Result<()> {
        self.expect(FlowState::Deploy, "record a submission")?;
        let progress = match outcome {
            Ok(ChainOutcome::AlreadyDeployed { .. }) => ChainProgress::AlreadyDeployed,
            Ok(ChainOutcome::Submitted(handle)) => ChainProgress::Sent {
                handle: *handle,
                status: TxStatus::Pending,
            },
            Err(err) => ChainProgress::Failed {
                reason: err.to_string(),
            },
        };
        self.chains.insert(chain_id, progress);
        Ok(())
    }

    /// Records the settled status of a previously sent transaction
    pub fn record_status(&mut self, chain_id: u64, status: Result<TxStatus>) -> Result<()> {
        self.expect(FlowState::Deploy, "record a status")?;
        match (self.chains.get_mut(&chain_id), status) {
            (Some(ChainProgress::Sent { status: current, .. }), Ok(status)) => *current = status,
            (Some(progress), Err(err)) => {
                *progress = ChainProgress::Failed {
                    reason: err.to_string(),
                }
            }
            // nothing was sent on this chain
            (Some(_), Ok(_)) => {}
            (None, _) => return Err(Error::UnconfiguredChain(chain_id)),
        }
        Ok(())
    }

    /// Closes the flow regardless of pending chains
    pub fn dismiss(&mut self) -> Result<()> {
        self.expect(FlowState::Deploy, "dismiss")?;
        self.state = FlowState::Done;
        Ok(())
    }

    fn accept(&mut self, configuration: SafeConfiguration) -> Result<bool> {
        if has_errors(&self.issues) {
            return Ok(false);
        }
        self.configuration = Some(configuration);
        self.state = FlowState::Deploy;
        Ok(true)
    }

    fn expect(&self, state: FlowState, action: &'static str) -> Result<()> {
        if self.state != state {
            return Err(Error::InvalidTransition {
                state: self.state.to_string(),
                action,
            });
        }
        Ok(())
    }
}
