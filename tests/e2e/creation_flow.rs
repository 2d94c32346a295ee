//! Creation flow driven end to end with in-memory submitters

use std::time::Duration;

use alloy::primitives::U256;
use futures::future::join_all;
use safe_deployer::{
    ChainOutcome, ChainProgress, ConfigurationDraft, CreationFlow, Error, FlowKind, FlowState,
    SafeConfiguration, Submitter, TxStatus,
};

use crate::common::{offline_orchestrator, FakeSubmitter, OWNER_A, OWNER_B};

/// New Safe: draft, plan, submit, confirm, dismiss
#[tokio::test]
async fn test_new_safe_flow() {
    let orchestrator = offline_orchestrator();
    let mut flow = CreationFlow::new();
    flow.select(FlowKind::New).expect("Failed to select flow");

    let draft = ConfigurationDraft::new([OWNER_A.to_string(), OWNER_B.to_string()], 2);
    assert!(flow.submit_draft(draft).expect("Failed to submit draft"));
    assert_eq!(flow.state(), FlowState::Deploy);

    let configuration = flow.configuration().cloned().expect("Configuration accepted");
    let plan = orchestrator
        .plan(&configuration, &[1, 10, 8453])
        .expect("Failed to plan");
    let expected = plan.expected_address();

    let submitters = vec![
        FakeSubmitter::new(1).creating(expected),
        FakeSubmitter::new(10).with_code_at(expected),
        FakeSubmitter::new(8453).failing("nonce too low"),
    ];
    let funding = plan.funding_call(U256::from(1000));
    let results = orchestrator.submit_all(&plan, &submitters, &[funding]).await;
    for result in &results {
        flow.record_submission(result.chain_id, &result.outcome)
            .expect("Failed to record submission");
    }

    // Going back is no longer possible once chains have results
    assert!(matches!(flow.back(), Err(Error::InvalidTransition { .. })));

    let pending: Vec<_> = results
        .iter()
        .filter_map(|r| match r.outcome {
            Ok(ChainOutcome::Submitted(handle)) => Some(handle),
            _ => None,
        })
        .collect();
    assert_eq!(pending.len(), 1);

    let statuses = join_all(pending.iter().map(|handle| {
        let submitter = submitters
            .iter()
            .find(|s| s.chain_id() == handle.chain_id)
            .expect("Submitter for handle");
        orchestrator.confirm(submitter, handle)
    }))
    .await;
    for (handle, status) in pending.iter().zip(statuses) {
        flow.record_status(handle.chain_id, status)
            .expect("Failed to record status");
    }

    let chains = flow.chains();
    assert!(matches!(
        chains.get(&1),
        Some(ChainProgress::Sent {
            status: TxStatus::Confirmed,
            ..
        })
    ));
    assert_eq!(chains.get(&10), Some(&ChainProgress::AlreadyDeployed));
    assert!(matches!(
        chains.get(&8453),
        Some(ChainProgress::Failed { reason }) if reason.contains("nonce too low")
    ));

    flow.dismiss().expect("Failed to dismiss");
    assert_eq!(flow.state(), FlowState::Done);
}

/// A chain whose endpoint never answers does not hold back the others
#[tokio::test]
async fn test_stalled_chain_does_not_block_others() {
    let orchestrator = offline_orchestrator();
    let mut flow = CreationFlow::new();
    flow.select(FlowKind::New).expect("Failed to select flow");
    assert!(flow
        .submit_configuration(SafeConfiguration::new(vec![OWNER_A, OWNER_B], 2))
        .expect("Failed to submit configuration"));

    let configuration = flow.configuration().cloned().expect("Configuration accepted");
    let plan = orchestrator
        .plan(&configuration, &[1, 10, 8453])
        .expect("Failed to plan");
    let submitters = vec![
        FakeSubmitter::new(1),
        FakeSubmitter::new(10).stalled(),
        FakeSubmitter::new(8453),
    ];

    let submission = orchestrator.submit_all(&plan, &submitters, &[]);
    let finished = tokio::time::timeout(Duration::from_millis(200), submission).await;
    assert!(finished.is_err(), "The stalled chain never settles");

    // The healthy chains were broadcast while chain 10 hung
    assert_eq!(submitters[0].sent().len(), 1);
    assert!(submitters[1].sent().is_empty());
    assert_eq!(submitters[2].sent().len(), 1);
    assert_eq!(submitters[0].sent()[0], submitters[2].sent()[0]);
}

/// Invalid drafts keep the flow in data entry with the issues exposed
#[tokio::test]
async fn test_new_safe_flow_rejects_invalid_draft() {
    let mut flow = CreationFlow::new();
    flow.select(FlowKind::New).expect("Failed to select flow");

    let draft = ConfigurationDraft::new([OWNER_A.to_string(), "not-an-address".to_string()], 3);
    assert!(!flow.submit_draft(draft).expect("Draft submission should not error"));
    assert_eq!(flow.state(), FlowState::FlowData(FlowKind::New));
    assert!(flow.issues().iter().any(|i| i.is_error()));

    flow.back().expect("Failed to go back");
    assert_eq!(flow.state(), FlowState::FlowSelect);
}

/// Existing Safe: the decoded deployment is replayed at the same address
#[tokio::test]
async fn test_clone_flow_reuses_address() {
    let orchestrator = offline_orchestrator();
    let original = orchestrator
        .plan(
            &SafeConfiguration::new(vec![OWNER_A], 1).with_salt_nonce(U256::from(7)),
            &[1],
        )
        .expect("Failed to plan original");
    let original_tx = orchestrator
        .transaction(&original, &[original.funding_call(U256::from(5))])
        .expect("Failed to build original transaction");

    let mut flow = CreationFlow::new();
    flow.select(FlowKind::Existing).expect("Failed to select flow");
    assert!(flow
        .submit_calldata(orchestrator.registry(), &original_tx.data)
        .expect("Failed to submit calldata"));

    let decoded = flow.decoded().cloned().expect("Deployment decoded");
    assert_eq!(decoded.configuration.owners, vec![OWNER_A]);
    assert_eq!(decoded.configuration.salt_nonce, U256::from(7));

    let clone = orchestrator
        .plan_clone(&decoded, &[10, 137])
        .expect("Failed to plan clone");
    assert_eq!(clone.expected_address(), original.expected_address());

    let submitters = vec![FakeSubmitter::new(10), FakeSubmitter::new(137)];
    let results = orchestrator.submit_all(&clone, &submitters, &[]).await;
    assert!(results.iter().all(|r| r.outcome.is_ok()));
    assert_eq!(submitters[0].sent()[0].data, orchestrator.deployment_call(&original).data);
}

/// Calldata without a factory call leaves the flow waiting for new input
#[tokio::test]
async fn test_clone_flow_rejects_foreign_calldata() {
    let mut flow = CreationFlow::new();
    flow.select(FlowKind::Existing).expect("Failed to select flow");

    let registry = offline_orchestrator().registry().clone();
    assert!(!flow
        .submit_calldata(&registry, &[0xa9, 0x05, 0x9c, 0xbb, 0x00])
        .expect("Decode failures are not flow errors"));
    assert!(matches!(flow.decode_error(), Some(Error::Decode(_))));
    assert_eq!(flow.state(), FlowState::FlowData(FlowKind::Existing));
}
