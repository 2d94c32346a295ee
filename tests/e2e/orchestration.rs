//! Multi-chain submission against in-memory submitters

use alloy::primitives::{address, U256};
use alloy::sol_types::SolCall;
use safe_deployer::{
    ChainOutcome, Error, IMulticall3, ISafeProxyFactory, SafeConfiguration, TxStatus, MULTICALL3,
};

use crate::common::{offline_orchestrator, FakeSubmitter, OWNER_A, OWNER_B};

fn configuration() -> SafeConfiguration {
    SafeConfiguration::new(vec![OWNER_A, OWNER_B], 2).with_salt_label("orchestration")
}

/// Every chain receives the same transaction and reports the same address
#[tokio::test]
async fn test_submit_all_sends_identical_transaction_everywhere() {
    let orchestrator = offline_orchestrator();
    let plan = orchestrator
        .plan(&configuration(), &[1, 10, 8453])
        .expect("Failed to plan");
    let submitters = vec![FakeSubmitter::new(1), FakeSubmitter::new(10), FakeSubmitter::new(8453)];

    let results = orchestrator.submit_all(&plan, &submitters, &[]).await;
    assert_eq!(results.len(), 3);

    for result in &results {
        match result.outcome.as_ref().expect("Submission should succeed") {
            ChainOutcome::Submitted(handle) => {
                assert_eq!(handle.chain_id, result.chain_id);
                assert_eq!(handle.expected_address, plan.expected_address());
            }
            other => panic!("Unexpected outcome {:?}", other),
        }
    }

    let sent: Vec<_> = submitters.iter().map(|s| s.sent()).collect();
    for txs in &sent {
        assert_eq!(txs.len(), 1, "Each chain should receive exactly one transaction");
    }
    assert_eq!(sent[0][0], sent[1][0]);
    assert_eq!(sent[1][0], sent[2][0]);

    // Without extra calls the factory is called directly
    assert_eq!(sent[0][0].to, orchestrator.factory().address);
    assert_eq!(sent[0][0].value, U256::ZERO);
    assert_eq!(
        sent[0][0].data[..4],
        ISafeProxyFactory::createProxyWithNonceCall::SELECTOR
    );
}

/// A failing chain does not affect the others
#[tokio::test]
async fn test_submit_all_failures_are_independent() {
    let orchestrator = offline_orchestrator();
    let plan = orchestrator
        .plan(&configuration(), &[1, 10, 137])
        .expect("Failed to plan");
    let submitters = vec![
        FakeSubmitter::new(1),
        FakeSubmitter::new(10).failing("insufficient funds"),
        FakeSubmitter::new(137),
    ];

    let results = orchestrator.submit_all(&plan, &submitters, &[]).await;

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].chain_id, 10);
    assert!(matches!(
        failed[0].outcome,
        Err(Error::ExecutionFailed { ref reason }) if reason == "insufficient funds"
    ));

    assert_eq!(submitters[0].sent().len(), 1);
    assert_eq!(submitters[2].sent().len(), 1);
}

/// Chains where the Safe already exists are skipped without sending
#[tokio::test]
async fn test_submit_all_skips_deployed_chains() {
    let orchestrator = offline_orchestrator();
    let plan = orchestrator
        .plan(&configuration(), &[1, 10])
        .expect("Failed to plan");
    let expected = plan.expected_address();
    let submitters = vec![
        FakeSubmitter::new(1).with_code_at(expected),
        FakeSubmitter::new(10),
    ];

    let results = orchestrator.submit_all(&plan, &submitters, &[]).await;

    assert!(matches!(
        results[0].outcome,
        Ok(ChainOutcome::AlreadyDeployed { address }) if address == expected
    ));
    assert!(matches!(results[1].outcome, Ok(ChainOutcome::Submitted(_))));
    assert!(submitters[0].sent().is_empty());
    assert_eq!(submitters[1].sent().len(), 1);
}

/// A planned chain without a submitter fails on its own
#[tokio::test]
async fn test_submit_all_without_submitter() {
    let orchestrator = offline_orchestrator();
    let plan = orchestrator
        .plan(&configuration(), &[1, 42161])
        .expect("Failed to plan");
    let submitters = vec![FakeSubmitter::new(1)];

    let results = orchestrator.submit_all(&plan, &submitters, &[]).await;

    assert!(results[0].outcome.is_ok());
    assert_eq!(results[1].chain_id, 42161);
    assert!(matches!(
        results[1].outcome,
        Err(Error::UnconfiguredChain(42161))
    ));
}

/// Submitting a target through a submitter for another chain is refused
#[tokio::test]
async fn test_submit_chain_mismatch() {
    let orchestrator = offline_orchestrator();
    let plan = orchestrator
        .plan(&configuration(), &[1])
        .expect("Failed to plan");
    let submitter = FakeSubmitter::new(5);

    let result = orchestrator
        .submit(&plan, &plan.targets[0], &submitter, &[])
        .await;

    assert!(matches!(
        result,
        Err(Error::ChainMismatch {
            expected: 1,
            actual: 5
        })
    ));
    assert!(submitter.sent().is_empty());
}

/// Funding is batched with the deployment in one multicall transaction
#[tokio::test]
async fn test_submit_with_funding() {
    let orchestrator = offline_orchestrator();
    let plan = orchestrator
        .plan(&configuration(), &[1])
        .expect("Failed to plan");
    let amount = U256::from(10u64.pow(16));
    let funding = plan.funding_call(amount);
    let submitter = FakeSubmitter::new(1);

    orchestrator
        .submit(&plan, &plan.targets[0], &submitter, &[funding])
        .await
        .expect("Failed to submit");

    let sent = submitter.sent();
    assert_eq!(sent[0].to, MULTICALL3);
    assert_eq!(sent[0].value, amount);

    let decoded = IMulticall3::aggregate3ValueCall::abi_decode(&sent[0].data)
        .expect("Failed to decode multicall");
    assert_eq!(decoded.calls.len(), 2);
    assert_eq!(decoded.calls[0].target, orchestrator.factory().address);
    assert!(!decoded.calls[0].allowFailure);
    assert_eq!(decoded.calls[1].target, plan.expected_address());
    assert_eq!(decoded.calls[1].value, amount);
}

/// A custom multicall address is used for batched transactions
#[tokio::test]
async fn test_submit_with_custom_multicall() {
    let multicall = address!("1111111111111111111111111111111111111111");
    let orchestrator = offline_orchestrator().with_multicall(multicall);
    let plan = orchestrator
        .plan(&configuration(), &[1])
        .expect("Failed to plan");
    let submitter = FakeSubmitter::new(1);

    orchestrator
        .submit(&plan, &plan.targets[0], &submitter, &[plan.funding_call(U256::from(1))])
        .await
        .expect("Failed to submit");

    assert_eq!(submitter.sent()[0].to, multicall);
}

/// Confirmation checks that the Safe exists after the transaction
#[tokio::test]
async fn test_confirm_outcomes() {
    let orchestrator = offline_orchestrator();
    let plan = orchestrator
        .plan(&configuration(), &[1, 10, 100])
        .expect("Failed to plan");
    let expected = plan.expected_address();
    let submitters = vec![
        FakeSubmitter::new(1).creating(expected),
        // confirms without producing code at the expected address
        FakeSubmitter::new(10),
        FakeSubmitter::new(100).reverting(),
    ];

    let results = orchestrator.submit_all(&plan, &submitters, &[]).await;
    let handles: Vec<_> = results
        .iter()
        .map(|r| match r.outcome {
            Ok(ChainOutcome::Submitted(handle)) => handle,
            ref other => panic!("Unexpected outcome {:?}", other),
        })
        .collect();

    let confirmed = orchestrator.confirm(&submitters[0], &handles[0]).await;
    assert_eq!(confirmed.expect("Should confirm"), TxStatus::Confirmed);

    let missing = orchestrator.confirm(&submitters[1], &handles[1]).await;
    assert!(matches!(missing, Err(Error::ExecutionFailed { .. })));

    let reverted = orchestrator.confirm(&submitters[2], &handles[2]).await;
    assert_eq!(reverted.expect("Should settle"), TxStatus::Reverted);
}
