//! Safe deployment E2E tests

use alloy::primitives::U256;
use alloy::providers::Provider;
use safe_deployer::{fetch_safe_setup, ChainOutcome, SafeConfiguration};

use crate::common::{TestHarness, OWNER_B};
use crate::skip_if_no_rpc;

/// Test deploying a Safe through the canonical factory
#[tokio::test]
async fn test_deploy_safe_success() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let orchestrator = harness.orchestrator().await;
    let owner = harness.signer_address();
    let config = SafeConfiguration::new(vec![owner, OWNER_B], 2).with_salt_label("e2e-deploy");

    let handle = harness
        .deploy_safe(&orchestrator, &config, &[])
        .await
        .expect("Failed to deploy Safe");

    // The Safe lands at the address predicted offline
    let predicted = orchestrator
        .factory()
        .derive(&config, orchestrator.registry())
        .expect("Failed to derive address");
    assert_eq!(handle.expected_address, predicted);

    let code = harness
        .provider
        .get_code_at(predicted)
        .await
        .expect("Failed to get code");
    assert!(!code.is_empty(), "Safe should have code deployed");

    let (owners, threshold) = fetch_safe_setup(&harness.provider, predicted)
        .await
        .expect("Failed to read Safe setup");
    assert_eq!(owners, vec![owner, OWNER_B]);
    assert_eq!(threshold, 2);
}

/// Test funding the Safe in the deployment transaction
#[tokio::test]
async fn test_deploy_safe_with_funding() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let orchestrator = harness.orchestrator().await;
    let config = SafeConfiguration::new(vec![harness.signer_address()], 1)
        .with_salt_label("e2e-funding");
    let plan = orchestrator
        .plan(&config, &[harness.chain_id])
        .expect("Failed to plan");
    let amount = U256::from(10u64.pow(17));

    let handle = harness
        .deploy_safe(&orchestrator, &config, &[plan.funding_call(amount)])
        .await
        .expect("Failed to deploy Safe");

    let balance = harness
        .get_balance(handle.expected_address)
        .await
        .expect("Failed to get balance");
    assert_eq!(balance, amount, "Safe should hold the funding amount");
}

/// Test that a second deployment of the same configuration is skipped
#[tokio::test]
async fn test_redeploy_is_skipped() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let orchestrator = harness.orchestrator().await;
    let config = SafeConfiguration::new(vec![harness.signer_address()], 1)
        .with_salt_label("e2e-redeploy");

    let handle = harness
        .deploy_safe(&orchestrator, &config, &[])
        .await
        .expect("Failed to deploy Safe");

    let plan = orchestrator
        .plan(&config, &[harness.chain_id])
        .expect("Failed to plan");
    let results = orchestrator
        .submit_all(&plan, &[harness.submitter().await], &[])
        .await;

    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0].outcome,
        Ok(ChainOutcome::AlreadyDeployed { address }) if address == handle.expected_address
    ));
}

/// Test that connecting a submitter to the wrong chain fails
#[tokio::test]
async fn test_submitter_chain_mismatch() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let result = safe_deployer::RpcSubmitter::connect(
        harness.provider.clone(),
        harness.signer_address(),
        harness.chain_id + 1,
    )
    .await;

    assert!(matches!(
        result,
        Err(safe_deployer::Error::ChainMismatch { .. })
    ));
}
