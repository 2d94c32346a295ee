//! Cloning a deployed Safe from its creation transaction

use alloy::primitives::U256;
use safe_deployer::{
    decode_with, fetch_transaction_input, verify_reproduces, ChainOutcome, Error,
    SafeConfiguration,
};

use crate::common::{TestHarness, OWNER_B};
use crate::skip_if_no_rpc;

/// Test that a deployment transaction decodes back to a configuration reproducing its address
#[tokio::test]
async fn test_clone_from_deployment_transaction() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let orchestrator = harness.orchestrator().await;
    let config = SafeConfiguration::new(vec![harness.signer_address(), OWNER_B], 1)
        .with_salt_nonce(U256::from(424242));

    let plan = orchestrator
        .plan(&config, &[harness.chain_id])
        .expect("Failed to plan");
    let handle = harness
        .deploy_safe(&orchestrator, &config, &[plan.funding_call(U256::from(1))])
        .await
        .expect("Failed to deploy Safe");

    let input = fetch_transaction_input(&harness.provider, handle.tx_hash)
        .await
        .expect("Failed to fetch transaction input");
    let decoded = decode_with(orchestrator.registry(), &input).expect("Failed to decode");

    assert_eq!(decoded.configuration, config);
    assert!(!decoded.is_partial());

    let original = verify_reproduces(&decoded, orchestrator.factory(), handle.expected_address)
        .expect("Decoded configuration should reproduce the Safe");
    assert_eq!(original, handle.expected_address);

    // Replaying the clone on the source chain finds the Safe already there
    let clone = orchestrator
        .plan_clone(&decoded, &[harness.chain_id])
        .expect("Failed to plan clone");
    assert_eq!(clone.expected_address(), handle.expected_address);

    let results = orchestrator
        .submit_all(&clone, &[harness.submitter().await], &[])
        .await;
    assert!(matches!(
        results[0].outcome,
        Ok(ChainOutcome::AlreadyDeployed { .. })
    ));
}

/// Test that a decoded configuration does not verify against another Safe
#[tokio::test]
async fn test_clone_verification_rejects_other_safe() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let orchestrator = harness.orchestrator().await;
    let first = SafeConfiguration::new(vec![harness.signer_address()], 1).with_salt_label("clone-a");
    let second = first.clone().with_salt_label("clone-b");

    let first_handle = harness
        .deploy_safe(&orchestrator, &first, &[])
        .await
        .expect("Failed to deploy first Safe");
    let second_handle = harness
        .deploy_safe(&orchestrator, &second, &[])
        .await
        .expect("Failed to deploy second Safe");

    let input = fetch_transaction_input(&harness.provider, first_handle.tx_hash)
        .await
        .expect("Failed to fetch transaction input");
    let decoded = decode_with(orchestrator.registry(), &input).expect("Failed to decode");

    let result = verify_reproduces(&decoded, orchestrator.factory(), second_handle.expected_address);
    assert!(matches!(result, Err(Error::AddressMismatch { .. })));
}
