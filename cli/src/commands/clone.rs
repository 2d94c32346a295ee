use alloy::primitives::{Address, TxHash};
use alloy::providers::Provider;
use color_eyre::eyre::{eyre, Result};
use safe_deployer::flow::{CreationFlow, FlowKind};
use safe_deployer::{
    derive_decoded_address, fetch_proxy_factory, fetch_transaction_input, verify_reproduces,
    DeploymentOrchestrator, Settings,
};
use tracing::info;

use super::{http_provider, submit_plan};
use crate::cli::CloneArgs;
use crate::output::print_issues;

pub async fn run(args: CloneArgs, settings: Settings, json: bool) -> Result<()> {
    let tx_hash: TxHash = args.tx_hash.parse()?;
    let source = http_provider(&args.source_rpc_url)?;
    let input = fetch_transaction_input(&source, tx_hash).await?;

    let mut flow = CreationFlow::new();
    flow.select(FlowKind::Existing)?;
    if !flow.submit_calldata(&settings.registry, &input)? {
        if let Some(err) = flow.decode_error() {
            return Err(eyre!(
                "Transaction {} does not look like a compatible Safe deployment: {}",
                tx_hash,
                err
            ));
        }
        print_issues(flow.issues());
        return Err(eyre!("Decoded configuration is invalid"));
    }
    let decoded = flow
        .decoded()
        .cloned()
        .ok_or_else(|| eyre!("No deployment decoded"))?;

    let factory = match settings.proxy_factory() {
        Some(factory) => factory,
        None => fetch_proxy_factory(&source, settings.addresses.proxy_factory).await?,
    };

    // The decoded configuration must reproduce the original address before it is
    // deployed anywhere else
    let original = match &args.safe {
        Some(safe) => verify_reproduces(&decoded, &factory, safe.parse::<Address>()?)?,
        None => {
            let derived = derive_decoded_address(&decoded, &factory);
            if source.get_code_at(derived).await?.is_empty() {
                return Err(eyre!(
                    "Decoded configuration derives {} which has no code on the source chain",
                    derived
                ));
            }
            derived
        }
    };
    info!(%original, "decoded configuration reproduces the original safe");

    let orchestrator = DeploymentOrchestrator::new(factory, settings.registry.clone())
        .with_multicall(settings.addresses.multicall);
    let plan = orchestrator.plan_clone(&decoded, &args.chains)?;

    submit_plan(&orchestrator, &plan, &settings, &args.submit, &mut flow, json).await
}
