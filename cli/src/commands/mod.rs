pub mod clone;
pub mod decode;
pub mod deploy;
pub mod predict;

use std::path::Path;

use alloy::network::{AnyNetwork, EthereumWallet};
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use color_eyre::eyre::{eyre, Result};
use futures::future::join_all;
use safe_deployer::flow::CreationFlow;
use safe_deployer::validation::{has_errors, validate_draft};
use safe_deployer::{
    fetch_proxy_factory, search_vanity_salt, ChainOutcome, ConfigurationDraft,
    DeploymentOrchestrator, DeploymentPlan, ProxyFactory, RpcSubmitter, SafeConfiguration,
    Settings, Singleton, VanityPattern,
};
use tracing::{info, info_span, warn, Instrument};

use crate::cli::{SafeArgs, SubmitArgs};
use crate::output::{confirm_prompt, print_issues, DeployOutput};
use crate::wallet::create_signer;

/// Settings from the given file, or the canonical defaults
pub async fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Ok(Settings::load(path).await?),
        None => Ok(Settings::default()),
    }
}

pub fn http_provider(rpc_url: &str) -> Result<impl Provider<AnyNetwork> + Clone + 'static> {
    Ok(ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(rpc_url.parse()?))
}

/// Proxy factory from the settings, or read from the chain behind `rpc_url`
pub async fn resolve_factory(settings: &Settings, rpc_url: Option<&str>) -> Result<ProxyFactory> {
    if let Some(factory) = settings.proxy_factory() {
        return Ok(factory);
    }
    let rpc_url = rpc_url
        .map(str::to_string)
        .or_else(|| settings.chains.first().map(|c| c.rpc_url.to_string()))
        .ok_or_else(|| {
            eyre!("No proxy creation code configured. Set proxy-creation-code or provide an RPC URL")
        })?;

    let provider = http_provider(&rpc_url)?;
    Ok(fetch_proxy_factory(&provider, settings.addresses.proxy_factory).await?)
}

/// Builds the configuration from command line input.
/// Owner input errors are printed and abort; other validation happens when planning.
pub fn build_configuration(
    args: &SafeArgs,
    settings: &Settings,
    factory: &ProxyFactory,
) -> Result<SafeConfiguration> {
    let draft = ConfigurationDraft::new(args.owners.iter().cloned(), args.threshold);
    let issues = validate_draft(&draft);
    if has_errors(&issues) {
        print_issues(&issues);
        return Err(eyre!("Invalid owners or threshold"));
    }

    let singleton = match args.singleton.parse::<Singleton>().map_err(|e| eyre!(e))? {
        Singleton::Unknown(address) => settings.registry.lookup(address),
        known => known,
    };
    let fallback_handler: Address = match &args.fallback_handler {
        Some(handler) => handler.parse()?,
        None => settings.addresses.fallback_handler,
    };

    let mut config = draft
        .into_configuration()?
        .with_singleton(singleton)
        .with_fallback_handler(fallback_handler);

    if let Some(label) = &args.salt_label {
        config = config.with_salt_label(label);
    } else if let Some(nonce) = &args.salt_nonce {
        config = config.with_salt_nonce(nonce.parse()?);
    }

    if args.vanity_prefix.is_some() || args.vanity_suffix.is_some() {
        let pattern = VanityPattern::new(
            args.vanity_prefix.as_deref().unwrap_or_default(),
            args.vanity_suffix.as_deref().unwrap_or_default(),
        );
        let (nonce, address) = search_vanity_salt(
            factory,
            &config,
            &settings.registry,
            &pattern,
            config.salt_nonce,
            args.max_attempts,
        )?;
        info!(%nonce, %address, "vanity salt nonce found");
        config = config.with_salt_nonce(nonce);
    }

    Ok(config)
}

/// Submits a plan to all of its chains, waits for the receipts and prints the
/// per-chain result. The flow must be in its deploy state.
pub async fn submit_plan(
    orchestrator: &DeploymentOrchestrator,
    plan: &DeploymentPlan,
    settings: &Settings,
    args: &SubmitArgs,
    flow: &mut CreationFlow,
    json: bool,
) -> Result<()> {
    let extra_calls = match &args.fund {
        Some(amount) => vec![plan.funding_call(amount.parse::<U256>()?)],
        None => Vec::new(),
    };

    if !json {
        println!("Safe Address: {}", plan.expected_address());
        println!(
            "  Chains: {:?}",
            plan.targets.iter().map(|t| t.chain_id).collect::<Vec<_>>()
        );
        if let Some(fund) = extra_calls.first() {
            println!("  Funding: {} wei", fund.value);
        }
        print_issues(&plan.warnings);
        println!();
    }

    if !args.no_confirm && !json && !confirm_prompt("Deploy Safe?") {
        println!("Aborted");
        return Ok(());
    }

    let signer = create_signer(&args.wallet)?;
    let from = signer.address();
    let wallet = EthereumWallet::from(signer);

    // each chain connects, submits and confirms on its own; a stalled endpoint only
    // holds up its own chain
    let chains = plan.targets.iter().map(|target| {
        let wallet = wallet.clone();
        let extra_calls = &extra_calls;
        let span = info_span!("chain", chain_id = target.chain_id);
        async move {
            let connected = match settings.chain(target.chain_id) {
                Ok(chain) => {
                    let provider = ProviderBuilder::new()
                        .network::<AnyNetwork>()
                        .wallet(wallet)
                        .connect_http(chain.rpc_url.clone());
                    RpcSubmitter::connect(provider, from, target.chain_id).await
                }
                Err(err) => Err(err),
            };
            let submitter = match connected {
                Ok(submitter) => submitter,
                Err(err) => {
                    warn!(%err, "could not connect");
                    return (target.chain_id, Err(err), None);
                }
            };

            let outcome = orchestrator
                .submit(plan, target, &submitter, extra_calls)
                .await;
            let status = match &outcome {
                Ok(ChainOutcome::Submitted(handle)) => {
                    Some(orchestrator.confirm(&submitter, handle).await)
                }
                Ok(ChainOutcome::AlreadyDeployed { .. }) => None,
                Err(err) => {
                    warn!(%err, "deployment failed");
                    None
                }
            };
            (target.chain_id, outcome, status)
        }
        .instrument(span)
    });

    for (chain_id, outcome, status) in join_all(chains).await {
        flow.record_submission(chain_id, &outcome)?;
        if let Some(status) = status {
            flow.record_status(chain_id, status)?;
        }
    }

    let output = DeployOutput {
        safe_address: plan.expected_address(),
        chains: flow.chains().clone(),
    };
    flow.dismiss()?;
    output.print(json);

    if !output.all_succeeded() {
        return Err(eyre!("Deployment failed on at least one chain"));
    }
    Ok(())
}
