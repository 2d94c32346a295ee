use color_eyre::eyre::{eyre, Result};
use safe_deployer::flow::{CreationFlow, FlowKind};
use safe_deployer::{DeploymentOrchestrator, Settings};

use super::{build_configuration, resolve_factory, submit_plan};
use crate::cli::DeployArgs;
use crate::output::print_issues;

pub async fn run(args: DeployArgs, settings: Settings, json: bool) -> Result<()> {
    let factory = resolve_factory(&settings, None).await?;
    let config = build_configuration(&args.safe, &settings, &factory)?;

    let mut flow = CreationFlow::new();
    flow.select(FlowKind::New)?;
    if !flow.submit_configuration(config)? {
        print_issues(flow.issues());
        return Err(eyre!("Configuration is invalid"));
    }
    let config = flow
        .configuration()
        .cloned()
        .ok_or_else(|| eyre!("No configuration accepted"))?;

    let orchestrator = DeploymentOrchestrator::new(factory, settings.registry.clone())
        .with_multicall(settings.addresses.multicall);
    let plan = orchestrator.plan(&config, &args.chains)?;

    submit_plan(&orchestrator, &plan, &settings, &args.submit, &mut flow, json).await
}
