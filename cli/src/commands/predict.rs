use color_eyre::eyre::{eyre, Result};
use safe_deployer::validation::{has_errors, validate};
use safe_deployer::Settings;

use super::{build_configuration, resolve_factory};
use crate::cli::PredictArgs;
use crate::output::{print_issues, PredictOutput};

pub async fn run(args: PredictArgs, settings: Settings, json: bool) -> Result<()> {
    let factory = resolve_factory(&settings, args.rpc_url.as_deref()).await?;
    let config = build_configuration(&args.safe, &settings, &factory)?;

    let issues = validate(&config);
    if has_errors(&issues) {
        print_issues(&issues);
        return Err(eyre!("Configuration is invalid"));
    }

    let safe_address = factory.derive(&config, &settings.registry)?;

    let output = PredictOutput {
        safe_address,
        factory: factory.address,
        singleton: config.singleton,
        singleton_address: settings.registry.address_of(config.singleton)?,
        salt_nonce: config.salt_nonce,
        owners: config.owners,
        threshold: config.threshold,
        warnings: issues,
    };
    output.print(json);

    Ok(())
}
