use alloy::hex;
use alloy::primitives::{Bytes, TxHash};
use color_eyre::eyre::{eyre, Result};
use safe_deployer::{decode_with, derive_decoded_address, fetch_transaction_input, Settings};

use super::{http_provider, resolve_factory};
use crate::cli::DecodeArgs;
use crate::output::DecodeOutput;

pub async fn run(args: DecodeArgs, settings: Settings, json: bool) -> Result<()> {
    let input = args.input.trim();
    let calldata: Bytes = if input.len() == 66 {
        // 32 bytes: a transaction hash
        let tx_hash: TxHash = input.parse()?;
        let rpc_url = args
            .rpc_url
            .as_deref()
            .ok_or_else(|| eyre!("--rpc-url is required to fetch transaction {}", tx_hash))?;
        fetch_transaction_input(&http_provider(rpc_url)?, tx_hash).await?
    } else {
        hex::decode(input)?.into()
    };

    let decoded = decode_with(&settings.registry, &calldata)
        .map_err(|e| eyre!("Input does not look like a compatible Safe deployment: {}", e))?;

    // the address is only shown when the factory bytecode is at hand
    let predicted_address = match resolve_factory(&settings, args.rpc_url.as_deref()).await {
        Ok(factory) if !decoded.is_partial() => Some(derive_decoded_address(&decoded, &factory)),
        _ => None,
    };

    DecodeOutput::new(decoded, predicted_address).print(json);
    Ok(())
}
