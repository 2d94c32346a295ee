use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "safe-deploy")]
#[command(about = "Deterministic multi-chain Safe deployment", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Deployment settings file (TOML)
    #[arg(long, global = true, env = "SAFE_DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directives (e.g. "debug" or "safe_deployer=trace")
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn,safe_deployer=info")]
    pub log_filter: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the Safe address offline, without deploying
    Predict(PredictArgs),

    /// Deploy a new Safe to one or more chains at the same address
    Deploy(DeployArgs),

    /// Decode a past deployment transaction
    Decode(DecodeArgs),

    /// Redeploy an existing Safe on other chains
    Clone(CloneArgs),
}

#[derive(Args, Clone)]
pub struct SafeArgs {
    /// Owner address (repeatable, order matters)
    #[arg(long = "owner", value_name = "ADDR", required = true)]
    pub owners: Vec<String>,

    /// Required confirmations
    #[arg(long)]
    pub threshold: u64,

    /// Salt nonce for CREATE2 (default: 0)
    #[arg(long, conflicts_with = "salt_label")]
    pub salt_nonce: Option<String>,

    /// Derive the salt nonce from a label
    #[arg(long)]
    pub salt_label: Option<String>,

    /// Singleton variant: l1, l2, l2-delegate-protected or an address
    #[arg(long, default_value = "l2")]
    pub singleton: String,

    /// Custom fallback handler address
    #[arg(long)]
    pub fallback_handler: Option<String>,

    /// Search a salt nonce whose address starts with this hex prefix
    #[arg(long)]
    pub vanity_prefix: Option<String>,

    /// Search a salt nonce whose address ends with this hex suffix
    #[arg(long)]
    pub vanity_suffix: Option<String>,

    /// Maximum salt nonces tried by the vanity search
    #[arg(long, default_value = "1000000")]
    pub max_attempts: u64,
}

#[derive(Parser, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub safe: SafeArgs,

    /// RPC endpoint used to read the proxy creation code if the settings lack it
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: Option<String>,
}

#[derive(Parser, Clone)]
pub struct DeployArgs {
    #[command(flatten)]
    pub safe: SafeArgs,

    /// Target chain ID (repeatable; endpoints come from the settings file)
    #[arg(long = "chain", value_name = "CHAIN_ID", required = true)]
    pub chains: Vec<u64>,

    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Parser, Clone)]
pub struct DecodeArgs {
    /// Deployment calldata (hex) or a transaction hash
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// RPC endpoint to fetch the transaction from
    #[arg(long, env = "ETH_RPC_URL")]
    pub rpc_url: Option<String>,
}

#[derive(Parser, Clone)]
pub struct CloneArgs {
    /// Hash of the original deployment transaction
    #[arg(value_name = "TX_HASH")]
    pub tx_hash: String,

    /// RPC endpoint of the chain the original Safe lives on
    #[arg(long, env = "ETH_RPC_URL")]
    pub source_rpc_url: String,

    /// Address of the original Safe; when omitted its code is looked up on the source chain
    #[arg(long)]
    pub safe: Option<String>,

    /// Target chain ID (repeatable)
    #[arg(long = "chain", value_name = "CHAIN_ID", required = true)]
    pub chains: Vec<u64>,

    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Args, Clone)]
pub struct SubmitArgs {
    /// Send this amount (wei) to the new Safe in the deployment transaction
    #[arg(long)]
    pub fund: Option<String>,

    /// Skip confirmation prompt
    #[arg(long)]
    pub no_confirm: bool,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

#[derive(Args, Clone)]
pub struct WalletArgs {
    /// Raw private key
    #[arg(long, env = "PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Prompt for private key interactively
    #[arg(short, long)]
    pub interactive: bool,
}
