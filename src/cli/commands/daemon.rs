use crate::cli::print_resp_json;
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::rpc::StakerServiceJsonRpcClient;
use clap::{Args, Subcommand};
use tracing::info;

/// Commands talking to a running staker daemon
#[derive(Args)]
pub struct DaemonCommand {
    /// Full address of the staker daemon in format tcp://<host>:<port> (overrides config.toml)
    #[arg(long, global = true)]
    pub daemon_address: Option<String>,

    #[command(subcommand)]
    pub action: DaemonCommands,
}

/// Daemon command types
#[derive(Subcommand)]
pub enum DaemonCommands {
    /// Check if staker daemon is running
    #[command(visible_alias = "ch")]
    CheckHealth,

    /// List unspent outputs in connected wallet
    #[command(visible_alias = "lo")]
    ListOutputs,

    /// List current Babylon finality providers
    #[command(visible_alias = "bv")]
    BabylonValidators {
        /// Offset of the first validator to return
        #[arg(long)]
        offset: Option<u32>,

        /// Maximum number of validators to return
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Stake an amount of BTC to Babylon
    #[command(visible_alias = "st")]
    Stake {
        /// BTC address of the staker in hex
        #[arg(long)]
        staker_address: String,

        /// Staking amount in satoshis
        #[arg(long, allow_negative_numbers = true)]
        staking_amount: i64,

        /// BTC public key of the finality provider in hex
        #[arg(long, alias = "finality-providers-pks")]
        finality_provider_pk: String,

        /// Staking time in BTC blocks
        #[arg(long, allow_negative_numbers = true)]
        staking_time: i64,
    },

    /// List current staking transactions in db
    #[command(visible_alias = "lst")]
    ListStakingTransactions {
        /// Offset of the first transaction to return
        #[arg(long)]
        offset: Option<u32>,

        /// Maximum number of transactions to return
        #[arg(long)]
        limit: Option<u32>,
    },
}

impl DaemonCommand {
    pub async fn run(&self) -> AppResult<()> {
        let app_config = AppConfig::get_defaults()?;
        let mut rpc_config = app_config.staker_rpc;

        // Override with CLI arguments
        if let Some(address) = &self.daemon_address {
            rpc_config.daemon_address = address.clone();
        }

        info!("Connecting to staker daemon at {}", rpc_config.daemon_address);
        let client = StakerServiceJsonRpcClient::new(&rpc_config.daemon_address, &rpc_config)?;

        match &self.action {
            DaemonCommands::CheckHealth => {
                let resp = client.health().await?;
                print_resp_json(&resp)
            }
            DaemonCommands::ListOutputs => {
                let resp = client.list_outputs().await?;
                print_resp_json(&resp)
            }
            DaemonCommands::BabylonValidators { offset, limit } => {
                let resp = client.babylon_validators(*offset, *limit).await?;
                print_resp_json(&resp)
            }
            DaemonCommands::Stake {
                staker_address,
                staking_amount,
                finality_provider_pk,
                staking_time,
            } => {
                // Forwarded unchecked; the daemon owns staking limits
                let resp = client
                    .stake(
                        staker_address,
                        *staking_amount,
                        finality_provider_pk,
                        *staking_time,
                    )
                    .await?;
                print_resp_json(&resp)
            }
            DaemonCommands::ListStakingTransactions { offset, limit } => {
                let resp = client.list_staking_transactions(*offset, *limit).await?;
                print_resp_json(&resp)
            }
        }
    }
}
