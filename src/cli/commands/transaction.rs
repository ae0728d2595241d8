use crate::btcstaking::V0StakingProtocol;
use crate::cli::print_resp_json;
use crate::errors::AppResult;
use crate::network::get_btc_network_params;
use crate::staking::{
    parse_btc_tx_hex, parse_covenant_keys, parse_magic_bytes_hex, verify_tx,
    CreatePhase1StakingTxResponse, InputBtcStakingTx,
};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Commands related to Babylon BTC staking transactions
#[derive(Args)]
pub struct TransactionCommand {
    #[command(subcommand)]
    pub action: TransactionCommands,
}

impl TransactionCommand {
    pub fn run(&self) -> AppResult<()> {
        match &self.action {
            TransactionCommands::CheckPhase1StakingTransaction(args) => {
                check_phase1_staking_transaction(args)?;
                println!("Provided transaction is valid staking transaction!");
                Ok(())
            }
            TransactionCommands::CreatePhase1StakingTransaction(args) => {
                let resp = create_phase1_staking_transaction(args)?;
                print_resp_json(&resp)
            }
            TransactionCommands::CreatePhase1StakingTransactionJson { path } => {
                let resp = create_phase1_staking_transaction_from_json(path)?;
                print_resp_json(&resp)
            }
        }
    }
}

/// Transaction command types
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Checks whether provided staking transaction is valid staking transaction (tx must be funded/have inputs)
    #[command(visible_alias = "cpst")]
    CheckPhase1StakingTransaction(CheckStakingTxArgs),

    /// Creates unsigned and unfunded phase 1 staking transaction
    #[command(visible_alias = "crpst")]
    CreatePhase1StakingTransaction(CreateStakingTxArgs),

    /// Creates unsigned and unfunded phase 1 staking transaction from a JSON file
    #[command(visible_alias = "crpstjson")]
    CreatePhase1StakingTransactionJson {
        /// Full path to the inputBtcStakingTx.json file
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CheckStakingTxArgs {
    /// Staking transaction in hex
    #[arg(long)]
    pub staking_transaction: String,

    /// Magic bytes in op return output in hex
    #[arg(long)]
    pub magic_bytes: String,

    /// BTC public keys of the covenant committee members
    #[arg(long, required = true, num_args = 1)]
    pub covenant_committee_pks: Vec<String>,

    /// Required quorum for the covenant members
    #[arg(long)]
    pub covenant_quorum: u32,

    /// Bitcoin network on which staking should take place one of (mainnet, testnet3, regtest, simnet, signet)
    #[arg(long)]
    pub network: String,
}

#[derive(Args, Debug, Clone)]
pub struct CreateStakingTxArgs {
    /// Staker public key in schnorr format (32 byte) in hex
    #[arg(long)]
    pub staker_pk: String,

    /// Finality provider public key in schnorr format (32 byte) in hex
    #[arg(long)]
    pub finality_provider_pk: String,

    /// Staking amount in satoshis
    #[arg(long, allow_negative_numbers = true)]
    pub staking_amount: i64,

    /// Staking time in BTC blocks
    #[arg(long, alias = "staking-time", allow_negative_numbers = true)]
    pub staking_time_blocks: i64,

    /// Magic bytes in op_return output in hex
    #[arg(long)]
    pub magic_bytes: String,

    /// BTC public keys of the covenant committee members
    #[arg(long, required = true, num_args = 1)]
    pub covenant_committee_pks: Vec<String>,

    /// Required quorum for the covenant members
    #[arg(long)]
    pub covenant_quorum: u32,

    /// Bitcoin network on which staking should take place one of (mainnet, testnet3, regtest, simnet, signet)
    #[arg(long)]
    pub network: String,
}

impl From<&CreateStakingTxArgs> for InputBtcStakingTx {
    fn from(args: &CreateStakingTxArgs) -> Self {
        Self {
            staker_public_key_hex: args.staker_pk.clone(),
            covenant_members_pk_hex: args.covenant_committee_pks.clone(),
            finality_provider_public_key_hex: args.finality_provider_pk.clone(),
            staking_amount: args.staking_amount,
            staking_time_blocks: args.staking_time_blocks,
            magic_bytes_hex: args.magic_bytes.clone(),
            covenant_quorum: args.covenant_quorum,
            network: args.network.clone(),
        }
    }
}

pub fn check_phase1_staking_transaction(args: &CheckStakingTxArgs) -> AppResult<()> {
    let network = get_btc_network_params(&args.network)?;
    // Transaction decoding is reported before any flag validation
    let tx = parse_btc_tx_hex(&args.staking_transaction)?;
    let magic_bytes = parse_magic_bytes_hex(&args.magic_bytes)?;
    let covenant_keys = parse_covenant_keys(&args.covenant_committee_pks)?;

    let parsed = verify_tx(
        &V0StakingProtocol::new(),
        &tx,
        &magic_bytes,
        &covenant_keys,
        args.covenant_quorum,
        network,
    )?;

    info!(
        "Staking output {} locks {} sats for {} blocks",
        parsed.staking_output_idx,
        parsed.staking_output.value.to_sat(),
        parsed.op_return_data.staking_time
    );
    Ok(())
}

pub fn create_phase1_staking_transaction(
    args: &CreateStakingTxArgs,
) -> AppResult<CreatePhase1StakingTxResponse> {
    let input = InputBtcStakingTx::from(args);
    input.to_create_phase1_staking_tx_response(&V0StakingProtocol::new())
}

pub fn create_phase1_staking_transaction_from_json(
    path: &Path,
) -> AppResult<CreatePhase1StakingTxResponse> {
    info!("Reading staking input from {}", path.display());
    let input = InputBtcStakingTx::load_from_file(path)?;
    input.to_create_phase1_staking_tx_response(&V0StakingProtocol::new())
}
