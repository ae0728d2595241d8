//! JSON file input for `create-phase1-staking-transaction-json`
//!
//! The file mirrors the command line flags:
//!
//! ```json
//! {
//!   "staker_public_key_hex": "<32-byte x-only key>",
//!   "covenant_members_pk_hex": ["<key>", "<key>"],
//!   "finality_provider_public_key_hex": "<key>",
//!   "staking_amount": 10000,
//!   "staking_time_blocks": 100,
//!   "magic_bytes_hex": "62627434",
//!   "covenant_quorum": 1,
//!   "network": "regtest"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::builder::make_create_phase1_staking_tx_response;
use super::parse::{parse_covenant_keys, parse_magic_bytes_hex, parse_schnorr_pubkey_hex};
use super::types::{CreatePhase1StakingTxResponse, StakingParameters};
use super::validate::{validate_staking_amount, validate_staking_time_blocks};
use crate::btcstaking::StakingProtocol;
use crate::errors::{AppError, AppResult};
use crate::network::get_btc_network_params;

/// JSON mirror of [`StakingParameters`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputBtcStakingTx {
    pub staker_public_key_hex: String,
    pub covenant_members_pk_hex: Vec<String>,
    pub finality_provider_public_key_hex: String,
    pub staking_amount: i64,
    pub staking_time_blocks: i64,
    pub magic_bytes_hex: String,
    pub covenant_quorum: u32,
    pub network: String,
}

impl InputBtcStakingTx {
    /// Read and decode the input file
    pub fn load_from_file(path: &Path) -> AppResult<Self> {
        if path.as_os_str().is_empty() {
            return Err(AppError::InputFile("json file input is empty".to_string()));
        }

        if !path.exists() {
            return Err(AppError::InputFile(format!(
                "json file input {} does not exist",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::InputFile(format!("error reading file {}: {}", path.display(), e))
        })?;

        let input: InputBtcStakingTx = serde_json::from_str(&raw).map_err(|e| {
            AppError::InputFile(format!(
                "error parsing file content {} to struct InputBtcStakingTx from {}: {}",
                raw.trim(),
                path.display(),
                e
            ))
        })?;

        debug!("Loaded staking input from {}", path.display());
        Ok(input)
    }

    /// Parse and validate the raw fields, in the same order as the CLI flags
    pub fn to_staking_parameters(&self) -> AppResult<StakingParameters> {
        let network = get_btc_network_params(&self.network)?;
        let staker_key = parse_schnorr_pubkey_hex(&self.staker_public_key_hex)?;
        let finality_provider_key =
            parse_schnorr_pubkey_hex(&self.finality_provider_public_key_hex)?;
        let staking_amount = validate_staking_amount(self.staking_amount)?;
        let staking_time_blocks = validate_staking_time_blocks(self.staking_time_blocks)?;
        let magic_bytes = parse_magic_bytes_hex(&self.magic_bytes_hex)?;
        let covenant_keys = parse_covenant_keys(&self.covenant_members_pk_hex)?;

        Ok(StakingParameters {
            magic_bytes,
            staker_key,
            finality_provider_key,
            covenant_keys,
            covenant_quorum: self.covenant_quorum,
            staking_time_blocks,
            staking_amount,
            network,
        })
    }

    pub fn to_create_phase1_staking_tx_response<P: StakingProtocol + ?Sized>(
        &self,
        protocol: &P,
    ) -> AppResult<CreatePhase1StakingTxResponse> {
        let params = self.to_staking_parameters()?;
        make_create_phase1_staking_tx_response(protocol, &params)
    }
}
