use bitcoin::{Amount, XOnlyPublicKey};
use serde::{Deserialize, Serialize};

use crate::btcstaking::MAGIC_BYTES_LEN;
use crate::network::NetworkParams;

/// Validated inputs of a phase-1 staking transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingParameters {
    pub magic_bytes: [u8; MAGIC_BYTES_LEN],
    pub staker_key: XOnlyPublicKey,
    pub finality_provider_key: XOnlyPublicKey,
    /// Order and duplicates kept exactly as supplied
    pub covenant_keys: Vec<XOnlyPublicKey>,
    pub covenant_quorum: u32,
    pub staking_time_blocks: u16,
    pub staking_amount: Amount,
    pub network: &'static NetworkParams,
}

/// Output of `create-phase1-staking-transaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePhase1StakingTxResponse {
    pub staking_tx_hex: String,
}
