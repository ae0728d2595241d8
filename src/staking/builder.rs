//! Unsigned phase-1 staking transaction construction

use tracing::{debug, info};

use super::parse::serialize_btc_tx_hex;
use super::types::{CreatePhase1StakingTxResponse, StakingParameters};
use crate::btcstaking::StakingProtocol;
use crate::errors::AppResult;

/// Unsigned, unfunded staking transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingTransactionEnvelope {
    pub transaction: bitcoin::Transaction,
}

impl StakingTransactionEnvelope {
    pub fn to_hex(&self) -> String {
        serialize_btc_tx_hex(&self.transaction)
    }
}

/// Compose the staking envelope for already validated parameters
///
/// Protocol failures are returned unchanged.
pub fn build<P: StakingProtocol + ?Sized>(
    protocol: &P,
    params: &StakingParameters,
) -> AppResult<StakingTransactionEnvelope> {
    debug!(
        "Composing staking envelope: {} sats for {} blocks, {} of {} covenant keys on {}",
        params.staking_amount.to_sat(),
        params.staking_time_blocks,
        params.covenant_quorum,
        params.covenant_keys.len(),
        params.network
    );

    let envelope = protocol.compose_staking_envelope(params)?;
    info!("Staking output address: {}", envelope.staking_address);

    Ok(StakingTransactionEnvelope {
        transaction: envelope.transaction,
    })
}

/// Build and serialise the staking transaction as a hex response
pub fn make_create_phase1_staking_tx_response<P: StakingProtocol + ?Sized>(
    protocol: &P,
    params: &StakingParameters,
) -> AppResult<CreatePhase1StakingTxResponse> {
    let envelope = build(protocol, params)?;

    Ok(CreatePhase1StakingTxResponse {
        staking_tx_hex: envelope.to_hex(),
    })
}
