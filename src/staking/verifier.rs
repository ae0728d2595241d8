//! Phase-1 staking transaction shape checks

use bitcoin::{Transaction, XOnlyPublicKey};
use tracing::debug;

use super::parse::parse_btc_tx_hex;
use crate::btcstaking::{ParsedV0StakingTx, StakingProtocol, MAGIC_BYTES_LEN};
use crate::errors::AppResult;
use crate::network::NetworkParams;

/// Decode `tx_hex` and check it carries a phase-1 staking envelope
pub fn verify<P: StakingProtocol + ?Sized>(
    protocol: &P,
    tx_hex: &str,
    magic_bytes: &[u8; MAGIC_BYTES_LEN],
    covenant_keys: &[XOnlyPublicKey],
    covenant_quorum: u32,
    network: &NetworkParams,
) -> AppResult<ParsedV0StakingTx> {
    let tx = parse_btc_tx_hex(tx_hex)?;
    verify_tx(
        protocol,
        &tx,
        magic_bytes,
        covenant_keys,
        covenant_quorum,
        network,
    )
}

/// Check an already decoded transaction carries a phase-1 staking envelope
///
/// Funding and signatures are not looked at; only the outputs matter.
pub fn verify_tx<P: StakingProtocol + ?Sized>(
    protocol: &P,
    tx: &Transaction,
    magic_bytes: &[u8; MAGIC_BYTES_LEN],
    covenant_keys: &[XOnlyPublicKey],
    covenant_quorum: u32,
    network: &NetworkParams,
) -> AppResult<ParsedV0StakingTx> {
    debug!(
        "Checking transaction {} with {} outputs",
        tx.compute_txid(),
        tx.output.len()
    );

    let parsed =
        protocol.parse_staking_envelope(tx, magic_bytes, covenant_keys, covenant_quorum, network)?;

    Ok(parsed)
}
