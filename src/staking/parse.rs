//! Hex field parsing for staking inputs
//!
//! Every helper here fails with [`AppError::Parse`] on malformed encodings,
//! except the magic bytes length check which is a validation failure.

use bitcoin::absolute::LockTime;
use bitcoin::consensus::{encode, Decodable};
use bitcoin::transaction::Version;
use bitcoin::{Transaction, TxOut, XOnlyPublicKey};

use crate::btcstaking::MAGIC_BYTES_LEN;
use crate::errors::{AppError, AppResult};

/// Decode a 32-byte BIP-340 (x-only) public key from hex
///
/// A 33-byte compressed key is rejected even when it is a valid point.
pub fn parse_schnorr_pubkey_hex(pk_hex: &str) -> AppResult<XOnlyPublicKey> {
    let pk_bytes = hex::decode(pk_hex)
        .map_err(|e| AppError::Parse(format!("invalid public key hex {}: {}", pk_hex, e)))?;

    XOnlyPublicKey::from_slice(&pk_bytes)
        .map_err(|e| AppError::Parse(format!("invalid schnorr public key {}: {}", pk_hex, e)))
}

/// Decode covenant committee keys, preserving their order
pub fn parse_covenant_keys(covenant_pks_hex: &[String]) -> AppResult<Vec<XOnlyPublicKey>> {
    covenant_pks_hex
        .iter()
        .enumerate()
        .map(|(index, pk_hex)| {
            parse_schnorr_pubkey_hex(pk_hex).map_err(|e| {
                AppError::Parse(format!("covenant committee key {}: {}", index, e))
            })
        })
        .collect()
}

/// Decode magic bytes and enforce the protocol length
pub fn parse_magic_bytes_hex(magic_bytes_hex: &str) -> AppResult<[u8; MAGIC_BYTES_LEN]> {
    let magic_bytes = hex::decode(magic_bytes_hex).map_err(|e| {
        AppError::Parse(format!("invalid magic bytes hex {}: {}", magic_bytes_hex, e))
    })?;

    magic_bytes.try_into().map_err(|_| {
        AppError::Validation(format!(
            "magic bytes should be of length {}",
            MAGIC_BYTES_LEN
        ))
    })
}

/// Decode a consensus-encoded transaction from hex
///
/// Unfunded transactions have no inputs. Some tools serialise them in the
/// legacy layout, which the segwit-aware decoder reads as a bad marker, so
/// that layout is accepted as a fallback.
pub fn parse_btc_tx_hex(tx_hex: &str) -> AppResult<Transaction> {
    let tx_bytes = hex::decode(tx_hex)
        .map_err(|e| AppError::Parse(format!("invalid transaction hex: {}", e)))?;

    match encode::deserialize::<Transaction>(&tx_bytes) {
        Ok(tx) => Ok(tx),
        Err(e) => decode_legacy_without_inputs(&tx_bytes)
            .ok_or_else(|| AppError::Parse(format!("failed to decode transaction: {}", e))),
    }
}

/// `version | 0x00 | outputs | lock_time` with nothing left over
fn decode_legacy_without_inputs(mut bytes: &[u8]) -> Option<Transaction> {
    let version = Version::consensus_decode(&mut bytes).ok()?;
    if u8::consensus_decode(&mut bytes).ok()? != 0 {
        return None;
    }
    let output = Vec::<TxOut>::consensus_decode(&mut bytes).ok()?;
    let lock_time = LockTime::consensus_decode(&mut bytes).ok()?;

    if !bytes.is_empty() || output.is_empty() {
        return None;
    }

    Some(Transaction {
        version,
        lock_time,
        input: vec![],
        output,
    })
}

/// Consensus-encode a transaction as lowercase hex
pub fn serialize_btc_tx_hex(tx: &Transaction) -> String {
    encode::serialize_hex(tx)
}
