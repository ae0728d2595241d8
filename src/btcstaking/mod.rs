//! Phase-1 staking protocol
//!
//! This module provides the staking-protocol capability consumed by the
//! envelope pipeline:
//! - **StakingProtocol** - trait with the two operations the pipeline needs
//! - **V0StakingProtocol** - identifiable V0 staking outputs (taproot staking
//!   output plus OP_RETURN identifier)
//! - **scripts** - tapscript spending paths of the staking output
//! - **op_return** - V0 identifier payload encoding
//!
//! Anything implementing [`StakingProtocol`] can replace the V0 implementation
//! without changing the builder or verifier.

pub mod error;
pub mod op_return;
pub mod scripts;

pub use error::{StakingError, StakingResult};
pub use op_return::{V0OpReturnData, V0_OP_RETURN_DATA_SIZE, V0_OP_RETURN_VERSION};
pub use scripts::StakingScriptPaths;

use bitcoin::absolute::LockTime;
use bitcoin::bech32::segwit;
use bitcoin::secp256k1::{Secp256k1, VerifyOnly};
use bitcoin::transaction::Version;
use bitcoin::{Amount, ScriptBuf, Transaction, TxOut, XOnlyPublicKey};
use tracing::debug;

use crate::network::NetworkParams;
use crate::staking::StakingParameters;

/// Length of the protocol magic bytes
pub const MAGIC_BYTES_LEN: usize = 4;

/// Staking output, identifier output and the unsigned transaction carrying them
#[derive(Debug, Clone)]
pub struct StakingEnvelope {
    pub staking_output: TxOut,
    pub op_return_output: TxOut,
    pub staking_address: String,
    pub transaction: Transaction,
}

/// Outputs recognised in a phase-1 staking transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedV0StakingTx {
    pub staking_output: TxOut,
    pub staking_output_idx: usize,
    pub op_return_output: TxOut,
    pub op_return_output_idx: usize,
    pub op_return_data: V0OpReturnData,
}

/// Staking-protocol capability used by the envelope builder and verifier
pub trait StakingProtocol {
    /// Build the identifiable staking outputs and the unsigned, unfunded
    /// transaction holding them
    fn compose_staking_envelope(
        &self,
        params: &StakingParameters,
    ) -> StakingResult<StakingEnvelope>;

    /// Check that `tx` carries a well-formed phase-1 staking envelope for
    /// the given covenant committee
    fn parse_staking_envelope(
        &self,
        tx: &Transaction,
        magic_bytes: &[u8; MAGIC_BYTES_LEN],
        covenant_keys: &[XOnlyPublicKey],
        covenant_quorum: u32,
        network: &NetworkParams,
    ) -> StakingResult<ParsedV0StakingTx>;
}

/// V0 identifiable staking transactions
#[derive(Debug, Clone)]
pub struct V0StakingProtocol {
    secp: Secp256k1<VerifyOnly>,
}

impl Default for V0StakingProtocol {
    fn default() -> Self {
        Self::new()
    }
}

impl V0StakingProtocol {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::verification_only(),
        }
    }

    /// Build the taproot staking output for one staker/provider pair
    pub fn build_staking_output(
        &self,
        staker_key: &XOnlyPublicKey,
        finality_provider_key: &XOnlyPublicKey,
        covenant_keys: &[XOnlyPublicKey],
        covenant_quorum: u32,
        staking_time: u16,
        staking_amount: Amount,
    ) -> StakingResult<TxOut> {
        check_covenant_committee(covenant_keys, covenant_quorum)?;

        let paths = StakingScriptPaths::new(
            staker_key,
            std::slice::from_ref(finality_provider_key),
            covenant_keys,
            covenant_quorum,
            staking_time,
        )?;
        let spend_info = paths.spend_info(&self.secp)?;

        Ok(TxOut {
            value: staking_amount,
            script_pubkey: ScriptBuf::new_p2tr_tweaked(spend_info.output_key()),
        })
    }
}

impl StakingProtocol for V0StakingProtocol {
    fn compose_staking_envelope(
        &self,
        params: &StakingParameters,
    ) -> StakingResult<StakingEnvelope> {
        if params.staking_amount == Amount::ZERO {
            return Err(StakingError::NonPositiveStakingAmount);
        }
        if params.staking_time_blocks == 0 {
            return Err(StakingError::ZeroStakingTime);
        }

        let staking_output = self.build_staking_output(
            &params.staker_key,
            &params.finality_provider_key,
            &params.covenant_keys,
            params.covenant_quorum,
            params.staking_time_blocks,
            params.staking_amount,
        )?;

        let op_return_data = V0OpReturnData::new(
            params.magic_bytes,
            params.staker_key,
            params.finality_provider_key,
            params.staking_time_blocks,
        );
        let op_return_output = op_return_data.to_tx_out()?;

        let staking_address = taproot_address(&staking_output, params.network)?;
        debug!(
            "Composed staking output {} ({} sats) on {}",
            staking_address,
            staking_output.value.to_sat(),
            params.network
        );

        let transaction = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![],
            output: vec![staking_output.clone(), op_return_output.clone()],
        };

        Ok(StakingEnvelope {
            staking_output,
            op_return_output,
            staking_address,
            transaction,
        })
    }

    fn parse_staking_envelope(
        &self,
        tx: &Transaction,
        magic_bytes: &[u8; MAGIC_BYTES_LEN],
        covenant_keys: &[XOnlyPublicKey],
        covenant_quorum: u32,
        network: &NetworkParams,
    ) -> StakingResult<ParsedV0StakingTx> {
        if tx.output.len() < 2 {
            return Err(StakingError::TooFewOutputs(tx.output.len()));
        }
        check_covenant_committee(covenant_keys, covenant_quorum)?;

        let (op_return_data, op_return_output_idx) = find_op_return_output(&tx.output)?;

        if &op_return_data.magic_bytes != magic_bytes {
            return Err(StakingError::UnexpectedMagicBytes {
                found: hex::encode(op_return_data.magic_bytes),
                expected: hex::encode(magic_bytes),
            });
        }
        if op_return_data.version != V0_OP_RETURN_VERSION {
            return Err(StakingError::UnexpectedVersion {
                found: op_return_data.version,
                expected: V0_OP_RETURN_VERSION,
            });
        }

        // The identifier carries everything needed to rebuild the expected
        // staking script; only the amount is unknown.
        let expected = self.build_staking_output(
            &op_return_data.staker_key,
            &op_return_data.finality_provider_key,
            covenant_keys,
            covenant_quorum,
            op_return_data.staking_time,
            Amount::ZERO,
        )?;

        let staking_output_idx = find_staking_output(&tx.output, &expected.script_pubkey)?;

        debug!(
            "Recognised staking output {} and op return output {} on {}",
            staking_output_idx, op_return_output_idx, network
        );

        Ok(ParsedV0StakingTx {
            staking_output: tx.output[staking_output_idx].clone(),
            staking_output_idx,
            op_return_output: tx.output[op_return_output_idx].clone(),
            op_return_output_idx,
            op_return_data,
        })
    }
}

fn check_covenant_committee(covenant_keys: &[XOnlyPublicKey], quorum: u32) -> StakingResult<()> {
    if covenant_keys.is_empty() {
        return Err(StakingError::EmptyCovenantKeys);
    }
    if quorum == 0 {
        return Err(StakingError::ZeroCovenantQuorum);
    }
    if quorum as usize > covenant_keys.len() {
        return Err(StakingError::QuorumExceedsCovenantKeys {
            quorum,
            keys: covenant_keys.len(),
        });
    }
    Ok(())
}

/// Exactly one output may decode as a V0 identifier
fn find_op_return_output(outputs: &[TxOut]) -> StakingResult<(V0OpReturnData, usize)> {
    let mut found: Option<(V0OpReturnData, usize)> = None;

    for (idx, output) in outputs.iter().enumerate() {
        let Ok(data) = V0OpReturnData::from_tx_out(output) else {
            continue;
        };
        if found.is_some() {
            return Err(StakingError::MultipleOpReturnOutputs);
        }
        found = Some((data, idx));
    }

    found.ok_or(StakingError::MissingOpReturnOutput)
}

/// Exactly one output may pay to the expected staking script
fn find_staking_output(outputs: &[TxOut], expected: &ScriptBuf) -> StakingResult<usize> {
    let mut matches = outputs
        .iter()
        .enumerate()
        .filter(|(_, output)| &output.script_pubkey == expected)
        .map(|(idx, _)| idx);

    let idx = matches.next().ok_or(StakingError::MissingStakingOutput)?;
    if matches.next().is_some() {
        return Err(StakingError::MultipleStakingOutputs);
    }
    Ok(idx)
}

/// Render a P2TR output as a bech32m address for the given network
fn taproot_address(output: &TxOut, network: &NetworkParams) -> StakingResult<String> {
    // OP_1 OP_PUSHBYTES_32 <output key>
    let program = &output.script_pubkey.as_bytes()[2..];
    segwit::encode_v1(network.hrp(), program).map_err(|e| StakingError::Address(e.to_string()))
}
