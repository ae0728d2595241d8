//! Tapscript spending paths of the staking output
//!
//! The staking output is a taproot output whose internal key is provably
//! unspendable, so it can only be spent through one of three script paths:
//!
//! - **timelock**: `<staker> OP_CHECKSIGVERIFY <staking_time> OP_CSV`
//! - **unbonding**: `<staker> OP_CHECKSIGVERIFY <covenant multisig>`
//! - **slashing**: `<staker> OP_CHECKSIGVERIFY <fp multisig> <covenant multisig>`
//!
//! Multisig fragments sort their keys and use `OP_CHECKSIGADD`.

use bitcoin::opcodes::all::{
    OP_CHECKSIG, OP_CHECKSIGADD, OP_CHECKSIGVERIFY, OP_CSV, OP_NUMEQUAL, OP_NUMEQUALVERIFY,
};
use bitcoin::script::Builder;
use bitcoin::secp256k1::{Secp256k1, Verification};
use bitcoin::taproot::{TaprootBuilder, TaprootSpendInfo};
use bitcoin::{ScriptBuf, XOnlyPublicKey};
use std::collections::HashSet;

use super::error::{StakingError, StakingResult};

/// BIP-341 "H" point: x coordinate with no known discrete logarithm
pub const UNSPENDABLE_KEY_PATH_KEY: [u8; 32] = [
    0x50, 0x92, 0x9b, 0x74, 0xc1, 0xa0, 0x49, 0x54, 0xb7, 0x8b, 0x4b, 0x60, 0x35, 0xe9, 0x7a, 0x5e,
    0x07, 0x8a, 0x5a, 0x0f, 0x28, 0xec, 0x96, 0xd5, 0x47, 0xbf, 0xee, 0x9a, 0xce, 0x80, 0x3a, 0xc0,
];

/// Internal key for every staking output
pub fn unspendable_key_path_internal_key() -> XOnlyPublicKey {
    XOnlyPublicKey::from_slice(&UNSPENDABLE_KEY_PATH_KEY)
        .unwrap_or_else(|_| unreachable!("BIP-341 H point is a valid x-only key"))
}

/// The three tapscript leaves of a staking output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingScriptPaths {
    pub time_lock_path_script: ScriptBuf,
    pub unbonding_path_script: ScriptBuf,
    pub slashing_path_script: ScriptBuf,
}

impl StakingScriptPaths {
    pub fn new(
        staker_key: &XOnlyPublicKey,
        finality_provider_keys: &[XOnlyPublicKey],
        covenant_keys: &[XOnlyPublicKey],
        covenant_quorum: u32,
        staking_time: u16,
    ) -> StakingResult<Self> {
        check_for_duplicate_keys(staker_key, finality_provider_keys, covenant_keys)?;

        let covenant_multisig = build_multisig_script(covenant_keys, covenant_quorum, false)?;
        let finality_provider_multisig = build_multisig_script(finality_provider_keys, 1, true)?;
        let staker_sig = build_single_key_sig_script(staker_key, true);

        let time_lock_path_script = build_time_lock_script(staker_key, staking_time);
        let unbonding_path_script = aggregate_scripts(&[&staker_sig, &covenant_multisig]);
        let slashing_path_script = aggregate_scripts(&[
            &staker_sig,
            &finality_provider_multisig,
            &covenant_multisig,
        ]);

        Ok(Self {
            time_lock_path_script,
            unbonding_path_script,
            slashing_path_script,
        })
    }

    /// Assemble the script tree and tweak the unspendable internal key
    ///
    /// Leaves 0 and 1 share a branch at depth 2, leaf 2 sits at depth 1.
    pub fn spend_info<C: Verification>(
        &self,
        secp: &Secp256k1<C>,
    ) -> StakingResult<TaprootSpendInfo> {
        let builder = TaprootBuilder::new()
            .add_leaf(2, self.time_lock_path_script.clone())
            .and_then(|b| b.add_leaf(2, self.unbonding_path_script.clone()))
            .and_then(|b| b.add_leaf(1, self.slashing_path_script.clone()))
            .map_err(|e| StakingError::TaprootTree(e.to_string()))?;

        builder
            .finalize(secp, unspendable_key_path_internal_key())
            .map_err(|_| StakingError::TaprootTree("script tree is not complete".to_string()))
    }
}

fn build_time_lock_script(key: &XOnlyPublicKey, lock_time: u16) -> ScriptBuf {
    Builder::new()
        .push_x_only_key(key)
        .push_opcode(OP_CHECKSIGVERIFY)
        .push_int(i64::from(lock_time))
        .push_opcode(OP_CSV)
        .into_script()
}

fn build_single_key_sig_script(key: &XOnlyPublicKey, with_verify: bool) -> ScriptBuf {
    let op = if with_verify {
        OP_CHECKSIGVERIFY
    } else {
        OP_CHECKSIG
    };
    Builder::new().push_x_only_key(key).push_opcode(op).into_script()
}

/// `k1 OP_CHECKSIG k2 OP_CHECKSIGADD ... kn OP_CHECKSIGADD m OP_NUMEQUAL[VERIFY]`
fn build_multisig_script(
    keys: &[XOnlyPublicKey],
    threshold: u32,
    with_verify: bool,
) -> StakingResult<ScriptBuf> {
    if keys.is_empty() {
        return Err(StakingError::EmptyCovenantKeys);
    }
    if threshold == 0 {
        return Err(StakingError::ZeroCovenantQuorum);
    }
    if threshold as usize > keys.len() {
        return Err(StakingError::QuorumExceedsCovenantKeys {
            quorum: threshold,
            keys: keys.len(),
        });
    }

    if keys.len() == 1 {
        return Ok(build_single_key_sig_script(&keys[0], with_verify));
    }

    let mut sorted = keys.to_vec();
    sorted.sort_by_key(|k| k.serialize());

    let mut builder = Builder::new();
    for (i, key) in sorted.iter().enumerate() {
        builder = builder.push_x_only_key(key);
        builder = if i == 0 {
            builder.push_opcode(OP_CHECKSIG)
        } else {
            builder.push_opcode(OP_CHECKSIGADD)
        };
    }

    builder = builder.push_int(i64::from(threshold));
    builder = if with_verify {
        builder.push_opcode(OP_NUMEQUALVERIFY)
    } else {
        builder.push_opcode(OP_NUMEQUAL)
    };

    Ok(builder.into_script())
}

fn aggregate_scripts(scripts: &[&ScriptBuf]) -> ScriptBuf {
    let mut bytes = Vec::new();
    for script in scripts {
        bytes.extend_from_slice(script.as_bytes());
    }
    ScriptBuf::from_bytes(bytes)
}

/// No key may appear twice across the staker, finality provider and covenant sets
fn check_for_duplicate_keys(
    staker_key: &XOnlyPublicKey,
    finality_provider_keys: &[XOnlyPublicKey],
    covenant_keys: &[XOnlyPublicKey],
) -> StakingResult<()> {
    let mut seen = HashSet::new();

    for key in std::iter::once(staker_key)
        .chain(finality_provider_keys)
        .chain(covenant_keys)
    {
        if !seen.insert(key.serialize()) {
            return Err(StakingError::DuplicateKey(key.to_string()));
        }
    }

    Ok(())
}
