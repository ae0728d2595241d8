//! V0 staking identifier carried in the OP_RETURN output
//!
//! Layout of the pushed payload (71 bytes):
//! - Bytes 0-3: magic bytes
//! - Byte 4: version (always 0)
//! - Bytes 5-36: staker x-only public key
//! - Bytes 37-68: finality provider x-only public key
//! - Bytes 69-70: staking time in blocks (big-endian u16)
//!
//! The output script is `OP_RETURN OP_PUSHBYTES_71 <payload>`.

use bitcoin::opcodes::all::OP_RETURN;
use bitcoin::script::PushBytesBuf;
use bitcoin::{Amount, ScriptBuf, TxOut, XOnlyPublicKey};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};

use super::error::{StakingError, StakingResult};
use super::MAGIC_BYTES_LEN;

/// Only version understood by phase-1 staking
pub const V0_OP_RETURN_VERSION: u8 = 0;

const PUBKEY_LEN: usize = 32;

/// Size of the V0 payload pushed after OP_RETURN
pub const V0_OP_RETURN_DATA_SIZE: usize = MAGIC_BYTES_LEN + 1 + PUBKEY_LEN + PUBKEY_LEN + 2;

/// Decoded V0 OP_RETURN payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V0OpReturnData {
    pub magic_bytes: [u8; MAGIC_BYTES_LEN],
    pub version: u8,
    pub staker_key: XOnlyPublicKey,
    pub finality_provider_key: XOnlyPublicKey,
    pub staking_time: u16,
}

impl V0OpReturnData {
    pub fn new(
        magic_bytes: [u8; MAGIC_BYTES_LEN],
        staker_key: XOnlyPublicKey,
        finality_provider_key: XOnlyPublicKey,
        staking_time: u16,
    ) -> Self {
        Self {
            magic_bytes,
            version: V0_OP_RETURN_VERSION,
            staker_key,
            finality_provider_key,
            staking_time,
        }
    }

    /// Serialise to the fixed-size payload
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(V0_OP_RETURN_DATA_SIZE);
        data.extend_from_slice(&self.magic_bytes);
        data.push(self.version);
        data.extend_from_slice(&self.staker_key.serialize());
        data.extend_from_slice(&self.finality_provider_key.serialize());
        // Writing into a Vec cannot fail
        let _ = data.write_u16::<BigEndian>(self.staking_time);
        data
    }

    /// Parse the fixed-size payload
    ///
    /// Magic bytes and version are decoded but not checked against any
    /// expectation here; callers compare them once an output is identified.
    pub fn from_bytes(data: &[u8]) -> StakingResult<Self> {
        if data.len() != V0_OP_RETURN_DATA_SIZE {
            return Err(StakingError::InvalidOpReturnLength {
                expected: V0_OP_RETURN_DATA_SIZE,
                actual: data.len(),
            });
        }

        let mut cursor = Cursor::new(data);
        let mut magic_bytes = [0u8; MAGIC_BYTES_LEN];
        let mut staker = [0u8; PUBKEY_LEN];
        let mut finality_provider = [0u8; PUBKEY_LEN];

        cursor.read_exact(&mut magic_bytes).map_err(read_err)?;
        let version = cursor.read_u8().map_err(read_err)?;
        cursor.read_exact(&mut staker).map_err(read_err)?;
        cursor.read_exact(&mut finality_provider).map_err(read_err)?;
        let staking_time = cursor.read_u16::<BigEndian>().map_err(read_err)?;

        let staker_key = XOnlyPublicKey::from_slice(&staker).map_err(|e| {
            StakingError::InvalidOpReturnData(format!("invalid staker public key: {}", e))
        })?;
        let finality_provider_key = XOnlyPublicKey::from_slice(&finality_provider).map_err(|e| {
            StakingError::InvalidOpReturnData(format!(
                "invalid finality provider public key: {}",
                e
            ))
        })?;

        Ok(Self {
            magic_bytes,
            version,
            staker_key,
            finality_provider_key,
            staking_time,
        })
    }

    /// Build the zero-value OP_RETURN output carrying this payload
    pub fn to_tx_out(&self) -> StakingResult<TxOut> {
        let push = PushBytesBuf::try_from(self.to_bytes())
            .map_err(|e| StakingError::InvalidOpReturnData(e.to_string()))?;

        Ok(TxOut {
            value: Amount::ZERO,
            script_pubkey: ScriptBuf::new_op_return(push),
        })
    }

    /// Decode a V0 payload from an output script
    pub fn from_tx_out(output: &TxOut) -> StakingResult<Self> {
        let script = output.script_pubkey.as_bytes();

        if script.first() != Some(&OP_RETURN.to_u8()) {
            return Err(StakingError::NotOpReturn);
        }

        // OP_RETURN + OP_PUSHBYTES_71 + payload
        if script.len() != V0_OP_RETURN_DATA_SIZE + 2 {
            return Err(StakingError::InvalidOpReturnLength {
                expected: V0_OP_RETURN_DATA_SIZE + 2,
                actual: script.len(),
            });
        }

        if script[1] as usize != V0_OP_RETURN_DATA_SIZE {
            return Err(StakingError::InvalidOpReturnData(format!(
                "unexpected push opcode 0x{:02x}",
                script[1]
            )));
        }

        Self::from_bytes(&script[2..])
    }
}

fn read_err(e: std::io::Error) -> StakingError {
    StakingError::InvalidOpReturnData(e.to_string())
}
