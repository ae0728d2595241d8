//! Common Test Utilities
//!
//! This module provides shared utilities and helper functions used across all test files
//! to reduce code duplication and ensure consistent test setup.

#![allow(dead_code)]

use bitcoin::secp256k1::{Keypair, Secp256k1, SecretKey};
use bitcoin::{Amount, XOnlyPublicKey};
use btc_staker_cli::network::get_btc_network_params;
use btc_staker_cli::staking::StakingParameters;

/// Magic bytes used by the regtest fixtures ("bbt4")
pub const TEST_MAGIC_BYTES_HEX: &str = "62627434";

/// Deterministic x-only key derived from a one-byte seed
pub fn test_key(seed: u8) -> XOnlyPublicKey {
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(&[seed; 32]).unwrap();
    Keypair::from_secret_key(&secp, &sk).x_only_public_key().0
}

pub fn test_key_hex(seed: u8) -> String {
    hex::encode(test_key(seed).serialize())
}

/// Regtest staking of 10000 sats for 100 blocks with a 2-of-3 covenant committee
pub fn regtest_params() -> StakingParameters {
    StakingParameters {
        magic_bytes: *b"bbt4",
        staker_key: test_key(1),
        finality_provider_key: test_key(2),
        covenant_keys: vec![test_key(3), test_key(4), test_key(5)],
        covenant_quorum: 2,
        staking_time_blocks: 100,
        staking_amount: Amount::from_sat(10_000),
        network: get_btc_network_params("regtest").unwrap(),
    }
}

/// Covenant committee of `regtest_params` as hex strings
pub fn regtest_covenant_hex() -> Vec<String> {
    vec![test_key_hex(3), test_key_hex(4), test_key_hex(5)]
}
