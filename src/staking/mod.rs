//! Staking transaction envelope pipeline
//!
//! This module provides the path from raw command line or JSON inputs to a
//! hex-encoded staking transaction, and back:
//! - **parse** - hex keys, magic bytes and transactions
//! - **validate** - staking amount and duration rules
//! - **builder** - unsigned, unfunded staking transaction construction
//! - **verifier** - phase-1 staking transaction shape checks
//! - **input** - JSON file input adapter
//!
//! The staking protocol itself is reached only through
//! [`crate::btcstaking::StakingProtocol`].

pub mod builder;
pub mod input;
pub mod parse;
pub mod types;
pub mod validate;
pub mod verifier;

pub use builder::{build, make_create_phase1_staking_tx_response, StakingTransactionEnvelope};
pub use input::InputBtcStakingTx;
pub use parse::{
    parse_btc_tx_hex, parse_covenant_keys, parse_magic_bytes_hex, parse_schnorr_pubkey_hex,
    serialize_btc_tx_hex,
};
pub use types::{CreatePhase1StakingTxResponse, StakingParameters};
pub use validate::{validate_staking_amount, validate_staking_time_blocks};
pub use verifier::{verify, verify_tx};
