//! Bitcoin staking CLI
//!
//! Builds and checks unsigned phase-1 staking transactions offline, and drives
//! a running staker daemon over JSON-RPC.

pub mod btcstaking;
pub mod cli;
pub mod config;
pub mod errors;
pub mod network;
pub mod rpc;
pub mod staking;
