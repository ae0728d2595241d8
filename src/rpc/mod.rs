//! Staker daemon JSON-RPC integration module
//!
//! This module provides the client side of the staker daemon's JSON-RPC API:
//! - **Client** - typed calls for health, outputs, validators, staking
//! - **Transport** - pluggable request delivery, reqwest over HTTP by default
//! - **Jsonrpc** - JSON-RPC 2.0 envelope encoding and decoding
//! - **Types** - daemon response payloads

pub mod client;
pub mod jsonrpc;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::StakerServiceJsonRpcClient;
pub use transport::{parse_daemon_address, HttpTransport, RpcTransport, TransportResponse};
pub use types::{
    HealthResponse, ListStakingTransactionsResponse, OutputDetail, OutputsResponse,
    StakeResponse, StakingDetails, ValidatorInfo, ValidatorsResponse,
};
