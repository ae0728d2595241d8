use thiserror::Error;

use crate::btcstaking::StakingError;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed hex, key, or byte-length input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Well-formed but semantically invalid staking parameter
    #[error("{0}")]
    Validation(String),

    /// Staking protocol rejected the composed envelope or transaction
    #[error("Staking protocol error: {0}")]
    Protocol(#[from] StakingError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input file missing, unreadable, or undecodable
    #[error("{0}")]
    InputFile(String),

    /// Staker daemon RPC operations
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Staker daemon RPC error types
#[derive(Error, Debug)]
pub enum RpcError {
    /// Daemon address could not be turned into an endpoint URL
    #[error("Invalid daemon address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Connection refused, reset, or any other transport-level failure
    #[error("Transport failure calling {method}: {message}")]
    Transport { method: String, message: String },

    /// Request did not complete before the configured or caller deadline
    #[error("Request timeout: {timeout_seconds}s for {method}")]
    Timeout { timeout_seconds: u64, method: String },

    /// Daemon answered with a non-success HTTP status
    #[error("HTTP status {status} for {method}")]
    HttpStatus { status: u16, method: String },

    /// Response body was not a well-formed JSON-RPC response for this call
    #[error("Invalid response for {method}: {message}")]
    InvalidResponse { method: String, message: String },

    /// Daemon returned a JSON-RPC error object
    #[error("RPC call {method} failed with code {code}: {message}")]
    Remote {
        method: String,
        code: i64,
        message: String,
        data: Option<String>,
    },
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
