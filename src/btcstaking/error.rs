//! Staking protocol error types

use thiserror::Error;

/// Result type for staking protocol operations
pub type StakingResult<T> = Result<T, StakingError>;

/// Reasons the staking protocol rejects an envelope or a transaction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("covenant keys cannot be empty")]
    EmptyCovenantKeys,

    #[error("covenant quorum must be greater than 0")]
    ZeroCovenantQuorum,

    #[error("covenant quorum {quorum} cannot be greater than number of covenant keys {keys}")]
    QuorumExceedsCovenantKeys { quorum: u32, keys: usize },

    #[error("duplicate key found: {0}")]
    DuplicateKey(String),

    #[error("staking amount must be greater than 0")]
    NonPositiveStakingAmount,

    #[error("staking time must be greater than 0")]
    ZeroStakingTime,

    #[error("failed to build taproot script tree: {0}")]
    TaprootTree(String),

    #[error("staking tx must have at least 2 outputs, got {0}")]
    TooFewOutputs(usize),

    #[error("invalid op return data length: expected {expected}, got {actual}")]
    InvalidOpReturnLength { expected: usize, actual: usize },

    #[error("output is not an op return output")]
    NotOpReturn,

    #[error("invalid op return data: {0}")]
    InvalidOpReturnData(String),

    #[error("multiple op return outputs found")]
    MultipleOpReturnOutputs,

    #[error("transaction does not have expected op return output")]
    MissingOpReturnOutput,

    #[error("unexpected magic bytes: {found}, expected: {expected}")]
    UnexpectedMagicBytes { found: String, expected: String },

    #[error("unexpected version: {found}, expected: {expected}")]
    UnexpectedVersion { found: u8, expected: u8 },

    #[error("multiple staking outputs found")]
    MultipleStakingOutputs,

    #[error("staking output not found in potential staking transaction")]
    MissingStakingOutput,

    #[error("failed to encode staking address: {0}")]
    Address(String),
}
