//! Staker daemon response payloads
//!
//! Counters and amounts arrive as decimal strings, and empty lists may be
//! encoded as `null`.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDetail {
    pub amount: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub outputs: Vec<OutputDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    #[serde(rename = "babylon_public_Key")]
    pub babylon_public_key: String,
    #[serde(rename = "bitcoin_public_Key")]
    pub bitcoin_public_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub validators: Vec<ValidatorInfo>,
    #[serde(default)]
    pub total_validators_count: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeResponse {
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingDetails {
    pub staking_tx_hash: String,
    pub staker_address: String,
    pub staking_state: String,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub transaction_idx: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStakingTransactionsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Vec<StakingDetails>,
    #[serde(default)]
    pub total_transaction_count: String,
}
