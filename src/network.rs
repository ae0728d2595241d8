//! Bitcoin network parameter lookup
//!
//! Maps the network names accepted on the command line (`mainnet`, `testnet3`,
//! `regtest`, `simnet`, `signet`) to the chain constants the staking pipeline
//! needs. The table is built once on first use and never mutated.

use bitcoin::bech32::Hrp;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

use crate::errors::{AppError, AppResult};

/// Names accepted by [`get_btc_network_params`], in display order
pub const SUPPORTED_NETWORKS: [&str; 5] = ["mainnet", "testnet3", "regtest", "simnet", "signet"];

/// Chain constants for one Bitcoin network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    /// Canonical network name
    pub name: &'static str,
    /// Human-readable part used for segwit addresses
    pub bech32_hrp: &'static str,
}

impl NetworkParams {
    /// Parsed bech32 HRP for address rendering
    pub fn hrp(&self) -> Hrp {
        // The table only holds valid lowercase HRPs
        Hrp::parse_unchecked(self.bech32_hrp)
    }
}

impl fmt::Display for NetworkParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

lazy_static! {
    static ref NETWORK_PARAMS: HashMap<&'static str, NetworkParams> = {
        let mut table = HashMap::new();
        for params in [
            NetworkParams {
                name: "mainnet",
                bech32_hrp: "bc",
            },
            NetworkParams {
                name: "testnet3",
                bech32_hrp: "tb",
            },
            NetworkParams {
                name: "regtest",
                bech32_hrp: "bcrt",
            },
            NetworkParams {
                name: "simnet",
                bech32_hrp: "sb",
            },
            NetworkParams {
                name: "signet",
                bech32_hrp: "tb",
            },
        ] {
            table.insert(params.name, params);
        }
        table
    };
}

/// Resolve a network name to its chain parameters
pub fn get_btc_network_params(network: &str) -> AppResult<&'static NetworkParams> {
    NETWORK_PARAMS
        .get(network)
        .ok_or_else(|| AppError::Validation(format!("unknown network: {}", network)))
}
