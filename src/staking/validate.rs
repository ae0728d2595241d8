//! Domain checks on staking parameters
//!
//! Pure functions: no I/O, same input always gives the same verdict.

use bitcoin::Amount;

use crate::errors::{AppError, AppResult};

/// Staking amount in satoshis must be strictly positive
pub fn validate_staking_amount(amount: i64) -> AppResult<Amount> {
    if amount <= 0 {
        return Err(AppError::Validation(
            "staking amount should be greater than 0".to_string(),
        ));
    }

    Ok(Amount::from_sat(amount as u64))
}

/// Staking time must fit the relative timelock range `1..=65535`
pub fn validate_staking_time_blocks(time_blocks: i64) -> AppResult<u16> {
    if time_blocks <= 0 {
        return Err(AppError::Validation(
            "staking time blocks should be greater than 0".to_string(),
        ));
    }

    u16::try_from(time_blocks).map_err(|_| {
        AppError::Validation(format!(
            "staking time blocks should be less or equal to {}",
            u16::MAX
        ))
    })
}
