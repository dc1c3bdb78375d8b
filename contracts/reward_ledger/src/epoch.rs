use soroban_sdk::Env;

use crate::{config, ContractError};

/// Epoch index containing `timestamp`.
///
/// ```text
/// epoch(t) = (t − epoch_zero) / epoch_length      for t ≥ epoch_zero
/// ```
///
/// Timestamps before `epoch_zero` have no epoch and yield `NotLaunched`.
/// An index past `u32::MAX` saturates; at one-second epochs that is ~136 years.
pub fn epoch_at(epoch_zero: u64, epoch_length: u64, timestamp: u64) -> Result<u32, ContractError> {
    if timestamp < epoch_zero {
        return Err(ContractError::NotLaunched);
    }
    if epoch_length == 0 {
        return Err(ContractError::InvalidInput);
    }
    let index = (timestamp - epoch_zero) / epoch_length;
    Ok(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Epoch of the current ledger timestamp under the stored configuration.
pub fn current(env: &Env) -> Result<u32, ContractError> {
    let cfg = config::load(env)?;
    epoch_at(cfg.epoch_zero, cfg.epoch_length, env.ledger().timestamp())
}

/// Last fully elapsed epoch, if any.
pub fn last_elapsed(current: u32) -> Option<u32> {
    current.checked_sub(1)
}
