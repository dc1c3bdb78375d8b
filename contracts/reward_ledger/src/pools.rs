//! Per-epoch reward pools. Each epoch is funded at most once.

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::{config, ContractError};

const POOL: Symbol = symbol_short!("POOL");

fn pool_key(epoch: u32) -> (Symbol, u32) {
    (POOL, epoch)
}

/// Deposited amount for `epoch`, if it has been funded.
pub fn get(env: &Env, epoch: u32) -> Option<i128> {
    env.storage().persistent().get(&pool_key(epoch))
}

pub fn record(env: &Env, epoch: u32, amount: i128) -> Result<(), ContractError> {
    let key = pool_key(epoch);
    if env.storage().persistent().has(&key) {
        return Err(ContractError::DuplicateDeposit);
    }
    env.storage().persistent().set(&key, &amount);
    config::extend_ttl(env, &key);
    Ok(())
}
