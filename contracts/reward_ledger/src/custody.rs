use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::ContractError;

const CUSTODY: Symbol = symbol_short!("CUSTODY");

/// Token balance held by the ledger, split by who it is owed to.
///
/// `circulating` backs live principal and rewards still owed to positions;
/// `reclaimable` is swept reward that no position can ever claim. Their sum
/// always equals the contract's token balance.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CustodyBalance {
    pub circulating: i128,
    pub reclaimable: i128,
}

pub fn load(env: &Env) -> CustodyBalance {
    env.storage()
        .instance()
        .get(&CUSTODY)
        .unwrap_or_default()
}

fn store(env: &Env, balance: &CustodyBalance) {
    env.storage().instance().set(&CUSTODY, balance);
}

/// Funds entering custody (principal or reward deposits).
pub fn credit(env: &Env, amount: i128) -> Result<CustodyBalance, ContractError> {
    let mut balance = load(env);
    balance.circulating = balance
        .circulating
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    store(env, &balance);
    Ok(balance)
}

/// Funds leaving custody to a position holder.
pub fn debit(env: &Env, amount: i128) -> Result<CustodyBalance, ContractError> {
    let mut balance = load(env);
    if amount > balance.circulating {
        return Err(ContractError::Overflow);
    }
    balance.circulating -= amount;
    store(env, &balance);
    Ok(balance)
}

/// Move verified-unowed funds from circulating into reclaimable.
pub fn reclaim(env: &Env, amount: i128) -> Result<CustodyBalance, ContractError> {
    let mut balance = load(env);
    if amount > balance.circulating {
        return Err(ContractError::Overflow);
    }
    balance.circulating -= amount;
    balance.reclaimable = balance
        .reclaimable
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    store(env, &balance);
    Ok(balance)
}

/// Zero the reclaimable balance and return what it held.
pub fn take_reclaimable(env: &Env) -> i128 {
    let mut balance = load(env);
    let amount = balance.reclaimable;
    balance.reclaimable = 0;
    store(env, &balance);
    amount
}
