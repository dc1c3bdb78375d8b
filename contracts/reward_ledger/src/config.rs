use soroban_sdk::{contracttype, symbol_short, Address, Env, IntoVal, Symbol, Val};

use crate::ContractError;

const CONFIG: Symbol = symbol_short!("CONFIG");

/// Persistent entries are bumped to ~120 days whenever they drop below ~30 days
/// (17_280 ledgers per day at 5 s close time).
pub const TTL_THRESHOLD: u32 = 518_400;
pub const TTL_EXTEND_TO: u32 = 2_073_600;

/// Upper bound on epochs a single `sweep` call processes.
pub const MAX_SWEEP_BATCH: u32 = 64;

/// Ledger-wide configuration, fixed at `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Token used for both principal and rewards.
    pub token: Address,
    /// Unix timestamp at which epoch 0 starts.
    pub epoch_zero: u64,
    /// Epoch length in seconds; never zero.
    pub epoch_length: u64,
}

pub fn store(env: &Env, cfg: &LedgerConfig) {
    env.storage().instance().set(&CONFIG, cfg);
}

pub fn load(env: &Env) -> Result<LedgerConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&CONFIG)
}

/// Keep a persistent entry alive.
pub fn extend_ttl<K: IntoVal<Env, Val>>(env: &Env, key: &K) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
