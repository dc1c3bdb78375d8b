use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{config, ContractError};

const ACCESS_PREFIX: Symbol = symbol_short!("ACCESS");
const SUPER_ADMIN: Symbol = symbol_short!("S_ADMIN");

/// Ranked roles for the ledger's privileged entry points.
///
/// - `Depositor`  – may fund reward pools.
/// - `Manager`    – depositor rights plus lock tiers and node approvals.
/// - `SuperAdmin` – everything, including reclaimable withdrawals and
///                  granting or revoking tiers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AccessTier {
    Depositor = 1,
    Manager = 2,
    SuperAdmin = 3,
}

impl AccessTier {
    pub fn rank(&self) -> u32 {
        match self {
            AccessTier::Depositor => 1,
            AccessTier::Manager => 2,
            AccessTier::SuperAdmin => 3,
        }
    }

    pub fn has_at_least(&self, min_tier: &AccessTier) -> bool {
        self.rank() >= min_tier.rank()
    }
}

fn tier_key(holder: &Address) -> (Symbol, Address) {
    (ACCESS_PREFIX, holder.clone())
}

pub fn set_tier(env: &Env, holder: &Address, tier: AccessTier) {
    let key = tier_key(holder);
    env.storage().persistent().set(&key, &tier);
    config::extend_ttl(env, &key);
}

pub fn get_tier(env: &Env, holder: &Address) -> Option<AccessTier> {
    env.storage().persistent().get(&tier_key(holder))
}

pub fn remove_tier(env: &Env, holder: &Address) {
    env.storage().persistent().remove(&tier_key(holder));
}

/// `Unauthorized` unless `caller` holds at least `min_tier`.
pub fn require_tier(env: &Env, caller: &Address, min_tier: &AccessTier) -> Result<(), ContractError> {
    match get_tier(env, caller) {
        Some(tier) if tier.has_at_least(min_tier) => Ok(()),
        _ => Err(ContractError::Unauthorized),
    }
}

/// Record the bootstrap admin and give it `SuperAdmin`.
pub fn set_super_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&SUPER_ADMIN, admin);
    set_tier(env, admin, AccessTier::SuperAdmin);
}

pub fn get_super_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&SUPER_ADMIN)
}

/// Grant `tier` to `target`. Caller must already be authenticated.
pub fn promote(env: &Env, caller: &Address, target: &Address, tier: AccessTier) -> Result<(), ContractError> {
    require_tier(env, caller, &AccessTier::SuperAdmin)?;
    set_tier(env, target, tier);
    Ok(())
}

/// Revoke every tier from `target`. The bootstrap admin cannot be demoted, so
/// the ledger always keeps one `SuperAdmin`.
pub fn demote(env: &Env, caller: &Address, target: &Address) -> Result<(), ContractError> {
    require_tier(env, caller, &AccessTier::SuperAdmin)?;
    if get_super_admin(env).as_ref() == Some(target) {
        return Err(ContractError::Unauthorized);
    }
    remove_tier(env, target);
    Ok(())
}
