use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{config, ContractError};

const POSITION: Symbol = symbol_short!("POS");
const POSITION_CTR: Symbol = symbol_short!("POS_CTR");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StakeRole {
    Operator,
    Delegator,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PositionStatus {
    Active,
    /// Exited during the given epoch.
    Exited(u32),
}

/// A single staking position bound to one node.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub id: u64,
    pub holder: Address,
    pub role: StakeRole,
    pub node_id: u64,
    pub tier_id: u32,
    pub principal: i128,
    /// `principal × tier.weight_bps / 10_000`; fixed for the position's life.
    pub weighted_amount: i128,
    pub lock_until_epoch: u32,
    pub created_epoch: u32,
    /// Every epoch up to and including this one has been settled.
    pub last_settled_epoch: u32,
    /// Settled but not yet paid out.
    pub unclaimed: i128,
    pub status: PositionStatus,
}

impl Position {
    pub fn is_active(&self) -> bool {
        self.status == PositionStatus::Active
    }

    /// Whether the position contributes weight to `epoch`.
    ///
    /// Stakes count from the epoch after creation; exits stop counting after
    /// the exit epoch.
    pub fn holds_weight_at(&self, epoch: u32) -> bool {
        if epoch <= self.created_epoch {
            return false;
        }
        match self.status {
            PositionStatus::Active => true,
            PositionStatus::Exited(exit_epoch) => epoch <= exit_epoch,
        }
    }
}

fn position_key(id: u64) -> (Symbol, u64) {
    (POSITION, id)
}

/// Allocate the next position id, starting at 1.
pub fn next_position_id(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&POSITION_CTR).unwrap_or(0);
    let next = current.saturating_add(1);
    env.storage().instance().set(&POSITION_CTR, &next);
    next
}

pub fn store(env: &Env, position: &Position) {
    let key = position_key(position.id);
    env.storage().persistent().set(&key, position);
    config::extend_ttl(env, &key);
}

pub fn load(env: &Env, id: u64) -> Result<Position, ContractError> {
    env.storage()
        .persistent()
        .get(&position_key(id))
        .ok_or(ContractError::UnknownPosition)
}

/// Number of positions ever created.
pub fn count(env: &Env) -> u64 {
    env.storage().instance().get(&POSITION_CTR).unwrap_or(0)
}
