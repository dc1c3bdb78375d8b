//! Lock-tier catalog and node registry.
//!
//! Both are written by privileged callers and only read by the ledger. Tiers
//! and node fees never change once written, so positions can rely on them for
//! their whole life.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{config, ContractError};

const TIER: Symbol = symbol_short!("TIER");
const NODE: Symbol = symbol_short!("NODE");

// ── Lock tiers ──────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockTier {
    pub id: u32,
    /// Smallest principal accepted for this tier.
    pub min_amount: i128,
    /// Epochs a position stays locked after creation.
    pub lock_epochs: u32,
    /// Principal multiplier, 10_000 == 1.0×.
    pub weight_bps: u32,
}

fn tier_key(id: u32) -> (Symbol, u32) {
    (TIER, id)
}

pub fn has_tier(env: &Env, id: u32) -> bool {
    env.storage().persistent().has(&tier_key(id))
}

pub fn store_tier(env: &Env, tier: &LockTier) {
    let key = tier_key(tier.id);
    env.storage().persistent().set(&key, tier);
    config::extend_ttl(env, &key);
}

pub fn load_tier(env: &Env, id: u32) -> Result<LockTier, ContractError> {
    env.storage()
        .persistent()
        .get(&tier_key(id))
        .ok_or(ContractError::UnknownTier)
}

// ── Nodes ───────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeStatus {
    /// Approved, waiting for the operator's own stake.
    Approved,
    /// Operator position live; delegators welcome.
    Active,
    /// Operator exited during the given epoch.
    Closed(u32),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub id: u64,
    pub operator: Address,
    pub delegator_fee_bps: u32,
    pub operator_position: Option<u64>,
    pub status: NodeStatus,
}

impl Node {
    /// Whether an operator is around to collect delegator fees for `epoch`.
    pub fn collects_fee_at(&self, epoch: u32) -> bool {
        match self.status {
            NodeStatus::Closed(exit_epoch) => epoch <= exit_epoch,
            NodeStatus::Approved | NodeStatus::Active => true,
        }
    }
}

fn node_key(id: u64) -> (Symbol, u64) {
    (NODE, id)
}

pub fn has_node(env: &Env, id: u64) -> bool {
    env.storage().persistent().has(&node_key(id))
}

pub fn store_node(env: &Env, node: &Node) {
    let key = node_key(node.id);
    env.storage().persistent().set(&key, node);
    config::extend_ttl(env, &key);
}

pub fn load_node(env: &Env, id: u64) -> Result<Node, ContractError> {
    env.storage()
        .persistent()
        .get(&node_key(id))
        .ok_or(ContractError::UnknownNode)
}
