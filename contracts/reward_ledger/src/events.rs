#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::{access::AccessTier, positions::StakeRole};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub token: Address,
    pub epoch_zero: u64,
    pub epoch_length: u64,
    pub timestamp: u64,
}

/// Fired when a lock tier is added to the catalog.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockTierAddedEvent {
    pub tier_id: u32,
    pub min_amount: i128,
    pub lock_epochs: u32,
    pub weight_bps: u32,
    pub timestamp: u64,
}

/// Fired when a node is approved and may receive its operator stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NodeApprovedEvent {
    pub node_id: u64,
    pub operator: Address,
    pub delegator_fee_bps: u32,
    pub timestamp: u64,
}

/// Fired when a position is opened.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub position_id: u64,
    pub holder: Address,
    pub node_id: u64,
    pub role: StakeRole,
    pub principal: i128,
    pub weighted_amount: i128,
    /// First epoch in which the stake earns.
    pub effective_epoch: u32,
    pub timestamp: u64,
}

/// Fired when a position exits and its principal is returned.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExitedEvent {
    pub position_id: u64,
    pub holder: Address,
    pub node_id: u64,
    pub exit_epoch: u32,
    pub principal: i128,
    /// Weight marked stuck for the exit epoch.
    pub stuck_weight: i128,
    pub timestamp: u64,
}

/// Fired when an epoch's reward pool is funded.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsDepositedEvent {
    pub depositor: Address,
    pub epoch: u32,
    pub amount: i128,
    /// Portion credited straight to reclaimable (no stake in that epoch).
    pub reclaimed: i128,
    /// Whether the epoch was queued for sweeping.
    pub queued_for_sweep: bool,
    pub timestamp: u64,
}

/// Fired when a position's cursor advances.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettledEvent {
    pub position_id: u64,
    pub from_epoch: u32,
    pub through_epoch: u32,
    pub accrued: i128,
    /// Cut of the gross share routed to the node operator.
    pub operator_fee: i128,
    pub timestamp: u64,
}

/// Fired when a holder withdraws settled rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsClaimedEvent {
    pub position_id: u64,
    pub holder: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired once per sweep call that reclaimed at least one epoch.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SweptEvent {
    pub first_epoch: u32,
    pub last_epoch: u32,
    pub epochs: u32,
    pub amount: i128,
    /// Fees on stuck delegator weight paid to live operators.
    pub operator_fees: i128,
    pub timestamp: u64,
}

/// Fired when reclaimable funds leave the ledger.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReclaimableWithdrawnEvent {
    pub caller: Address,
    pub to: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrantedEvent {
    pub caller: Address,
    pub target: Address,
    pub tier: AccessTier,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRevokedEvent {
    pub caller: Address,
    pub target: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address, token: Address, epoch_zero: u64, epoch_length: u64) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            token,
            epoch_zero,
            epoch_length,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_lock_tier_added(env: &Env, tier_id: u32, min_amount: i128, lock_epochs: u32, weight_bps: u32) {
    env.events().publish(
        (symbol_short!("TIER_ADD"),),
        LockTierAddedEvent {
            tier_id,
            min_amount,
            lock_epochs,
            weight_bps,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_node_approved(env: &Env, node_id: u64, operator: Address, delegator_fee_bps: u32) {
    env.events().publish(
        (symbol_short!("NODE_APR"), node_id),
        NodeApprovedEvent {
            node_id,
            operator,
            delegator_fee_bps,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_staked(
    env: &Env,
    position_id: u64,
    holder: Address,
    node_id: u64,
    role: StakeRole,
    principal: i128,
    weighted_amount: i128,
    effective_epoch: u32,
) {
    env.events().publish(
        (symbol_short!("STAKED"), holder.clone()),
        StakedEvent {
            position_id,
            holder,
            node_id,
            role,
            principal,
            weighted_amount,
            effective_epoch,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_exited(
    env: &Env,
    position_id: u64,
    holder: Address,
    node_id: u64,
    exit_epoch: u32,
    principal: i128,
    stuck_weight: i128,
) {
    env.events().publish(
        (symbol_short!("EXITED"), holder.clone()),
        ExitedEvent {
            position_id,
            holder,
            node_id,
            exit_epoch,
            principal,
            stuck_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_deposited(
    env: &Env,
    depositor: Address,
    epoch: u32,
    amount: i128,
    reclaimed: i128,
    queued_for_sweep: bool,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), epoch),
        RewardsDepositedEvent {
            depositor,
            epoch,
            amount,
            reclaimed,
            queued_for_sweep,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_settled(
    env: &Env,
    position_id: u64,
    from_epoch: u32,
    through_epoch: u32,
    accrued: i128,
    operator_fee: i128,
) {
    env.events().publish(
        (symbol_short!("SETTLED"), position_id),
        SettledEvent {
            position_id,
            from_epoch,
            through_epoch,
            accrued,
            operator_fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_claimed(env: &Env, position_id: u64, holder: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), holder.clone()),
        RewardsClaimedEvent {
            position_id,
            holder,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_swept(
    env: &Env,
    first_epoch: u32,
    last_epoch: u32,
    epochs: u32,
    amount: i128,
    operator_fees: i128,
) {
    env.events().publish(
        (symbol_short!("SWEPT"),),
        SweptEvent {
            first_epoch,
            last_epoch,
            epochs,
            amount,
            operator_fees,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reclaimable_withdrawn(env: &Env, caller: Address, to: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RECLAIM"), to.clone()),
        ReclaimableWithdrawnEvent {
            caller,
            to,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_access_granted(env: &Env, caller: Address, target: Address, tier: AccessTier) {
    env.events().publish(
        (symbol_short!("ACC_GRANT"), target.clone()),
        AccessGrantedEvent {
            caller,
            target,
            tier,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_access_revoked(env: &Env, caller: Address, target: Address) {
    env.events().publish(
        (symbol_short!("ACC_REVOK"), target.clone()),
        AccessRevokedEvent {
            caller,
            target,
            timestamp: env.ledger().timestamp(),
        },
    );
}
