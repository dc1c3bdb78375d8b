//! Stuck shares and the sweeper.
//!
//! `stuck_shares[e]` collects weight that was present in epoch `e` but whose
//! owner's cursor has moved past `e` without a pool to pay from. Shares are
//! only ever added to an epoch before it is funded, so once a pool lands the
//! stuck total for that epoch is final. Funding an epoch with stuck shares
//! queues it, and `sweep` drains the queue, each epoch exactly once.
//!
//! Delegator weight is also kept per node. Its gross share is split at sweep
//! time like a live settlement: the node's operator still collects the fee,
//! only the delegator's net is reclaimed.
//!
//! ```text
//! (STUCK, epoch)          → total stuck weight
//! (DLG_STK, epoch, node)  → stuck delegator weight under that node's fee
//! (DLG_NODES, epoch)      → nodes with stuck delegator weight
//! (SWEEP_Q, index)        → queued epoch, indices in [SWP_HEAD, SWP_TAIL)
//! ```

use soroban_sdk::{symbol_short, Env, Symbol, Vec};

use crate::{
    checkpoints::{self, ShareScope},
    config::{self, MAX_SWEEP_BATCH},
    custody, pools, registry, rewards, settlement, ContractError,
};

const STUCK: Symbol = symbol_short!("STUCK");
const DELEGATED: Symbol = symbol_short!("DLG_STK");
const DELEGATED_NODES: Symbol = symbol_short!("DLG_NODES");
const SWEPT: Symbol = symbol_short!("SWEPT");
const SWEEP_QUEUE: Symbol = symbol_short!("SWEEP_Q");
const SWEEP_HEAD: Symbol = symbol_short!("SWP_HEAD");
const SWEEP_TAIL: Symbol = symbol_short!("SWP_TAIL");

/// One sweep call's work.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SweepOutcome {
    pub first_epoch: u32,
    pub last_epoch: u32,
    pub epochs: u32,
    /// Moved to reclaimable.
    pub amount: i128,
    /// Fees on stuck delegator weight credited to live operators.
    pub operator_fees: i128,
}

fn stuck_key(epoch: u32) -> (Symbol, u32) {
    (STUCK, epoch)
}

fn delegated_key(epoch: u32, node_id: u64) -> (Symbol, u32, u64) {
    (DELEGATED, epoch, node_id)
}

fn delegated_nodes_key(epoch: u32) -> (Symbol, u32) {
    (DELEGATED_NODES, epoch)
}

fn swept_key(epoch: u32) -> (Symbol, u32) {
    (SWEPT, epoch)
}

fn queue_key(index: u32) -> (Symbol, u32) {
    (SWEEP_QUEUE, index)
}

// ── Tracking ────────────────────────────────────────────────────────────────

pub fn shares_at(env: &Env, epoch: u32) -> i128 {
    env.storage()
        .persistent()
        .get(&stuck_key(epoch))
        .unwrap_or(0)
}

/// Stuck delegator weight of `node_id` in `epoch`.
pub fn delegated_at(env: &Env, epoch: u32, node_id: u64) -> i128 {
    env.storage()
        .persistent()
        .get(&delegated_key(epoch, node_id))
        .unwrap_or(0)
}

fn delegated_nodes(env: &Env, epoch: u32) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&delegated_nodes_key(epoch))
        .unwrap_or(Vec::new(env))
}

fn add_to_total(env: &Env, epoch: u32, weight: i128) -> Result<(), ContractError> {
    let key = stuck_key(epoch);
    let updated = shares_at(env, epoch)
        .checked_add(weight)
        .ok_or(ContractError::Overflow)?;
    env.storage().persistent().set(&key, &updated);
    config::extend_ttl(env, &key);
    Ok(())
}

/// Weight reclaimed in full once `epoch` is funded.
pub fn accumulate(env: &Env, epoch: u32, weight: i128) -> Result<(), ContractError> {
    if weight <= 0 {
        return Ok(());
    }
    add_to_total(env, epoch, weight)
}

/// Delegator weight whose gross share is still subject to `node_id`'s fee.
pub fn accumulate_delegated(
    env: &Env,
    epoch: u32,
    node_id: u64,
    weight: i128,
) -> Result<(), ContractError> {
    if weight <= 0 {
        return Ok(());
    }
    add_to_total(env, epoch, weight)?;

    let previous = delegated_at(env, epoch, node_id);
    if previous == 0 {
        let nodes_key = delegated_nodes_key(epoch);
        let mut nodes = delegated_nodes(env, epoch);
        nodes.push_back(node_id);
        env.storage().persistent().set(&nodes_key, &nodes);
        config::extend_ttl(env, &nodes_key);
    }

    let key = delegated_key(epoch, node_id);
    let updated = previous.checked_add(weight).ok_or(ContractError::Overflow)?;
    env.storage().persistent().set(&key, &updated);
    config::extend_ttl(env, &key);
    Ok(())
}

/// Amount reclaimed from `epoch`, once swept.
pub fn swept_at(env: &Env, epoch: u32) -> Option<i128> {
    env.storage().persistent().get(&swept_key(epoch))
}

// ── Queue ───────────────────────────────────────────────────────────────────

fn bounds(env: &Env) -> (u32, u32) {
    let head: u32 = env.storage().instance().get(&SWEEP_HEAD).unwrap_or(0);
    let tail: u32 = env.storage().instance().get(&SWEEP_TAIL).unwrap_or(0);
    (head, tail)
}

/// Funded epochs waiting for `sweep`, oldest first.
pub fn pending(env: &Env) -> Vec<u32> {
    let (head, tail) = bounds(env);
    let mut out = Vec::new(env);
    for index in head..tail {
        if let Some(epoch) = env.storage().persistent().get(&queue_key(index)) {
            out.push_back(epoch);
        }
    }
    out
}

/// Called right after `epoch` is funded. Returns whether it was queued.
pub fn enqueue_if_stuck(env: &Env, epoch: u32) -> bool {
    if shares_at(env, epoch) <= 0 {
        return false;
    }
    let (_, tail) = bounds(env);
    let key = queue_key(tail);
    env.storage().persistent().set(&key, &epoch);
    config::extend_ttl(env, &key);
    env.storage().instance().set(&SWEEP_TAIL, &(tail + 1));
    true
}

// ── Sweeping ────────────────────────────────────────────────────────────────

/// Reclaimed amount for one funded epoch, plus fees credited to operators.
///
/// ```text
/// plain    = stuck_shares[e] − Σ delegated[e][n]
/// reclaim  = pool × plain / total
///          + Σ (gross_n − fee_n)           gross_n = pool × delegated[e][n] / total
///          + fee_n where no live operator
/// ```
fn sweep_epoch(env: &Env, epoch: u32) -> Result<(i128, i128), ContractError> {
    let pool = pools::get(env, epoch).unwrap_or(0);
    let total = checkpoints::query(env, ShareScope::Platform, epoch);

    let mut reclaimed: i128 = 0;
    let mut credited: i128 = 0;
    let mut delegated: i128 = 0;

    for node_id in delegated_nodes(env, epoch).iter() {
        let weight = delegated_at(env, epoch, node_id);
        delegated = delegated.checked_add(weight).ok_or(ContractError::Overflow)?;

        let node = registry::load_node(env, node_id)?;
        let gross = rewards::proportional_share(pool, weight, total)?;
        let fee = rewards::fee_amount(gross, node.delegator_fee_bps);
        let unowned_fee = settlement::credit_operator_fee(env, &node, fee)?;

        credited = credited
            .checked_add(fee - unowned_fee)
            .ok_or(ContractError::Overflow)?;
        reclaimed = reclaimed
            .checked_add(gross - fee + unowned_fee)
            .ok_or(ContractError::Overflow)?;
    }

    let plain = shares_at(env, epoch) - delegated;
    let plain_amount = rewards::proportional_share(pool, plain, total)?;
    reclaimed = reclaimed
        .checked_add(plain_amount)
        .ok_or(ContractError::Overflow)?;

    Ok((reclaimed, credited))
}

/// Sweep up to `MAX_SWEEP_BATCH` queued epochs, oldest first.
///
/// Returns `None` when nothing was queued.
pub fn sweep(env: &Env) -> Result<Option<SweepOutcome>, ContractError> {
    let (head, tail) = bounds(env);
    if head == tail {
        return Ok(None);
    }

    let end = tail.min(head.saturating_add(MAX_SWEEP_BATCH));
    let mut outcome = SweepOutcome {
        first_epoch: u32::MAX,
        last_epoch: 0,
        epochs: 0,
        amount: 0,
        operator_fees: 0,
    };

    for index in head..end {
        let slot = queue_key(index);
        let epoch: Option<u32> = env.storage().persistent().get(&slot);
        env.storage().persistent().remove(&slot);
        let Some(epoch) = epoch else { continue };

        let (amount, credited) = sweep_epoch(env, epoch)?;

        let key = swept_key(epoch);
        env.storage().persistent().set(&key, &amount);
        config::extend_ttl(env, &key);

        outcome.first_epoch = outcome.first_epoch.min(epoch);
        outcome.last_epoch = outcome.last_epoch.max(epoch);
        outcome.epochs += 1;
        outcome.amount = outcome
            .amount
            .checked_add(amount)
            .ok_or(ContractError::Overflow)?;
        outcome.operator_fees = outcome
            .operator_fees
            .checked_add(credited)
            .ok_or(ContractError::Overflow)?;
    }

    env.storage().instance().set(&SWEEP_HEAD, &end);

    custody::reclaim(env, outcome.amount)?;
    Ok(Some(outcome))
}
