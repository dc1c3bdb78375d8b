//! Conversion of elapsed epochs into claimable balance.
//!
//! A position's cursor (`last_settled_epoch`) only moves forward. Every epoch
//! it passes is either paid from that epoch's pool or, when the pool has not
//! been deposited yet, handed to the stuck-share tracker: the position can
//! never come back for it, so a later deposit must be reclaimable.
//!
//! Per funded epoch a position earns `gross = pool × weight / total`. While
//! its node collects a fee, a delegator keeps `gross − fee` and the fee is
//! credited to the operator's position in the same call.

use soroban_sdk::Env;

use crate::{
    checkpoints::{self, ShareScope},
    custody, pools,
    positions::{self, Position, StakeRole},
    registry::Node,
    rewards, stuck, ContractError,
};

/// Result of advancing one position's cursor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub from_epoch: u32,
    pub through_epoch: u32,
    pub accrued: i128,
    /// Fee taken from the position's gross share for the node operator.
    pub operator_fee: i128,
}

/// Weight `position` earns with during `epoch`.
pub fn weight_at(position: &Position, epoch: u32) -> i128 {
    if position.holds_weight_at(epoch) {
        position.weighted_amount
    } else {
        0
    }
}

fn pays_fee_at(position: &Position, node: &Node, epoch: u32) -> bool {
    position.role == StakeRole::Delegator
        && node.delegator_fee_bps > 0
        && node.collects_fee_at(epoch)
}

/// Record `weight` of `position` as stuck in `epoch`.
///
/// Delegator weight under a fee stays attributed to its node so the sweep can
/// still pay the operator its cut.
pub fn mark_stuck(
    env: &Env,
    position: &Position,
    node: &Node,
    epoch: u32,
    weight: i128,
) -> Result<(), ContractError> {
    if pays_fee_at(position, node, epoch) {
        stuck::accumulate_delegated(env, epoch, node.id, weight)
    } else {
        stuck::accumulate(env, epoch, weight)
    }
}

/// Credit `fee` to the node operator's position.
///
/// Returns the part no live operator can collect; the caller must reclaim it.
pub fn credit_operator_fee(env: &Env, node: &Node, fee: i128) -> Result<i128, ContractError> {
    if fee <= 0 {
        return Ok(0);
    }
    let Some(operator_id) = node.operator_position else {
        return Ok(fee);
    };
    let mut operator = positions::load(env, operator_id)?;
    if !operator.is_active() {
        return Ok(fee);
    }
    operator.unclaimed = operator
        .unclaimed
        .checked_add(fee)
        .ok_or(ContractError::Overflow)?;
    positions::store(env, &operator);
    Ok(0)
}

/// Settle `position` through `through` (inclusive).
///
/// The caller guarantees `through` has fully elapsed. Returns `None` when the
/// cursor is already there or the position has exited. The position is
/// updated in place; persisting it is up to the caller. Fees are routed
/// before returning.
pub fn settle_through(
    env: &Env,
    position: &mut Position,
    node: &Node,
    through: u32,
) -> Result<Option<Settlement>, ContractError> {
    if !position.is_active() || through <= position.last_settled_epoch {
        return Ok(None);
    }

    let from_epoch = position.last_settled_epoch + 1;
    let mut accrued: i128 = 0;
    let mut operator_fee: i128 = 0;

    for epoch in from_epoch..=through {
        let weight = weight_at(position, epoch);
        if weight == 0 {
            continue;
        }
        let Some(pool) = pools::get(env, epoch) else {
            mark_stuck(env, position, node, epoch, weight)?;
            continue;
        };

        let total = checkpoints::query(env, ShareScope::Platform, epoch);
        let gross = rewards::proportional_share(pool, weight, total)?;
        let fee = if pays_fee_at(position, node, epoch) {
            rewards::fee_amount(gross, node.delegator_fee_bps)
        } else {
            0
        };

        accrued = accrued
            .checked_add(gross - fee)
            .ok_or(ContractError::Overflow)?;
        operator_fee = operator_fee
            .checked_add(fee)
            .ok_or(ContractError::Overflow)?;
    }

    position.last_settled_epoch = through;
    position.unclaimed = position
        .unclaimed
        .checked_add(accrued)
        .ok_or(ContractError::Overflow)?;

    let unowned = credit_operator_fee(env, node, operator_fee)?;
    if unowned > 0 {
        custody::reclaim(env, unowned)?;
    }

    Ok(Some(Settlement {
        from_epoch,
        through_epoch: through,
        accrued,
        operator_fee,
    }))
}
