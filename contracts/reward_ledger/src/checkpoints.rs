//! Sparse history of aggregate weighted stake.
//!
//! Each scope (one per node, one platform-wide) owns a tail-written sequence of
//! [`Checkpoint`]s with strictly increasing epochs, stored one entry per index:
//!
//! ```text
//! (prefix, scope_id)        → length
//! (prefix, scope_id, index) → Checkpoint
//! ```
//!
//! A checkpoint's aggregate holds from its epoch until the next checkpoint's
//! epoch, so a point lookup is a binary search for the greatest epoch `<=` the
//! query. Writes only ever touch the tail, and a tail whose epoch nets out to
//! the aggregate before it is dropped.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::{config, ContractError};

const NODE_CKPT: Symbol = symbol_short!("N_CKPT");
const PLATFORM_CKPT: Symbol = symbol_short!("P_CKPT");

/// Aggregate weighted stake effective from `epoch` onward.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checkpoint {
    pub epoch: u32,
    pub aggregate: i128,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShareScope {
    Platform,
    Node(u64),
}

impl ShareScope {
    fn prefix(&self) -> (Symbol, u64) {
        match self {
            ShareScope::Platform => (PLATFORM_CKPT, 0),
            ShareScope::Node(id) => (NODE_CKPT, *id),
        }
    }

    fn len_key(&self) -> (Symbol, u64) {
        self.prefix()
    }

    fn entry_key(&self, index: u32) -> (Symbol, u64, u32) {
        let (prefix, id) = self.prefix();
        (prefix, id, index)
    }
}

// ── Reads ───────────────────────────────────────────────────────────────────

/// Number of checkpoints recorded for `scope`.
pub fn count(env: &Env, scope: ShareScope) -> u32 {
    env.storage()
        .persistent()
        .get(&scope.len_key())
        .unwrap_or(0)
}

pub fn get(env: &Env, scope: ShareScope, index: u32) -> Option<Checkpoint> {
    env.storage().persistent().get(&scope.entry_key(index))
}

/// Aggregate effective at `epoch`, or 0 when nothing was recorded at or
/// before it.
pub fn query(env: &Env, scope: ShareScope, epoch: u32) -> i128 {
    let len = count(env, scope);
    if len == 0 {
        return 0;
    }

    // Most lookups target recent epochs.
    if let Some(last) = get(env, scope, len - 1) {
        if last.epoch <= epoch {
            return last.aggregate;
        }
    }

    // First index whose epoch is strictly greater than `epoch`.
    let mut lo = 0u32;
    let mut hi = len - 1;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let mid_epoch = get(env, scope, mid).map(|cp| cp.epoch).unwrap_or(u32::MAX);
        if mid_epoch <= epoch {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    if lo == 0 {
        return 0;
    }
    get(env, scope, lo - 1).map(|cp| cp.aggregate).unwrap_or(0)
}

// ── Writes ──────────────────────────────────────────────────────────────────

/// Add `delta` to the aggregate effective at `epoch` and return the new value.
///
/// Changes landing on the latest checkpoint's epoch coalesce into it, or
/// remove it when they cancel out; a later epoch appends. Epochs behind the
/// latest checkpoint would rewrite history and are refused with
/// `CheckpointOrder`.
pub fn record_change(
    env: &Env,
    scope: ShareScope,
    epoch: u32,
    delta: i128,
) -> Result<i128, ContractError> {
    let len = count(env, scope);

    let previous = if len > 0 {
        let tail = get(env, scope, len - 1).ok_or(ContractError::CheckpointOrder)?;
        if epoch < tail.epoch {
            return Err(ContractError::CheckpointOrder);
        }
        Some(tail)
    } else {
        None
    };

    let base = previous.as_ref().map(|cp| cp.aggregate).unwrap_or(0);
    if delta == 0 {
        return Ok(base);
    }
    let aggregate = base.checked_add(delta).ok_or(ContractError::Overflow)?;

    match previous {
        Some(mut tail) if tail.epoch == epoch => {
            let before = if len >= 2 {
                get(env, scope, len - 2).map(|cp| cp.aggregate).unwrap_or(0)
            } else {
                0
            };
            if aggregate == before {
                // Net-zero epoch: the tail no longer changes anything.
                env.storage().persistent().remove(&scope.entry_key(len - 1));
                let len_key = scope.len_key();
                if len == 1 {
                    env.storage().persistent().remove(&len_key);
                } else {
                    env.storage().persistent().set(&len_key, &(len - 1));
                    config::extend_ttl(env, &len_key);
                }
                return Ok(aggregate);
            }
            tail.aggregate = aggregate;
            let key = scope.entry_key(len - 1);
            env.storage().persistent().set(&key, &tail);
            config::extend_ttl(env, &key);
        }
        _ => {
            let key = scope.entry_key(len);
            env.storage()
                .persistent()
                .set(&key, &Checkpoint { epoch, aggregate });
            config::extend_ttl(env, &key);

            let len_key = scope.len_key();
            env.storage().persistent().set(&len_key, &(len + 1));
            config::extend_ttl(env, &len_key);
        }
    }

    Ok(aggregate)
}

/// Apply the same delta to a node and to the platform aggregate.
pub fn record_stake_change(
    env: &Env,
    node_id: u64,
    epoch: u32,
    delta: i128,
) -> Result<(), ContractError> {
    record_change(env, ShareScope::Node(node_id), epoch, delta)?;
    record_change(env, ShareScope::Platform, epoch, delta)?;
    Ok(())
}
