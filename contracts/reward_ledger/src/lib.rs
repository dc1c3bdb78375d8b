#![no_std]

pub mod access;
pub mod checkpoints;
pub mod config;
pub mod custody;
pub mod epoch;
pub mod events;
pub mod pools;
pub mod positions;
pub mod registry;
pub mod rewards;
pub mod settlement;
pub mod stuck;

use soroban_sdk::{contract, contractimpl, token, Address, Env, Vec};

pub use access::AccessTier;
pub use checkpoints::Checkpoint;
use checkpoints::ShareScope;
pub use config::LedgerConfig;
pub use custody::CustodyBalance;
pub use positions::{Position, PositionStatus, StakeRole};
pub use registry::{LockTier, Node, NodeStatus};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    NotLaunched = 5,
    DuplicateDeposit = 6,
    FutureEpoch = 7,
    UnknownPosition = 8,
    ZeroBasis = 9,
    UnknownTier = 10,
    UnknownNode = 11,
    TierExists = 12,
    NodeExists = 13,
    NodeNotOpen = 14,
    BelowMinimum = 15,
    LockActive = 16,
    PositionExited = 17,
    CheckpointOrder = 18,
    Overflow = 19,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RewardLedgerContract;

#[contractimpl]
impl RewardLedgerContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `token`        – SAC address of the token staked and paid as reward.
    /// * `epoch_zero`   – timestamp at which epoch 0 begins.
    /// * `epoch_length` – epoch length in seconds.
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        epoch_zero: u64,
        epoch_length: u64,
    ) -> Result<(), ContractError> {
        if config::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if epoch_length == 0 {
            return Err(ContractError::InvalidInput);
        }

        config::store(
            &env,
            &LedgerConfig {
                token: token.clone(),
                epoch_zero,
                epoch_length,
            },
        );
        access::set_super_admin(&env, &admin);

        events::publish_initialized(&env, admin, token, epoch_zero, epoch_length);

        Ok(())
    }

    // ── Catalog & registry ──────────────────────────────────────────────────

    /// Add a lock tier. Tiers are write-once.
    ///
    /// Requires at least `Manager`.
    pub fn add_lock_tier(
        env: Env,
        caller: Address,
        tier_id: u32,
        min_amount: i128,
        lock_epochs: u32,
        weight_bps: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_tier(&env, &caller, &AccessTier::Manager)?;

        if min_amount < 0 || weight_bps == 0 {
            return Err(ContractError::InvalidInput);
        }
        if registry::has_tier(&env, tier_id) {
            return Err(ContractError::TierExists);
        }

        registry::store_tier(
            &env,
            &LockTier {
                id: tier_id,
                min_amount,
                lock_epochs,
                weight_bps,
            },
        );

        events::publish_lock_tier_added(&env, tier_id, min_amount, lock_epochs, weight_bps);

        Ok(())
    }

    /// Register an approved node. Its operator must stake before delegators
    /// can join.
    ///
    /// Requires at least `Manager`.
    pub fn approve_node(
        env: Env,
        caller: Address,
        node_id: u64,
        operator: Address,
        delegator_fee_bps: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_tier(&env, &caller, &AccessTier::Manager)?;

        if delegator_fee_bps as i128 > rewards::BPS_DENOMINATOR {
            return Err(ContractError::InvalidInput);
        }
        if registry::has_node(&env, node_id) {
            return Err(ContractError::NodeExists);
        }

        registry::store_node(
            &env,
            &Node {
                id: node_id,
                operator: operator.clone(),
                delegator_fee_bps,
                operator_position: None,
                status: NodeStatus::Approved,
            },
        );

        events::publish_node_approved(&env, node_id, operator, delegator_fee_bps);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Open a position of `amount` tokens against `node_id`.
    ///
    /// The stake counts from the next epoch onward; the running epoch's
    /// aggregate is never touched.
    pub fn stake(
        env: Env,
        holder: Address,
        node_id: u64,
        amount: i128,
        tier_id: u32,
        role: StakeRole,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        holder.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let current = epoch::current(&env)?;

        let tier = registry::load_tier(&env, tier_id)?;
        if amount < tier.min_amount {
            return Err(ContractError::BelowMinimum);
        }

        let mut node = registry::load_node(&env, node_id)?;
        match role {
            StakeRole::Operator => {
                if holder != node.operator {
                    return Err(ContractError::Unauthorized);
                }
                if node.status != NodeStatus::Approved {
                    return Err(ContractError::NodeNotOpen);
                }
            }
            StakeRole::Delegator => {
                if node.status != NodeStatus::Active {
                    return Err(ContractError::NodeNotOpen);
                }
            }
        }

        let weighted_amount = rewards::weighted_amount(amount, tier.weight_bps)?;
        if weighted_amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let effective_epoch = current.checked_add(1).ok_or(ContractError::Overflow)?;

        // 1. Pull principal into custody.
        Self::transfer(&env, &holder, &env.current_contract_address(), amount)?;
        custody::credit(&env, amount)?;

        // 2. Record the position.
        let position_id = positions::next_position_id(&env);
        let position = Position {
            id: position_id,
            holder: holder.clone(),
            role: role.clone(),
            node_id,
            tier_id,
            principal: amount,
            weighted_amount,
            lock_until_epoch: current.saturating_add(tier.lock_epochs),
            created_epoch: current,
            last_settled_epoch: current,
            unclaimed: 0,
            status: PositionStatus::Active,
        };
        positions::store(&env, &position);

        // 3. Extend the node and platform aggregates from the next epoch.
        checkpoints::record_stake_change(&env, node_id, effective_epoch, weighted_amount)?;

        if role == StakeRole::Operator {
            node.operator_position = Some(position_id);
            node.status = NodeStatus::Active;
            registry::store_node(&env, &node);
        }

        events::publish_staked(
            &env,
            position_id,
            holder,
            node_id,
            role,
            amount,
            weighted_amount,
            effective_epoch,
        );

        Ok(position_id)
    }

    /// Close a position and return its principal.
    ///
    /// Elapsed epochs are settled first. The running epoch, in which the
    /// position still holds weight, can never be settled by it again and is
    /// marked stuck. An operator exit closes its node.
    pub fn exit(env: Env, holder: Address, position_id: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        holder.require_auth();

        let mut position = positions::load(&env, position_id)?;
        if position.holder != holder {
            return Err(ContractError::Unauthorized);
        }
        if !position.is_active() {
            return Err(ContractError::PositionExited);
        }

        let current = epoch::current(&env)?;
        if current < position.lock_until_epoch {
            return Err(ContractError::LockActive);
        }
        let removal_epoch = current.checked_add(1).ok_or(ContractError::Overflow)?;

        let mut node = registry::load_node(&env, position.node_id)?;

        // 1. Force-settle everything that has elapsed.
        if let Some(through) = epoch::last_elapsed(current) {
            if let Some(done) = settlement::settle_through(&env, &mut position, &node, through)? {
                events::publish_settled(
                    &env,
                    position_id,
                    done.from_epoch,
                    done.through_epoch,
                    done.accrued,
                    done.operator_fee,
                );
            }
        }

        // 2. The exit epoch's share is unclaimable from here on.
        let stuck_weight = settlement::weight_at(&position, current);
        settlement::mark_stuck(&env, &position, &node, current, stuck_weight)?;

        // 3. Drop the weight from the next epoch onward.
        checkpoints::record_stake_change(
            &env,
            position.node_id,
            removal_epoch,
            -position.weighted_amount,
        )?;

        position.status = PositionStatus::Exited(current);
        position.last_settled_epoch = current;
        positions::store(&env, &position);

        if position.role == StakeRole::Operator {
            node.status = NodeStatus::Closed(current);
            registry::store_node(&env, &node);
        }

        // 4. Release principal.
        custody::debit(&env, position.principal)?;
        Self::transfer(
            &env,
            &env.current_contract_address(),
            &holder,
            position.principal,
        )?;

        events::publish_exited(
            &env,
            position_id,
            holder,
            position.node_id,
            current,
            position.principal,
            stuck_weight,
        );

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Fund the reward pool of an elapsed epoch.
    ///
    /// An epoch nobody staked in has no claimant; its whole pool goes straight
    /// to the reclaimable balance. Otherwise the epoch is queued for sweeping
    /// if it carries stuck shares.
    ///
    /// Requires at least `Depositor`.
    pub fn deposit_rewards(
        env: Env,
        depositor: Address,
        epoch: u32,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();
        access::require_tier(&env, &depositor, &AccessTier::Depositor)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }
        let current = epoch::current(&env)?;
        if epoch >= current {
            return Err(ContractError::FutureEpoch);
        }
        if pools::get(&env, epoch).is_some() {
            return Err(ContractError::DuplicateDeposit);
        }

        Self::transfer(&env, &depositor, &env.current_contract_address(), amount)?;
        pools::record(&env, epoch, amount)?;
        custody::credit(&env, amount)?;

        let basis = checkpoints::query(&env, ShareScope::Platform, epoch);
        let (reclaimed, queued) = if basis == 0 {
            custody::reclaim(&env, amount)?;
            (amount, false)
        } else {
            (0, stuck::enqueue_if_stuck(&env, epoch))
        };

        events::publish_rewards_deposited(&env, depositor, epoch, amount, reclaimed, queued);

        Ok(())
    }

    /// Settle every elapsed epoch of a position. Anyone may call this.
    pub fn settle(env: Env, position_id: u64) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        let position = positions::load(&env, position_id)?;

        let current = epoch::current(&env)?;
        match epoch::last_elapsed(current) {
            Some(through) => Self::settle_position(&env, position, through),
            None => Ok(0),
        }
    }

    /// Settle a position through `upto_epoch` only, bounding the work done.
    ///
    /// Fails with `FutureEpoch` unless `upto_epoch` has fully elapsed.
    pub fn settle_upto(env: Env, position_id: u64, upto_epoch: u32) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        let position = positions::load(&env, position_id)?;

        let current = epoch::current(&env)?;
        if upto_epoch >= current {
            return Err(ContractError::FutureEpoch);
        }
        Self::settle_position(&env, position, upto_epoch)
    }

    /// Pay out everything a position has accrued.
    ///
    /// Active positions are settled first. Exited positions can still claim
    /// what they accrued before exiting.
    pub fn claim_rewards(env: Env, holder: Address, position_id: u64) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        holder.require_auth();

        let mut position = positions::load(&env, position_id)?;
        if position.holder != holder {
            return Err(ContractError::Unauthorized);
        }

        if position.is_active() {
            let current = epoch::current(&env)?;
            if let Some(through) = epoch::last_elapsed(current) {
                let node = registry::load_node(&env, position.node_id)?;
                if let Some(done) = settlement::settle_through(&env, &mut position, &node, through)? {
                    events::publish_settled(
                        &env,
                        position_id,
                        done.from_epoch,
                        done.through_epoch,
                        done.accrued,
                        done.operator_fee,
                    );
                }
            }
        }

        let amount = position.unclaimed;
        position.unclaimed = 0;
        positions::store(&env, &position);

        if amount <= 0 {
            // Nothing owed.
            return Ok(0);
        }

        custody::debit(&env, amount)?;
        Self::transfer(&env, &env.current_contract_address(), &holder, amount)?;

        events::publish_rewards_claimed(&env, position_id, holder, amount);

        Ok(amount)
    }

    // ── Stuck funds ─────────────────────────────────────────────────────────

    /// Move the stuck fraction of funded epochs into the reclaimable balance.
    ///
    /// Anyone may call this; it returns 0 when nothing is queued.
    pub fn sweep(env: Env) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;

        match stuck::sweep(&env)? {
            Some(outcome) => {
                events::publish_swept(
                    &env,
                    outcome.first_epoch,
                    outcome.last_epoch,
                    outcome.epochs,
                    outcome.amount,
                    outcome.operator_fees,
                );
                Ok(outcome.amount)
            }
            None => Ok(0),
        }
    }

    /// Pay the whole reclaimable balance to `to`.
    ///
    /// Requires `SuperAdmin`.
    pub fn withdraw_reclaimable(env: Env, caller: Address, to: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_tier(&env, &caller, &AccessTier::SuperAdmin)?;

        let amount = custody::take_reclaimable(&env);
        if amount <= 0 {
            return Ok(0);
        }

        Self::transfer(&env, &env.current_contract_address(), &to, amount)?;

        events::publish_reclaimable_withdrawn(&env, caller, to, amount);

        Ok(amount)
    }

    // ── Access management ───────────────────────────────────────────────────

    /// Grant `tier` to `target`. Only a `SuperAdmin` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AccessTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::promote(&env, &caller, &target, tier.clone())?;
        events::publish_access_granted(&env, caller, target, tier);
        Ok(())
    }

    /// Revoke every tier from `target`. Only a `SuperAdmin` may call this.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::demote(&env, &caller, &target)?;
        events::publish_access_revoked(&env, caller, target);
        Ok(())
    }

    pub fn get_access_tier(env: Env, holder: Address) -> Option<AccessTier> {
        access::get_tier(&env, &holder)
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, ContractError> {
        config::load(&env)
    }

    /// Epoch of the current ledger timestamp.
    pub fn current_epoch(env: Env) -> Result<u32, ContractError> {
        epoch::current(&env)
    }

    /// Aggregate weighted stake of `node_id` during `epoch`.
    pub fn weighted_stake_at(env: Env, node_id: u64, epoch: u32) -> i128 {
        checkpoints::query(&env, ShareScope::Node(node_id), epoch)
    }

    /// Aggregate weighted stake across all nodes during `epoch`.
    pub fn platform_stake_at(env: Env, epoch: u32) -> i128 {
        checkpoints::query(&env, ShareScope::Platform, epoch)
    }

    pub fn checkpoint_count(env: Env, node_id: u64) -> u32 {
        checkpoints::count(&env, ShareScope::Node(node_id))
    }

    pub fn get_checkpoint(env: Env, node_id: u64, index: u32) -> Option<Checkpoint> {
        checkpoints::get(&env, ShareScope::Node(node_id), index)
    }

    pub fn reward_pool_at(env: Env, epoch: u32) -> Option<i128> {
        pools::get(&env, epoch)
    }

    /// Weight marked stuck for `epoch`.
    pub fn stuck_shares_at(env: Env, epoch: u32) -> i128 {
        stuck::shares_at(&env, epoch)
    }

    /// Amount reclaimed from `epoch`, if it has been swept.
    pub fn swept_at(env: Env, epoch: u32) -> Option<i128> {
        stuck::swept_at(&env, epoch)
    }

    /// Funded epochs waiting for `sweep`.
    pub fn pending_sweeps(env: Env) -> Vec<u32> {
        stuck::pending(&env)
    }

    /// Settled rewards not yet claimed. Does not settle.
    pub fn unclaimed_balance(env: Env, position_id: u64) -> Result<i128, ContractError> {
        positions::load(&env, position_id).map(|p| p.unclaimed)
    }

    pub fn get_position(env: Env, position_id: u64) -> Result<Position, ContractError> {
        positions::load(&env, position_id)
    }

    pub fn position_count(env: Env) -> u64 {
        positions::count(&env)
    }

    pub fn get_node(env: Env, node_id: u64) -> Result<Node, ContractError> {
        registry::load_node(&env, node_id)
    }

    pub fn get_lock_tier(env: Env, tier_id: u32) -> Result<LockTier, ContractError> {
        registry::load_tier(&env, tier_id)
    }

    pub fn get_custody(env: Env) -> CustodyBalance {
        custody::load(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !config::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn settle_position(env: &Env, mut position: Position, through: u32) -> Result<i128, ContractError> {
        let node = registry::load_node(env, position.node_id)?;
        match settlement::settle_through(env, &mut position, &node, through)? {
            Some(done) => {
                positions::store(env, &position);
                events::publish_settled(
                    env,
                    position.id,
                    done.from_epoch,
                    done.through_epoch,
                    done.accrued,
                    done.operator_fee,
                );
                Ok(done.accrued)
            }
            None => Ok(0),
        }
    }

    fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
        let cfg = config::load(env)?;
        token::Client::new(env, &cfg.token).transfer(from, to, &amount);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
