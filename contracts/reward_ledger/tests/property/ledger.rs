//! Random operation sequences against a live ledger.
//!
//! Invariants checked after every operation:
//! - The custody split adds up to the token balance held
//! - Unclaimed rewards plus active principal never exceed circulating funds
//! - Node and platform aggregates for the next epoch equal the sum of active
//!   weighted stakes
//! - Settlement cursors only move forward and never pass the last elapsed epoch
//!
//! And once the sequence is drained:
//! - Paid plus reclaimed never exceeds what was deposited, and falls short by
//!   at most one unit per division
//! - A second sweep reclaims nothing

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::{testutils::Address as _, Address};
use reward_ledger::{PositionStatus, StakeRole};

use crate::harness::{launch, Fixture, BASE_TIER, BOOST_TIER, NODE_FEES};

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Delegate {
        #[proptest(strategy = "0u64..3")]
        node: u64,
        #[proptest(strategy = "1i128..5_000")]
        amount: i128,
        boosted: bool,
    },
    Exit {
        pick: u8,
    },
    Advance {
        #[proptest(strategy = "1u32..3")]
        epochs: u32,
    },
    Deposit {
        #[proptest(strategy = "0u32..4")]
        back: u32,
        #[proptest(strategy = "1i128..20_000")]
        amount: i128,
    },
    Settle {
        pick: u8,
    },
    Claim {
        pick: u8,
    },
    Sweep,
}

struct Tracked {
    holder: Address,
    id: u64,
    cursor: u32,
}

struct Run {
    fx: Fixture,
    positions: Vec<Tracked>,
    epoch: u32,
    deposited: i128,
    funded_epochs: i128,
    claimed: i128,
}

impl Run {
    fn start() -> Self {
        let fx = launch();
        let mut positions = Vec::new();
        for (node_id, fee) in NODE_FEES.iter().enumerate() {
            let (holder, id) = fx.open_node(node_id as u64, *fee, 2_000);
            positions.push(Tracked {
                holder,
                id,
                cursor: 0,
            });
        }
        Run {
            fx,
            positions,
            epoch: 0,
            deposited: 0,
            funded_epochs: 0,
            claimed: 0,
        }
    }

    fn pick(&self, seed: u8) -> (Address, u64) {
        let tracked = &self.positions[seed as usize % self.positions.len()];
        (tracked.holder.clone(), tracked.id)
    }

    fn apply(&mut self, op: &Op) {
        let client = &self.fx.client;
        match op {
            Op::Delegate {
                node,
                amount,
                boosted,
            } => {
                let holder = Address::generate(&self.fx.env);
                self.fx.mint(&holder, *amount);
                let tier = if *boosted { BOOST_TIER } else { BASE_TIER };
                if let Ok(Ok(id)) =
                    client.try_stake(&holder, node, amount, &tier, &StakeRole::Delegator)
                {
                    self.positions.push(Tracked {
                        holder,
                        id,
                        cursor: self.epoch,
                    });
                }
            }
            Op::Exit { pick } => {
                let (holder, id) = self.pick(*pick);
                let _ = client.try_exit(&holder, &id);
            }
            Op::Advance { epochs } => {
                self.epoch += epochs;
                self.fx.at_epoch(self.epoch);
            }
            Op::Deposit { back, amount } => {
                if let Some(epoch) = self.epoch.checked_sub(1 + back) {
                    self.fx.mint(&self.fx.admin, *amount);
                    if let Ok(Ok(())) = client.try_deposit_rewards(&self.fx.admin, &epoch, amount) {
                        self.deposited += amount;
                        self.funded_epochs += 1;
                    }
                }
            }
            Op::Settle { pick } => {
                let (_, id) = self.pick(*pick);
                let _ = client.try_settle(&id);
            }
            Op::Claim { pick } => {
                let (holder, id) = self.pick(*pick);
                if let Ok(Ok(amount)) = client.try_claim_rewards(&holder, &id) {
                    self.claimed += amount;
                }
            }
            Op::Sweep => {
                client.sweep();
            }
        }
    }

    fn check(&mut self) -> Result<(), TestCaseError> {
        let client = &self.fx.client;
        let custody = client.get_custody();
        prop_assert_eq!(custody.circulating + custody.reclaimable, self.fx.held());

        let next = self.epoch + 1;
        let mut node_totals = [0i128; NODE_FEES.len()];
        let mut owed = 0i128;

        for tracked in self.positions.iter_mut() {
            let position = client.get_position(&tracked.id);
            owed += position.unclaimed;

            prop_assert!(position.last_settled_epoch >= tracked.cursor);
            tracked.cursor = position.last_settled_epoch;

            match position.status {
                PositionStatus::Active => {
                    owed += position.principal;
                    node_totals[position.node_id as usize] += position.weighted_amount;
                    let bound = self.epoch.saturating_sub(1).max(position.created_epoch);
                    prop_assert!(position.last_settled_epoch <= bound);
                }
                PositionStatus::Exited(at) => {
                    prop_assert_eq!(position.last_settled_epoch, at);
                }
            }
        }

        prop_assert!(owed <= custody.circulating);
        for (node_id, total) in node_totals.iter().enumerate() {
            prop_assert_eq!(client.weighted_stake_at(&(node_id as u64), &next), *total);
        }
        prop_assert_eq!(
            client.platform_stake_at(&next),
            node_totals.iter().sum::<i128>()
        );
        Ok(())
    }

    /// Settle everything elapsed and sweep.
    fn drain(&mut self) -> Result<(), TestCaseError> {
        self.epoch += 1;
        self.fx.at_epoch(self.epoch);
        for tracked in self.positions.iter() {
            self.fx.client.settle(&tracked.id);
        }
        while !self.fx.client.pending_sweeps().is_empty() {
            self.fx.client.sweep();
        }
        prop_assert_eq!(self.fx.client.sweep(), 0);
        self.check()
    }

    fn accrued(&self) -> i128 {
        let unclaimed: i128 = self
            .positions
            .iter()
            .map(|t| self.fx.client.unclaimed_balance(&t.id))
            .sum();
        unclaimed + self.claimed
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every intermediate state keeps custody, solvency and aggregates intact.
    #[test]
    fn prop_invariants_hold_across_sequences(
        ops in proptest::collection::vec(any::<Op>(), 1..24),
    ) {
        let mut run = Run::start();
        run.check()?;
        for op in ops.iter() {
            run.apply(op);
            run.check()?;
        }
    }

    /// Rewards paid out and reclaimed together never exceed deposits.
    #[test]
    fn prop_payouts_bounded_by_deposits(
        ops in proptest::collection::vec(any::<Op>(), 1..24),
    ) {
        let mut run = Run::start();
        for op in ops.iter() {
            run.apply(op);
        }
        run.drain()?;

        let reclaimed = run.fx.client.get_custody().reclaimable;
        let accounted = run.accrued() + reclaimed;
        prop_assert!(accounted <= run.deposited);

        // Per funded epoch: one share per position, one plain sweep share and
        // one per fee-charging node.
        let divisions = run.positions.len() as i128 + NODE_FEES.len() as i128 + 1;
        prop_assert!(run.deposited - accounted <= run.funded_epochs * divisions);
    }
}
