//! Settlement and sweep properties on small, fully specified ledgers.
//!
//! Invariants tested:
//! - Settling in several bounded steps accrues exactly what one call does
//! - A node's payouts lose at most one unit per division to flooring
//! - When an operator leaves mid-way, delegator payouts plus the reclaimed
//!   amount recover the whole pool up to flooring
//! - Sweeping twice reclaims nothing the second time

use proptest::prelude::*;

use crate::harness::{launch, Fixture, BASE_TIER};

/// One node, one delegator, every epoch in `1..=pools.len()` funded.
fn funded_node(fee_bps: u32, operator: i128, delegated: i128, pools: &[i128]) -> (Fixture, u64, u64) {
    let fx = launch();
    let (_, op_pos) = fx.open_node(0, fee_bps, operator);
    let (_, del_pos) = fx.delegate(0, delegated, BASE_TIER);

    let last = pools.len() as u32;
    fx.at_epoch(last + 1);
    for (i, amount) in pools.iter().enumerate() {
        fx.fund(i as u32 + 1, *amount);
    }
    (fx, op_pos, del_pos)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_settlement_is_path_independent(
        fee_bps in 0u32..=10_000,
        operator in 1i128..100_000,
        delegated in 1i128..100_000,
        pools in proptest::collection::vec(1i128..1_000_000, 2..8),
        split_seed in 0u32..64,
    ) {
        let (once, once_op, once_del) = funded_node(fee_bps, operator, delegated, &pools);
        let (steps, steps_op, steps_del) = funded_node(fee_bps, operator, delegated, &pools);

        let split = 1 + split_seed % pools.len() as u32;

        let op_once = once.client.settle(&once_op);
        let del_once = once.client.settle(&once_del);

        let op_steps = steps.client.settle_upto(&steps_op, &split) + steps.client.settle(&steps_op);
        let del_steps = steps.client.settle_upto(&steps_del, &split) + steps.client.settle(&steps_del);

        prop_assert_eq!(op_once, op_steps);
        prop_assert_eq!(del_once, del_steps);

        let op_total = once.client.unclaimed_balance(&once_op);
        prop_assert_eq!(op_total, steps.client.unclaimed_balance(&steps_op));
        prop_assert_eq!(del_once, once.client.unclaimed_balance(&once_del));

        // Two floored shares per epoch; the fee split itself is exact.
        let funded: i128 = pools.iter().sum();
        let paid = op_total + del_once;
        prop_assert!(paid <= funded);
        prop_assert!(funded - paid <= 2 * pools.len() as i128);
    }

    #[test]
    fn prop_operator_exit_is_recovered_by_sweep(
        fee_bps in 0u32..=10_000,
        operator in 1i128..100_000,
        delegated in 1i128..100_000,
        reward in 1i128..10_000_000,
    ) {
        let fx = launch();
        let (op, op_pos) = fx.open_node(0, fee_bps, operator);
        let (_, del_pos) = fx.delegate(0, delegated, BASE_TIER);

        fx.at_epoch(2);
        fx.client.exit(&op, &op_pos);
        fx.at_epoch(3);
        fx.fund(2, reward);

        let paid = fx.client.settle(&del_pos);
        let swept = fx.client.sweep();

        let custody = fx.client.get_custody();
        let reclaimed = custody.reclaimable;
        prop_assert!(swept <= reclaimed);

        // One floored share for the delegator, one for the swept operator.
        prop_assert!(paid + reclaimed <= reward);
        prop_assert!(reward - (paid + reclaimed) <= 2);
        prop_assert_eq!(fx.client.unclaimed_balance(&op_pos), 0);
        prop_assert_eq!(custody.circulating + custody.reclaimable, fx.held());
    }

    #[test]
    fn prop_sweep_is_idempotent(
        exits in proptest::collection::vec(any::<bool>(), 1..5),
        reward in 1i128..1_000_000,
    ) {
        let fx = launch();
        let operators: Vec<_> = (0..exits.len())
            .map(|i| fx.open_node(i as u64, 0, 1_000))
            .collect();

        fx.at_epoch(1);
        for ((op, pos), leaves) in operators.iter().zip(exits.iter()) {
            if *leaves {
                fx.client.exit(op, pos);
            }
        }
        fx.at_epoch(2);
        fx.fund(1, reward);

        let first = fx.client.sweep();
        let after_first = fx.client.get_custody();
        let swept_epoch = fx.client.swept_at(&1);

        prop_assert_eq!(fx.client.sweep(), 0);
        prop_assert_eq!(fx.client.get_custody(), after_first);
        prop_assert_eq!(fx.client.swept_at(&1), swept_epoch);
        prop_assert!(fx.client.pending_sweeps().is_empty());

        let leaving = exits.iter().filter(|l| **l).count() as i128;
        prop_assert_eq!(first, reward * leaving * 1_000 / (exits.len() as i128 * 1_000));
    }
}
