//! Properties of the pure reward arithmetic.

use proptest::prelude::*;
use reward_ledger::rewards::{fee_amount, proportional_share, weighted_amount, BPS_DENOMINATOR};

proptest! {
    /// A share never exceeds the pool and grows with weight.
    #[test]
    fn prop_share_bounded_and_monotonic(
        pool in 0i128..1_000_000_000,
        total in 1i128..1_000_000_000,
        a in 0i128..1_000_000_000,
        b in 0i128..1_000_000_000,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = lo.min(total);
        let hi = hi.min(total);

        let share_lo = proportional_share(pool, lo, total).unwrap();
        let share_hi = proportional_share(pool, hi, total).unwrap();
        prop_assert!(share_lo <= share_hi);
        prop_assert!(share_hi <= pool);
        prop_assert!(share_lo >= 0);
    }

    /// Splitting a basis between holders never pays out more than the pool.
    #[test]
    fn prop_split_never_overpays(
        pool in 0i128..1_000_000_000,
        weights in proptest::collection::vec(1i128..1_000_000, 1..12),
    ) {
        let total: i128 = weights.iter().sum();
        let paid: i128 = weights
            .iter()
            .map(|w| proportional_share(pool, *w, total).unwrap())
            .sum();
        prop_assert!(paid <= pool);
        // Each holder loses less than one unit to flooring.
        prop_assert!(pool - paid < weights.len() as i128);
    }

    /// The fee is a floored fraction of gross and never exceeds it.
    #[test]
    fn prop_fee_stays_within_gross(
        gross in 0i128..1_000_000_000_000,
        fee_bps in 0u32..=10_000,
    ) {
        let fee = fee_amount(gross, fee_bps);
        prop_assert!(fee >= 0);
        prop_assert!(fee <= gross);
        prop_assert_eq!(fee, gross * fee_bps as i128 / BPS_DENOMINATOR);
        if fee_bps == 10_000 {
            prop_assert_eq!(fee, gross);
        }
    }

    /// The tier multiplier scales linearly with flooring.
    #[test]
    fn prop_weighted_amount_scales(
        principal in 1i128..1_000_000_000_000,
        weight_bps in 1u32..50_000,
    ) {
        let weighted = weighted_amount(principal, weight_bps).unwrap();
        prop_assert_eq!(weighted, principal * weight_bps as i128 / BPS_DENOMINATOR);
    }
}
