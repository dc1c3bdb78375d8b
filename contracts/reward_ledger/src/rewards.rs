use crate::ContractError;

/// Basis-point denominator: 10_000 bps == 100 %.
pub const BPS_DENOMINATOR: i128 = 10_000;

// ── Weighting ───────────────────────────────────────────────────────────────

/// Scale a principal by a lock-tier multiplier.
///
/// ```text
/// weighted = principal × weight_bps / 10_000
/// ```
///
/// A 12_000 bps tier turns 1_000 tokens into 1_200 units of weighted stake.
pub fn weighted_amount(principal: i128, weight_bps: u32) -> Result<i128, ContractError> {
    principal
        .checked_mul(weight_bps as i128)
        .map(|v| v / BPS_DENOMINATOR)
        .ok_or(ContractError::Overflow)
}

/// Operator fee taken out of a delegator's gross reward.
///
/// ```text
/// fee = gross × fee_bps / 10_000      (floor)
/// ```
///
/// The delegator keeps `gross − fee`, so the two halves always add back up to
/// `gross` and the split itself loses nothing to rounding.
pub fn fee_amount(gross: i128, fee_bps: u32) -> i128 {
    if gross <= 0 {
        return 0;
    }
    gross.saturating_mul(fee_bps as i128) / BPS_DENOMINATOR
}

// ── Proportional split ──────────────────────────────────────────────────────

/// Floor of `pool × weight / total`.
///
/// The residue of the floor division is at most one unit per call and stays in
/// circulating custody.
///
/// # Errors
/// * `ZeroBasis` – `weight > 0` but `total <= 0`; some position claims weight
///   the checkpoint store does not know about.
/// * `Overflow`  – `pool × weight` does not fit in an `i128`.
pub fn proportional_share(pool: i128, weight: i128, total: i128) -> Result<i128, ContractError> {
    if weight <= 0 || pool <= 0 {
        return Ok(0);
    }
    if total <= 0 {
        return Err(ContractError::ZeroBasis);
    }
    pool.checked_mul(weight)
        .map(|v| v / total)
        .ok_or(ContractError::Overflow)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure arithmetic, no Soroban environment needed.
