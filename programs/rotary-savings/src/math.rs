//! Early-withdrawal penalty arithmetic

use anchor_lang::prelude::*;

use crate::constants::MAX_PENALTY_RATE;
use crate::error::SavingsError;

/// Splits `amount` into `(penalty, payout)` for a penalty of `rate_percent`.
///
/// The penalty is rounded down, so the member never pays more than the rate.
/// Uses a u128 intermediate: `amount * rate` can exceed u64.
pub fn penalty_and_payout(amount: u64, rate_percent: u8) -> Result<(u64, u64)> {
    require!(
        rate_percent <= MAX_PENALTY_RATE,
        SavingsError::InvalidPenaltyRate
    );

    let penalty = (amount as u128)
        .checked_mul(rate_percent as u128)
        .ok_or(SavingsError::MathOverflow)?
        / 100;
    let penalty = u64::try_from(penalty).map_err(|_| SavingsError::MathOverflow)?;
    let payout = amount
        .checked_sub(penalty)
        .ok_or(SavingsError::MathOverflow)?;

    Ok((penalty, payout))
}
