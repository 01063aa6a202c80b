//! Integer-only withdrawal fee arithmetic.

use crate::constants::BPS_DENOMINATOR;
use crate::error::ErrorCode;

/// A withdrawal amount split into the part routed to the fee recipient and
/// the part released to the depositor. `fee + net` always equals the
/// requested amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub fee: u64,
    pub net: u64,
}

impl FeeSplit {
    /// `fee = floor(amount * fee_bps / 10_000)`, `net = amount - fee`.
    pub fn compute(amount: u64, fee_bps: u16) -> Result<Self, ErrorCode> {
        // Widen before multiplying so large withdrawals are not rejected.
        let fee = (amount as u128)
            .checked_mul(fee_bps as u128)
            .ok_or(ErrorCode::Overflow)?
            .checked_div(BPS_DENOMINATOR as u128)
            .ok_or(ErrorCode::Overflow)?;
        let fee = u64::try_from(fee).map_err(|_| ErrorCode::Overflow)?;
        let net = amount.checked_sub(fee).ok_or(ErrorCode::Overflow)?;

        Ok(Self { fee, net })
    }
}
