//! Helper library to find result of a swap within a single tick range
use super::fixed_point_64;
use super::full_math::MulDiv;
use super::sqrt_price_math::{
    get_amount_0_delta, get_amount_1_delta, get_next_sqrt_price_from_input,
};
use crate::error::ErrorCode;
use anchor_lang::prelude::*;

/// Swap fees are expressed in hundredths of a bip, i.e. parts per million
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;
/// Highest swap fee a pool accepts (10%)
pub const MAX_SWAP_FEE: u32 = 100_000;
/// The protocol share of the swap fee is expressed in bips of the fee
pub const BAR_FEE_DENOMINATOR: u32 = 10_000;

/// Result of a swap within a single tick range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapStep {
    /// Price after swapping, not past the target price
    pub sqrt_price_next_x64: u128,
    /// Input consumed by this step
    pub amount_in: u64,
    /// Gross output, before the swap fee is taken
    pub amount_out: u128,
    /// Whether the target price was reached with input left over
    pub cross: bool,
}

/// Find result of an exact input swap within a single tick range
///
/// If the remaining input does not reach the target the whole input is consumed and the
/// new price is found on the constant liquidity curve. Otherwise exactly the input needed
/// to move the price to the target is consumed and the step is marked as crossing.
///
/// # Arguments
///
/// * `sqrt_price_current_x64` - Current price of pool
/// * `sqrt_price_target_x64` - Price of the next tick in the swap direction, which can't be exceeded
/// * `liquidity` - Usable liquidity, must be non zero
/// * `amount_remaining` - Input which remains to be swapped
/// * `zero_for_one` - Whether token_0 is swapped in for token_1
///
pub fn compute_swap_step(
    sqrt_price_current_x64: u128,
    sqrt_price_target_x64: u128,
    liquidity: u128,
    amount_remaining: u64,
    zero_for_one: bool,
) -> Result<SwapStep> {
    // an amount that does not fit in 128 bits cannot be met by a 64 bit input
    let max_in = if zero_for_one {
        get_amount_0_delta(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, false)
    } else {
        get_amount_1_delta(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, false)
    }
    .unwrap_or(u128::MAX);

    if (amount_remaining as u128) <= max_in {
        let sqrt_price_next_x64 = get_next_sqrt_price_from_input(
            sqrt_price_current_x64,
            liquidity,
            amount_remaining,
            zero_for_one,
        )?;
        let amount_out = if zero_for_one {
            get_amount_1_delta(sqrt_price_next_x64, sqrt_price_current_x64, liquidity, false)
        } else {
            get_amount_0_delta(sqrt_price_current_x64, sqrt_price_next_x64, liquidity, false)
        }
        .ok_or(ErrorCode::MathOverflow)?;

        Ok(SwapStep {
            sqrt_price_next_x64,
            amount_in: amount_remaining,
            amount_out,
            cross: false,
        })
    } else {
        let amount_out = if zero_for_one {
            get_amount_1_delta(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, false)
        } else {
            get_amount_0_delta(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, false)
        }
        .ok_or(ErrorCode::MathOverflow)?;

        Ok(SwapStep {
            sqrt_price_next_x64: sqrt_price_target_x64,
            // max_in < amount_remaining, so it fits
            amount_in: max_in as u64,
            amount_out,
            cross: true,
        })
    }
}

/// Fees taken from the gross output of one swap step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepFees {
    /// Total fee, rounded up
    pub fee_amount: u128,
    /// Protocol share of the fee, rounded up
    pub protocol_fee: u128,
    /// Growth of the fee per unit of liquidity for liquidity providers, rounded down
    pub fee_growth_x64: u128,
}

/// Splits the swap fee on a step output between liquidity providers and the protocol
///
/// # Arguments
///
/// * `amount_out` - Gross output of the step
/// * `swap_fee` - Swap fee in hundredths of a bip
/// * `bar_fee` - Protocol share of the swap fee in bips
/// * `liquidity` - Liquidity active during the step
///
pub fn compute_fees(
    amount_out: u128,
    swap_fee: u32,
    bar_fee: u32,
    liquidity: u128,
) -> Result<StepFees> {
    let fee_amount = amount_out
        .mul_div_ceil(swap_fee as u128, FEE_RATE_DENOMINATOR as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    let protocol_fee = fee_amount
        .mul_div_ceil(bar_fee as u128, BAR_FEE_DENOMINATOR as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    let fee_growth_x64 = (fee_amount - protocol_fee)
        .mul_div_floor(fixed_point_64::Q64, liquidity)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(StepFees {
        fee_amount,
        protocol_fee,
        fee_growth_x64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::tick_math::get_sqrt_price_at_tick;
    use fixed_point_64::Q64;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn terminal_step_consumes_all_input() {
        let target = get_sqrt_price_at_tick(-120).unwrap();
        let step = compute_swap_step(Q64, target, 1_000_000, 1_000, true).unwrap();
        assert!(!step.cross);
        assert_eq!(step.amount_in, 1_000);
        assert!(step.sqrt_price_next_x64 < Q64 && step.sqrt_price_next_x64 > target);
        // √P' = ceil(2^64 * 1_000_000 / 1_001_000)
        assert_eq!(step.sqrt_price_next_x64, 18428315757951600016);
        assert_eq!(step.amount_out, 999);
    }

    #[test]
    fn crossing_step_stops_at_target() {
        let target = get_sqrt_price_at_tick(-120).unwrap();
        let step = compute_swap_step(Q64, target, 1_000_000, 1_000_000, true).unwrap();
        assert!(step.cross);
        assert_eq!(step.sqrt_price_next_x64, target);
        assert_eq!(
            step.amount_in as u128,
            get_amount_0_delta(target, Q64, 1_000_000, false).unwrap()
        );
        assert_eq!(
            step.amount_out,
            get_amount_1_delta(target, Q64, 1_000_000, false).unwrap()
        );
    }

    #[test]
    fn upward_step() {
        let target = get_sqrt_price_at_tick(180).unwrap();
        let step = compute_swap_step(Q64, target, 1_000_000, 1_000, false).unwrap();
        assert!(!step.cross);
        assert_eq!(step.sqrt_price_next_x64, Q64 + Q64 / 1_000);
        assert!(step.amount_out < 1_000);
    }

    #[test]
    fn price_already_at_target_crosses_without_input() {
        let step = compute_swap_step(Q64, Q64, 1_000_000, 10, true).unwrap();
        assert!(step.cross);
        assert_eq!(step.amount_in, 0);
        assert_eq!(step.amount_out, 0);
    }

    #[test]
    fn fee_split() {
        // 0.3% of 10_000 is 30, a sixth of it goes to the protocol
        let fees = compute_fees(10_000, 3_000, 1_667, 1_000).unwrap();
        assert_eq!(fees.fee_amount, 30);
        assert_eq!(fees.protocol_fee, 6);
        assert_eq!(fees.fee_growth_x64, 24 * Q64 / 1_000);
    }

    #[test]
    fn fees_round_up() {
        let fees = compute_fees(1, 3_000, 1, 1).unwrap();
        assert_eq!(fees.fee_amount, 1);
        assert_eq!(fees.protocol_fee, 1);
        assert_eq!(fees.fee_growth_x64, 0);
    }

    quickcheck! {
        fn step_never_overshoots_target(amount: u64, liquidity: u64, ticks: u8, zero_for_one: bool) -> TestResult {
            if ticks == 0 {
                return TestResult::discard();
            }
            let distance = ticks as i32 * 60;
            let target = get_sqrt_price_at_tick(if zero_for_one { -distance } else { distance }).unwrap();
            let liquidity = (liquidity as u128 + 1) * 1_000_003;
            let amount = amount * 7_919;
            let step = compute_swap_step(Q64, target, liquidity, amount, zero_for_one).unwrap();
            let within = if zero_for_one {
                step.sqrt_price_next_x64 >= target && step.sqrt_price_next_x64 <= Q64
            } else {
                step.sqrt_price_next_x64 <= target && step.sqrt_price_next_x64 >= Q64
            };
            TestResult::from_bool(within && step.amount_in <= amount && (step.cross || step.amount_in == amount))
        }
    }
}
