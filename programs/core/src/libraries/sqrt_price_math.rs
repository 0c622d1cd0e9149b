/// Helper functions to find price changes for change in token
/// supply and vice versa
use super::big_num::U256;
use super::fixed_point_64;
use super::full_math::MulDiv;
use super::unsafe_math;
use crate::error::ErrorCode;
use anchor_lang::prelude::*;

/// Gets the next sqrt price √P' given an input of token_0
///
/// Always round up because token 0 supply increases leading to price decrease.
/// Do not round down to minimize price impact. We only need to meet input
/// change and not guarantee exact output.
///
/// # Formula
///
/// * `√P' = √P * L / (L + Δx * √P)`
///
/// # Proof
///
/// For constant y,
/// √P * L = y
/// √P' * L' = √P * L
/// √P' = √P * L / L'
/// √P' = √P * L / (L + Δx*√P)
///
/// # Arguments
///
/// * `sqrt_p_x64` - The starting price `√P`, i.e., before accounting for the token_0 delta,
/// where P is `token_1_supply / token_0_supply`
/// * `liquidity` - The amount of usable liquidity L
/// * `amount` - Delta of token 0 (Δx) to add to virtual reserves
///
pub fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_p_x64: u128,
    liquidity: u128,
    amount: u64,
) -> Option<u128> {
    // we short circuit amount == 0 because the result is otherwise not
    // guaranteed to equal the input price
    if amount == 0 {
        return Some(sqrt_p_x64);
    }
    let numerator_1 = U256::from(liquidity) << fixed_point_64::RESOLUTION; // Q128.64
    let product = U256::from(amount) * U256::from(sqrt_p_x64);
    let denominator = numerator_1.checked_add(product)?;

    numerator_1
        .mul_div_ceil(U256::from(sqrt_p_x64), denominator)?
        .to_u128()
}

/// Gets the next sqrt price given an input of token_1
///
/// Always round down because token 1 supply increases leading to price increase.
/// Do not round up to minimize price impact. We only need to meet input
/// change and not guarantee exact output for token 0.
///
/// # Formula
///
/// * `√P' = √P + Δy / L`
///
/// # Arguments
///
/// * `sqrt_p_x64` - The starting price `√P`, i.e., before accounting for the token_1 delta
/// * `liquidity` - The amount of usable liquidity L
/// * `amount` - Delta of token 1 (Δy) to add to virtual reserves
///
pub fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_p_x64: u128,
    liquidity: u128,
    amount: u64,
) -> Option<u128> {
    if liquidity == 0 {
        return None;
    }
    // quotient - `Δy / L` as Q64.64
    let quotient = (U256::from(amount) << fixed_point_64::RESOLUTION) / U256::from(liquidity);

    U256::from(sqrt_p_x64).checked_add(quotient)?.to_u128()
}

/// Gets the next sqrt price given an input amount of token0 or token1
/// Throws if price or liquidity are 0, or if the next price does not fit in 128 bits
///
/// # Arguments
///
/// * `sqrt_p_x64` - The starting price `√P`, i.e., before accounting for the input amount
/// * `liquidity` - The amount of usable liquidity
/// * `amount_in` - How much of token_0, or token_1, is being swapped in
/// * `zero_for_one` - Whether the amount in is token_0 or token_1
///
pub fn get_next_sqrt_price_from_input(
    sqrt_p_x64: u128,
    liquidity: u128,
    amount_in: u64,
    zero_for_one: bool,
) -> Result<u128> {
    require!(sqrt_p_x64 > 0, ErrorCode::InvalidSqrtPrice);
    require!(liquidity > 0, ErrorCode::InsufficientLiquidity);

    // round to make sure that we don't pass the target price
    let next = if zero_for_one {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_p_x64, liquidity, amount_in)
    } else {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_p_x64, liquidity, amount_in)
    };
    next.ok_or_else(|| ErrorCode::MathOverflow.into())
}

/// Gets the amount_0 delta between two prices, for given amount of liquidity (formula 6.30)
///
/// # Formula
///
/// * `Δx = L * (1 / √P_lower - 1 / √P_upper)`
/// * i.e. `L * (√P_upper - √P_lower) / (√P_upper * √P_lower)`
///
/// # Arguments
///
/// * `sqrt_ratio_a_x64` - A sqrt price
/// * `sqrt_ratio_b_x64` - Another sqrt price
/// * `liquidity` - The amount of usable liquidity
/// * `round_up`- Whether to round the amount up or down
///
pub fn get_amount_0_delta(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Option<u128> {
    // sqrt_ratio_a_x64 should hold the smaller value
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    };
    if sqrt_ratio_a_x64 == 0 {
        return None;
    }

    let numerator_1 = U256::from(liquidity) << fixed_point_64::RESOLUTION;
    let numerator_2 = U256::from(sqrt_ratio_b_x64 - sqrt_ratio_a_x64);
    let sqrt_ratio_a = U256::from(sqrt_ratio_a_x64);
    let sqrt_ratio_b = U256::from(sqrt_ratio_b_x64);

    let amount = if round_up {
        unsafe_math::div_rounding_up(
            numerator_1.mul_div_ceil(numerator_2, sqrt_ratio_b)?,
            sqrt_ratio_a,
        )
    } else {
        numerator_1.mul_div_floor(numerator_2, sqrt_ratio_b)? / sqrt_ratio_a
    };
    amount.to_u128()
}

/// Gets the amount_1 delta between two prices, for given amount of liquidity (formula 6.30)
///
/// # Formula
///
/// * `Δy = L (√P_upper - √P_lower)`
///
/// # Arguments
///
/// * `sqrt_ratio_a_x64` - A sqrt price
/// * `sqrt_ratio_b_x64` - Another sqrt price
/// * `liquidity` - The amount of usable liquidity
/// * `round_up`- Whether to round the amount up or down
///
pub fn get_amount_1_delta(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Option<u128> {
    // sqrt_ratio_a_x64 should hold the smaller value
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    };

    if round_up {
        liquidity.mul_div_ceil(sqrt_ratio_b_x64 - sqrt_ratio_a_x64, fixed_point_64::Q64)
    } else {
        liquidity.mul_div_floor(sqrt_ratio_b_x64 - sqrt_ratio_a_x64, fixed_point_64::Q64)
    }
}

#[cfg(test)]
mod sqrt_math {
    use super::*;
    use fixed_point_64::Q64;
    use quickcheck::{quickcheck, TestResult};

    // 1. get_next_sqrt_price_from_input()

    #[test]
    fn fails_if_price_is_zero() {
        assert_eq!(
            get_next_sqrt_price_from_input(0, 1, u64::pow(10, 17), false).unwrap_err(),
            ErrorCode::InvalidSqrtPrice.into()
        );
    }

    #[test]
    fn fails_if_liquidity_is_zero() {
        assert_eq!(
            get_next_sqrt_price_from_input(1, 0, u64::pow(10, 17), true).unwrap_err(),
            ErrorCode::InsufficientLiquidity.into()
        );
    }

    #[test]
    fn fails_if_input_amount_overflows_the_price() {
        let sqrt_p_x64 = u128::MAX;
        assert_eq!(
            get_next_sqrt_price_from_input(sqrt_p_x64, 1024, 1024, false).unwrap_err(),
            ErrorCode::MathOverflow.into()
        );
    }

    #[test]
    fn any_input_amount_cannot_underflow_the_price() {
        assert_eq!(
            get_next_sqrt_price_from_input(1, 1, u64::MAX, true).unwrap(),
            1
        );
    }

    #[test]
    fn returns_input_price_if_amount_in_is_zero() {
        let sqrt_p_x64 = Q64;
        assert_eq!(
            get_next_sqrt_price_from_input(sqrt_p_x64, u128::pow(10, 8), 0, true).unwrap(),
            sqrt_p_x64
        );
        assert_eq!(
            get_next_sqrt_price_from_input(sqrt_p_x64, u128::pow(10, 8), 0, false).unwrap(),
            sqrt_p_x64
        );
    }

    #[test]
    fn input_of_token_1_moves_price_by_amount_over_liquidity() {
        // Δ√P = Δy / L = 1 / 10
        let next = get_next_sqrt_price_from_input(Q64, 10, 1, false).unwrap();
        assert_eq!(next, Q64 + Q64 / 10);
    }

    #[test]
    fn input_of_token_0_halves_price_when_reserves_double() {
        // x = L / √P = L, so adding L of token_0 halves √P
        let liquidity = u128::pow(10, 18);
        let next = get_next_sqrt_price_from_input(Q64, liquidity, 10u64.pow(18), true).unwrap();
        assert_eq!(next, Q64 / 2);
    }

    // 2. get_amount_0_delta() and get_amount_1_delta()

    #[test]
    fn amount_deltas_between_price_1_and_4() {
        let liquidity = u128::pow(10, 18);
        // √P moves from 1 to 2
        assert_eq!(get_amount_1_delta(Q64, 2 * Q64, liquidity, false), Some(liquidity));
        assert_eq!(get_amount_1_delta(2 * Q64, Q64, liquidity, true), Some(liquidity));
        assert_eq!(get_amount_0_delta(Q64, 2 * Q64, liquidity, false), Some(liquidity / 2));
        assert_eq!(get_amount_0_delta(2 * Q64, Q64, liquidity, true), Some(liquidity / 2));
    }

    #[test]
    fn amount_0_delta_is_none_for_zero_price() {
        assert_eq!(get_amount_0_delta(0, Q64, 1, false), None);
    }

    #[test]
    fn zero_for_equal_prices() {
        assert_eq!(get_amount_0_delta(Q64, Q64, 1_000, true), Some(0));
        assert_eq!(get_amount_1_delta(Q64, Q64, 1_000, true), Some(0));
    }

    quickcheck! {
        fn rounding_up_adds_at_most_one(a: u32, b: u32, liquidity: u64) -> TestResult {
            let sqrt_a = Q64 + ((a as u128) << 48);
            let sqrt_b = Q64 + ((b as u128) << 48);
            let liquidity = (liquidity as u128 + 1) << 20;
            if sqrt_a == sqrt_b {
                return TestResult::discard();
            }
            let down_0 = get_amount_0_delta(sqrt_a, sqrt_b, liquidity, false).unwrap();
            let up_0 = get_amount_0_delta(sqrt_a, sqrt_b, liquidity, true).unwrap();
            let down_1 = get_amount_1_delta(sqrt_a, sqrt_b, liquidity, false).unwrap();
            let up_1 = get_amount_1_delta(sqrt_a, sqrt_b, liquidity, true).unwrap();
            TestResult::from_bool(up_0 - down_0 <= 1 && up_1 - down_1 <= 1)
        }

        fn input_of_token_0_never_raises_price(amount: u64, liquidity: u64) -> bool {
            let amount = amount << 30;
            let liquidity = (liquidity as u128 + 1) << 30;
            let next = get_next_sqrt_price_from_input(Q64, liquidity, amount, true).unwrap();
            next <= Q64 && (amount == 0 || next < Q64)
        }
    }
}
