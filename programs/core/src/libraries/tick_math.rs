//! Helper functions to calculate tick from √P and vice versa
//! Performs power and log calculations on Q64.64 numbers
//!
//! # Resources
//!
//! * https://medium.com/coinmonks/math-in-solidity-part-5-exponent-and-logarithm-9aef8515136e
//! * https://liaoph.com/logarithm-in-solidity/
use crate::error::ErrorCode;
use anchor_lang::prelude::*;

/// The minimum tick, i.e. log base √1.0001 of 2^-64
pub const MIN_TICK: i32 = -443636;
/// The maximum tick, i.e. log base √1.0001 of 2^64
pub const MAX_TICK: i32 = -MIN_TICK;

/// The sqrt price at MIN_TICK
pub const MIN_SQRT_PRICE_X64: u128 = 4295048016;
/// The sqrt price at MAX_TICK
pub const MAX_SQRT_PRICE_X64: u128 = 79226673521066979257578248091;

// Number of fractional bits computed for log2
const BIT_PRECISION: u32 = 16;

// 2^32 / log2(√1.0001), used to change the base of a Q32.32 log2 into a Q64.64 tick
const LOG_B_2_X32: i128 = 59543866431248;

// 0.01 as a Q64.64 number
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516;

// 2^-16 / log2(√1.0001) + 0.01 as a Q64.64 number
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745;

/// Calculates 1.0001^(tick/2) as a Q64.64 number representing
/// the square root of the ratio of the two assets (token_1/token_0)
///
/// Each magic factor is `2^64 / (1.0001^(2^i / 2))` for i in `[0, 19)`.
/// The product is accumulated for |tick| and inverted for positive ticks.
///
/// Throws if |tick| > MAX_TICK
///
/// # Arguments
/// * `tick` - Price tick
///
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128> {
    let abs_tick = tick.unsigned_abs();
    require!(abs_tick <= MAX_TICK as u32, ErrorCode::TickOutOfRange);

    // i = 0
    let mut ratio: u128 = if abs_tick & 0x1 != 0 {
        0xfffcb933bd6fad37
    } else {
        // 2^64
        0x10000000000000000
    };
    // i = 1
    if abs_tick & 0x2 != 0 { ratio = (ratio * 0xfff97272373d4132) >> 64 };
    // i = 2
    if abs_tick & 0x4 != 0 { ratio = (ratio * 0xfff2e50f5f656932) >> 64 };
    // i = 3
    if abs_tick & 0x8 != 0 { ratio = (ratio * 0xffe5caca7e10e4e6) >> 64 };
    // i = 4
    if abs_tick & 0x10 != 0 { ratio = (ratio * 0xffcb9843d60f6159) >> 64 };
    // i = 5
    if abs_tick & 0x20 != 0 { ratio = (ratio * 0xff973b41fa98c081) >> 64 };
    // i = 6
    if abs_tick & 0x40 != 0 { ratio = (ratio * 0xff2ea16466c96a38) >> 64 };
    // i = 7
    if abs_tick & 0x80 != 0 { ratio = (ratio * 0xfe5dee046a99a2a8) >> 64 };
    // i = 8
    if abs_tick & 0x100 != 0 { ratio = (ratio * 0xfcbe86c7900a88ae) >> 64 };
    // i = 9
    if abs_tick & 0x200 != 0 { ratio = (ratio * 0xf987a7253ac41317) >> 64 };
    // i = 10
    if abs_tick & 0x400 != 0 { ratio = (ratio * 0xf3392b0822b70005) >> 64 };
    // i = 11
    if abs_tick & 0x800 != 0 { ratio = (ratio * 0xe7159475a2c29b74) >> 64 };
    // i = 12
    if abs_tick & 0x1000 != 0 { ratio = (ratio * 0xd097f3bdfd2022b8) >> 64 };
    // i = 13
    if abs_tick & 0x2000 != 0 { ratio = (ratio * 0xa9f746462d870fdf) >> 64 };
    // i = 14
    if abs_tick & 0x4000 != 0 { ratio = (ratio * 0x70d869a156d2a1b8) >> 64 };
    // i = 15
    if abs_tick & 0x8000 != 0 { ratio = (ratio * 0x31be135f97d08fd9) >> 64 };
    // i = 16
    if abs_tick & 0x10000 != 0 { ratio = (ratio * 0x9aa508b5b7a84e1) >> 64 };
    // i = 17
    if abs_tick & 0x20000 != 0 { ratio = (ratio * 0x5d6af8dedb8119) >> 64 };
    // i = 18
    if abs_tick & 0x40000 != 0 { ratio = (ratio * 0x2216e584f5fa) >> 64 };

    // Divide to obtain 1.0001^(2^i / 2) * 2^64 in numerator
    if tick > 0 {
        ratio = u128::MAX / ratio;
    }

    Ok(ratio)
}

/// Calculates the greatest tick value such that get_sqrt_price_at_tick(tick) <= sqrt_price_x64
/// Throws if sqrt_price_x64 < MIN_SQRT_PRICE_X64 or sqrt_price_x64 >= MAX_SQRT_PRICE_X64
///
/// Formula: `i = log base(√1.0001) (√P)`
///
/// # Arguments
///
/// * `sqrt_price_x64`- The sqrt price for which to compute the tick as a Q64.64
///
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Result<i32> {
    // second inequality must be < because the price can never reach the price at the max tick
    require!(
        sqrt_price_x64 >= MIN_SQRT_PRICE_X64 && sqrt_price_x64 < MAX_SQRT_PRICE_X64,
        ErrorCode::InvalidSqrtPrice
    );

    // Determine log_b(sqrt_ratio). First by calculating integer portion (msb)
    let msb: u32 = 127 - sqrt_price_x64.leading_zeros();
    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // Fractional value r / 2^msb, held as a Q1.63 number
    // We begin the iteration from bit 63 (0.5 in Q64.64)
    let mut bit: i128 = 0x8000_0000_0000_0000;
    let mut precision = 0;
    let mut log2p_fraction_x64: i128 = 0;

    // Log2 iterative approximation for the fractional part
    // Go through each 2^(j) bit where j < 64 in a Q64.64 number
    // Append current bit value to fraction result if r^2 Q2.126 is more than 2
    let mut r = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };

    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = (r >> 127) as u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
        precision += 1;
    }
    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let log2p_x32 = log2p_integer_x32 + log2p_fraction_x32;

    // Change of base rule: multiply with 2^32 / log2(√1.0001)
    let log_sqrt_10001_x64 = log2p_x32 * LOG_B_2_X32;

    // tick - 0.01
    let tick_low = ((log_sqrt_10001_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;

    // tick + (2^-16 / log2(√1.0001)) + 0.01
    let tick_high = ((log_sqrt_10001_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_price_at_tick(tick_high)? <= sqrt_price_x64 {
        tick_high
    } else {
        tick_low
    })
}
