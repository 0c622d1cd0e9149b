/// A library for handling Q64.64 fixed point numbers
/// Used in sqrt_price_math.rs, swap_math.rs and position.rs
use super::big_num::U256;

pub const Q64: u128 = 1u128 << 64; // 2^64
pub const RESOLUTION: u8 = 64;

/// Encodes the ratio `amount_1 / amount_0` as a Q64.64 square root price
///
/// # Formula
///
/// * `√P = √(amount_1 * 2^128 / amount_0)`
///
pub fn encode_price_sqrt(amount_1: u64, amount_0: u64) -> Option<u128> {
    if amount_0 == 0 {
        return None;
    }
    let ratio_x128 = (U256::from(amount_1) << 128) / U256::from(amount_0);
    ratio_x128.integer_sqrt().to_u128()
}
