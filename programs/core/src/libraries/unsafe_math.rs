use super::big_num::U256;

/// Returns `ceil(x / y)`. Division by zero panics, so callers must check the divisor
pub fn div_rounding_up(x: U256, y: U256) -> U256 {
    let quotient = x / y;
    if (x % y).is_zero() {
        quotient
    } else {
        quotient + 1
    }
}
