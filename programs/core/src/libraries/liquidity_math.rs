//! Math library for liquidity

use crate::error::ErrorCode;
use anchor_lang::prelude::*;

/// Add a signed liquidity delta to liquidity and revert if it overflows or underflows
///
/// # Arguments
///
/// * `x` - The liquidity (L) before change
/// * `y` - The delta (ΔL) by which liquidity should be changed
///
pub fn add_delta(x: u128, y: i128) -> Result<u128> {
    let z = if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(ErrorCode::LiquiditySub)?
    } else {
        x.checked_add(y as u128).ok_or(ErrorCode::LiquidityAdd)?
    };

    Ok(z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_liquidity_delta() {
        let x: u128 = 1;
        let y: i128 = 2;
        assert_eq!(add_delta(x, y).unwrap(), 3);
    }

    #[test]
    fn negative_liquidity_delta() {
        let x: u128 = 2;
        let y: i128 = -1;
        assert_eq!(add_delta(x, y).unwrap(), 1);
    }

    #[test]
    fn most_negative_delta() {
        let x = i128::MIN.unsigned_abs();
        assert_eq!(add_delta(x, i128::MIN).unwrap(), 0);
    }

    #[test]
    fn positive_liquidity_delta_overflow() {
        assert_eq!(
            add_delta(u128::MAX, 1).unwrap_err(),
            ErrorCode::LiquidityAdd.into()
        );
    }

    #[test]
    fn negative_liquidity_delta_underflow() {
        assert_eq!(
            add_delta(u128::MIN, -1).unwrap_err(),
            ErrorCode::LiquiditySub.into()
        );
    }
}
