//! Multiplication and division with an intermediate wide enough to never overflow
//! Returns `None` when the result does not fit the output type or the divisor is zero
use super::big_num::{U256, U512};

pub trait MulDiv<RHS = Self> {
    type Output;

    /// Calculates `floor(self * num / denom)`
    fn mul_div_floor(self, num: RHS, denom: RHS) -> Option<Self::Output>;

    /// Calculates `ceil(self * num / denom)`
    fn mul_div_ceil(self, num: RHS, denom: RHS) -> Option<Self::Output>;
}

impl MulDiv for u64 {
    type Output = u64;

    fn mul_div_floor(self, num: Self, denom: Self) -> Option<Self::Output> {
        if denom == 0 {
            return None;
        }
        let r = (self as u128) * (num as u128) / (denom as u128);
        u64::try_from(r).ok()
    }

    fn mul_div_ceil(self, num: Self, denom: Self) -> Option<Self::Output> {
        if denom == 0 {
            return None;
        }
        let product = (self as u128) * (num as u128);
        let r = product / (denom as u128) + u128::from(product % (denom as u128) != 0);
        u64::try_from(r).ok()
    }
}

impl MulDiv for u128 {
    type Output = u128;

    fn mul_div_floor(self, num: Self, denom: Self) -> Option<Self::Output> {
        if denom == 0 {
            return None;
        }
        let r = U256::from(self) * U256::from(num) / U256::from(denom);
        r.to_u128()
    }

    fn mul_div_ceil(self, num: Self, denom: Self) -> Option<Self::Output> {
        if denom == 0 {
            return None;
        }
        let product = U256::from(self) * U256::from(num);
        let denom = U256::from(denom);
        let mut r = product / denom;
        if !(product % denom).is_zero() {
            r = r + 1;
        }
        r.to_u128()
    }
}

impl MulDiv for U256 {
    type Output = U256;

    fn mul_div_floor(self, num: Self, denom: Self) -> Option<Self::Output> {
        if denom.is_zero() {
            return None;
        }
        let r = U512::from(self) * U512::from(num) / U512::from(denom);
        r.to_u256()
    }

    fn mul_div_ceil(self, num: Self, denom: Self) -> Option<Self::Output> {
        if denom.is_zero() {
            return None;
        }
        let product = U512::from(self) * U512::from(num);
        let denom = U512::from(denom);
        let mut r = product / denom;
        if !(product % denom).is_zero() {
            r = r + 1;
        }
        r.to_u256()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn zero_denominator() {
        assert_eq!(1u64.mul_div_floor(1, 0), None);
        assert_eq!(1u128.mul_div_ceil(1, 0), None);
        assert_eq!(U256::one().mul_div_floor(U256::one(), U256::zero()), None);
    }

    #[test]
    fn full_width_intermediate() {
        assert_eq!(u128::MAX.mul_div_floor(u128::MAX, u128::MAX), Some(u128::MAX));
        assert_eq!(u64::MAX.mul_div_ceil(u64::MAX, u64::MAX), Some(u64::MAX));
        assert_eq!(U256::MAX.mul_div_floor(U256::MAX, U256::MAX), Some(U256::MAX));
    }

    #[test]
    fn output_overflow() {
        assert_eq!(u128::MAX.mul_div_floor(2, 1), None);
        assert_eq!(u64::MAX.mul_div_ceil(3, 2), None);
    }

    #[test]
    fn rounding() {
        assert_eq!(7u128.mul_div_floor(3, 2), Some(10));
        assert_eq!(7u128.mul_div_ceil(3, 2), Some(11));
        assert_eq!(6u128.mul_div_ceil(3, 2), Some(9));
    }

    quickcheck! {
        fn ceil_is_floor_or_one_more(a: u64, b: u64, d: u64) -> bool {
            let a = (a as u128) << 60;
            let b = (b as u128) << 40;
            let d = d as u128 + 1;
            let floor = a.mul_div_floor(b, d).unwrap();
            let ceil = a.mul_div_ceil(b, d).unwrap();
            let exact = (a * b) % d == 0;
            if exact { ceil == floor } else { ceil == floor + 1 }
        }
    }
}
