//! 256 and 512 bit numbers

use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    pub struct U512(8);
}

impl From<U256> for U512 {
    fn from(value: U256) -> U512 {
        let U256(ref words) = value;
        let mut ret = [0u64; 8];
        ret[..4].copy_from_slice(words);
        U512(ret)
    }
}

impl U256 {
    /// Narrows to u128, or `None` if any high bit is set
    pub fn to_u128(self) -> Option<u128> {
        let U256(ref words) = self;
        if words[2] != 0 || words[3] != 0 {
            return None;
        }
        Some((words[1] as u128) << 64 | words[0] as u128)
    }
}

impl U512 {
    /// Narrows to U256, or `None` if any high bit is set
    pub fn to_u256(self) -> Option<U256> {
        let U512(ref words) = self;
        if words[4..].iter().any(|w| *w != 0) {
            return None;
        }
        let mut ret = [0u64; 4];
        ret.copy_from_slice(&words[..4]);
        Some(U256(ret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u256_narrowing() {
        assert_eq!(U256::from(u128::MAX).to_u128(), Some(u128::MAX));
        assert_eq!((U256::from(u128::MAX) + 1).to_u128(), None);
    }

    #[test]
    fn u512_widening_and_narrowing() {
        let x = U256::MAX;
        let wide = U512::from(x);
        assert_eq!(wide.to_u256(), Some(x));
        assert_eq!((wide + 1).to_u256(), None);
    }
}
