#![allow(unexpected_cfgs)]
pub mod context;
pub mod error;
pub mod libraries;
pub mod liquidity;
pub mod pool;
pub mod shared;
pub mod states;
pub mod swap;
pub mod vault;

#[cfg(test)]
pub(crate) mod test_utils;

use crate::error::ErrorCode;
use crate::libraries::tick_math;
use anchor_lang::prelude::*;

pub use context::*;
pub use pool::Pool;
pub use shared::SharedPool;
pub use states::pool::PoolConfig;
pub use vault::{MemoryVault, Transfer, Vault};

declare_id!("37kn8WUzihQoAnhYxueA2BnqCA7VRnrVvYoHy1hQ6Veu");

/// Common checks for valid position ticks.
///
/// Ticks must be ordered, lie within tick boundaries and be multiples of the tick
/// spacing. Lower ticks sit on even and upper ticks on odd multiples of the spacing.
///
/// # Arguments
///
/// * `tick_lower` - The lower tick
/// * `tick_upper` - The upper tick
/// * `tick_spacing` - Tick spacing of the pool
///
pub fn check_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: u16) -> Result<()> {
    require!(tick_lower < tick_upper, ErrorCode::WrongOrder);
    require!(tick_lower >= tick_math::MIN_TICK, ErrorCode::LowerRange);
    require!(tick_upper <= tick_math::MAX_TICK, ErrorCode::UpperRange);

    let tick_spacing = tick_spacing as i32;
    require!(
        tick_lower % tick_spacing == 0 && tick_upper % tick_spacing == 0,
        ErrorCode::InvalidTick
    );
    require!((tick_lower / tick_spacing) % 2 == 0, ErrorCode::LowerEven);
    require!((tick_upper / tick_spacing) % 2 != 0, ErrorCode::UpperOdd);
    Ok(())
}
