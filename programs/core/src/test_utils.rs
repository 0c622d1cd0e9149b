use crate::context::{MintAmount, MintParams, MintResult};
use crate::error::ErrorCode;
use crate::libraries::fixed_point_64::Q64;
use crate::libraries::tick_math::MIN_TICK;
use crate::pool::Pool;
use crate::states::pool::PoolConfig;
use crate::vault::{MemoryVault, Transfer, Vault};
use anchor_lang::prelude::*;

pub const FUNDS: u64 = 1_000_000_000_000_000;

pub fn key(n: u8) -> Pubkey {
    Pubkey::new_from_array([n; 32])
}

pub fn alice() -> Pubkey {
    key(1)
}

pub fn bob() -> Pubkey {
    key(2)
}

pub fn carol() -> Pubkey {
    key(3)
}

pub fn owner() -> Pubkey {
    key(9)
}

pub fn config(tick_spacing: u16, swap_fee: u32) -> PoolConfig {
    PoolConfig {
        token_0: key(100),
        token_1: key(101),
        tick_spacing,
        swap_fee,
        protocol_owner: owner(),
    }
}

/// Spacing 60, 0.3% swap fee, price 1
pub fn standard_pool() -> Pool {
    pool_with_bar_fee(0)
}

pub fn pool_with_bar_fee(bar_fee: u32) -> Pool {
    Pool::new(config(60, 3_000), bar_fee, Q64).unwrap()
}

/// A vault where alice, bob and carol hold plenty of both pool tokens
pub fn funded_vault(pool: &Pool) -> MemoryVault {
    let mut vault = MemoryVault::new();
    for owner in [alice(), bob(), carol()] {
        vault.credit(owner, pool.config().token_0, FUNDS).unwrap();
        vault.credit(owner, pool.config().token_1, FUNDS).unwrap();
    }
    vault
}

/// Highest initialized tick below `tick`
pub fn hint_below(pool: &Pool, tick: i32) -> i32 {
    pool.ticks()
        .iter()
        .map(|state| state.tick)
        .filter(|t| *t < tick)
        .last()
        .unwrap_or(MIN_TICK)
}

/// Mints with hints looked up in the ledger
pub fn mint_liquidity(
    pool: &mut Pool,
    vault: &mut MemoryVault,
    owner: Pubkey,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> Result<MintResult> {
    let lower_old = hint_below(pool, tick_lower);
    let mut upper_old = hint_below(pool, tick_upper);
    if !pool.ticks().contains(tick_lower) && upper_old < tick_lower {
        upper_old = tick_lower;
    }
    pool.mint(
        vault,
        owner,
        MintParams {
            lower_old,
            tick_lower,
            upper_old,
            tick_upper,
            amount: MintAmount::Liquidity(liquidity),
            recipient: owner,
        },
    )
}

/// Standard pool with bob's liquidity on one range
pub fn pool_with_range(tick_lower: i32, tick_upper: i32, liquidity: u128) -> (Pool, MemoryVault) {
    let mut pool = standard_pool();
    let mut vault = funded_vault(&pool);
    mint_liquidity(&mut pool, &mut vault, bob(), tick_lower, tick_upper, liquidity).unwrap();
    (pool, vault)
}

pub fn encode(pool: &Pool) -> Vec<u8> {
    let mut bytes = Vec::new();
    pool.serialize(&mut bytes).unwrap();
    bytes
}

pub fn decode(mut bytes: &[u8]) -> Pool {
    Pool::deserialize(&mut bytes).unwrap()
}

/// Refuses every settlement, counting the attempts
#[derive(Default)]
pub struct RejectingVault {
    pub calls: usize,
}

impl Vault for RejectingVault {
    fn settle(&mut self, _transfers: &[Transfer]) -> Result<()> {
        self.calls += 1;
        err!(ErrorCode::InsufficientBalance)
    }
}
