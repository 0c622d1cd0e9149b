#![allow(unexpected_cfgs)]
pub mod error;

use anchor_lang::prelude::*;
use clmm_core::{Pool, SwapParams, Vault};
use error::ErrorCode;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

/// Parameters of a single pool exact input swap
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct ExactInputSingleParams {
    /// The direction of the swap, true for token_0 to token_1, false for token_1 to token_0
    pub zero_for_one: bool,

    /// Token amount to be swapped in
    pub amount_in: u64,

    /// The minimum amount to swap out, which serves as a slippage check
    pub amount_out_minimum: u64,

    /// Receives the output
    pub recipient: Pubkey,

    /// Whether the vault should hand the output out of its internal balances
    pub unwrap_output: bool,
}

/// Swaps `amount_in` of one token for as much as possible of another token,
/// across a single pool
///
/// The output is quoted first. Nothing is swapped when the quote pays out nothing or
/// falls short of the minimum.
///
/// # Arguments
///
/// * `pool` - The pool to swap through
/// * `vault` - Custody of the pool tokens
/// * `sender` - Pays the input
/// * `params` - Direction, amounts and recipient of the swap
///
pub fn exact_input_single<V: Vault>(
    pool: &mut Pool,
    vault: &mut V,
    sender: Pubkey,
    params: ExactInputSingleParams,
) -> Result<u64> {
    let quote = pool.quote_exact_input(params.zero_for_one, params.amount_in)?;
    require!(quote > 0, ErrorCode::InsufficientOutputAmount);
    require!(
        quote >= params.amount_out_minimum,
        ErrorCode::TooLittleReceived
    );

    pool.swap(
        vault,
        sender,
        SwapParams {
            zero_for_one: params.zero_for_one,
            amount_in: params.amount_in,
            recipient: params.recipient,
            unwrap_output: params.unwrap_output,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_core::libraries::fixed_point_64::Q64;
    use clmm_core::{MemoryVault, MintAmount, MintParams, PoolConfig};
    use clmm_core::libraries::tick_math::MIN_TICK;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn setup() -> (Pool, MemoryVault) {
        let config = PoolConfig {
            token_0: key(100),
            token_1: key(101),
            tick_spacing: 60,
            swap_fee: 3_000,
            protocol_owner: key(9),
        };
        let mut pool = Pool::new(config, 0, Q64).unwrap();
        let mut vault = MemoryVault::new();
        for owner in [key(1), key(2)] {
            vault.credit(owner, config.token_0, 1_000_000_000).unwrap();
            vault.credit(owner, config.token_1, 1_000_000_000).unwrap();
        }
        pool.mint(
            &mut vault,
            key(2),
            MintParams {
                lower_old: MIN_TICK,
                tick_lower: -120,
                upper_old: -120,
                tick_upper: 180,
                amount: MintAmount::Liquidity(1_000_000),
                recipient: key(2),
            },
        )
        .unwrap();
        (pool, vault)
    }

    fn params(amount_in: u64, amount_out_minimum: u64) -> ExactInputSingleParams {
        ExactInputSingleParams {
            zero_for_one: true,
            amount_in,
            amount_out_minimum,
            recipient: key(1),
            unwrap_output: false,
        }
    }

    #[test]
    fn swaps_when_output_is_enough() {
        let (mut pool, mut vault) = setup();
        let amount_out = exact_input_single(&mut pool, &mut vault, key(1), params(1_000, 996)).unwrap();
        assert_eq!(amount_out, 996);
    }

    #[test]
    fn slippage_guard() {
        let (mut pool, mut vault) = setup();
        let before = pool.clone();
        assert_eq!(
            exact_input_single(&mut pool, &mut vault, key(1), params(1_000, 997)).unwrap_err(),
            ErrorCode::TooLittleReceived.into()
        );
        assert_eq!(pool, before);
    }

    #[test]
    fn router_errors_stand_apart_from_pool_errors() {
        use clmm_core::error::ErrorCode as PoolErrorCode;
        let router: Error = ErrorCode::TooLittleReceived.into();
        assert_ne!(router, PoolErrorCode::BarFeeLimit.into());
        let router: Error = ErrorCode::InsufficientOutputAmount.into();
        assert_ne!(router, PoolErrorCode::FeeLimit.into());
        assert_eq!(u32::from(ErrorCode::InsufficientOutputAmount), 7000);
    }

    #[test]
    fn dust_input_pays_nothing() {
        let (mut pool, mut vault) = setup();
        let before = pool.clone();
        assert_eq!(
            exact_input_single(&mut pool, &mut vault, key(1), params(1, 0)).unwrap_err(),
            ErrorCode::InsufficientOutputAmount.into()
        );
        assert_eq!(
            exact_input_single(&mut pool, &mut vault, key(1), params(0, 0)).unwrap_err(),
            ErrorCode::InsufficientOutputAmount.into()
        );
        assert_eq!(pool, before);
    }
}
