//! A pool instance owning its state, tick ledger and positions
use crate::error::ErrorCode;
use crate::libraries::swap_math::{BAR_FEE_DENOMINATOR, MAX_SWAP_FEE};
use crate::libraries::tick_math::{self, MIN_TICK};
use crate::states::pool::*;
use crate::states::position::{PositionKey, PositionState, PositionStore};
use crate::states::tick::{tick_spacing_to_max_liquidity_per_tick, TickLedger, TickState};
use crate::vault::{Transfer, Vault};
use anchor_lang::prelude::*;

/// Tick spacing must stay below this bound
pub const MAX_TICK_SPACING: u16 = 16384;

/// A concentrated liquidity pool for one pair of tokens
///
/// Every mutating operation validates against the current state, settles with the vault,
/// then commits. Whenever an error is returned the pool is left exactly as it was.
///
#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct Pool {
    pub(crate) config: PoolConfig,
    pub(crate) state: PoolState,
    pub(crate) ticks: TickLedger,
    pub(crate) positions: PositionStore,
}

impl Pool {
    /// Creates a pool and sets its initial price
    ///
    /// # Arguments
    ///
    /// * `config` - Tokens, tick spacing, swap fee and protocol owner of the pool
    /// * `bar_fee` - Protocol share of the swap fee, in bips of the fee
    /// * `sqrt_price_x64` - The initial sqrt price of the pool, as a Q64.64
    ///
    pub fn new(config: PoolConfig, bar_fee: u32, sqrt_price_x64: u128) -> Result<Pool> {
        require!(config.swap_fee <= MAX_SWAP_FEE, ErrorCode::FeeLimit);
        require!(
            config.tick_spacing > 0 && config.tick_spacing < MAX_TICK_SPACING,
            ErrorCode::TickSpacingLimit
        );
        require!(config.token_0 != config.token_1, ErrorCode::IdenticalTokens);
        require!(bar_fee <= BAR_FEE_DENOMINATOR, ErrorCode::BarFeeLimit);
        // Fails if price is out of range
        let tick = tick_math::get_tick_at_sqrt_price(sqrt_price_x64)?;

        let state = PoolState {
            sqrt_price_x64,
            nearest_tick: MIN_TICK,
            bar_fee,
            max_liquidity_per_tick: tick_spacing_to_max_liquidity_per_tick(config.tick_spacing),
            ..Default::default()
        };

        emit!(PoolCreatedAndInitialized {
            token_0: config.token_0,
            token_1: config.token_1,
            swap_fee: config.swap_fee,
            tick_spacing: config.tick_spacing,
            sqrt_price_x64,
            tick,
        });

        Ok(Pool {
            config,
            state,
            ticks: TickLedger::new(),
            positions: PositionStore::default(),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn ticks(&self) -> &TickLedger {
        &self.ticks
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn position(&self, owner: Pubkey, tick_lower: i32, tick_upper: i32) -> Option<&PositionState> {
        self.positions.get(&PositionKey {
            owner,
            tick_lower,
            tick_upper,
        })
    }

    /// Current sqrt price and the highest initialized tick at or below it
    pub fn price_and_nearest_tick(&self) -> (u128, i32) {
        (self.state.sqrt_price_x64, self.state.nearest_tick)
    }

    /// Tokens in the custody of the pool
    pub fn reserves(&self) -> (u64, u64) {
        (self.state.reserve_0, self.state.reserve_1)
    }

    /// All time fee growth per unit of liquidity inside a tick range
    pub fn range_fee_growth(&self, tick_lower: i32, tick_upper: i32) -> Result<(u128, u128)> {
        let price_lower = tick_math::get_sqrt_price_at_tick(tick_lower)?;
        let price_upper = tick_math::get_sqrt_price_at_tick(tick_upper)?;
        let nearest_tick = self.nearest_tick_after_insert(tick_lower, price_lower, tick_upper, price_upper);

        Ok(TickState::get_fee_growth_inside(
            &self.boundary_tick(tick_lower, price_lower),
            &self.boundary_tick(tick_upper, price_upper),
            nearest_tick,
            self.state.fee_growth_global_0_x64,
            self.state.fee_growth_global_1_x64,
        ))
    }

    /// Changes the protocol share of swap fees
    pub fn set_bar_fee(&mut self, signer: Pubkey, bar_fee: u32) -> Result<()> {
        require_keys_eq!(signer, self.config.protocol_owner, ErrorCode::NotAnOwner);
        require!(bar_fee <= BAR_FEE_DENOMINATOR, ErrorCode::BarFeeLimit);

        let bar_fee_old = self.state.bar_fee;
        self.state.bar_fee = bar_fee;

        emit!(SetBarFeeEvent {
            bar_fee_old,
            bar_fee,
        });
        Ok(())
    }

    /// Pays out every protocol fee accrued since the last collection
    ///
    /// # Arguments
    ///
    /// * `vault` - Custody of the pool tokens
    /// * `signer` - Must be the protocol owner
    /// * `recipient` - Receives the fees
    ///
    pub fn collect_protocol_fees<V: Vault>(
        &mut self,
        vault: &mut V,
        signer: Pubkey,
        recipient: Pubkey,
    ) -> Result<(u64, u64)> {
        require_keys_eq!(signer, self.config.protocol_owner, ErrorCode::NotAnOwner);

        let (owed_0, owed_1) = self.state.protocol_fees_owed();
        let amount_0 = u64::try_from(owed_0).map_err(|_| ErrorCode::TokenAmountOverflow)?;
        let amount_1 = u64::try_from(owed_1).map_err(|_| ErrorCode::TokenAmountOverflow)?;
        let reserve_0 = self
            .state
            .reserve_0
            .checked_sub(amount_0)
            .ok_or(ErrorCode::MathOverflow)?;
        let reserve_1 = self
            .state
            .reserve_1
            .checked_sub(amount_1)
            .ok_or(ErrorCode::MathOverflow)?;

        vault.settle(&self.withdrawals(recipient, amount_0, amount_1, false))?;

        self.state.protocol_fees_collected_0 = self.state.token_0_protocol_fee;
        self.state.protocol_fees_collected_1 = self.state.token_1_protocol_fee;
        self.state.reserve_0 = reserve_0;
        self.state.reserve_1 = reserve_1;

        emit!(CollectProtocolEvent {
            sender: signer,
            recipient,
            amount_0,
            amount_1,
        });
        Ok((amount_0, amount_1))
    }

    /// The record a boundary tick has, or would get when initialized now
    pub(crate) fn boundary_tick(&self, tick: i32, sqrt_price_at_tick: u128) -> TickState {
        if let Some(state) = self.ticks.get(tick) {
            return state.clone();
        }
        // by convention, we assume that all growth before a tick was initialized happened _below_ the tick
        let (fee_growth_outside_0_x64, fee_growth_outside_1_x64) =
            if sqrt_price_at_tick <= self.state.sqrt_price_x64 {
                (
                    self.state.fee_growth_global_0_x64,
                    self.state.fee_growth_global_1_x64,
                )
            } else {
                (0, 0)
            };
        TickState {
            tick,
            fee_growth_outside_0_x64,
            fee_growth_outside_1_x64,
            ..Default::default()
        }
    }

    /// The nearest tick once any missing boundary ticks are initialized
    pub(crate) fn nearest_tick_after_insert(
        &self,
        tick_lower: i32,
        price_lower: u128,
        tick_upper: i32,
        price_upper: u128,
    ) -> i32 {
        let mut nearest_tick = self.state.nearest_tick;
        for (tick, price) in [(tick_lower, price_lower), (tick_upper, price_upper)] {
            if !self.ticks.contains(tick)
                && nearest_tick < tick
                && price <= self.state.sqrt_price_x64
            {
                nearest_tick = tick;
            }
        }
        nearest_tick
    }

    pub(crate) fn deposits(&self, from: Pubkey, amount_0: u64, amount_1: u64) -> Vec<Transfer> {
        let mut transfers = Vec::with_capacity(2);
        for (token, amount) in [(self.config.token_0, amount_0), (self.config.token_1, amount_1)] {
            if amount > 0 {
                transfers.push(Transfer::Deposit {
                    token,
                    from,
                    amount,
                });
            }
        }
        transfers
    }

    pub(crate) fn withdrawals(
        &self,
        to: Pubkey,
        amount_0: u64,
        amount_1: u64,
        unwrap: bool,
    ) -> Vec<Transfer> {
        let mut transfers = Vec::with_capacity(2);
        for (token, amount) in [(self.config.token_0, amount_0), (self.config.token_1, amount_1)] {
            if amount > 0 {
                transfers.push(Transfer::Withdraw {
                    token,
                    to,
                    amount,
                    unwrap,
                });
            }
        }
        transfers
    }
}
