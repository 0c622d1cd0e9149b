//! Adding and removing position liquidity, and collecting fees
use crate::check_ticks;
use crate::context::*;
use crate::error::ErrorCode;
use crate::libraries::{liquidity_amounts, liquidity_math, tick_math};
use crate::pool::Pool;
use crate::states::pool::{BurnEvent, CollectEvent, MintEvent};
use crate::states::position::{PositionKey, PositionState};
use crate::states::tick::{TickLedger, TickState};
use crate::vault::Vault;
use anchor_lang::prelude::*;

impl Pool {
    /// Adds liquidity for the given recipient/tickLower/tickUpper position
    ///
    /// Missing boundary ticks are linked into the tick list after the hinted ticks.
    /// The sender pays for the liquidity, rounded up.
    ///
    /// # Arguments
    ///
    /// * `vault` - Custody of the pool tokens
    /// * `sender` - Pays for the liquidity
    /// * `params` - Position ticks, their hints, the amount to add and the position owner
    ///
    pub fn mint<V: Vault>(&mut self, vault: &mut V, sender: Pubkey, params: MintParams) -> Result<MintResult> {
        check_ticks(params.tick_lower, params.tick_upper, self.config.tick_spacing)?;
        self.check_hints(&params)?;

        let pool = &self.state;
        let price_lower = tick_math::get_sqrt_price_at_tick(params.tick_lower)?;
        let price_upper = tick_math::get_sqrt_price_at_tick(params.tick_upper)?;

        let liquidity = match params.amount {
            MintAmount::Liquidity(liquidity) => liquidity,
            MintAmount::Desired { amount_0, amount_1 } => liquidity_amounts::get_liquidity_for_amounts(
                pool.sqrt_price_x64,
                price_lower,
                price_upper,
                amount_0,
                amount_1,
            )
            .ok_or(ErrorCode::MathOverflow)?,
        };
        require!(liquidity > 0, ErrorCode::InsufficientLiquidityMinted);
        require!(
            liquidity <= pool.max_liquidity_per_tick,
            ErrorCode::LiquidityOverflow
        );
        let liquidity_delta = i128::try_from(liquidity).map_err(|_| ErrorCode::LiquidityOverflow)?;

        let (amount_0, amount_1) = liquidity_amounts::get_amounts_for_liquidity(
            pool.sqrt_price_x64,
            price_lower,
            price_upper,
            liquidity,
            true,
        )
        .ok_or(ErrorCode::MathOverflow)?;
        let amount_0 = u64::try_from(amount_0).map_err(|_| ErrorCode::TokenAmountOverflow)?;
        let amount_1 = u64::try_from(amount_1).map_err(|_| ErrorCode::TokenAmountOverflow)?;

        // Tick records as they will be once initialized
        let lower = self.boundary_tick(params.tick_lower, price_lower);
        let upper = self.boundary_tick(params.tick_upper, price_upper);
        let nearest_tick = self.nearest_tick_after_insert(
            params.tick_lower,
            price_lower,
            params.tick_upper,
            price_upper,
        );
        self.check_tick_liquidity(&lower, liquidity_delta)?;
        self.check_tick_liquidity(&upper, -liquidity_delta)?;

        let (fee_growth_inside_0_x64, fee_growth_inside_1_x64) = TickState::get_fee_growth_inside(
            &lower,
            &upper,
            nearest_tick,
            pool.fee_growth_global_0_x64,
            pool.fee_growth_global_1_x64,
        );
        let key = PositionKey {
            owner: params.recipient,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
        };
        let mut position = self.positions.get(&key).cloned().unwrap_or_default();
        position.update(liquidity_delta, fee_growth_inside_0_x64, fee_growth_inside_1_x64)?;
        require!(
            position.liquidity <= pool.max_liquidity_per_tick,
            ErrorCode::LiquidityOverflow
        );

        // The range is active when the price sits in [lower, upper)
        let liquidity_next = if params.tick_lower <= nearest_tick && nearest_tick < params.tick_upper {
            liquidity_math::add_delta(pool.liquidity, liquidity_delta)?
        } else {
            pool.liquidity
        };
        let reserve_0 = pool
            .reserve_0
            .checked_add(amount_0)
            .ok_or(ErrorCode::TokenAmountOverflow)?;
        let reserve_1 = pool
            .reserve_1
            .checked_add(amount_1)
            .ok_or(ErrorCode::TokenAmountOverflow)?;

        // Ledger changes are staged so nothing can fail once tokens have moved
        let mut ticks = self.ticks.clone();
        ticks.insert(
            params.lower_old,
            params.tick_lower,
            lower.fee_growth_outside_0_x64,
            lower.fee_growth_outside_1_x64,
        )?;
        ticks.insert(
            params.upper_old,
            params.tick_upper,
            upper.fee_growth_outside_0_x64,
            upper.fee_growth_outside_1_x64,
        )?;
        ticks.apply_liquidity_delta(params.tick_lower, liquidity_delta, false)?;
        ticks.apply_liquidity_delta(params.tick_upper, liquidity_delta, true)?;

        vault.settle(&self.deposits(sender, amount_0, amount_1))?;

        self.ticks = ticks;
        self.positions.save(key, position);

        let pool = &mut self.state;
        pool.nearest_tick = nearest_tick;
        pool.liquidity = liquidity_next;
        pool.reserve_0 = reserve_0;
        pool.reserve_1 = reserve_1;

        emit!(MintEvent {
            sender,
            owner: params.recipient,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            amount: liquidity,
            amount_0,
            amount_1,
            liquidity: pool.liquidity,
        });

        Ok(MintResult {
            liquidity,
            amount_0,
            amount_1,
        })
    }

    /// Burns liquidity from the sender's position and pays out the tokens it was worth,
    /// together with every fee owed to the position
    ///
    /// A burn of 0 is a poke, withdrawing fees earned so far.
    ///
    /// # Arguments
    ///
    /// * `vault` - Custody of the pool tokens
    /// * `sender` - Owner of the position
    /// * `params` - Position ticks, liquidity to burn and recipient of the tokens
    ///
    pub fn burn<V: Vault>(&mut self, vault: &mut V, sender: Pubkey, params: BurnParams) -> Result<(u64, u64)> {
        let key = PositionKey {
            owner: sender,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
        };
        let mut position = self
            .positions
            .get(&key)
            .cloned()
            .ok_or(ErrorCode::PositionNotFound)?;
        require!(
            params.amount <= position.liquidity,
            ErrorCode::InsufficientPositionLiquidity
        );
        let liquidity_delta = i128::try_from(params.amount)
            .map_err(|_| ErrorCode::LiquidityOverflow)?
            .checked_neg()
            .ok_or(ErrorCode::LiquidityOverflow)?;

        let pool = &self.state;
        let (fee_growth_inside_0_x64, fee_growth_inside_1_x64) = self.ticks.fee_growth_inside(
            params.tick_lower,
            params.tick_upper,
            pool.nearest_tick,
            pool.fee_growth_global_0_x64,
            pool.fee_growth_global_1_x64,
        )?;
        position.update(liquidity_delta, fee_growth_inside_0_x64, fee_growth_inside_1_x64)?;

        let (principal_0, principal_1) = liquidity_amounts::get_amounts_for_liquidity(
            pool.sqrt_price_x64,
            tick_math::get_sqrt_price_at_tick(params.tick_lower)?,
            tick_math::get_sqrt_price_at_tick(params.tick_upper)?,
            params.amount,
            false,
        )
        .ok_or(ErrorCode::MathOverflow)?;
        let amount_0 = u64::try_from(principal_0)
            .ok()
            .and_then(|principal| principal.checked_add(position.tokens_owed_0))
            .ok_or(ErrorCode::TokenAmountOverflow)?;
        let amount_1 = u64::try_from(principal_1)
            .ok()
            .and_then(|principal| principal.checked_add(position.tokens_owed_1))
            .ok_or(ErrorCode::TokenAmountOverflow)?;
        position.tokens_owed_0 = 0;
        position.tokens_owed_1 = 0;

        let active = params.tick_lower <= pool.nearest_tick && pool.nearest_tick < params.tick_upper;
        let liquidity_next = if active {
            liquidity_math::add_delta(pool.liquidity, liquidity_delta)?
        } else {
            pool.liquidity
        };
        let reserve_0 = pool
            .reserve_0
            .checked_sub(amount_0)
            .ok_or(ErrorCode::MathOverflow)?;
        let reserve_1 = pool
            .reserve_1
            .checked_sub(amount_1)
            .ok_or(ErrorCode::MathOverflow)?;

        let mut nearest_tick = pool.nearest_tick;
        let mut ticks: Option<TickLedger> = None;
        if params.amount > 0 {
            let staged = ticks.insert(self.ticks.clone());
            let net_lower = staged.apply_liquidity_delta(params.tick_lower, liquidity_delta, false)?;
            let net_upper = staged.apply_liquidity_delta(params.tick_upper, liquidity_delta, true)?;
            for (tick, net) in [(params.tick_lower, net_lower), (params.tick_upper, net_upper)] {
                if net == 0 && tick != tick_math::MIN_TICK && tick != tick_math::MAX_TICK {
                    let removed = staged.remove(tick)?;
                    if nearest_tick == tick {
                        nearest_tick = removed.previous_tick;
                    }
                }
            }
        }

        vault.settle(&self.withdrawals(params.recipient, amount_0, amount_1, params.unwrap))?;

        if let Some(ticks) = ticks {
            self.ticks = ticks;
        }
        self.positions.save(key, position);

        let pool = &mut self.state;
        pool.nearest_tick = nearest_tick;
        pool.liquidity = liquidity_next;
        pool.reserve_0 = reserve_0;
        pool.reserve_1 = reserve_1;

        emit!(BurnEvent {
            owner: sender,
            recipient: params.recipient,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            amount: params.amount,
            amount_0,
            amount_1,
            liquidity: pool.liquidity,
        });

        Ok((amount_0, amount_1))
    }

    /// Collects tokens owed to the sender's position
    ///
    /// Fees earned up to now are credited first when the position still holds liquidity.
    /// To withdraw a single asset, the amount for the other asset can be set as 0.
    /// To withdraw all tokens owed, a value larger than owed amount can be passed,
    /// e.g. u64::MAX
    ///
    pub fn collect<V: Vault>(&mut self, vault: &mut V, sender: Pubkey, params: CollectParams) -> Result<(u64, u64)> {
        let key = PositionKey {
            owner: sender,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
        };
        let mut position: PositionState = self
            .positions
            .get(&key)
            .cloned()
            .ok_or(ErrorCode::PositionNotFound)?;

        let pool = &self.state;
        if position.liquidity > 0 {
            let (fee_growth_inside_0_x64, fee_growth_inside_1_x64) = self.ticks.fee_growth_inside(
                params.tick_lower,
                params.tick_upper,
                pool.nearest_tick,
                pool.fee_growth_global_0_x64,
                pool.fee_growth_global_1_x64,
            )?;
            position.update(0, fee_growth_inside_0_x64, fee_growth_inside_1_x64)?;
        }

        let amount_0 = params.amount_0_requested.min(position.tokens_owed_0);
        let amount_1 = params.amount_1_requested.min(position.tokens_owed_1);
        position.tokens_owed_0 -= amount_0;
        position.tokens_owed_1 -= amount_1;
        let reserve_0 = pool
            .reserve_0
            .checked_sub(amount_0)
            .ok_or(ErrorCode::MathOverflow)?;
        let reserve_1 = pool
            .reserve_1
            .checked_sub(amount_1)
            .ok_or(ErrorCode::MathOverflow)?;

        vault.settle(&self.withdrawals(params.recipient, amount_0, amount_1, params.unwrap))?;

        self.positions.save(key, position);
        self.state.reserve_0 = reserve_0;
        self.state.reserve_1 = reserve_1;

        emit!(CollectEvent {
            owner: sender,
            recipient: params.recipient,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            amount_0,
            amount_1,
        });

        Ok((amount_0, amount_1))
    }

    /// Validates the hints of the ticks a mint would initialize
    fn check_hints(&self, params: &MintParams) -> Result<()> {
        let lower_new = !self.ticks.contains(params.tick_lower);
        let upper_new = !self.ticks.contains(params.tick_upper);

        if lower_new {
            self.ticks.check_hint(params.lower_old, params.tick_lower)?;
        }
        if upper_new {
            if lower_new && params.upper_old == params.tick_lower {
                // linked right after the new lower tick
                require!(
                    params.tick_upper < self.ticks.next_tick(params.lower_old)?,
                    ErrorCode::InvalidTickOrder
                );
            } else {
                self.ticks.check_hint(params.upper_old, params.tick_upper)?;
                // the new lower tick would land between the upper hint and the upper tick
                require!(
                    !(lower_new && params.upper_old < params.tick_lower),
                    ErrorCode::InvalidTickOrder
                );
            }
        }
        Ok(())
    }

    /// Net liquidity of a tick must stay within the per tick bound
    fn check_tick_liquidity(&self, tick: &TickState, liquidity_delta: i128) -> Result<()> {
        let net = tick
            .liquidity_net
            .checked_add(liquidity_delta)
            .ok_or(ErrorCode::LiquidityOverflow)?;
        require!(
            net.unsigned_abs() <= self.state.max_liquidity_per_tick,
            ErrorCode::LiquidityOverflow
        );
        Ok(())
    }
}
