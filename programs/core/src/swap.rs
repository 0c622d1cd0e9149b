//! Exact input swaps walking the tick list
use crate::context::SwapParams;
use crate::error::ErrorCode;
use crate::libraries::liquidity_math;
use crate::libraries::swap_math::{compute_fees, compute_swap_step};
use crate::libraries::tick_math::{self, MAX_TICK, MIN_TICK};
use crate::pool::Pool;
use crate::states::pool::SwapEvent;
use crate::vault::{Transfer, Vault};
use anchor_lang::prelude::*;

/// Working state of a swap, committed only once the swap is settled
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct SwapState {
    // input left to swap
    amount_remaining: u64,
    // output net of fees, paid to the recipient
    amount_out: u128,
    sqrt_price_x64: u128,
    liquidity: u128,
    // the next initialized tick in the direction of travel
    next_tick_to_cross: i32,
    fee_growth_global_0_x64: u128,
    fee_growth_global_1_x64: u128,
    token_0_protocol_fee: u128,
    token_1_protocol_fee: u128,
    // ticks crossed in order, with the fee growth globals at the time of crossing
    crossings: Vec<(i32, u128, u128)>,
}

/// Outcome of a planned swap
#[derive(Clone, Debug, PartialEq, Eq)]
struct SwapPlan {
    amount_out: u64,
    nearest_tick: i32,
    reserve_0: u64,
    reserve_1: u64,
    state: SwapState,
}

impl Pool {
    /// Swaps an exact amount of one token for as much as possible of the other
    ///
    /// Returns the amount paid out to the recipient, net of the swap fee.
    ///
    /// # Arguments
    ///
    /// * `vault` - Custody of the pool tokens
    /// * `sender` - Pays the input
    /// * `params` - Direction, input amount and recipient of the swap
    ///
    pub fn swap<V: Vault>(&mut self, vault: &mut V, sender: Pubkey, params: SwapParams) -> Result<u64> {
        if params.amount_in == 0 {
            return Ok(0);
        }
        let plan = self.plan_swap(params.zero_for_one, params.amount_in)?;

        let (token_in, token_out) = if params.zero_for_one {
            (self.config.token_0, self.config.token_1)
        } else {
            (self.config.token_1, self.config.token_0)
        };
        let mut transfers = vec![Transfer::Deposit {
            token: token_in,
            from: sender,
            amount: params.amount_in,
        }];
        if plan.amount_out > 0 {
            transfers.push(Transfer::Withdraw {
                token: token_out,
                to: params.recipient,
                amount: plan.amount_out,
                unwrap: params.unwrap_output,
            });
        }
        vault.settle(&transfers)?;

        // Every crossed tick was loaded while planning, so crossing cannot fail here
        for (tick, fee_growth_0_x64, fee_growth_1_x64) in &plan.state.crossings {
            self.ticks.cross(*tick, *fee_growth_0_x64, *fee_growth_1_x64)?;
        }
        let pool = &mut self.state;
        pool.sqrt_price_x64 = plan.state.sqrt_price_x64;
        pool.liquidity = plan.state.liquidity;
        pool.nearest_tick = plan.nearest_tick;
        pool.fee_growth_global_0_x64 = plan.state.fee_growth_global_0_x64;
        pool.fee_growth_global_1_x64 = plan.state.fee_growth_global_1_x64;
        pool.token_0_protocol_fee = plan.state.token_0_protocol_fee;
        pool.token_1_protocol_fee = plan.state.token_1_protocol_fee;
        pool.reserve_0 = plan.reserve_0;
        pool.reserve_1 = plan.reserve_1;

        emit!(SwapEvent {
            sender,
            recipient: params.recipient,
            token_in,
            token_out,
            amount_in: params.amount_in,
            amount_out: plan.amount_out,
            sqrt_price_x64: pool.sqrt_price_x64,
            liquidity: pool.liquidity,
            nearest_tick: pool.nearest_tick,
        });

        Ok(plan.amount_out)
    }

    /// Output an exact input swap would pay now, without changing the pool
    pub fn quote_exact_input(&self, zero_for_one: bool, amount_in: u64) -> Result<u64> {
        if amount_in == 0 {
            return Ok(0);
        }
        Ok(self.plan_swap(zero_for_one, amount_in)?.amount_out)
    }

    fn plan_swap(&self, zero_for_one: bool, amount_in: u64) -> Result<SwapPlan> {
        let pool = &self.state;
        let mut state = SwapState {
            amount_remaining: amount_in,
            sqrt_price_x64: pool.sqrt_price_x64,
            liquidity: pool.liquidity,
            next_tick_to_cross: if zero_for_one {
                pool.nearest_tick
            } else {
                self.ticks.next_tick(pool.nearest_tick)?
            },
            fee_growth_global_0_x64: pool.fee_growth_global_0_x64,
            fee_growth_global_1_x64: pool.fee_growth_global_1_x64,
            token_0_protocol_fee: pool.token_0_protocol_fee,
            token_1_protocol_fee: pool.token_1_protocol_fee,
            ..Default::default()
        };

        while state.amount_remaining > 0 {
            let sqrt_price_target_x64 = tick_math::get_sqrt_price_at_tick(state.next_tick_to_cross)?;
            let step = compute_swap_step(
                state.sqrt_price_x64,
                sqrt_price_target_x64,
                state.liquidity,
                state.amount_remaining,
                zero_for_one,
            )?;
            state.amount_remaining -= step.amount_in;
            state.sqrt_price_x64 = step.sqrt_price_next_x64;

            if step.amount_out > 0 {
                let fees = compute_fees(
                    step.amount_out,
                    self.config.swap_fee,
                    pool.bar_fee,
                    state.liquidity,
                )?;
                // fees are taken from the output token
                let (fee_growth_global_x64, protocol_fee) = if zero_for_one {
                    (&mut state.fee_growth_global_1_x64, &mut state.token_1_protocol_fee)
                } else {
                    (&mut state.fee_growth_global_0_x64, &mut state.token_0_protocol_fee)
                };
                *fee_growth_global_x64 = fee_growth_global_x64
                    .checked_add(fees.fee_growth_x64)
                    .ok_or(ErrorCode::FeeGrowthRegression)?;
                *protocol_fee = protocol_fee
                    .checked_add(fees.protocol_fee)
                    .ok_or(ErrorCode::MathOverflow)?;
                state.amount_out = state
                    .amount_out
                    .checked_add(step.amount_out - fees.fee_amount)
                    .ok_or(ErrorCode::MathOverflow)?;
            }

            if step.cross {
                self.cross_next_tick(&mut state, zero_for_one)?;
            }
        }

        let nearest_tick = if zero_for_one {
            state.next_tick_to_cross
        } else {
            self.ticks.previous_tick(state.next_tick_to_cross)?
        };
        let amount_out = u64::try_from(state.amount_out).map_err(|_| ErrorCode::TokenAmountOverflow)?;

        let (reserve_in, reserve_out) = if zero_for_one {
            (pool.reserve_0, pool.reserve_1)
        } else {
            (pool.reserve_1, pool.reserve_0)
        };
        let reserve_in = reserve_in
            .checked_add(amount_in)
            .ok_or(ErrorCode::TokenAmountOverflow)?;
        let reserve_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(ErrorCode::InsufficientLiquidity)?;
        let (reserve_0, reserve_1) = if zero_for_one {
            (reserve_in, reserve_out)
        } else {
            (reserve_out, reserve_in)
        };

        Ok(SwapPlan {
            amount_out,
            nearest_tick,
            reserve_0,
            reserve_1,
            state,
        })
    }

    /// Moves the working state past `next_tick_to_cross`
    fn cross_next_tick(&self, state: &mut SwapState, zero_for_one: bool) -> Result<()> {
        let tick = state.next_tick_to_cross;
        // no liquidity exists past the sentinels
        if (zero_for_one && tick == MIN_TICK) || (!zero_for_one && tick == MAX_TICK) {
            return err!(ErrorCode::InsufficientLiquidity);
        }

        let tick_state = self.ticks.load(tick)?;
        state.crossings.push((
            tick,
            state.fee_growth_global_0_x64,
            state.fee_growth_global_1_x64,
        ));

        let liquidity_net = tick_state.liquidity_net;
        let liquidity_delta = if zero_for_one {
            liquidity_net.checked_neg().ok_or(ErrorCode::LiquidityUnderflow)?
        } else {
            liquidity_net
        };
        state.liquidity = match liquidity_math::add_delta(state.liquidity, liquidity_delta) {
            Ok(liquidity) => liquidity,
            Err(_) => {
                msg!(
                    "crossing tick {} with liquidity {} and net {}",
                    tick,
                    state.liquidity,
                    liquidity_net
                );
                return err!(ErrorCode::LiquidityUnderflow);
            }
        };

        state.next_tick_to_cross = if zero_for_one {
            tick_state.previous_tick
        } else {
            tick_state.next_tick
        };
        Ok(())
    }
}
