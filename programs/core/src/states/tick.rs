//! Contains functions for managing tick processes and relevant calculations
use crate::error::ErrorCode;
use crate::libraries::tick_math::{MAX_TICK, MIN_TICK};
use anchor_lang::prelude::*;
use std::collections::BTreeMap;

/// Info stored for an initialized price tick
#[derive(Clone, Debug, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct TickState {
    /// The price tick whose info is stored in the record
    pub tick: i32,

    /// The closest initialized tick below, or the tick itself for MIN_TICK
    pub previous_tick: i32,

    /// The closest initialized tick above, or the tick itself for MAX_TICK
    pub next_tick: i32,

    /// Amount of net liquidity added (subtracted) when tick is crossed from left to right (right to left)
    pub liquidity_net: i128,

    /// Fee growth per unit of liquidity on the _other_ side of this tick (relative to the current tick)
    /// only has relative meaning, not absolute; the value depends on when the tick is initialized
    pub fee_growth_outside_0_x64: u128,
    pub fee_growth_outside_1_x64: u128,
}

impl TickState {
    /// Retrieves the all time fee growth data in token_0 and token_1, per unit of liquidity,
    /// inside a position's tick boundaries.
    ///
    /// Calculates `fr = fg - f_below(lower) - f_above(upper)`, formula 6.19
    ///
    /// Accumulators are free to overflow, only differences between them are meaningful.
    ///
    /// # Arguments
    ///
    /// * `tick_lower` - The lower tick boundary of the position
    /// * `tick_upper` - The upper tick boundary of the position
    /// * `nearest_tick` - The highest initialized tick at or below the current price
    /// * `fee_growth_global_0_x64` - The all-time global fee growth, per unit of liquidity, in token_0
    /// * `fee_growth_global_1_x64` - The all-time global fee growth, per unit of liquidity, in token_1
    ///
    pub fn get_fee_growth_inside(
        tick_lower: &TickState,
        tick_upper: &TickState,
        nearest_tick: i32,
        fee_growth_global_0_x64: u128,
        fee_growth_global_1_x64: u128,
    ) -> (u128, u128) {
        // calculate fee growth below
        let (fee_growth_below_0_x64, fee_growth_below_1_x64) = if tick_lower.tick <= nearest_tick {
            (
                tick_lower.fee_growth_outside_0_x64,
                tick_lower.fee_growth_outside_1_x64,
            )
        } else {
            (
                fee_growth_global_0_x64.wrapping_sub(tick_lower.fee_growth_outside_0_x64),
                fee_growth_global_1_x64.wrapping_sub(tick_lower.fee_growth_outside_1_x64),
            )
        };

        // Calculate fee growth above
        let (fee_growth_above_0_x64, fee_growth_above_1_x64) = if nearest_tick < tick_upper.tick {
            (
                tick_upper.fee_growth_outside_0_x64,
                tick_upper.fee_growth_outside_1_x64,
            )
        } else {
            (
                fee_growth_global_0_x64.wrapping_sub(tick_upper.fee_growth_outside_0_x64),
                fee_growth_global_1_x64.wrapping_sub(tick_upper.fee_growth_outside_1_x64),
            )
        };
        let fee_growth_inside_0_x64 = fee_growth_global_0_x64
            .wrapping_sub(fee_growth_below_0_x64)
            .wrapping_sub(fee_growth_above_0_x64);
        let fee_growth_inside_1_x64 = fee_growth_global_1_x64
            .wrapping_sub(fee_growth_below_1_x64)
            .wrapping_sub(fee_growth_above_1_x64);

        (fee_growth_inside_0_x64, fee_growth_inside_1_x64)
    }

    /// Transitions to the current tick as needed by price movement, returning the amount of liquidity
    /// added (subtracted) when tick is crossed from left to right (right to left)
    ///
    /// # Arguments
    ///
    /// * `self` - The destination tick of the transition
    /// * `fee_growth_global_0_x64` - The all-time global fee growth, per unit of liquidity, in token_0
    /// * `fee_growth_global_1_x64` - The all-time global fee growth, per unit of liquidity, in token_1
    ///
    pub fn cross(&mut self, fee_growth_global_0_x64: u128, fee_growth_global_1_x64: u128) -> i128 {
        self.fee_growth_outside_0_x64 =
            fee_growth_global_0_x64.wrapping_sub(self.fee_growth_outside_0_x64);
        self.fee_growth_outside_1_x64 =
            fee_growth_global_1_x64.wrapping_sub(self.fee_growth_outside_1_x64);

        self.liquidity_net
    }
}

/// Initialized ticks of a pool, kept as a sorted doubly linked list
///
/// Records live in an arena keyed by tick index. Each record links to its neighbours,
/// so walking the price curve never searches the map. Two sentinels at MIN_TICK and
/// MAX_TICK are always present.
///
#[derive(Clone, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct TickLedger {
    ticks: BTreeMap<i32, TickState>,
}

impl Default for TickLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TickLedger {
    /// Creates a ledger holding only the two linked sentinels
    pub fn new() -> Self {
        let mut ticks = BTreeMap::new();
        ticks.insert(
            MIN_TICK,
            TickState {
                tick: MIN_TICK,
                previous_tick: MIN_TICK,
                next_tick: MAX_TICK,
                ..Default::default()
            },
        );
        ticks.insert(
            MAX_TICK,
            TickState {
                tick: MAX_TICK,
                previous_tick: MIN_TICK,
                next_tick: MAX_TICK,
                ..Default::default()
            },
        );
        TickLedger { ticks }
    }

    pub fn get(&self, tick: i32) -> Option<&TickState> {
        self.ticks.get(&tick)
    }

    pub fn contains(&self, tick: i32) -> bool {
        self.ticks.contains_key(&tick)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Initialized ticks in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &TickState> {
        self.ticks.values()
    }

    /// Loads a tick the caller knows to be initialized
    pub fn load(&self, tick: i32) -> Result<&TickState> {
        match self.ticks.get(&tick) {
            Some(state) => Ok(state),
            None => {
                msg!("tick {} is missing from the ledger", tick);
                err!(ErrorCode::TickLedgerCorrupted)
            }
        }
    }

    pub fn next_tick(&self, tick: i32) -> Result<i32> {
        Ok(self.load(tick)?.next_tick)
    }

    pub fn previous_tick(&self, tick: i32) -> Result<i32> {
        Ok(self.load(tick)?.previous_tick)
    }

    /// Checks that `hint_below` is initialized and brackets `tick` with its successor
    pub fn check_hint(&self, hint_below: i32, tick: i32) -> Result<()> {
        let below = self
            .ticks
            .get(&hint_below)
            .ok_or(ErrorCode::InvalidTickOrder)?;
        require!(
            hint_below < tick && tick < below.next_tick,
            ErrorCode::InvalidTickOrder
        );
        Ok(())
    }

    /// Links a new tick between `hint_below` and its successor
    ///
    /// Inserting an initialized tick is a no-op returning the existing record.
    ///
    /// # Arguments
    ///
    /// * `hint_below` - An initialized tick directly below the new tick
    /// * `tick` - The tick to initialize
    /// * `fee_growth_outside_0_x64` - Starting fee growth outside in token_0
    /// * `fee_growth_outside_1_x64` - Starting fee growth outside in token_1
    ///
    pub fn insert(
        &mut self,
        hint_below: i32,
        tick: i32,
        fee_growth_outside_0_x64: u128,
        fee_growth_outside_1_x64: u128,
    ) -> Result<&TickState> {
        if !self.ticks.contains_key(&tick) {
            self.check_hint(hint_below, tick)?;
            let next_tick = self.next_tick(hint_below)?;

            self.ticks.insert(
                tick,
                TickState {
                    tick,
                    previous_tick: hint_below,
                    next_tick,
                    liquidity_net: 0,
                    fee_growth_outside_0_x64,
                    fee_growth_outside_1_x64,
                },
            );
            if let Some(below) = self.ticks.get_mut(&hint_below) {
                below.next_tick = tick;
            }
            if let Some(above) = self.ticks.get_mut(&next_tick) {
                above.previous_tick = tick;
            }
        }
        self.load(tick)
    }

    /// Unlinks a tick that no longer carries liquidity and returns its record
    pub fn remove(&mut self, tick: i32) -> Result<TickState> {
        require!(tick != MIN_TICK && tick != MAX_TICK, ErrorCode::SentinelTick);
        require!(self.load(tick)?.liquidity_net == 0, ErrorCode::TickNotEmpty);

        let removed = self
            .ticks
            .remove(&tick)
            .ok_or(ErrorCode::TickLedgerCorrupted)?;
        if let Some(below) = self.ticks.get_mut(&removed.previous_tick) {
            below.next_tick = removed.next_tick;
        }
        if let Some(above) = self.ticks.get_mut(&removed.next_tick) {
            above.previous_tick = removed.previous_tick;
        }
        Ok(removed)
    }

    /// Adds liquidity referencing the tick and returns the new net liquidity
    ///
    /// # Arguments
    ///
    /// * `tick` - An initialized tick
    /// * `liquidity_delta` - Liquidity added (removed) by a position
    /// * `upper` - true for a position's upper tick, false for its lower tick
    ///
    pub fn apply_liquidity_delta(
        &mut self,
        tick: i32,
        liquidity_delta: i128,
        upper: bool,
    ) -> Result<i128> {
        let state = self
            .ticks
            .get_mut(&tick)
            .ok_or(ErrorCode::TickLedgerCorrupted)?;

        // when the lower (upper) tick is crossed left to right (right to left),
        // liquidity must be added (removed)
        state.liquidity_net = if upper {
            state.liquidity_net.checked_sub(liquidity_delta)
        } else {
            state.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(ErrorCode::LiquidityOverflow)?;

        Ok(state.liquidity_net)
    }

    /// Flips the fee growth outside of a tick as price moves past it
    pub fn cross(
        &mut self,
        tick: i32,
        fee_growth_global_0_x64: u128,
        fee_growth_global_1_x64: u128,
    ) -> Result<i128> {
        let state = self
            .ticks
            .get_mut(&tick)
            .ok_or(ErrorCode::TickLedgerCorrupted)?;
        Ok(state.cross(fee_growth_global_0_x64, fee_growth_global_1_x64))
    }

    /// Fee growth inside `[tick_lower, tick_upper)`, both of which must be initialized
    pub fn fee_growth_inside(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        nearest_tick: i32,
        fee_growth_global_0_x64: u128,
        fee_growth_global_1_x64: u128,
    ) -> Result<(u128, u128)> {
        Ok(TickState::get_fee_growth_inside(
            self.load(tick_lower)?,
            self.load(tick_upper)?,
            nearest_tick,
            fee_growth_global_0_x64,
            fee_growth_global_1_x64,
        ))
    }

    /// Walks the list from MIN_TICK to MAX_TICK and checks ordering, back links,
    /// reachability of every record and that net liquidity sums to zero
    pub fn verify(&self) -> Result<()> {
        let mut previous = MIN_TICK;
        let mut current = MIN_TICK;
        let mut visited = 0usize;
        let mut net: i128 = 0;

        loop {
            let state = self.load(current)?;
            if state.tick != current || state.previous_tick != previous {
                msg!("tick {} is linked to the wrong neighbour", current);
                return err!(ErrorCode::TickLedgerCorrupted);
            }
            net = net
                .checked_add(state.liquidity_net)
                .ok_or(ErrorCode::TickLedgerCorrupted)?;
            visited += 1;

            if current == MAX_TICK {
                require!(state.next_tick == MAX_TICK, ErrorCode::TickLedgerCorrupted);
                break;
            }
            if state.next_tick <= current {
                msg!("tick {} links forward to {}", current, state.next_tick);
                return err!(ErrorCode::TickLedgerCorrupted);
            }
            previous = current;
            current = state.next_tick;
        }

        if visited != self.ticks.len() || net != 0 {
            msg!(
                "{} of {} ticks reachable, net liquidity {}",
                visited,
                self.ticks.len(),
                net
            );
            return err!(ErrorCode::TickLedgerCorrupted);
        }
        Ok(())
    }
}

/// Derives max liquidity per tick from given tick spacing
///
/// # Arguments
///
/// * `tick_spacing` - The amount of required tick separation, realized in multiples of `tick_spacing`
/// e.g., a tickSpacing of 3 requires ticks to be initialized every 3rd tick i.e., ..., -6, -3, 0, 3, 6, ...
///
pub fn tick_spacing_to_max_liquidity_per_tick(tick_spacing: u16) -> u128 {
    let tick_spacing = tick_spacing as i32;
    // Find min and max values permitted by tick spacing
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;

    u128::MAX / num_ticks
}
