/// Store owed liquidity, fee growth per unit liquidity fees per position
use crate::error::ErrorCode;
use crate::libraries::fixed_point_64;
use crate::libraries::full_math::MulDiv;
use crate::libraries::liquidity_math;
use anchor_lang::prelude::*;
use std::collections::BTreeMap;

/// Identifies a position: `[owner, tick_lower, tick_upper]`
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AnchorSerialize, AnchorDeserialize,
)]
pub struct PositionKey {
    pub owner: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PositionState {
    // Liquidity in the position the last time it was touched
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x64: u128,
    pub fee_growth_inside_1_last_x64: u128,
    pub tokens_owed_0: u64,
    pub tokens_owed_1: u64,
}

impl PositionState {
    /// Credit liquidity change and fee growth to a position
    ///
    /// Fees earned since the last touch are credited on the liquidity held before the change.
    /// A new position holds no liquidity, so it only takes the snapshot.
    ///
    /// # Arguments
    ///
    /// * `liquidity_delta` - Liquidity added (removed), zero to poke
    /// * `fee_growth_inside_0_x64` - Fee growth of token_0 inside the position's range
    /// * `fee_growth_inside_1_x64` - Fee growth of token_1 inside the position's range
    ///
    pub fn update(
        &mut self,
        liquidity_delta: i128,
        fee_growth_inside_0_x64: u128,
        fee_growth_inside_1_x64: u128,
    ) -> Result<()> {
        let liquidity_next = if liquidity_delta == 0 {
            // Poke- credit fees to a position without adding more liquidity
            require!(self.liquidity > 0, ErrorCode::NoPokeForEmptyPosition);
            self.liquidity
        } else {
            liquidity_math::add_delta(self.liquidity, liquidity_delta)?
        };

        // Calculate accumulated Fees
        let tokens_owed_0 = fees_owed(
            fee_growth_inside_0_x64,
            self.fee_growth_inside_0_last_x64,
            self.liquidity,
        )?;
        let tokens_owed_1 = fees_owed(
            fee_growth_inside_1_x64,
            self.fee_growth_inside_1_last_x64,
            self.liquidity,
        )?;

        // Update the position
        self.tokens_owed_0 = self
            .tokens_owed_0
            .checked_add(tokens_owed_0)
            .ok_or(ErrorCode::TokenAmountOverflow)?;
        self.tokens_owed_1 = self
            .tokens_owed_1
            .checked_add(tokens_owed_1)
            .ok_or(ErrorCode::TokenAmountOverflow)?;
        self.liquidity = liquidity_next;
        self.fee_growth_inside_0_last_x64 = fee_growth_inside_0_x64;
        self.fee_growth_inside_1_last_x64 = fee_growth_inside_1_x64;

        Ok(())
    }

    /// Whether the position holds nothing and can be pruned
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0 && self.tokens_owed_0 == 0 && self.tokens_owed_1 == 0
    }
}

fn fees_owed(fee_growth_inside_x64: u128, fee_growth_inside_last_x64: u128, liquidity: u128) -> Result<u64> {
    let owed = fee_growth_inside_x64
        .wrapping_sub(fee_growth_inside_last_x64)
        .mul_div_floor(liquidity, fixed_point_64::Q64)
        .ok_or(ErrorCode::TokenAmountOverflow)?;
    u64::try_from(owed).map_err(|_| ErrorCode::TokenAmountOverflow.into())
}

/// Positions of a pool, addressed by owner and tick range
#[derive(Clone, Debug, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PositionStore {
    positions: BTreeMap<PositionKey, PositionState>,
}

impl PositionStore {
    pub fn get(&self, key: &PositionKey) -> Option<&PositionState> {
        self.positions.get(key)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &PositionState)> {
        self.positions.iter()
    }

    /// Stores the position, or drops it once nothing is left in it
    pub fn save(&mut self, key: PositionKey, position: PositionState) {
        if position.is_empty() {
            self.positions.remove(&key);
        } else {
            self.positions.insert(key, position);
        }
    }
}
