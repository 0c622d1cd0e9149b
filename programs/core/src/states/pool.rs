use anchor_lang::prelude::*;

/// Immutable configuration of a pool, fixed at creation
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PoolConfig {
    /// Token swapped in by zero for one swaps
    pub token_0: Pubkey,

    /// Token swapped in by one for zero swaps
    pub token_1: Pubkey,

    /// The minimum number of ticks between initialized ticks. Lower position ticks sit on
    /// even multiples and upper position ticks on odd multiples of the spacing
    pub tick_spacing: u16,

    /// The fee taken from every swap output, denominated in hundredths of a bip
    pub swap_fee: u32,

    /// May change the bar fee and collect protocol fees
    pub protocol_owner: Pubkey,
}

/// The pool state
///
/// Mutated by swap, mint, burn and collect. Prices are Q64.64 numbers.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct PoolState {
    /// The current price of the pool as a sqrt(token_1/token_0) Q64.64 value
    pub sqrt_price_x64: u128,

    /// The currently in range liquidity available to the pool
    pub liquidity: u128,

    /// The highest initialized tick at or below the current price
    pub nearest_tick: i32,

    /// The fee growth as a Q64.64 number, i.e. fees of token_0 and token_1 collected per
    /// unit of liquidity for the entire life of the pool
    pub fee_growth_global_0_x64: u128,
    pub fee_growth_global_1_x64: u128,

    /// Share of the swap fee kept by the protocol, in bips of the fee
    pub bar_fee: u32,

    /// Protocol fees accrued over the life of the pool, in token_0 and token_1
    pub token_0_protocol_fee: u128,
    pub token_1_protocol_fee: u128,

    /// Protocol fees already paid out
    pub protocol_fees_collected_0: u128,
    pub protocol_fees_collected_1: u128,

    /// Tokens in the custody of the pool
    pub reserve_0: u64,
    pub reserve_1: u64,

    /// The maximum amount of position liquidity that can use any tick in the range
    pub max_liquidity_per_tick: u128,
}

impl PoolState {
    /// Protocol fees accrued but not yet collected
    pub fn protocol_fees_owed(&self) -> (u128, u128) {
        (
            self.token_0_protocol_fee - self.protocol_fees_collected_0,
            self.token_1_protocol_fee - self.protocol_fees_collected_1,
        )
    }
}

/// Emitted when a pool is created and initialized with a starting price
///
#[event]
pub struct PoolCreatedAndInitialized {
    /// The first token of the pool
    pub token_0: Pubkey,

    /// The second token of the pool
    pub token_1: Pubkey,

    /// The fee collected upon every swap in the pool, denominated in hundredths of a bip
    pub swap_fee: u32,

    /// The minimum number of ticks between initialized ticks
    pub tick_spacing: u16,

    /// The initial sqrt price of the pool, as a Q64.64
    pub sqrt_price_x64: u128,

    /// The initial tick of the pool, i.e. log base 1.0001 of the starting price of the pool
    pub tick: i32,
}

/// Emitted when liquidity is minted for a given position
#[event]
pub struct MintEvent {
    /// The address that paid for the liquidity
    pub sender: Pubkey,

    /// The owner of the position and recipient of any minted liquidity
    pub owner: Pubkey,

    /// The lower tick of the position
    pub tick_lower: i32,

    /// The upper tick of the position
    pub tick_upper: i32,

    /// The amount of liquidity minted to the position range
    pub amount: u128,

    /// How much token_0 was required for the minted liquidity
    pub amount_0: u64,

    /// How much token_1 was required for the minted liquidity
    pub amount_1: u64,

    /// In range liquidity of the pool after the mint
    pub liquidity: u128,
}

/// Emitted when a position's liquidity is removed
#[event]
pub struct BurnEvent {
    /// The owner of the position for which liquidity is removed
    pub owner: Pubkey,

    /// The address receiving the withdrawn tokens
    pub recipient: Pubkey,

    /// The lower tick of the position
    pub tick_lower: i32,

    /// The upper tick of the position
    pub tick_upper: i32,

    /// The amount of liquidity to remove
    pub amount: u128,

    /// The amount of token_0 withdrawn, principal and fees
    pub amount_0: u64,

    /// The amount of token_1 withdrawn, principal and fees
    pub amount_1: u64,

    /// In range liquidity of the pool after the burn
    pub liquidity: u128,
}

/// Emitted when fees are collected by the owner of a position
#[event]
pub struct CollectEvent {
    /// The owner of the position for which fees are collected
    pub owner: Pubkey,

    /// The address receiving the fees
    pub recipient: Pubkey,

    /// The lower tick of the position
    pub tick_lower: i32,

    /// The upper tick of the position
    pub tick_upper: i32,

    /// The amount of token_0 fees collected
    pub amount_0: u64,

    /// The amount of token_1 fees collected
    pub amount_1: u64,
}

/// Emitted by when a swap is performed for a pool
#[event]
pub struct SwapEvent {
    /// The address that paid the input
    pub sender: Pubkey,

    /// The address that received the output
    pub recipient: Pubkey,

    /// The token paid in
    pub token_in: Pubkey,

    /// The token paid out
    pub token_out: Pubkey,

    /// The amount paid in
    pub amount_in: u64,

    /// The amount paid out, net of fees
    pub amount_out: u64,

    /// The sqrt(price) of the pool after the swap, as a Q64.64
    pub sqrt_price_x64: u128,

    /// The liquidity of the pool after the swap
    pub liquidity: u128,

    /// The nearest initialized tick at or below the price after the swap
    pub nearest_tick: i32,
}

/// Emitted when the protocol share of swap fees is changed
#[event]
pub struct SetBarFeeEvent {
    /// The previous protocol share, in bips of the swap fee
    pub bar_fee_old: u32,

    /// The updated protocol share
    pub bar_fee: u32,
}

/// Emitted when the collected protocol fees are withdrawn
#[event]
pub struct CollectProtocolEvent {
    /// The address that collects the protocol fees
    pub sender: Pubkey,

    /// The address that receives the collected protocol fees
    pub recipient: Pubkey,

    /// The amount of token_0 protocol fees that is withdrawn
    pub amount_0: u64,

    /// The amount of token_1 protocol fees that is withdrawn
    pub amount_1: u64,
}
