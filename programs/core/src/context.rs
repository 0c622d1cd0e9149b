use anchor_lang::prelude::*;

/// Parameters of an exact input swap
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct SwapParams {
    /// Whether token_0 is swapped in for token_1
    pub zero_for_one: bool,

    /// The exact amount paid in
    pub amount_in: u64,

    /// Receives the output
    pub recipient: Pubkey,

    /// Whether the vault should hand the output out of its internal balances
    pub unwrap_output: bool,
}

/// How much liquidity to add to a position
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum MintAmount {
    /// An exact amount of liquidity
    Liquidity(u128),

    /// As much liquidity as the given token amounts pay for at the current price
    Desired { amount_0: u64, amount_1: u64 },
}

/// Parameters to add liquidity to a position
///
/// Hints are initialized ticks directly below the position ticks, consulted only when the
/// position tick is not initialized yet. When both ticks are new and `upper_old` equals
/// `tick_lower`, the upper tick is linked right after the new lower tick.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct MintParams {
    pub lower_old: i32,
    pub tick_lower: i32,
    pub upper_old: i32,
    pub tick_upper: i32,
    pub amount: MintAmount,

    /// Owner of the position
    pub recipient: Pubkey,
}

/// Outcome of a mint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MintResult {
    /// Liquidity added to the position
    pub liquidity: u128,

    /// token_0 paid in
    pub amount_0: u64,

    /// token_1 paid in
    pub amount_1: u64,
}

/// Parameters to remove liquidity from the sender's position
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct BurnParams {
    pub tick_lower: i32,
    pub tick_upper: i32,

    /// Liquidity to remove, zero to only withdraw fees
    pub amount: u128,

    /// Receives the principal and fees
    pub recipient: Pubkey,

    /// Whether the vault should hand the tokens out of its internal balances
    pub unwrap: bool,
}

/// Parameters to withdraw fees owed to the sender's position
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct CollectParams {
    pub tick_lower: i32,
    pub tick_upper: i32,

    /// Upper bound on token_0 withdrawn
    pub amount_0_requested: u64,

    /// Upper bound on token_1 withdrawn
    pub amount_1_requested: u64,

    /// Receives the fees
    pub recipient: Pubkey,

    /// Whether the vault should hand the tokens out of its internal balances
    pub unwrap: bool,
}
