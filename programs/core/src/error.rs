use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Swap fee should be at most 100_000 (10%)")]
    FeeLimit,
    #[msg("Bar fee should be at most 10_000 (100%)")]
    BarFeeLimit,
    #[msg("Tick spacing should be between 1 and 16383")]
    TickSpacingLimit,
    #[msg("Pool tokens must differ")]
    IdenticalTokens,
    #[msg("Signer is not the protocol owner")]
    NotAnOwner,
    #[msg("Pool is Locked")]
    Locked,

    // libraries/tick_math.rs

    // second inequality must be < because the price can never reach the price at the max tick
    #[msg("Sqrt price outside of the supported range")]
    InvalidSqrtPrice,
    #[msg("Tick outside of the supported range")]
    TickOutOfRange,

    // libraries/liquidity_math.rs

    #[msg("LS")] // Liquidity Sub
    LiquiditySub,
    #[msg("LA")] // Liquidity Add
    LiquidityAdd,

    #[msg("Fixed point operation overflowed")]
    MathOverflow,
    #[msg("Token amount does not fit in 64 bits")]
    TokenAmountOverflow,

    // position boundaries
    #[msg("Tick is not a multiple of the tick spacing")]
    InvalidTick,
    #[msg("Lower tick must be an even multiple of the tick spacing")]
    LowerEven,
    #[msg("Upper tick must be an odd multiple of the tick spacing")]
    UpperOdd,
    #[msg("Lower tick must be below the upper tick")]
    WrongOrder,
    #[msg("Lower tick is below the minimum tick")]
    LowerRange,
    #[msg("Upper tick is above the maximum tick")]
    UpperRange,
    #[msg("Insertion hint does not bracket the tick")]
    InvalidTickOrder,

    // positions
    #[msg("Position does not exist")]
    PositionNotFound,
    #[msg("Burn amount exceeds position liquidity")]
    InsufficientPositionLiquidity,
    #[msg("No pokes for 0 liquidity positions")]
    NoPokeForEmptyPosition,

    #[msg("Minted liquidity must be greater than 0")]
    InsufficientLiquidityMinted,
    #[msg("Swap would exhaust all available liquidity")]
    InsufficientLiquidity,
    #[msg("Liquidity exceeds the per tick maximum")]
    LiquidityOverflow,

    // vault
    #[msg("Balance too low to settle transfer")]
    InsufficientBalance,

    // Internal consistency. These indicate a defect, never a caller mistake.
    #[msg("Active liquidity went negative while crossing a tick")]
    LiquidityUnderflow,
    #[msg("Tick ledger is not strictly ordered")]
    TickLedgerCorrupted,
    #[msg("Fee growth accumulator would decrease")]
    FeeGrowthRegression,
    #[msg("Tick still carries liquidity")]
    TickNotEmpty,
    #[msg("Sentinel ticks cannot be removed")]
    SentinelTick,
}
