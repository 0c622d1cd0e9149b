use anchor_lang::prelude::*;

#[error_code(offset = 7000)]
pub enum ErrorCode {
    #[msg("Swap pays out nothing")]
    InsufficientOutputAmount,
    #[msg("Too little received")]
    TooLittleReceived,
}
