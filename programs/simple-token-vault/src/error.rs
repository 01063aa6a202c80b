use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Vault already initialized")]
    AlreadyInitialized,
    #[msg("Fee rate must not exceed 10000 bps")]
    InvalidFeeRate,
    #[msg("Account address does not match its derivation")]
    InvalidAddress,
    #[msg("Token mint does not match the vault mint")]
    MintMismatch,
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Insufficient funds in source account")]
    InsufficientFunds,
    #[msg("Insufficient deposited balance")]
    InsufficientBalance,
    #[msg("Math overflow")]
    Overflow,
    #[msg("Invalid account")]
    InvalidAccount,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
}
