use anchor_lang::prelude::*;

#[constant]
pub const VAULT_SEED: &[u8] = b"vault";

#[constant]
pub const USER_DEPOSIT_SEED: &[u8] = b"user_deposit";

/// 10_000 bps = 100%
pub const BPS_DENOMINATOR: u64 = 10_000;

pub const MAX_FEE_BPS: u16 = 10_000;
