use anchor_lang::prelude::*;

use crate::constants::USER_DEPOSIT_SEED;
use crate::error::ErrorCode;

/// A depositor's claim against the pool. One per (vault, depositor).
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct UserDeposit {
    pub owner: Pubkey,
    pub vault: Pubkey,
    pub amount: u64,
}

impl UserDeposit {
    pub const SPACE: usize = 8 + // discriminator
        32 + // owner
        32 + // vault
        8; // amount

    pub fn find_address(vault: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[USER_DEPOSIT_SEED, vault.as_ref(), owner.as_ref()],
            program_id,
        )
    }

    /// An empty claim, as written by the first deposit.
    pub fn new(owner: Pubkey, vault: Pubkey) -> Self {
        Self {
            owner,
            vault,
            amount: 0,
        }
    }

    pub fn belongs_to(&self, owner: &Pubkey, vault: &Pubkey) -> bool {
        self.owner == *owner && self.vault == *vault
    }

    pub fn credit(&mut self, amount: u64) -> std::result::Result<u64, ErrorCode> {
        self.amount = self.amount.checked_add(amount).ok_or(ErrorCode::Overflow)?;
        Ok(self.amount)
    }

    /// Never takes the claim below zero; on failure the record is untouched.
    pub fn debit(&mut self, amount: u64) -> std::result::Result<u64, ErrorCode> {
        self.amount = self
            .amount
            .checked_sub(amount)
            .ok_or(ErrorCode::InsufficientBalance)?;
        Ok(self.amount)
    }
}
