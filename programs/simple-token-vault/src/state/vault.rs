use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;

use crate::constants::VAULT_SEED;

/// Singleton configuration record. Also the token authority of the custody
/// account, signing for it with `[VAULT_SEED, bump]`.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Vault {
    /// Authority that configured the vault; fees accrue to its token account
    pub owner: Pubkey,
    /// The only mint this vault custodies
    pub token_mint: Pubkey,
    /// Withdrawal fee in basis points
    pub fee_bps: u16,
    /// Canonical bump of the vault address
    pub bump: u8,
}

impl Vault {
    pub const SPACE: usize = 8 + // discriminator
        32 + // owner
        32 + // token_mint
        2 + // fee_bps
        1; // bump

    /// Canonical vault address and bump for `program_id`.
    pub fn find_address(program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[VAULT_SEED], program_id)
    }

    /// Re-derives the vault address from the stored bump and compares it to `key`.
    pub fn has_address(&self, key: &Pubkey, program_id: &Pubkey) -> bool {
        Pubkey::create_program_address(&[VAULT_SEED, &[self.bump]], program_id)
            .map(|derived| derived == *key)
            .unwrap_or(false)
    }

    /// The custody token account: the vault's associated token account for its mint.
    pub fn custody_address(&self, vault: &Pubkey) -> Pubkey {
        get_associated_token_address(vault, &self.token_mint)
    }
}
