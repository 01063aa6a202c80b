use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::error::ErrorCode;
use crate::events::VaultInitialized;
use crate::state::Vault;
use crate::utils::create_pda_account;
use crate::{MAX_FEE_BPS, VAULT_SEED};

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// CHECK: becomes the vault authority; only the signature is required.
    #[account(signer @ ErrorCode::Unauthorized)]
    pub owner: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: address and emptiness are verified in the handler before the
    /// record is created, so a second call reports `AlreadyInitialized`.
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,

    pub token_mint: Account<'info, Mint>,
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Creates the vault account at its PDA, paid by `payer`.
    fn create_vault_account(&self, bump: u8, program_id: &Pubkey) -> Result<()> {
        let bump_seed = [bump];
        let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, &bump_seed]];
        create_pda_account(
            &self.payer.to_account_info(),
            &self.vault.to_account_info(),
            &self.system_program.to_account_info(),
            Vault::SPACE,
            program_id,
            signer_seeds,
        )
    }
}

pub fn handler(ctx: Context<Initialize>, fee_bps: u16) -> Result<()> {
    let (expected, bump) = Vault::find_address(ctx.program_id);
    require_keys_eq!(
        ctx.accounts.vault.key(),
        expected,
        ErrorCode::InvalidAddress
    );
    require!(
        ctx.accounts.vault.data_is_empty()
            && ctx.accounts.vault.owner == &anchor_lang::system_program::ID,
        ErrorCode::AlreadyInitialized
    );
    require!(fee_bps <= MAX_FEE_BPS, ErrorCode::InvalidFeeRate);

    ctx.accounts.create_vault_account(bump, ctx.program_id)?;

    let vault = Vault {
        owner: ctx.accounts.owner.key(),
        token_mint: ctx.accounts.token_mint.key(),
        fee_bps,
        bump,
    };
    {
        let vault_info = ctx.accounts.vault.to_account_info();
        let mut data = vault_info.try_borrow_mut_data()?;
        vault.try_serialize(&mut &mut data[..])?;
    }

    msg!("Vault initialized: {}", expected);
    msg!("Owner: {}, mint: {}, fee: {} bps", vault.owner, vault.token_mint, fee_bps);

    emit!(VaultInitialized {
        vault: expected,
        owner: vault.owner,
        token_mint: vault.token_mint,
        fee_bps,
    });
    Ok(())
}
