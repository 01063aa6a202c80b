use anchor_lang::prelude::*;
use anchor_spl::token::{transfer_checked, Mint, Token, TokenAccount, TransferChecked};

use crate::error::ErrorCode;
use crate::events::Withdrawn;
use crate::fee::FeeSplit;
use crate::state::{UserDeposit, Vault};
use crate::VAULT_SEED;

#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// CHECK: only the signature is required; checked with a typed error.
    #[account(signer @ ErrorCode::Unauthorized)]
    pub user: UncheckedAccount<'info>,

    #[account(
        constraint = vault.has_address(&vault.key(), &crate::ID) @ ErrorCode::InvalidAddress,
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        address = UserDeposit::find_address(&vault.key(), &user.key(), &crate::ID).0
            @ ErrorCode::InvalidAccount,
        constraint = user_deposit.belongs_to(&user.key(), &vault.key()) @ ErrorCode::InvalidAccount,
    )]
    pub user_deposit: Account<'info, UserDeposit>,

    #[account(address = vault.token_mint @ ErrorCode::MintMismatch)]
    pub token_mint: Account<'info, Mint>,

    /// Destination of the net amount, held by the depositor
    #[account(
        mut,
        constraint = user_token_account.mint == vault.token_mint @ ErrorCode::MintMismatch,
        constraint = user_token_account.owner == user.key() @ ErrorCode::InvalidAccount,
        constraint = user_token_account.key() != vault_token_account.key() @ ErrorCode::InvalidAccount,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = vault.custody_address(&vault.key()) @ ErrorCode::InvalidAccount,
        constraint = vault_token_account.mint == vault.token_mint @ ErrorCode::MintMismatch,
        constraint = vault_token_account.owner == vault.key() @ ErrorCode::InvalidAccount,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    /// Fee recipient, held by the vault owner
    #[account(
        mut,
        constraint = fee_account.mint == vault.token_mint @ ErrorCode::MintMismatch,
        constraint = fee_account.owner == vault.owner @ ErrorCode::InvalidAccount,
    )]
    pub fee_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Withdraw<'info> {
    pub fn validate(&self, amount: u64) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(
            amount <= self.user_deposit.amount,
            ErrorCode::InsufficientBalance
        );
        FeeSplit::compute(amount, self.vault.fee_bps)?;
        Ok(())
    }

    /// Moves `amount` out of custody, signed by the vault PDA.
    fn release(&self, to: &Account<'info, TokenAccount>, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let bump_seed = [self.vault.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[VAULT_SEED, &bump_seed]];

        let cpi_accounts = TransferChecked {
            from: self.vault_token_account.to_account_info(),
            mint: self.token_mint.to_account_info(),
            to: to.to_account_info(),
            authority: self.vault.to_account_info(),
        };
        let cpi_ctx = CpiContext::new_with_signer(
            self.token_program.to_account_info(),
            cpi_accounts,
            signer_seeds,
        );
        transfer_checked(cpi_ctx, amount, self.token_mint.decimals)
    }
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let split = FeeSplit::compute(amount, ctx.accounts.vault.fee_bps)?;

    // The whole request leaves the claim; only the payout is split.
    let balance = ctx.accounts.user_deposit.debit(amount)?;

    let accounts = &ctx.accounts;
    accounts.release(&accounts.user_token_account, split.net)?;
    accounts.release(&accounts.fee_account, split.fee)?;

    msg!("Withdrew {} tokens from vault {}", amount, accounts.vault.key());
    msg!("Net: {}, fee: {}, sub-ledger balance: {}", split.net, split.fee, balance);

    emit!(Withdrawn {
        vault: accounts.vault.key(),
        user: accounts.user.key(),
        amount,
        fee: split.fee,
        net: split.net,
        balance,
    });
    Ok(())
}
