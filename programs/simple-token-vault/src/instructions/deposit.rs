use anchor_lang::prelude::*;
use anchor_spl::token::{transfer_checked, Mint, Token, TokenAccount, TransferChecked};

use crate::error::ErrorCode;
use crate::events::Deposited;
use crate::state::{UserDeposit, Vault};
use crate::utils::create_pda_account;
use crate::USER_DEPOSIT_SEED;

#[derive(Accounts)]
pub struct Deposit<'info> {
    /// CHECK: only the signature is required; checked with a typed error.
    #[account(mut, signer @ ErrorCode::Unauthorized)]
    pub user: UncheckedAccount<'info>,

    #[account(
        constraint = vault.has_address(&vault.key(), &crate::ID) @ ErrorCode::InvalidAddress,
    )]
    pub vault: Account<'info, Vault>,

    /// CHECK: the depositor's sub-ledger PDA. Empty until the first deposit
    /// creates it, which only happens after `user` has been checked.
    #[account(
        mut,
        address = UserDeposit::find_address(&vault.key(), &user.key(), &crate::ID).0
            @ ErrorCode::InvalidAccount,
    )]
    pub user_deposit: UncheckedAccount<'info>,

    #[account(address = vault.token_mint @ ErrorCode::MintMismatch)]
    pub token_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = user_token_account.mint == vault.token_mint @ ErrorCode::MintMismatch,
        constraint = user_token_account.owner == user.key() @ ErrorCode::Unauthorized,
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = vault.custody_address(&vault.key()) @ ErrorCode::InvalidAccount,
        constraint = vault_token_account.mint == vault.token_mint @ ErrorCode::MintMismatch,
        constraint = vault_token_account.owner == vault.key() @ ErrorCode::InvalidAccount,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> Deposit<'info> {
    pub fn validate(&self, amount: u64) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(
            self.user_token_account.amount >= amount,
            ErrorCode::InsufficientFunds
        );
        if let Some(record) = self.load_ledger()? {
            require!(
                record.belongs_to(&self.user.key(), &self.vault.key()),
                ErrorCode::InvalidAccount
            );
            record
                .amount
                .checked_add(amount)
                .ok_or(ErrorCode::Overflow)?;
        }
        Ok(())
    }

    /// The stored sub-ledger, or `None` before the first deposit.
    fn load_ledger(&self) -> Result<Option<UserDeposit>> {
        if self.user_deposit.data_is_empty() {
            return Ok(None);
        }
        require_keys_eq!(
            *self.user_deposit.owner,
            crate::ID,
            ErrorCode::InvalidAccount
        );
        let data = self.user_deposit.try_borrow_data()?;
        let record = UserDeposit::try_deserialize(&mut &data[..])?;
        Ok(Some(record))
    }

    /// Creates the sub-ledger account, paid by the depositor.
    fn create_ledger_account(&self) -> Result<()> {
        let vault_key = self.vault.key();
        let user_key = self.user.key();
        let (_, bump) = UserDeposit::find_address(&vault_key, &user_key, &crate::ID);
        let bump_seed = [bump];
        let signer_seeds: &[&[&[u8]]] = &[&[
            USER_DEPOSIT_SEED,
            vault_key.as_ref(),
            user_key.as_ref(),
            &bump_seed,
        ]];
        create_pda_account(
            &self.user.to_account_info(),
            &self.user_deposit.to_account_info(),
            &self.system_program.to_account_info(),
            UserDeposit::SPACE,
            &crate::ID,
            signer_seeds,
        )
    }

    fn store_ledger(&self, record: &UserDeposit) -> Result<()> {
        let mut data = self.user_deposit.try_borrow_mut_data()?;
        record.try_serialize(&mut &mut data[..])?;
        Ok(())
    }
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let accounts = &ctx.accounts;
    let user_key = accounts.user.key();
    let vault_key = accounts.vault.key();

    let mut record = match accounts.load_ledger()? {
        Some(record) => record,
        None => {
            accounts.create_ledger_account()?;
            msg!("Opened sub-ledger {} for {}", accounts.user_deposit.key(), user_key);
            UserDeposit::new(user_key, vault_key)
        }
    };
    let balance = record.credit(amount)?;
    accounts.store_ledger(&record)?;

    let cpi_accounts = TransferChecked {
        from: accounts.user_token_account.to_account_info(),
        mint: accounts.token_mint.to_account_info(),
        to: accounts.vault_token_account.to_account_info(),
        authority: accounts.user.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(accounts.token_program.to_account_info(), cpi_accounts);
    transfer_checked(cpi_ctx, amount, accounts.token_mint.decimals)?;

    msg!("Deposited {} tokens into vault {}", amount, vault_key);
    msg!("Sub-ledger balance: {}", balance);

    emit!(Deposited {
        vault: vault_key,
        user: user_key,
        amount,
        balance,
    });
    Ok(())
}
