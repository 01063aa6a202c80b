use anchor_lang::prelude::*;
use anchor_lang::system_program::{
    allocate, assign, create_account, transfer, Allocate, Assign, CreateAccount, Transfer,
};

/// Creates a rent-exempt account of `space` bytes at a PDA and hands it to
/// `owner`. `signer_seeds` must derive `target`; `payer` funds the rent.
pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    owner: &Pubkey,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let required = Rent::get()?.minimum_balance(space);

    let current = target.lamports();
    if current == 0 {
        let cpi_accounts = CreateAccount {
            from: payer.clone(),
            to: target.clone(),
        };
        let cpi_ctx =
            CpiContext::new_with_signer(system_program.clone(), cpi_accounts, signer_seeds);
        return create_account(cpi_ctx, required, space as u64, owner);
    }

    // Someone already sent lamports to the address; create_account would
    // refuse it, so top up, allocate and assign instead.
    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        let cpi_accounts = Transfer {
            from: payer.clone(),
            to: target.clone(),
        };
        transfer(CpiContext::new(system_program.clone(), cpi_accounts), top_up)?;
    }
    let cpi_accounts = Allocate {
        account_to_allocate: target.clone(),
    };
    allocate(
        CpiContext::new_with_signer(system_program.clone(), cpi_accounts, signer_seeds),
        space as u64,
    )?;
    let cpi_accounts = Assign {
        account_to_assign: target.clone(),
    };
    assign(
        CpiContext::new_with_signer(system_program.clone(), cpi_accounts, signer_seeds),
        owner,
    )
}
