pub mod constants;
pub mod error;
pub mod fee;
pub mod instructions;
pub mod state;
pub mod utils;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("2dftvFuYB5H7GFKerZUESaiN6pvqXJgFuqMcQkf6q5ZP");

#[program]
pub mod simple_token_vault {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, fee_bps: u16) -> Result<()> {
        initialize::handler(ctx, fee_bps)
    }

    #[access_control(ctx.accounts.validate(amount))]
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        deposit::handler(ctx, amount)
    }

    #[access_control(ctx.accounts.validate(amount))]
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        withdraw::handler(ctx, amount)
    }
}
