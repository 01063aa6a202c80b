#![allow(dead_code)]

use std::collections::HashMap;

use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use anchor_spl::associated_token::get_associated_token_address;
use mollusk_svm::{program, result::Check, result::InstructionResult, Mollusk};
use simple_token_vault::{UserDeposit, Vault};
use solana_sdk::{
    account::Account,
    instruction::{AccountMeta, Instruction},
    native_token::LAMPORTS_PER_SOL,
    program_error::ProgramError,
    program_option::COption,
    program_pack::Pack,
    pubkey::Pubkey,
};
use spl_token::state::{Account as TokenAccount, AccountState, Mint};

// Same id as declare_id! in lib.rs
pub const PROGRAM_ID: Pubkey = Pubkey::new_from_array(five8_const::decode_32_const(
    "2dftvFuYB5H7GFKerZUESaiN6pvqXJgFuqMcQkf6q5ZP",
));

pub const DECIMALS: u8 = 9;

/// Anchor custom error as the runtime reports it.
pub fn vault_error(code: simple_token_vault::error::ErrorCode) -> ProgramError {
    ProgramError::Custom(code as u32 + anchor_lang::error::ERROR_CODE_OFFSET)
}

// Uses pack to represent an initialized mint account
pub fn mint_account(mollusk: &Mollusk, mint_authority: &Pubkey, supply: u64) -> Account {
    let mut account = Account::new(
        mollusk.sysvars.rent.minimum_balance(Mint::LEN),
        Mint::LEN,
        &spl_token::id(),
    );
    Mint {
        mint_authority: COption::Some(*mint_authority),
        supply,
        decimals: DECIMALS,
        is_initialized: true,
        freeze_authority: COption::None,
    }
    .pack_into_slice(&mut account.data);
    account
}

// Uses pack to represent a token account for the provided owner and mint
pub fn token_account(mollusk: &Mollusk, owner: &Pubkey, mint: &Pubkey, amount: u64) -> Account {
    let mut account = Account::new(
        mollusk.sysvars.rent.minimum_balance(TokenAccount::LEN),
        TokenAccount::LEN,
        &spl_token::id(),
    );
    TokenAccount {
        mint: *mint,
        owner: *owner,
        amount,
        delegate: COption::None,
        state: AccountState::Initialized,
        is_native: COption::None,
        delegated_amount: 0,
        close_authority: COption::None,
    }
    .pack_into_slice(&mut account.data);
    account
}

/// Marks `key` as signed or unsigned in the instruction's metas.
pub fn set_signer(ix: &mut Instruction, key: &Pubkey, signed: bool) {
    for meta in ix.accounts.iter_mut().filter(|meta| meta.pubkey == *key) {
        meta.is_signer = signed;
    }
}

pub struct Depositor {
    pub key: Pubkey,
    pub token_account: Pubkey,
}

/// A mollusk instance plus the account store it operates on. Successful
/// instructions write their resulting accounts back into the store, so
/// consecutive calls see each other's state.
pub struct TestVault {
    pub mollusk: Mollusk,
    pub store: HashMap<Pubkey, Account>,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub vault_bump: u8,
    pub custody: Pubkey,
    pub fee_account: Pubkey,
    pub system_program: Pubkey,
    pub token_program: Pubkey,
}

impl TestVault {
    /// Program and token program loaded, mint created, vault not initialized.
    pub fn new() -> Self {
        let mut mollusk = Mollusk::new(&PROGRAM_ID, "../../target/deploy/simple_token_vault");
        mollusk_svm_programs_token::token::add_program(&mut mollusk);

        let (system_program, system_account) = program::keyed_account_for_system_program();
        let (token_program, token_program_account) =
            mollusk_svm_programs_token::token::keyed_account();

        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (vault, vault_bump) =
            Pubkey::find_program_address(&[simple_token_vault::VAULT_SEED], &PROGRAM_ID);
        let custody = get_associated_token_address(&vault, &mint);
        let fee_account = Pubkey::new_unique();

        let mut store = HashMap::new();
        store.insert(system_program, system_account);
        store.insert(token_program, token_program_account);
        store.insert(mint, mint_account(&mollusk, &owner, 0));
        store.insert(owner, Account::new(10 * LAMPORTS_PER_SOL, 0, &system_program));

        Self {
            mollusk,
            store,
            owner,
            mint,
            vault,
            vault_bump,
            custody,
            fee_account,
            system_program,
            token_program,
        }
    }

    /// Vault initialized through the program, with an empty custody account
    /// and an empty fee account held by the owner.
    pub fn initialized(fee_bps: u16) -> Self {
        let mut env = Self::new();
        let ix = env.initialize_ix(fee_bps);
        env.process(&ix, &[Check::success()]);

        let custody = token_account(&env.mollusk, &env.vault, &env.mint, 0);
        let fee_account = token_account(&env.mollusk, &env.owner, &env.mint, 0);
        env.store.insert(env.custody, custody);
        env.store.insert(env.fee_account, fee_account);
        env
    }

    pub fn add_depositor(&mut self, balance: u64) -> Depositor {
        let key = Pubkey::new_unique();
        let token_account_key = Pubkey::new_unique();
        self.store
            .insert(key, Account::new(10 * LAMPORTS_PER_SOL, 0, &self.system_program));
        let token = token_account(&self.mollusk, &key, &self.mint, balance);
        self.store.insert(token_account_key, token);
        Depositor {
            key,
            token_account: token_account_key,
        }
    }

    pub fn initialize_ix(&self, fee_bps: u16) -> Instruction {
        let accounts = simple_token_vault::accounts::Initialize {
            owner: self.owner,
            payer: self.owner,
            vault: self.vault,
            token_mint: self.mint,
            system_program: self.system_program,
        };
        Instruction::new_with_bytes(
            PROGRAM_ID,
            &simple_token_vault::instruction::Initialize { fee_bps }.data(),
            accounts.to_account_metas(None),
        )
    }

    pub fn user_deposit_address(&self, user: &Pubkey) -> Pubkey {
        UserDeposit::find_address(&self.vault, user, &PROGRAM_ID).0
    }

    pub fn deposit_ix(&self, depositor: &Depositor, amount: u64) -> Instruction {
        let accounts = simple_token_vault::accounts::Deposit {
            user: depositor.key,
            vault: self.vault,
            user_deposit: self.user_deposit_address(&depositor.key),
            token_mint: self.mint,
            user_token_account: depositor.token_account,
            vault_token_account: self.custody,
            token_program: self.token_program,
            system_program: self.system_program,
        };
        let mut ix = Instruction::new_with_bytes(
            PROGRAM_ID,
            &simple_token_vault::instruction::Deposit { amount }.data(),
            accounts.to_account_metas(None),
        );
        set_signer(&mut ix, &depositor.key, true);
        ix
    }

    pub fn withdraw_ix(&self, depositor: &Depositor, amount: u64) -> Instruction {
        let accounts = simple_token_vault::accounts::Withdraw {
            user: depositor.key,
            vault: self.vault,
            user_deposit: self.user_deposit_address(&depositor.key),
            token_mint: self.mint,
            user_token_account: depositor.token_account,
            vault_token_account: self.custody,
            fee_account: self.fee_account,
            token_program: self.token_program,
        };
        let mut ix = Instruction::new_with_bytes(
            PROGRAM_ID,
            &simple_token_vault::instruction::Withdraw { amount }.data(),
            accounts.to_account_metas(None),
        );
        set_signer(&mut ix, &depositor.key, true);
        ix
    }

    /// Accounts for every meta of `ix`, taken from the store. Unknown keys
    /// are empty system accounts.
    pub fn accounts_for(&self, ix: &Instruction) -> Vec<(Pubkey, Account)> {
        let mut accounts: Vec<(Pubkey, Account)> = Vec::new();
        for AccountMeta { pubkey, .. } in &ix.accounts {
            if accounts.iter().any(|(key, _)| key == pubkey) {
                continue;
            }
            let account = self.store.get(pubkey).cloned().unwrap_or_default();
            accounts.push((*pubkey, account));
        }
        accounts
    }

    pub fn process(&mut self, ix: &Instruction, checks: &[Check]) -> InstructionResult {
        let accounts = self.accounts_for(ix);
        let result = self
            .mollusk
            .process_and_validate_instruction(ix, &accounts, checks);
        if !result.program_result.is_err() {
            for (key, account) in &result.resulting_accounts {
                self.store.insert(*key, account.clone());
            }
        }
        result
    }

    pub fn token_balance(&self, key: &Pubkey) -> u64 {
        let account = self.store.get(key).expect("token account in store");
        TokenAccount::unpack(&account.data).unwrap().amount
    }

    pub fn vault_record(&self) -> Option<Vault> {
        let account = self.store.get(&self.vault)?;
        Vault::try_deserialize(&mut account.data.as_slice()).ok()
    }

    pub fn ledger(&self, user: &Pubkey) -> Option<UserDeposit> {
        let account = self.store.get(&self.user_deposit_address(user))?;
        UserDeposit::try_deserialize(&mut account.data.as_slice()).ok()
    }

    /// Overwrites a sub-ledger record directly, bypassing the program.
    pub fn set_ledger(&mut self, user: &Pubkey, amount: u64) {
        let record = UserDeposit {
            owner: *user,
            vault: self.vault,
            amount,
        };
        let mut data = Vec::with_capacity(UserDeposit::SPACE);
        anchor_lang::AccountSerialize::try_serialize(&record, &mut data).unwrap();
        let mut account = Account::new(
            self.mollusk.sysvars.rent.minimum_balance(UserDeposit::SPACE),
            0,
            &PROGRAM_ID,
        );
        account.data = data;
        self.store.insert(self.user_deposit_address(user), account);
    }

    /// Sum of the given depositors' sub-ledger amounts.
    pub fn ledger_total(&self, users: &[&Depositor]) -> u64 {
        users
            .iter()
            .filter_map(|user| self.ledger(&user.key))
            .map(|record| record.amount)
            .sum()
    }
}
