#![no_std]

//! RDAT, the RData reward token.
//!
//! The owner mints until minting is blocked for good; a separate admin keeps
//! a blocklist of accounts whose tokens are frozen. Transfer, approval and
//! burn follow the standard token interface so the reward and staking
//! contracts can move RDAT through `token::Client`.

mod blocklist;

use rdata_common::{
    access::{self, extend_instance_ttl},
    Error, PERSISTENT_TTL_BUMP, PERSISTENT_TTL_THRESHOLD,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, Env, String, Symbol,
};

pub const NAME: &str = "RData";
pub const SYMBOL: &str = "RDAT";
pub const DECIMALS: u32 = 18;

#[contract]
pub struct Rdat;

#[derive(Clone)]
#[contracttype]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

#[derive(Clone)]
#[contracttype]
enum DataKey {
    Admin,
    MintBlocked,
    TotalSupply,
    Balance(Address),
    Allowance(Address, Address),
}

fn read_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if *caller != read_admin(env)? {
        return Err(Error::UnauthorizedAdminAction);
    }
    Ok(())
}

fn require_not_blocked(env: &Env, account: &Address) -> Result<(), Error> {
    if blocklist::contains(env, account) {
        return Err(Error::UnauthorizedUserAction);
    }
    Ok(())
}

fn require_non_negative(amount: i128) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::InvalidAmount);
    }
    Ok(())
}

fn read_balance(env: &Env, id: &Address) -> i128 {
    let key = DataKey::Balance(id.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_BUMP);
            balance
        }
        None => 0,
    }
}

fn write_balance(env: &Env, id: &Address, balance: i128) {
    let key = DataKey::Balance(id.clone());
    env.storage().persistent().set(&key, &balance);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_BUMP);
}

fn read_total_supply(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

fn receive_balance(env: &Env, id: &Address, amount: i128) -> Result<(), Error> {
    let balance = read_balance(env, id)
        .checked_add(amount)
        .ok_or(Error::MathOverflow)?;
    write_balance(env, id, balance);
    Ok(())
}

fn spend_balance(env: &Env, id: &Address, amount: i128) -> Result<(), Error> {
    let balance = read_balance(env, id);
    if balance < amount {
        return Err(Error::InsufficientBalance);
    }
    write_balance(env, id, balance - amount);
    Ok(())
}

fn read_allowance(env: &Env, from: &Address, spender: &Address) -> AllowanceValue {
    let key = DataKey::Allowance(from.clone(), spender.clone());
    match env.storage().temporary().get::<_, AllowanceValue>(&key) {
        Some(allowance) if allowance.expiration_ledger >= env.ledger().sequence() => allowance,
        Some(allowance) => AllowanceValue {
            amount: 0,
            expiration_ledger: allowance.expiration_ledger,
        },
        None => AllowanceValue {
            amount: 0,
            expiration_ledger: 0,
        },
    }
}

fn write_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) -> Result<(), Error> {
    if amount > 0 && expiration_ledger < env.ledger().sequence() {
        return Err(Error::InvalidAmount);
    }
    let key = DataKey::Allowance(from.clone(), spender.clone());
    env.storage().temporary().set(
        &key,
        &AllowanceValue {
            amount,
            expiration_ledger,
        },
    );
    if amount > 0 {
        let live_for = expiration_ledger - env.ledger().sequence();
        env.storage()
            .temporary()
            .extend_ttl(&key, live_for, live_for);
    }
    Ok(())
}

fn spend_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), Error> {
    let allowance = read_allowance(env, from, spender);
    if allowance.amount < amount {
        return Err(Error::InsufficientAllowance);
    }
    if amount > 0 {
        write_allowance(
            env,
            from,
            spender,
            allowance.amount - amount,
            allowance.expiration_ledger,
        )?;
    }
    Ok(())
}

fn move_tokens(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    require_non_negative(amount)?;
    require_not_blocked(env, from)?;
    spend_balance(env, from, amount)?;
    receive_balance(env, to, amount)?;
    env.events().publish(
        (symbol_short!("transfer"), from.clone(), to.clone()),
        amount,
    );
    Ok(())
}

fn burn_tokens(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
    require_non_negative(amount)?;
    require_not_blocked(env, from)?;
    spend_balance(env, from, amount)?;
    env.storage()
        .instance()
        .set(&DataKey::TotalSupply, &(read_total_supply(env) - amount));
    env.events()
        .publish((symbol_short!("burn"), from.clone()), amount);
    Ok(())
}

#[contractimpl]
impl Rdat {
    /// The owner also starts out as admin.
    pub fn initialize(env: Env, owner: Address) -> Result<(), Error> {
        access::init_owner(&env, &owner)?;
        env.storage().instance().set(&DataKey::Admin, &owner);
        env.storage().instance().set(&DataKey::MintBlocked, &false);
        Ok(())
    }

    pub fn name(env: Env) -> String {
        String::from_str(&env, NAME)
    }

    pub fn symbol(env: Env) -> String {
        String::from_str(&env, SYMBOL)
    }

    pub fn decimals(_env: Env) -> u32 {
        DECIMALS
    }

    pub fn total_supply(env: Env) -> i128 {
        read_total_supply(&env)
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        read_balance(&env, &id)
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        read_allowance(&env, &from, &spender).amount
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), Error> {
        from.require_auth();
        require_non_negative(amount)?;
        write_allowance(&env, &from, &spender, amount, expiration_ledger)?;
        extend_instance_ttl(&env);
        env.events().publish(
            (symbol_short!("approve"), from, spender),
            (amount, expiration_ledger),
        );
        Ok(())
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        extend_instance_ttl(&env);
        move_tokens(&env, &from, &to, amount)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        spender.require_auth();
        require_non_negative(amount)?;
        require_not_blocked(&env, &from)?;
        spend_allowance(&env, &from, &spender, amount)?;
        extend_instance_ttl(&env);
        move_tokens(&env, &from, &to, amount)
    }

    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        extend_instance_ttl(&env);
        burn_tokens(&env, &from, amount)
    }

    pub fn burn_from(env: Env, spender: Address, from: Address, amount: i128) -> Result<(), Error> {
        spender.require_auth();
        require_non_negative(amount)?;
        require_not_blocked(&env, &from)?;
        spend_allowance(&env, &from, &spender, amount)?;
        extend_instance_ttl(&env);
        burn_tokens(&env, &from, amount)
    }

    /// Owner-only issuance. Blocked accounts may still receive minted tokens.
    pub fn mint(env: Env, caller: Address, to: Address, amount: i128) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        if Self::mint_blocked(env.clone()) {
            return Err(Error::EnforceMintBlocked);
        }
        require_non_negative(amount)?;

        let supply = read_total_supply(&env)
            .checked_add(amount)
            .ok_or(Error::MathOverflow)?;
        receive_balance(&env, &to, amount)?;
        env.storage().instance().set(&DataKey::TotalSupply, &supply);
        extend_instance_ttl(&env);

        env.events()
            .publish((symbol_short!("mint"), caller, to), amount);
        Ok(())
    }

    pub fn mint_blocked(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::MintBlocked)
            .unwrap_or(false)
    }

    /// Disables minting permanently.
    pub fn block_mint(env: Env, caller: Address) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        env.storage().instance().set(&DataKey::MintBlocked, &true);
        extend_instance_ttl(&env);
        env.events()
            .publish((Symbol::new(&env, "MintBlocked"),), caller);
        Ok(())
    }

    pub fn admin(env: Env) -> Result<Address, Error> {
        read_admin(&env)
    }

    pub fn change_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        let old_admin = read_admin(&env)?;
        env.storage().instance().set(&DataKey::Admin, &new_admin);
        extend_instance_ttl(&env);
        env.events().publish(
            (Symbol::new(&env, "AdminChanged"),),
            (old_admin, new_admin),
        );
        Ok(())
    }

    pub fn block_address(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        require_admin(&env, &caller)?;
        if blocklist::insert(&env, &account) {
            env.events()
                .publish((Symbol::new(&env, "AddressBlocked"),), account);
        }
        extend_instance_ttl(&env);
        Ok(())
    }

    pub fn unblock_address(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        require_admin(&env, &caller)?;
        if blocklist::remove(&env, &account)? {
            env.events()
                .publish((Symbol::new(&env, "AddressUnblocked"),), account);
        }
        extend_instance_ttl(&env);
        Ok(())
    }

    pub fn block_list_length(env: Env) -> u32 {
        blocklist::len(&env)
    }

    pub fn block_list_at(env: Env, index: u32) -> Result<Address, Error> {
        blocklist::at(&env, index)
    }

    pub fn is_blocked(env: Env, account: Address) -> bool {
        blocklist::contains(&env, &account)
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        access::read_owner(&env)
    }

    pub fn pending_owner(env: Env) -> Option<Address> {
        access::read_pending_owner(&env)
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        access::transfer_ownership(&env, &caller, &new_owner)
    }

    pub fn accept_ownership(env: Env, caller: Address) -> Result<(), Error> {
        access::accept_ownership(&env, &caller)
    }
}
