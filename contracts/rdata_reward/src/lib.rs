#![no_std]

//! Cumulative reward claims authorized by an off-chain signer wallet.
//!
//! The signer approves a running total per `user_id`; each claim pays out the
//! difference between that total and what was already claimed.

use rdata_common::{
    access::{self, extend_instance_ttl},
    signature, Error, PERSISTENT_TTL_BUMP, PERSISTENT_TTL_THRESHOLD,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, BytesN, Env, Symbol,
};

#[contract]
pub struct RDataReward;

#[derive(Clone)]
#[contracttype]
enum DataKey {
    /// Token paid out by claims.
    Rdat,
    SignerWallet,
    /// Cumulative amount already claimed for a user id.
    UserClaimAmount(u64),
}

fn read_rdat(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Rdat)
        .ok_or(Error::NotInitialized)
}

fn read_signer_wallet(env: &Env) -> Result<BytesN<20>, Error> {
    env.storage()
        .instance()
        .get(&DataKey::SignerWallet)
        .ok_or(Error::NotInitialized)
}

fn read_claimed(env: &Env, user_id: u64) -> i128 {
    let key = DataKey::UserClaimAmount(user_id);
    let claimed = env.storage().persistent().get(&key);
    if claimed.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_BUMP);
    }
    claimed.unwrap_or(0)
}

fn write_claimed(env: &Env, user_id: u64, amount: i128) {
    let key = DataKey::UserClaimAmount(user_id);
    env.storage().persistent().set(&key, &amount);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_BUMP);
}

#[contractimpl]
impl RDataReward {
    pub fn initialize(
        env: Env,
        owner: Address,
        rdat: Address,
        signer_wallet: BytesN<20>,
    ) -> Result<(), Error> {
        access::init_owner(&env, &owner)?;
        env.storage().instance().set(&DataKey::Rdat, &rdat);
        env.storage()
            .instance()
            .set(&DataKey::SignerWallet, &signer_wallet);
        Ok(())
    }

    /// Pays `receive_address` up to `cumulative_reward_amount` for `user_id`.
    /// Anyone may submit the signed authorization on the user's behalf.
    pub fn claim(
        env: Env,
        user_id: u64,
        receive_address: Address,
        cumulative_reward_amount: i128,
        deadline: u64,
        signature: BytesN<65>,
    ) -> Result<(), Error> {
        access::require_not_paused(&env)?;
        if deadline < env.ledger().timestamp() {
            return Err(Error::SignatureExpired);
        }
        if cumulative_reward_amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let digest = signature::claim_digest(
            &env,
            user_id,
            &receive_address,
            cumulative_reward_amount,
            deadline,
        )?;
        signature::verify(&env, &digest, &signature, &read_signer_wallet(&env)?)?;

        let claimed = read_claimed(&env, user_id);
        if cumulative_reward_amount <= claimed {
            return Err(Error::AlreadyClaimed);
        }
        let delta = cumulative_reward_amount
            .checked_sub(claimed)
            .ok_or(Error::MathOverflow)?;

        write_claimed(&env, user_id, cumulative_reward_amount);
        let rdat = read_rdat(&env)?;
        token::Client::new(&env, &rdat).transfer(
            &env.current_contract_address(),
            &receive_address,
            &delta,
        );
        extend_instance_ttl(&env);

        env.events().publish(
            (symbol_short!("Claimed"), user_id),
            (receive_address, delta, cumulative_reward_amount),
        );
        Ok(())
    }

    pub fn user_claim_amounts(env: Env, user_id: u64) -> i128 {
        read_claimed(&env, user_id)
    }

    pub fn rdat(env: Env) -> Result<Address, Error> {
        read_rdat(&env)
    }

    pub fn signer_wallet_address(env: Env) -> Result<BytesN<20>, Error> {
        read_signer_wallet(&env)
    }

    pub fn update_signer_wallet_address(
        env: Env,
        caller: Address,
        signer_wallet: BytesN<20>,
    ) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        env.storage()
            .instance()
            .set(&DataKey::SignerWallet, &signer_wallet);
        extend_instance_ttl(&env);
        env.events().publish(
            (Symbol::new(&env, "SignerWalletUpdated"),),
            signer_wallet,
        );
        Ok(())
    }

    /// Moves any token held by the contract, the native asset contract included.
    pub fn withdraw(
        env: Env,
        caller: Address,
        token: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        token::Client::new(&env, &token).transfer(&env.current_contract_address(), &to, &amount);
        env.events()
            .publish((symbol_short!("Withdrawn"), token), (to, amount));
        Ok(())
    }

    pub fn pause(env: Env, caller: Address) -> Result<(), Error> {
        access::pause(&env, &caller)
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), Error> {
        access::unpause(&env, &caller)
    }

    pub fn paused(env: Env) -> bool {
        access::is_paused(&env)
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

#[cfg(test)]
mod test;
