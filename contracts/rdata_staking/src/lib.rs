#![no_std]

//! Referral staking with a single signer-approved unstake per staker.

use rdata_common::{
    access::{self, extend_instance_ttl},
    signature, Error, PERSISTENT_TTL_BUMP, PERSISTENT_TTL_THRESHOLD,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, BytesN, Env, Symbol,
};

#[contract]
pub struct RDataStaking;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[contracttype]
pub struct Staker {
    /// Total ever staked.
    pub amount: i128,
    /// Released by the one-time unstake. Non-zero locks the staker out.
    pub unstaked_amount: i128,
}

#[derive(Clone)]
#[contracttype]
enum DataKey {
    Rdat,
    SignerWallet,
    MinStakeAmount,
    Staker(Address),
    UsedUnstakeDigest(BytesN<32>),
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

fn read_min_stake_amount(env: &Env) -> Result<i128, Error> {
    env.storage()
        .instance()
        .get(&DataKey::MinStakeAmount)
        .ok_or(Error::NotInitialized)
}

fn read_staker(env: &Env, staker: &Address) -> Staker {
    let key = DataKey::Staker(staker.clone());
    match env.storage().persistent().get(&key) {
        Some(record) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_BUMP);
            record
        }
        None => Staker::default(),
    }
}

fn write_staker(env: &Env, staker: &Address, record: &Staker) {
    let key = DataKey::Staker(staker.clone());
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_BUMP);
}

fn is_digest_used(env: &Env, digest: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::UsedUnstakeDigest(digest.clone()))
}

fn mark_digest_used(env: &Env, digest: &BytesN<32>) {
    let key = DataKey::UsedUnstakeDigest(digest.clone());
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_BUMP);
}

fn validate_min_stake_amount(amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidStakeAmount);
    }
    Ok(())
}

#[contractimpl]
impl RDataStaking {
    pub fn initialize(
        env: Env,
        owner: Address,
        rdat: Address,
        signer_wallet: BytesN<20>,
        min_stake_amount: i128,
    ) -> Result<(), Error> {
        validate_min_stake_amount(min_stake_amount)?;
        access::init_owner(&env, &owner)?;
        env.storage().instance().set(&DataKey::Rdat, &rdat);
        env.storage()
            .instance()
            .set(&DataKey::SignerWallet, &signer_wallet);
        env.storage()
            .instance()
            .set(&DataKey::MinStakeAmount, &min_stake_amount);
        Ok(())
    }

    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), Error> {
        staker.require_auth();
        access::require_not_paused(&env)?;
        if amount <= 0 || amount < read_min_stake_amount(&env)? {
            return Err(Error::InvalidStakeAmount);
        }

        let mut record = read_staker(&env, &staker);
        if record.unstaked_amount != 0 {
            return Err(Error::AlreadyUnstaked);
        }
        record.amount = record
            .amount
            .checked_add(amount)
            .ok_or(Error::MathOverflow)?;

        token::Client::new(&env, &read_rdat(&env)?).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );
        write_staker(&env, &staker, &record);
        extend_instance_ttl(&env);

        env.events().publish(
            (symbol_short!("Staked"), staker),
            (amount, record.amount),
        );
        Ok(())
    }

    /// Releases `amount` to `staker` once, on the signer wallet's approval.
    /// The amount is whatever the signer approved; it is not checked against
    /// the staked total.
    pub fn unstake(
        env: Env,
        staker: Address,
        amount: i128,
        signature: BytesN<65>,
    ) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        let digest = signature::unstake_digest(&env, &staker, amount)?;
        signature::verify(&env, &digest, &signature, &read_signer_wallet(&env)?)?;

        let digest = digest.to_bytes();
        let mut record = read_staker(&env, &staker);
        if record.unstaked_amount != 0 || is_digest_used(&env, &digest) {
            return Err(Error::AlreadyUnstaked);
        }

        record.unstaked_amount = amount;
        write_staker(&env, &staker, &record);
        mark_digest_used(&env, &digest);
        if amount > 0 {
            token::Client::new(&env, &read_rdat(&env)?).transfer(
                &env.current_contract_address(),
                &staker,
                &amount,
            );
        }
        extend_instance_ttl(&env);

        env.events()
            .publish((symbol_short!("Unstaked"), staker), amount);
        Ok(())
    }

    pub fn stakers(env: Env, staker: Address) -> Staker {
        read_staker(&env, &staker)
    }

    pub fn is_unstake_digest_used(env: Env, digest: BytesN<32>) -> bool {
        is_digest_used(&env, &digest)
    }

    pub fn min_stake_amount(env: Env) -> Result<i128, Error> {
        read_min_stake_amount(&env)
    }

    pub fn update_min_stake_amount(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        validate_min_stake_amount(amount)?;
        env.storage()
            .instance()
            .set(&DataKey::MinStakeAmount, &amount);
        extend_instance_ttl(&env);
        env.events()
            .publish((Symbol::new(&env, "MinStakeAmountUpdated"),), amount);
        Ok(())
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
