//! Two-step ownership and a pause switch, kept in the calling contract's
//! instance storage. Every privileged entry point takes the acting account as
//! an explicit `caller` that must authorize the invocation.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{Error, INSTANCE_TTL_BUMP, INSTANCE_TTL_THRESHOLD};

#[derive(Clone)]
#[contracttype]
enum AccessKey {
    Owner,
    PendingOwner,
    Paused,
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_BUMP);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&AccessKey::Owner)
}

/// Records the first owner, who must authorize it. Fails once an owner exists.
pub fn init_owner(env: &Env, owner: &Address) -> Result<(), Error> {
    owner.require_auth();
    if is_initialized(env) {
        return Err(Error::AlreadyInitialized);
    }
    env.storage().instance().set(&AccessKey::Owner, owner);
    env.storage().instance().set(&AccessKey::Paused, &false);
    extend_instance_ttl(env);
    Ok(())
}

pub fn read_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&AccessKey::Owner)
        .ok_or(Error::NotInitialized)
}

pub fn read_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&AccessKey::PendingOwner)
}

pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let owner = read_owner(env)?;
    if *caller != owner {
        return Err(Error::OwnableUnauthorizedAccount);
    }
    Ok(())
}

/// Starts a transfer; ownership only moves once `new_owner` accepts.
/// A second call replaces the pending owner.
pub fn transfer_ownership(env: &Env, caller: &Address, new_owner: &Address) -> Result<(), Error> {
    require_owner(env, caller)?;
    env.storage()
        .instance()
        .set(&AccessKey::PendingOwner, new_owner);
    env.events().publish(
        (Symbol::new(env, "OwnershipTransferStarted"), caller.clone()),
        new_owner.clone(),
    );
    Ok(())
}

pub fn accept_ownership(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    match read_pending_owner(env) {
        Some(pending) if pending == *caller => {}
        _ => return Err(Error::OwnableUnauthorizedAccount),
    }
    let previous = read_owner(env)?;
    env.storage().instance().set(&AccessKey::Owner, caller);
    env.storage().instance().remove(&AccessKey::PendingOwner);
    env.events().publish(
        (Symbol::new(env, "OwnershipTransferred"), previous),
        caller.clone(),
    );
    Ok(())
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&AccessKey::Paused)
        .unwrap_or(false)
}

pub fn require_not_paused(env: &Env) -> Result<(), Error> {
    if is_paused(env) {
        return Err(Error::Paused);
    }
    Ok(())
}

pub fn pause(env: &Env, caller: &Address) -> Result<(), Error> {
    require_owner(env, caller)?;
    require_not_paused(env)?;
    env.storage().instance().set(&AccessKey::Paused, &true);
    env.events()
        .publish((symbol_short!("Paused"),), caller.clone());
    Ok(())
}

pub fn unpause(env: &Env, caller: &Address) -> Result<(), Error> {
    require_owner(env, caller)?;
    if !is_paused(env) {
        return Err(Error::NotPaused);
    }
    env.storage().instance().set(&AccessKey::Paused, &false);
    env.events()
        .publish((symbol_short!("Unpaused"),), caller.clone());
    Ok(())
}
