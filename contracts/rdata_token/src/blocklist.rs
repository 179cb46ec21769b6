//! Enumerable set of blocked accounts. Removal moves the last entry into the
//! freed slot, so indices are not stable across unblocks.

use soroban_sdk::{contracttype, Address, Env};

use rdata_common::{Error, PERSISTENT_TTL_BUMP, PERSISTENT_TTL_THRESHOLD};

#[derive(Clone)]
#[contracttype]
enum BlockKey {
    Len,
    At(u32),
    IndexOf(Address),
}

fn bump(env: &Env, key: &BlockKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_BUMP);
}

pub fn len(env: &Env) -> u32 {
    env.storage().instance().get(&BlockKey::Len).unwrap_or(0)
}

pub fn contains(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&BlockKey::IndexOf(account.clone()))
}

pub fn at(env: &Env, index: u32) -> Result<Address, Error> {
    if index >= len(env) {
        return Err(Error::IndexOutOfBounds);
    }
    let key = BlockKey::At(index);
    let account = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::IndexOutOfBounds)?;
    bump(env, &key);
    Ok(account)
}

/// Returns `false` when the account was already present.
pub fn insert(env: &Env, account: &Address) -> bool {
    if contains(env, account) {
        return false;
    }
    let index = len(env);
    let at = BlockKey::At(index);
    let index_of = BlockKey::IndexOf(account.clone());
    env.storage().persistent().set(&at, account);
    env.storage().persistent().set(&index_of, &index);
    bump(env, &at);
    bump(env, &index_of);
    env.storage().instance().set(&BlockKey::Len, &(index + 1));
    true
}

/// Returns `false` when the account was not present.
pub fn remove(env: &Env, account: &Address) -> Result<bool, Error> {
    let index_of = BlockKey::IndexOf(account.clone());
    let Some(index) = env.storage().persistent().get::<_, u32>(&index_of) else {
        return Ok(false);
    };
    let last = len(env) - 1;

    if index != last {
        let moved: Address = env
            .storage()
            .persistent()
            .get(&BlockKey::At(last))
            .ok_or(Error::IndexOutOfBounds)?;
        let slot = BlockKey::At(index);
        let moved_index_of = BlockKey::IndexOf(moved.clone());
        env.storage().persistent().set(&slot, &moved);
        env.storage().persistent().set(&moved_index_of, &index);
        bump(env, &slot);
        bump(env, &moved_index_of);
    }

    env.storage().persistent().remove(&BlockKey::At(last));
    env.storage().persistent().remove(&index_of);
    env.storage().instance().set(&BlockKey::Len, &last);
    Ok(true)
}
