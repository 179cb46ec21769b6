#![cfg(test)]
extern crate std;

use super::{RDataReward, RDataRewardClient};
use claim_signer::{ClaimAuthorization, ClaimSigner};
use rdata_common::{signature::STRKEY_LEN, Error};
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, AuthorizedFunction, Events, Ledger},
    token, vec, Address, BytesN, Env, IntoVal, InvokeError, Symbol,
};

const ETHER: i128 = 1_000_000_000_000_000_000;
const INITIAL_REWARD_BALANCE: i128 = 1_000_000 * ETHER;
const NOW: u64 = 1_710_000_000;
const DEADLINE: u64 = 1_815_661_020;

fn set_timestamp(env: &Env, timestamp: u64) {
    env.ledger().with_mut(|li| {
        li.timestamp = timestamp;
    });
}

fn assert_contract_error<T, C>(
    result: Result<Result<T, C>, Result<Error, InvokeError>>,
    expected: Error,
) {
    assert!(matches!(result, Err(Ok(err)) if err == expected));
}

/// The last invocation required exactly one auth: `who` calling `function` on `contract`.
fn assert_authorized_by(env: &Env, who: &Address, contract: &Address, function: &str) {
    let auths = env.auths();
    assert_eq!(auths.len(), 1);
    assert_eq!(auths[0].0, *who);
    match &auths[0].1.function {
        AuthorizedFunction::Contract((id, name, _)) => {
            assert_eq!(id, contract);
            assert_eq!(*name, Symbol::new(env, function));
        }
        _ => panic!("expected a contract call"),
    }
}

fn strkey(address: &Address) -> std::string::String {
    let mut buf = [0u8; STRKEY_LEN];
    address.to_string().copy_into_slice(&mut buf);
    std::string::String::from_utf8(buf.to_vec()).unwrap()
}

struct Setup<'a> {
    env: Env,
    owner: Address,
    backend: ClaimSigner,
    rdat: token::Client<'a>,
    reward_id: Address,
    reward: RDataRewardClient<'a>,
}

impl Setup<'_> {
    fn sign(&self, user_id: u64, receiver: &Address, amount: i128, deadline: u64) -> BytesN<65> {
        let auth = ClaimAuthorization {
            user_id,
            receive_address: strkey(receiver),
            cumulative_reward_amount: amount,
            deadline,
        };
        BytesN::from_array(&self.env, &self.backend.sign_claim(&auth).unwrap())
    }

    fn assert_claimed_event(&self, user_id: u64, receiver: &Address, delta: i128, total: i128) {
        let events = self.env.events().all();
        let last = events.last().unwrap();
        assert_eq!(
            vec![&self.env, last],
            vec![
                &self.env,
                (
                    self.reward_id.clone(),
                    (symbol_short!("Claimed"), user_id).into_val(&self.env),
                    (receiver.clone(), delta, total).into_val(&self.env),
                )
            ]
        );
    }
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();
    set_timestamp(&env, NOW);

    let owner = Address::generate(&env);
    let backend = ClaimSigner::from_slice(&[0x5a; 32]).unwrap();

    let rdat_id = env
        .register_stellar_asset_contract_v2(owner.clone())
        .address();
    let reward_id = env.register(RDataReward, ());
    let reward = RDataRewardClient::new(&env, &reward_id);
    reward.initialize(
        &owner,
        &rdat_id,
        &BytesN::from_array(&env, &backend.address()),
    );

    token::StellarAssetClient::new(&env, &rdat_id).mint(&reward_id, &INITIAL_REWARD_BALANCE);
    let rdat = token::Client::new(&env, &rdat_id);

    Setup {
        env,
        owner,
        backend,
        rdat,
        reward_id,
        reward,
    }
}

#[test]
fn test_params_after_initialize() {
    let s = setup();
    assert_eq!(s.reward.owner(), s.owner);
    assert_eq!(s.reward.rdat(), s.rdat.address);
    assert_eq!(
        s.reward.signer_wallet_address(),
        BytesN::from_array(&s.env, &s.backend.address())
    );
    assert!(!s.reward.paused());
    assert_eq!(s.reward.pending_owner(), None);
}

#[test]
fn test_initialize_only_once() {
    let s = setup();
    let wallet = BytesN::from_array(&s.env, &[1u8; 20]);
    assert_contract_error(
        s.reward.try_initialize(&s.owner, &s.rdat.address, &wallet),
        Error::AlreadyInitialized,
    );
}

#[test]
fn test_initialize_requires_owner_auth() {
    let env = Env::default();
    let owner = Address::generate(&env);
    let rdat = Address::generate(&env);
    let wallet = BytesN::from_array(&env, &[7u8; 20]);
    let reward = RDataRewardClient::new(&env, &env.register(RDataReward, ()));

    assert!(reward.try_initialize(&owner, &rdat, &wallet).is_err());
    assert_contract_error(reward.try_owner(), Error::NotInitialized);

    reward.mock_all_auths().initialize(&owner, &rdat, &wallet);
    assert_authorized_by(&env, &owner, &reward.address, "initialize");
    assert_eq!(reward.owner(), owner);
}

#[test]
fn test_owner_entry_points_require_caller_auth() {
    let s = setup();
    let to = Address::generate(&s.env);
    let wallet = BytesN::from_array(&s.env, &[9u8; 20]);

    s.reward.pause(&s.owner);
    assert_authorized_by(&s.env, &s.owner, &s.reward_id, "pause");
    s.reward.unpause(&s.owner);
    assert_authorized_by(&s.env, &s.owner, &s.reward_id, "unpause");
    s.reward.update_signer_wallet_address(&s.owner, &wallet);
    assert_authorized_by(&s.env, &s.owner, &s.reward_id, "update_signer_wallet_address");
    s.reward.withdraw(&s.owner, &s.rdat.address, &to, &ETHER);
    assert_authorized_by(&s.env, &s.owner, &s.reward_id, "withdraw");
    s.reward.transfer_ownership(&s.owner, &to);
    assert_authorized_by(&s.env, &s.owner, &s.reward_id, "transfer_ownership");
}

#[test]
fn test_owner_address_alone_is_not_enough() {
    let s = setup();
    let to = Address::generate(&s.env);
    s.env.set_auths(&[]);

    assert!(s.reward.try_pause(&s.owner).is_err());
    let withdrawn = s.reward.try_withdraw(&s.owner, &s.rdat.address, &to, &ETHER);
    assert!(withdrawn.is_err());
    assert!(!s.reward.paused());
    assert_eq!(s.rdat.balance(&s.reward_id), INITIAL_REWARD_BALANCE);
}

#[test]
fn test_update_signer_wallet_requires_owner() {
    let s = setup();
    let stranger = Address::generate(&s.env);
    let wallet = BytesN::from_array(&s.env, &[9u8; 20]);

    assert_contract_error(
        s.reward.try_update_signer_wallet_address(&stranger, &wallet),
        Error::OwnableUnauthorizedAccount,
    );
    assert_eq!(
        s.reward.signer_wallet_address(),
        BytesN::from_array(&s.env, &s.backend.address())
    );

    s.reward.update_signer_wallet_address(&s.owner, &wallet);
    assert_eq!(s.reward.signer_wallet_address(), wallet);
}

#[test]
fn test_pause_and_unpause_by_owner_only() {
    let s = setup();
    let stranger = Address::generate(&s.env);

    assert_contract_error(s.reward.try_pause(&stranger), Error::OwnableUnauthorizedAccount);
    assert!(!s.reward.paused());

    s.reward.pause(&s.owner);
    assert!(s.reward.paused());
    assert_contract_error(s.reward.try_pause(&s.owner), Error::Paused);

    assert_contract_error(s.reward.try_unpause(&stranger), Error::OwnableUnauthorizedAccount);
    assert!(s.reward.paused());

    s.reward.unpause(&s.owner);
    assert!(!s.reward.paused());
    assert_contract_error(s.reward.try_unpause(&s.owner), Error::NotPaused);
}

#[test]
fn test_claim() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let amount = 10 * ETHER;
    let signature = s.sign(1, &user1, amount, DEADLINE);

    s.reward.claim(&1, &user1, &amount, &DEADLINE, &signature);
    s.assert_claimed_event(1, &user1, amount, amount);

    assert_eq!(s.reward.user_claim_amounts(&1), amount);
    assert_eq!(s.rdat.balance(&user1), amount);
    assert_eq!(s.rdat.balance(&s.reward_id), INITIAL_REWARD_BALANCE - amount);
}

#[test]
fn test_claim_fails_when_paused() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let amount = 10 * ETHER;
    let signature = s.sign(1, &user1, amount, DEADLINE);

    s.reward.pause(&s.owner);
    assert_contract_error(
        s.reward.try_claim(&1, &user1, &amount, &DEADLINE, &signature),
        Error::Paused,
    );
    assert_eq!(s.reward.user_claim_amounts(&1), 0);
}

#[test]
fn test_claim_rejects_any_altered_parameter() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let user2 = Address::generate(&s.env);
    let amount = 10 * ETHER;
    let signature = s.sign(1, &user1, amount, DEADLINE);

    assert_contract_error(
        s.reward.try_claim(&2, &user1, &amount, &DEADLINE, &signature),
        Error::InvalidSignature,
    );
    assert_contract_error(
        s.reward.try_claim(&1, &user1, &(11 * ETHER), &DEADLINE, &signature),
        Error::InvalidSignature,
    );
    assert_contract_error(
        s.reward.try_claim(&1, &user2, &amount, &DEADLINE, &signature),
        Error::InvalidSignature,
    );
    assert_contract_error(
        s.reward.try_claim(&1, &user1, &amount, &(DEADLINE + 1), &signature),
        Error::InvalidSignature,
    );
    assert_eq!(s.rdat.balance(&s.reward_id), INITIAL_REWARD_BALANCE);
}

#[test]
fn test_claim_rejects_signature_from_other_wallet() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let amount = 10 * ETHER;
    let intruder = ClaimSigner::from_slice(&[0x77; 32]).unwrap();
    let auth = ClaimAuthorization {
        user_id: 1,
        receive_address: strkey(&user1),
        cumulative_reward_amount: amount,
        deadline: DEADLINE,
    };
    let signature = BytesN::from_array(&s.env, &intruder.sign_claim(&auth).unwrap());

    assert_contract_error(
        s.reward.try_claim(&1, &user1, &amount, &DEADLINE, &signature),
        Error::InvalidSignature,
    );
}

#[test]
fn test_claim_fails_after_deadline() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let amount = 10 * ETHER;
    let deadline = 1_705_661_020;
    let signature = s.sign(1, &user1, amount, deadline);

    assert_contract_error(
        s.reward.try_claim(&1, &user1, &amount, &deadline, &signature),
        Error::SignatureExpired,
    );
}

#[test]
fn test_claim_accepted_at_deadline() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let signature = s.sign(1, &user1, ETHER, NOW);

    s.reward.claim(&1, &user1, &ETHER, &NOW, &signature);
    assert_eq!(s.rdat.balance(&user1), ETHER);
}

#[test]
fn test_claim_rejects_negative_amount() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let signature = BytesN::from_array(&s.env, &[0u8; 65]);

    assert_contract_error(
        s.reward.try_claim(&1, &user1, &-1, &DEADLINE, &signature),
        Error::InvalidAmount,
    );
}

#[test]
fn test_claim_twice_with_same_signature() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let amount = 10 * ETHER;
    let signature = s.sign(1, &user1, amount, DEADLINE);

    s.reward.claim(&1, &user1, &amount, &DEADLINE, &signature);
    assert_contract_error(
        s.reward.try_claim(&1, &user1, &amount, &DEADLINE, &signature),
        Error::AlreadyClaimed,
    );
    assert_eq!(s.rdat.balance(&user1), amount);
}

#[test]
fn test_claim_twice_same_amount() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let amount = 10 * ETHER;

    s.reward.claim(&1, &user1, &amount, &DEADLINE, &s.sign(1, &user1, amount, DEADLINE));

    let second = s.sign(1, &user1, amount, DEADLINE + 1);
    assert_contract_error(
        s.reward.try_claim(&1, &user1, &amount, &(DEADLINE + 1), &second),
        Error::AlreadyClaimed,
    );

    let lower = s.sign(1, &user1, amount - 1, DEADLINE);
    assert_contract_error(
        s.reward.try_claim(&1, &user1, &(amount - 1), &DEADLINE, &lower),
        Error::AlreadyClaimed,
    );
}

#[test]
fn test_claim_multiple_times_pays_the_delta() {
    let s = setup();
    let user1 = Address::generate(&s.env);

    let first = 10 * ETHER;
    s.reward.claim(&1, &user1, &first, &DEADLINE, &s.sign(1, &user1, first, DEADLINE));
    s.assert_claimed_event(1, &user1, first, first);
    assert_eq!(s.reward.user_claim_amounts(&1), first);
    assert_eq!(s.rdat.balance(&user1), first);

    let second = 25 * ETHER;
    s.reward.claim(
        &1,
        &user1,
        &second,
        &(DEADLINE + 1),
        &s.sign(1, &user1, second, DEADLINE + 1),
    );
    s.assert_claimed_event(1, &user1, second - first, second);
    assert_eq!(s.reward.user_claim_amounts(&1), second);
    assert_eq!(s.rdat.balance(&user1), second);
    assert_eq!(s.rdat.balance(&s.reward_id), INITIAL_REWARD_BALANCE - second);
}

#[test]
fn test_multiple_users_claim_independently() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let user2 = Address::generate(&s.env);

    let amount1 = 10 * ETHER;
    s.reward.claim(&1, &user1, &amount1, &DEADLINE, &s.sign(1, &user1, amount1, DEADLINE));

    let amount2 = 15 * ETHER;
    s.reward.claim(&3, &user2, &amount2, &DEADLINE, &s.sign(3, &user2, amount2, DEADLINE));
    s.assert_claimed_event(3, &user2, amount2, amount2);

    assert_eq!(s.reward.user_claim_amounts(&1), amount1);
    assert_eq!(s.reward.user_claim_amounts(&3), amount2);
    assert_eq!(s.rdat.balance(&user1), amount1);
    assert_eq!(s.rdat.balance(&user2), amount2);
}

#[test]
fn test_claim_submitted_for_another_user() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let amount = 10 * ETHER;
    let signature = s.sign(1, &user1, amount, DEADLINE);

    // Nobody authorizes the call: the backend signature is the only credential.
    s.env.set_auths(&[]);
    s.reward.claim(&1, &user1, &amount, &DEADLINE, &signature);
    assert_eq!(s.rdat.balance(&user1), amount);
    assert_eq!(s.reward.user_claim_amounts(&1), amount);
}

#[test]
fn test_claim_fails_without_funds() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let recipient = Address::generate(&s.env);
    s.reward
        .withdraw(&s.owner, &s.rdat.address, &recipient, &INITIAL_REWARD_BALANCE);

    let amount = 10 * ETHER;
    let signature = s.sign(1, &user1, amount, DEADLINE);
    let result = s.reward.try_claim(&1, &user1, &amount, &DEADLINE, &signature);
    assert!(result.is_err());
    assert_eq!(s.reward.user_claim_amounts(&1), 0);
}

#[test]
fn test_withdraw_by_owner() {
    let s = setup();
    let user1 = Address::generate(&s.env);

    s.reward
        .withdraw(&s.owner, &s.rdat.address, &user1, &INITIAL_REWARD_BALANCE);
    assert_eq!(s.rdat.balance(&s.reward_id), 0);
    assert_eq!(s.rdat.balance(&user1), INITIAL_REWARD_BALANCE);
}

#[test]
fn test_withdraw_native_asset_by_owner() {
    let s = setup();
    let user1 = Address::generate(&s.env);
    let native_admin = Address::generate(&s.env);
    let native_id = s
        .env
        .register_stellar_asset_contract_v2(native_admin)
        .address();
    token::StellarAssetClient::new(&s.env, &native_id).mint(&s.reward_id, &(100 * ETHER));

    s.reward.withdraw(&s.owner, &native_id, &user1, &(100 * ETHER));
    let native = token::Client::new(&s.env, &native_id);
    assert_eq!(native.balance(&s.reward_id), 0);
    assert_eq!(native.balance(&user1), 100 * ETHER);
}

#[test]
fn test_withdraw_by_non_owner() {
    let s = setup();
    let user1 = Address::generate(&s.env);

    assert_contract_error(
        s.reward
            .try_withdraw(&user1, &s.rdat.address, &user1, &INITIAL_REWARD_BALANCE),
        Error::OwnableUnauthorizedAccount,
    );
    assert_eq!(s.rdat.balance(&s.reward_id), INITIAL_REWARD_BALANCE);
}

#[test]
fn test_two_step_ownership_transfer() {
    let s = setup();
    let new_owner = Address::generate(&s.env);
    let stranger = Address::generate(&s.env);

    s.reward.transfer_ownership(&s.owner, &new_owner);
    assert_eq!(s.reward.owner(), s.owner);
    assert_eq!(s.reward.pending_owner(), Some(new_owner.clone()));

    assert_contract_error(
        s.reward.try_accept_ownership(&stranger),
        Error::OwnableUnauthorizedAccount,
    );

    s.reward.accept_ownership(&new_owner);
    assert_eq!(s.reward.owner(), new_owner);
    assert_eq!(s.reward.pending_owner(), None);

    assert_contract_error(s.reward.try_pause(&s.owner), Error::OwnableUnauthorizedAccount);
    s.reward.pause(&new_owner);
    assert!(s.reward.paused());
}
