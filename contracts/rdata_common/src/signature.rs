//! Signed authorizations issued by the off-chain signer wallet.
//!
//! A digest is `keccak256` over tightly packed parameters: integers as 32-byte
//! big-endian words, addresses as their 56-byte strkey. Signatures are
//! secp256k1 over the Ethereum personal-message hash of that digest, and the
//! signer is identified by its 20-byte Ethereum-style address.

use soroban_sdk::{crypto::Hash, Address, Bytes, BytesN, Env};

use crate::Error;

pub const STRKEY_LEN: usize = 56;

const ETH_SIGNED_MESSAGE_PREFIX: &[u8; 28] = b"\x19Ethereum Signed Message:\n32";

fn push_u64(packed: &mut Bytes, value: u64) {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    packed.extend_from_array(&word);
}

fn push_amount(packed: &mut Bytes, value: i128) -> Result<(), Error> {
    if value < 0 {
        return Err(Error::InvalidAmount);
    }
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&(value as u128).to_be_bytes());
    packed.extend_from_array(&word);
    Ok(())
}

fn push_address(packed: &mut Bytes, address: &Address) -> Result<(), Error> {
    let strkey = address.to_string();
    if strkey.len() as usize != STRKEY_LEN {
        return Err(Error::InvalidAddress);
    }
    let mut buf = [0u8; STRKEY_LEN];
    strkey.copy_into_slice(&mut buf);
    packed.extend_from_array(&buf);
    Ok(())
}

/// `keccak256(userId ‖ receiveAddress ‖ cumulativeRewardAmount ‖ deadline)`
pub fn claim_digest(
    env: &Env,
    user_id: u64,
    receive_address: &Address,
    cumulative_reward_amount: i128,
    deadline: u64,
) -> Result<Hash<32>, Error> {
    let mut packed = Bytes::new(env);
    push_u64(&mut packed, user_id);
    push_address(&mut packed, receive_address)?;
    push_amount(&mut packed, cumulative_reward_amount)?;
    push_u64(&mut packed, deadline);
    Ok(env.crypto().keccak256(&packed))
}

/// `keccak256(staker ‖ unstakeAmount)`
pub fn unstake_digest(env: &Env, staker: &Address, amount: i128) -> Result<Hash<32>, Error> {
    let mut packed = Bytes::new(env);
    push_address(&mut packed, staker)?;
    push_amount(&mut packed, amount)?;
    Ok(env.crypto().keccak256(&packed))
}

pub fn to_eth_signed_message_hash(env: &Env, digest: &Hash<32>) -> Hash<32> {
    let mut message = Bytes::from_array(env, ETH_SIGNED_MESSAGE_PREFIX);
    message.extend_from_array(&digest.to_bytes().to_array());
    env.crypto().keccak256(&message)
}

/// Ethereum address of an uncompressed SEC1 public key.
pub fn eth_address(env: &Env, public_key: &BytesN<65>) -> BytesN<20> {
    let uncompressed = public_key.to_array();
    let hash = env
        .crypto()
        .keccak256(&Bytes::from_slice(env, &uncompressed[1..]))
        .to_bytes()
        .to_array();
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    BytesN::from_array(env, &address)
}

/// Recovers the address that signed `digest`. The trailing byte of the
/// signature is the recovery id, either raw (0/1) or Ethereum style (27/28).
pub fn recover_signer(
    env: &Env,
    digest: &Hash<32>,
    signature: &BytesN<65>,
) -> Result<BytesN<20>, Error> {
    let raw = signature.to_array();
    let recovery_id = match raw[64] {
        v @ (27 | 28) => v - 27,
        v @ (0 | 1) => v,
        _ => return Err(Error::InvalidSignature),
    };
    let mut compact = [0u8; 64];
    compact.copy_from_slice(&raw[..64]);

    let message_hash = to_eth_signed_message_hash(env, digest);
    let public_key = env.crypto().secp256k1_recover(
        &message_hash,
        &BytesN::from_array(env, &compact),
        u32::from(recovery_id),
    );
    Ok(eth_address(env, &public_key))
}

pub fn verify(
    env: &Env,
    digest: &Hash<32>,
    signature: &BytesN<65>,
    signer_wallet: &BytesN<20>,
) -> Result<(), Error> {
    if recover_signer(env, digest, signature)? != *signer_wallet {
        return Err(Error::InvalidSignature);
    }
    Ok(())
}
