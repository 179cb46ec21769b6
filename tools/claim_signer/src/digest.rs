//! Digest layouts; these must stay byte-for-byte identical to
//! `rdata_common::signature` on the contract side.

use sha3::{Digest, Keccak256};

use crate::SignerError;

pub const STRKEY_LEN: usize = 56;

const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

fn push_u64(packed: &mut Vec<u8>, value: u64) {
    packed.extend_from_slice(&[0u8; 24]);
    packed.extend_from_slice(&value.to_be_bytes());
}

fn push_amount(packed: &mut Vec<u8>, value: i128) -> Result<(), SignerError> {
    let value = u128::try_from(value).map_err(|_| SignerError::NegativeAmount(value))?;
    packed.extend_from_slice(&[0u8; 16]);
    packed.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

fn push_address(packed: &mut Vec<u8>, address: &str) -> Result<(), SignerError> {
    if address.len() != STRKEY_LEN || !address.is_ascii() {
        return Err(SignerError::InvalidAddress(address.to_owned()));
    }
    packed.extend_from_slice(address.as_bytes());
    Ok(())
}

pub fn claim_digest(
    user_id: u64,
    receive_address: &str,
    cumulative_reward_amount: i128,
    deadline: u64,
) -> Result<[u8; 32], SignerError> {
    let mut packed = Vec::with_capacity(32 * 3 + STRKEY_LEN);
    push_u64(&mut packed, user_id);
    push_address(&mut packed, receive_address)?;
    push_amount(&mut packed, cumulative_reward_amount)?;
    push_u64(&mut packed, deadline);
    Ok(keccak256(&packed))
}

pub fn unstake_digest(staker: &str, amount: i128) -> Result<[u8; 32], SignerError> {
    let mut packed = Vec::with_capacity(32 + STRKEY_LEN);
    push_address(&mut packed, staker)?;
    push_amount(&mut packed, amount)?;
    Ok(keccak256(&packed))
}

pub fn eth_signed_message_hash(digest: &[u8; 32]) -> [u8; 32] {
    let mut message = Vec::with_capacity(ETH_SIGNED_MESSAGE_PREFIX.len() + 32);
    message.extend_from_slice(ETH_SIGNED_MESSAGE_PREFIX);
    message.extend_from_slice(digest);
    keccak256(&message)
}
