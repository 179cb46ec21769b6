//! Off-chain signer wallet for RData reward claims and staking unstakes.
//!
//! The backend holds the secp256k1 key; contracts only know its 20-byte
//! Ethereum-style address and recover it from each signature.

mod digest;

pub use digest::{
    claim_digest, eth_signed_message_hash, keccak256, unstake_digest, STRKEY_LEN,
};

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use thiserror::Error;

pub const SIGNATURE_LEN: usize = 65;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),
    #[error("address `{0}` is not a 56 character strkey")]
    InvalidAddress(String),
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(i128),
    #[error("malformed signature")]
    MalformedSignature,
    #[error("signing failed")]
    Signing(#[source] k256::ecdsa::Error),
}

/// A reward claim approved for a cumulative total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimAuthorization {
    pub user_id: u64,
    pub receive_address: String,
    pub cumulative_reward_amount: i128,
    pub deadline: u64,
}

impl ClaimAuthorization {
    pub fn digest(&self) -> Result<[u8; 32], SignerError> {
        claim_digest(
            self.user_id,
            &self.receive_address,
            self.cumulative_reward_amount,
            self.deadline,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstakeAuthorization {
    pub staker: String,
    pub amount: i128,
}

impl UnstakeAuthorization {
    pub fn digest(&self) -> Result<[u8; 32], SignerError> {
        unstake_digest(&self.staker, self.amount)
    }
}

pub struct ClaimSigner {
    key: SigningKey,
}

impl ClaimSigner {
    pub fn from_slice(secret: &[u8]) -> Result<Self, SignerError> {
        let key = SigningKey::from_slice(secret)
            .map_err(|err| SignerError::InvalidSecretKey(err.to_string()))?;
        Ok(Self { key })
    }

    /// Accepts the key as hex, with or without a `0x` prefix.
    pub fn from_hex(secret: &str) -> Result<Self, SignerError> {
        let bytes = hex::decode(secret.trim().trim_start_matches("0x"))
            .map_err(|err| SignerError::InvalidSecretKey(err.to_string()))?;
        Self::from_slice(&bytes)
    }

    pub fn address(&self) -> [u8; 20] {
        address_of(self.key.verifying_key())
    }

    /// Signs the personal-message hash of `digest`; the last byte is `27 + recovery id`.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; SIGNATURE_LEN], SignerError> {
        let prehash = eth_signed_message_hash(digest);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&prehash)
            .map_err(SignerError::Signing)?;

        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = 27 + recovery_id.to_byte();
        Ok(out)
    }

    pub fn sign_claim(
        &self,
        claim: &ClaimAuthorization,
    ) -> Result<[u8; SIGNATURE_LEN], SignerError> {
        self.sign_digest(&claim.digest()?)
    }

    pub fn sign_unstake(
        &self,
        unstake: &UnstakeAuthorization,
    ) -> Result<[u8; SIGNATURE_LEN], SignerError> {
        self.sign_digest(&unstake.digest()?)
    }
}

fn address_of(key: &VerifyingKey) -> [u8; 20] {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Recovers the signer address the same way the contracts do.
pub fn recover_signer(
    digest: &[u8; 32],
    signature: &[u8; SIGNATURE_LEN],
) -> Result<[u8; 20], SignerError> {
    let compact =
        Signature::from_slice(&signature[..64]).map_err(|_| SignerError::MalformedSignature)?;
    let v = match signature[64] {
        v @ (27 | 28) => v - 27,
        v @ (0 | 1) => v,
        _ => return Err(SignerError::MalformedSignature),
    };
    let recovery_id = RecoveryId::from_byte(v).ok_or(SignerError::MalformedSignature)?;
    let key = VerifyingKey::recover_from_prehash(
        &eth_signed_message_hash(digest),
        &compact,
        recovery_id,
    )
    .map_err(|_| SignerError::MalformedSignature)?;
    Ok(address_of(&key))
}

pub fn format_address(address: &[u8; 20]) -> String {
    format!("0x{}", hex::encode(address))
}
