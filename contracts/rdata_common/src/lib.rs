#![no_std]

//! Building blocks shared by the RData contracts: the common error codes,
//! owner / pause bookkeeping and the signed-authorization digests.

pub mod access;
pub mod signature;

use soroban_sdk::contracterror;

/// Instance entries are bumped to `INSTANCE_TTL_BUMP` once they fall under the threshold.
pub const INSTANCE_TTL_THRESHOLD: u32 = 120_960; // ~7 days
pub const INSTANCE_TTL_BUMP: u32 = 518_400; // ~30 days

/// Per-user / per-staker records live in persistent storage.
pub const PERSISTENT_TTL_THRESHOLD: u32 = 518_400;
pub const PERSISTENT_TTL_BUMP: u32 = 3_110_400; // ~180 days

#[contracterror]
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller does not hold the owner (or pending owner) role.
    OwnableUnauthorizedAccount = 3,
    OwnableInvalidOwner = 4,
    Paused = 5,
    NotPaused = 6,
    SignatureExpired = 7,
    InvalidSignature = 8,
    /// Authorized cumulative total does not exceed what was already claimed.
    AlreadyClaimed = 9,
    /// The staker already consumed its one-time unstake.
    AlreadyUnstaked = 10,
    InvalidStakeAmount = 11,
    InvalidAmount = 12,
    InvalidAddress = 13,
    MathOverflow = 14,
    UnauthorizedAdminAction = 15,
    UnauthorizedUserAction = 16,
    EnforceMintBlocked = 17,
    InsufficientBalance = 18,
    InsufficientAllowance = 19,
    IndexOutOfBounds = 20,
}
