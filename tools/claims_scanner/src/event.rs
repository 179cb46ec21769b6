use std::future::Future;

use crate::{error::ScanResult, units::format_ether};

/// One `Claimed` event published by the reward contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedEvent {
    pub ledger: u32,
    pub tx_hash: String,
    pub user_id: u64,
    pub receive_address: String,
    /// Amount paid out by this claim.
    pub claim_amount: i128,
    /// Cumulative amount claimed by the user after this claim.
    pub total_amount: i128,
}

impl ClaimedEvent {
    /// `ledger,txHash,userId,receiveAddress,claimAmount,totalAmount` with a trailing newline.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}\n",
            self.ledger,
            self.tx_hash,
            self.user_id,
            self.receive_address,
            format_ether(self.claim_amount),
            format_ether(self.total_amount),
        )
    }
}

/// Where `Claimed` events come from.
pub trait ClaimLogSource {
    /// Every `Claimed` event with `from <= ledger <= to`, in the order the chain emitted them.
    fn claimed_events(
        &self,
        from: u32,
        to: u32,
    ) -> impl Future<Output = ScanResult<Vec<ClaimedEvent>>> + Send;
}
