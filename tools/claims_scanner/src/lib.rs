//! Rebuilds a CSV ledger of reward claims from the reward contract's
//! `Claimed` events, scanning a ledger range in fixed-size windows.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger_file;
pub mod rpc;
pub mod scanner;
pub mod units;

pub use checkpoint::{Checkpoint, FileCheckpoint, NoCheckpoint};
pub use error::{ScanError, ScanResult};
pub use event::{ClaimLogSource, ClaimedEvent};
pub use ledger_file::LedgerFile;
pub use rpc::SorobanRpcSource;
pub use scanner::{ClaimScanner, ScanRange, ScanSummary};
pub use units::{format_ether, format_units};
