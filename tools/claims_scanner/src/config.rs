use std::path::PathBuf;

use clap::Parser;

use crate::{ledger_file::DEFAULT_LEDGER_FILE, rpc::DEFAULT_PAGE_LIMIT, scanner::DEFAULT_WINDOW};

#[derive(Debug, Parser)]
#[command(
    name = "claims-scanner",
    about = "Append Claimed events of the RData reward contract to a CSV ledger"
)]
pub struct ScanArgs {
    /// Soroban RPC endpoint.
    #[arg(long, value_name = "URL", env = "CLAIMS_SCANNER_RPC_URL")]
    pub rpc_url: String,

    /// Reward contract id (C... strkey).
    #[arg(long, value_name = "ID", env = "CLAIMS_SCANNER_CONTRACT_ID")]
    pub contract_id: String,

    #[arg(long, value_name = "LEDGER")]
    pub min_ledger: u32,

    #[arg(long, value_name = "LEDGER")]
    pub max_ledger: u32,

    /// Ledgers added to the window start; consecutive windows begin `window + 1` apart.
    #[arg(long, value_name = "LEDGERS", default_value_t = DEFAULT_WINDOW)]
    pub window: u32,

    #[arg(long, value_name = "PATH", default_value = DEFAULT_LEDGER_FILE)]
    pub output: PathBuf,

    /// Events requested per getEvents page.
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_PAGE_LIMIT)]
    pub page_limit: u32,

    /// JSON file recording the last completed window for `--contract-id`.
    #[arg(long, value_name = "PATH")]
    pub checkpoint: Option<PathBuf>,

    /// Start after the ledger stored in `--checkpoint` instead of `--min-ledger`.
    #[arg(long, default_value_t = false, requires = "checkpoint")]
    pub resume: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_scan() {
        let args = ScanArgs::try_parse_from([
            "claims-scanner",
            "--rpc-url",
            "http://localhost:8000/soroban/rpc",
            "--contract-id",
            "CCONTRACT",
            "--min-ledger",
            "12631992",
            "--max-ledger",
            "12876834",
        ])
        .unwrap();

        assert_eq!(args.window, 1000);
        assert_eq!(args.output, PathBuf::from("claimed_events.csv"));
        assert!(args.checkpoint.is_none());
        assert!(!args.resume);
    }

    #[test]
    fn resume_needs_a_checkpoint_file() {
        let result = ScanArgs::try_parse_from([
            "claims-scanner",
            "--rpc-url",
            "http://localhost:8000",
            "--contract-id",
            "CCONTRACT",
            "--min-ledger",
            "1",
            "--max-ledger",
            "2",
            "--resume",
        ]);
        assert!(result.is_err());
    }
}
