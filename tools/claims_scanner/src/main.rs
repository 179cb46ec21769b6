use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use claims_scanner::{
    config::ScanArgs, Checkpoint, ClaimScanner, FileCheckpoint, LedgerFile, NoCheckpoint,
    ScanRange, SorobanRpcSource,
};
use tracing_subscriber::EnvFilter;

async fn scan<C: Checkpoint>(args: &ScanArgs, checkpoint: C) -> Result<()> {
    let range = ScanRange::new(args.min_ledger, args.max_ledger, args.window)?;
    let source =
        SorobanRpcSource::new(&args.rpc_url, &args.contract_id).page_limit(args.page_limit);
    let output = LedgerFile::open(&args.output)
        .await
        .with_context(|| format!("opening {}", args.output.display()))?;

    let summary = ClaimScanner::new(source, checkpoint, output)
        .run(range, args.resume)
        .await
        .context("scanning Claimed events")?;
    tracing::debug!(?summary, "done");
    Ok(())
}

async fn run(args: ScanArgs) -> Result<()> {
    match args.checkpoint.clone() {
        Some(path) => scan(&args, FileCheckpoint::new(path, &args.contract_id)).await,
        None => scan(&args, NoCheckpoint).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    match run(ScanArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Error listening to events: {err:#}");
            ExitCode::FAILURE
        }
    }
}
