use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use claim_signer::{format_address, ClaimAuthorization, ClaimSigner, UnstakeAuthorization};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "claim-signer", about = "Sign RData reward claims and unstake requests")]
struct Cli {
    /// Hex encoded secp256k1 secret key of the signer wallet.
    #[arg(long, env = "CLAIM_SIGNER_SECRET_KEY", hide_env_values = true)]
    secret_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the signer wallet address to configure on the contracts.
    Address,
    /// Authorize a cumulative reward total for a user.
    Claim {
        #[arg(long)]
        user_id: u64,
        /// Strkey of the account receiving the tokens.
        #[arg(long)]
        receive_address: String,
        /// Cumulative reward in token base units.
        #[arg(long)]
        amount: i128,
        /// Unix timestamp after which the signature is rejected.
        #[arg(long)]
        deadline: u64,
    },
    /// Authorize the one-time unstake of a staker.
    Unstake {
        #[arg(long)]
        staker: String,
        #[arg(long)]
        amount: i128,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimParams {
    user_id: u64,
    receive_address: String,
    reward_amount: String,
    deadline: u64,
    signature: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnstakeParams {
    staker: String,
    amount: String,
    signature: String,
}

fn run(cli: Cli) -> Result<()> {
    let signer = ClaimSigner::from_hex(&cli.secret_key).context("loading signer key")?;

    let output = match cli.command {
        Command::Address => serde_json::json!({
            "signerWalletAddress": format_address(&signer.address()),
        }),
        Command::Claim {
            user_id,
            receive_address,
            amount,
            deadline,
        } => {
            let claim = ClaimAuthorization {
                user_id,
                receive_address,
                cumulative_reward_amount: amount,
                deadline,
            };
            let signature = signer.sign_claim(&claim).context("signing claim")?;
            tracing::info!(user_id, amount = %amount, deadline, "claim authorized");
            serde_json::to_value(ClaimParams {
                user_id: claim.user_id,
                receive_address: claim.receive_address,
                reward_amount: claim.cumulative_reward_amount.to_string(),
                deadline: claim.deadline,
                signature: hex::encode(signature),
            })?
        }
        Command::Unstake { staker, amount } => {
            let unstake = UnstakeAuthorization { staker, amount };
            let signature = signer.sign_unstake(&unstake).context("signing unstake")?;
            tracing::info!(staker = %unstake.staker, amount = %amount, "unstake authorized");
            serde_json::to_value(UnstakeParams {
                staker: unstake.staker,
                amount: unstake.amount.to_string(),
                signature: hex::encode(signature),
            })?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
