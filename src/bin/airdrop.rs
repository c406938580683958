// cargo run --bin airdrop -- --sol 5
use clap::Parser;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, native_token::LAMPORTS_PER_SOL, signer::Signer,
};
use std::error::Error;
use token_launchpad::{
    config::{get_rpc_url, get_wallet_variable},
    get_or_create_keypair,
};
use tracing::info;

/// Fund the launch wallet on a local or test cluster
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = 1, help = "Amount of SOL to request")]
    sol: u64,
    #[arg(long, help = "Solana RPC URL")]
    cluster: Option<String>,
    #[arg(long, help = "Name of the .env variable holding the wallet keypair")]
    wallet: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let wallet = get_or_create_keypair(&get_wallet_variable(args.wallet))?;

    let client = RpcClient::new_with_commitment(
        get_rpc_url(args.cluster),
        CommitmentConfig::confirmed(),
    );

    let signature = client
        .request_airdrop(&wallet.pubkey(), sol_to_lamports(args.sol)?)
        .await?;
    client.poll_for_signature(&signature).await?;
    info!(wallet = %wallet.pubkey(), %signature, "Airdrop requested");

    let balance = client.get_balance(&wallet.pubkey()).await?;
    println!("\n{}: {} lamports", wallet.pubkey(), balance);
    Ok(())
}

fn sol_to_lamports(sol: u64) -> Result<u64, Box<dyn Error + Send + Sync>> {
    sol.checked_mul(LAMPORTS_PER_SOL)
        .ok_or_else(|| format!("{} SOL does not fit in a u64 lamport amount", sol).into())
}
