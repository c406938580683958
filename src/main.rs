// solana-test-validator, then: cargo run -- --name MyToken --symbol MTK --initial-supply 500
use clap::Parser;
use solana_sdk::signature::Signer;
use std::error::Error;
use token_launchpad::{
    config::{get_explorer_cluster, get_rpc_url, get_wallet_variable, Args},
    get_or_create_keypair,
    utils::{print_transaction_link, transaction_link},
    KeypairWallet, RpcConnection, TokenLauncher,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt().init();
    dotenv::dotenv().ok();
    let args = Args::parse();

    let rpc_url = get_rpc_url(args.cluster.clone());
    let explorer_cluster = get_explorer_cluster(args.explorer_cluster.clone());
    let wallet_variable = get_wallet_variable(args.wallet.clone());

    let payer = get_or_create_keypair(&wallet_variable)?;
    let connection = RpcConnection::new(rpc_url);
    info!(wallet_pubkey = %payer.pubkey(), rpc_url = %connection.url(), "Wallet loaded");

    let request = args.form().resolve_with_decimals(args.decimals());
    info!(?request, mode = ?args.mode(), "Resolved launch request");

    let launcher =
        TokenLauncher::new(connection, KeypairWallet::new(payer)).with_mode(args.mode());

    let receipt = match launcher.launch(&request).await {
        Ok(receipt) => receipt,
        Err(e) => {
            error!(error = %e, "Launch failed");
            std::process::exit(1);
        }
    };

    if args.json {
        let signatures: Vec<_> = receipt
            .signatures
            .iter()
            .map(|(step, signature)| {
                serde_json::json!({
                    "step": step.to_string(),
                    "signature": signature.to_string(),
                    "link": transaction_link(signature, &explorer_cluster),
                })
            })
            .collect();
        let output = serde_json::json!({
            "mint": receipt.mint.to_string(),
            "holder": receipt.holder.to_string(),
            "amount": receipt.amount,
            "transactions": signatures,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (step, signature) in &receipt.signatures {
            print_transaction_link(signature, &explorer_cluster, &step.to_string());
        }
        println!("\nMint: {}\nToken Account: {}", receipt.mint, receipt.holder);
    }
    Ok(())
}
