use crate::form::{TokenForm, DEFAULT_DECIMALS};
use crate::launcher::SubmissionMode;
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Launch a Token-2022 mint with metadata", long_about = None)]
pub struct Args {
    #[arg(long, help = "Token name")]
    pub name: Option<String>,
    #[arg(long, help = "Token symbol")]
    pub symbol: Option<String>,
    #[arg(long, help = "Metadata URI")]
    pub uri: Option<String>,
    #[arg(long, help = "Initial supply in base units")]
    pub initial_supply: Option<String>,
    #[arg(long, help = "Mint decimals")]
    pub decimals: Option<u8>,
    #[arg(long, help = "Solana RPC URL")]
    pub cluster: Option<String>,
    #[arg(long, help = "Name of the .env variable holding the wallet keypair")]
    pub wallet: Option<String>,
    #[arg(long, help = "Cluster name used in explorer links")]
    pub explorer_cluster: Option<String>,
    #[arg(long, help = "Send all instructions in a single transaction")]
    pub batched: bool,
    #[arg(long, help = "Print the launch receipt as JSON")]
    pub json: bool,
}

impl Args {
    /// Form values, with the matching environment variables filling gaps.
    pub fn form(&self) -> TokenForm {
        TokenForm {
            name: cli_or_env(&self.name, "LAUNCHPAD_NAME").unwrap_or_default(),
            symbol: cli_or_env(&self.symbol, "LAUNCHPAD_SYMBOL").unwrap_or_default(),
            uri: cli_or_env(&self.uri, "LAUNCHPAD_URI").unwrap_or_default(),
            initial_supply: cli_or_env(&self.initial_supply, "LAUNCHPAD_INITIAL_SUPPLY")
                .unwrap_or_default(),
        }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
            .or_else(|| {
                std::env::var("LAUNCHPAD_DECIMALS")
                    .ok()
                    .and_then(|value| value.trim().parse().ok())
            })
            .unwrap_or(DEFAULT_DECIMALS)
    }

    pub fn mode(&self) -> SubmissionMode {
        if self.batched {
            SubmissionMode::Batched
        } else {
            SubmissionMode::Sequential
        }
    }
}

fn cli_or_env(cli_value: &Option<String>, variable_name: &str) -> Option<String> {
    cli_value
        .clone()
        .or_else(|| std::env::var(variable_name).ok())
}

pub fn get_rpc_url(cli_url: Option<String>) -> String {
    cli_url
        .or_else(|| std::env::var("LAUNCHPAD_RPC_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8899".to_string())
}

pub fn get_wallet_variable(cli_wallet: Option<String>) -> String {
    cli_wallet
        .or_else(|| std::env::var("LAUNCHPAD_WALLET").ok())
        .unwrap_or_else(|| "wallet_1".to_string())
}

pub fn get_explorer_cluster(cli_cluster: Option<String>) -> String {
    cli_cluster
        .or_else(|| std::env::var("LAUNCHPAD_EXPLORER_CLUSTER").ok())
        .unwrap_or_else(|| "localnet-solana".to_string())
}
