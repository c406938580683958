use crate::Result;
use solana_sdk::{bs58, signature::Signature, signer::keypair::Keypair};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

// Get or create a keypair from an .env file
pub fn get_or_create_keypair(variable_name: &str) -> Result<Keypair> {
    dotenv::dotenv().ok();
    get_or_create_keypair_in(Path::new(".env"), variable_name)
}

/// Like [`get_or_create_keypair`], reading and appending to `env_file`.
pub fn get_or_create_keypair_in(env_file: &Path, variable_name: &str) -> Result<Keypair> {
    dotenv::from_path(env_file).ok();

    match env::var(variable_name) {
        Ok(secret_key_string) => decode_keypair(&secret_key_string),
        Err(_) => {
            // Create a new keypair if the environment variable is not found
            let keypair = Keypair::new();

            // Convert secret key to Vec<u8> and then to JSON, append to .env file
            let secret_key_bytes = Vec::from(keypair.to_bytes());
            let json_secret_key = serde_json::to_string(&secret_key_bytes)?;

            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(env_file)?;
            writeln!(file, "{}={}", variable_name, json_secret_key)?;

            tracing::info!(
                variable = variable_name,
                path = %env_file.display(),
                "Stored new keypair"
            );
            Ok(keypair)
        }
    }
}

/// Decodes a secret key stored either as base58 or as a JSON byte array.
pub fn decode_keypair(secret_key_string: &str) -> Result<Keypair> {
    let secret_key_string = secret_key_string.trim();

    // Try to decode base58 first
    if let Ok(decoded_secret_key) = bs58::decode(secret_key_string).into_vec() {
        Ok(Keypair::from_bytes(&decoded_secret_key)?)
    } else {
        // Fallback to JSON format
        let decoded_secret_key: Vec<u8> = serde_json::from_str(secret_key_string)?;
        Ok(Keypair::from_bytes(&decoded_secret_key)?)
    }
}

pub fn transaction_link(signature: &Signature, cluster: &str) -> String {
    format!("https://solana.fm/tx/{}?cluster={}", signature, cluster)
}

pub fn print_transaction_link(signature: &Signature, cluster: &str, message: &str) {
    println!("\n{}: {}", message, transaction_link(signature, cluster));
}
