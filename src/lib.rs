pub mod config;
pub mod connection;
pub mod form;
pub mod instructions;
pub mod launcher;
pub mod utils;
pub mod wallet;

pub use connection::{Connection, RpcConnection};
pub use form::{LaunchRequest, TokenForm};
pub use launcher::{LaunchError, LaunchReceipt, Step, SubmissionMode, TokenLauncher};
pub use utils::get_or_create_keypair;
pub use wallet::{KeypairWallet, Wallet};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
