use crate::{connection::Connection, Result};
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

/// Signing capability the launcher submits through.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Adds the wallet signature to `transaction` and lands it through `connection`.
    async fn submit(
        &self,
        transaction: Transaction,
        connection: &dyn Connection,
    ) -> Result<Signature>;
}

/// Wallet backed by a local keypair.
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl Wallet for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn submit(
        &self,
        mut transaction: Transaction,
        connection: &dyn Connection,
    ) -> Result<Signature> {
        // Same blockhash keeps any signatures already on the transaction
        let recent_blockhash = transaction.message.recent_blockhash;
        transaction.try_partial_sign(&[&self.keypair], recent_blockhash)?;

        connection.send_and_confirm(&transaction).await
    }
}
