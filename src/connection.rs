use crate::Result;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, signature::Signature,
    transaction::Transaction,
};
use std::sync::Arc;

/// Network access needed to size, fund and land the launch transactions.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn minimum_balance_for_size(&self, size: usize) -> Result<u64>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Sends a fully signed transaction and waits for confirmation.
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature>;
}

#[async_trait]
impl<T: Connection + ?Sized> Connection for Arc<T> {
    async fn minimum_balance_for_size(&self, size: usize) -> Result<u64> {
        (**self).minimum_balance_for_size(size).await
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        (**self).latest_blockhash().await
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        (**self).send_and_confirm(transaction).await
    }
}

pub struct RpcConnection {
    client: RpcClient,
}

impl RpcConnection {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url.into(), CommitmentConfig::confirmed()),
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl Connection for RpcConnection {
    async fn minimum_balance_for_size(&self, size: usize) -> Result<u64> {
        Ok(self
            .client
            .get_minimum_balance_for_rent_exemption(size)
            .await?)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        Ok(self.client.send_and_confirm_transaction(transaction).await?)
    }
}
