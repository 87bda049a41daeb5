//! Optimism RPC client.

use alloy::{
    network::EthereumWallet,
    primitives::TxHash,
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
};

use crate::chain::WalletManager;
use crate::error::{AppError, Result};

/// Optimism RPC client holding a read-only provider and a transaction-signing
/// provider bound to one fixed endpoint.
///
/// Construction makes no network calls; connections are established lazily
/// when the first operation is performed. Submission goes through the
/// signing provider, confirmation polling through the read-only one.
#[derive(Clone)]
pub struct ChainClient {
    /// Read-only provider.
    reader: DynProvider,
    /// Signing provider with gas, nonce, and chain-id filling.
    signer: DynProvider,
    /// RPC URL for logging.
    rpc_url: String,
}

impl ChainClient {
    /// Create a new chain client from an RPC URL and the signing wallet.
    pub fn new(rpc_url: &str, wallet: &WalletManager) -> Result<Self> {
        let url: reqwest::Url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let reader = ProviderBuilder::new().connect_http(url.clone()).erased();

        let signer = ProviderBuilder::new()
            .wallet(EthereumWallet::from(wallet.signer().clone()))
            .connect_http(url)
            .erased();

        tracing::info!(rpc_url = %rpc_url, "Chain client created (lazy initialization)");

        Ok(Self { reader, signer, rpc_url: rpc_url.to_string() })
    }

    /// Sign and broadcast a transaction, returning its hash immediately.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self.signer.send_transaction(tx).await?;
        let hash = *pending.tx_hash();
        tracing::debug!(hash = %hash, rpc_url = %self.rpc_url, "Transaction broadcast");
        Ok(hash)
    }

    /// Block until the chain reports a terminal receipt for a transaction.
    pub async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt> {
        let pending = PendingTransactionBuilder::new(self.reader.root().clone(), hash);
        let receipt = pending.get_receipt().await?;
        Ok(receipt)
    }
}
