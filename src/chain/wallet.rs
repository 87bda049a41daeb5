//! Wallet management.

use alloy::{primitives::Address, signers::local::PrivateKeySigner};

use crate::error::{AppError, Result};

/// Wallet manager for transaction signing.
#[derive(Clone)]
pub struct WalletManager {
    /// The local signer.
    signer: PrivateKeySigner,
    /// Wallet address.
    address: Address,
}

impl WalletManager {
    /// Create a wallet manager from a private key string.
    ///
    /// The key is accepted with or without a `0x` prefix. An empty key is a
    /// fatal precondition failure, never a recoverable state.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let trimmed = private_key.trim();
        if trimmed.is_empty() {
            return Err(AppError::MissingCredential("WALLET_PRIVATE_KEY".into()));
        }

        let key = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let signer: PrivateKeySigner =
            key.parse().map_err(|e: alloy::signers::local::LocalSignerError| {
                AppError::Wallet(e.to_string())
            })?;

        let address = signer.address();

        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self { signer, address })
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the signer for transaction signing.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Resolve the recipient for a swap: an explicit recipient wins, an
    /// empty or missing value falls through to the derived wallet address.
    pub fn resolve_recipient(&self, specified: Option<&str>) -> Result<Address> {
        match specified.map(str::trim).filter(|s| !s.is_empty()) {
            Some(recipient) => recipient
                .parse::<Address>()
                .map_err(|e| AppError::Parse(format!("Invalid recipient address: {}", e))),
            None => Ok(self.address),
        }
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}
