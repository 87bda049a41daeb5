//! Wallet info service.

use crate::chain::WalletManager;
use crate::error::Result;
use crate::moralis::MoralisClient;
use crate::types::{TokenBalance, WalletInfo};

/// Service reading native and ERC-20 balances via the chain-data API.
#[derive(Clone)]
pub struct WalletInfoService {
    moralis: MoralisClient,
    wallet: WalletManager,
}

impl WalletInfoService {
    /// Create a new wallet info service.
    pub fn new(moralis: MoralisClient, wallet: WalletManager) -> Self {
        Self { moralis, wallet }
    }

    /// Fetch balances for an address, defaulting to the configured wallet's
    /// own address.
    ///
    /// The native-coin balance is prepended as a synthetic entry under the
    /// zero-address placeholder.
    pub async fn wallet_info(&self, address: Option<&str>) -> Result<WalletInfo> {
        let address = match address.map(str::trim).filter(|a| !a.is_empty()) {
            Some(address) => address.to_string(),
            None => format!("{:?}", self.wallet.address()),
        };

        tracing::info!(address = %address, "Fetching wallet balances");

        let native = self.moralis.native_balance(&address).await?;
        let erc20 = self.moralis.erc20_balances(&address).await?;

        let mut tokens = Vec::with_capacity(erc20.len() + 1);
        tokens.push(TokenBalance::native(&native));
        tokens.extend(erc20.into_iter().map(TokenBalance::from));

        Ok(WalletInfo { address, tokens })
    }
}
