//! Moralis chain-data API client.
//!
//! Typed boundary around the two balance endpoints the wallet-info service
//! consumes: native-coin balance and ERC-20 balances.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Moralis deep-index API base URL.
pub const MORALIS_API_URL: &str = "https://deep-index.moralis.io/api/v2.2";

/// Chain selector for Optimism in Moralis query parameters.
const OPTIMISM_CHAIN: &str = "optimism";

/// Native-coin balance response.
#[derive(Debug, Clone, Deserialize)]
pub struct NativeBalance {
    /// Raw balance in wei (decimal string).
    pub balance: String,
}

/// ERC-20 balance entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Erc20Balance {
    /// Token contract address.
    pub token_address: String,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Logo URI (optional).
    #[serde(default)]
    pub logo: Option<String>,
    /// Number of decimals.
    pub decimals: u8,
    /// Raw balance in smallest units (decimal string).
    pub balance: String,
}

/// Typed client for the Moralis chain-data API.
#[derive(Clone)]
pub struct MoralisClient {
    /// HTTP client.
    client: reqwest::Client,
    /// API key sent with every request.
    api_key: String,
    /// API base URL.
    base_url: String,
}

impl MoralisClient {
    /// Create a client against the production API.
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, MORALIS_API_URL.to_string())
    }

    /// Create a client against a custom base URL (used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::MissingCredential("MORALIS_API_KEY".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, api_key, base_url })
    }

    /// Fetch the native-coin balance for an address, as a raw wei string.
    pub async fn native_balance(&self, address: &str) -> Result<String> {
        let url = format!("{}/{}/balance", self.base_url, address);

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .query(&[("chain", OPTIMISM_CHAIN)])
            .send()
            .await
            .map_err(|e| upstream("native balance", e))?;
        let response = check_status("native balance", response)?;

        let body: NativeBalance = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse native balance: {}", e)))?;

        Ok(body.balance)
    }

    /// Fetch all ERC-20 balances for an address.
    pub async fn erc20_balances(&self, address: &str) -> Result<Vec<Erc20Balance>> {
        let url = format!("{}/{}/erc20", self.base_url, address);

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .query(&[("chain", OPTIMISM_CHAIN)])
            .send()
            .await
            .map_err(|e| upstream("token balances", e))?;
        let response = check_status("token balances", response)?;

        response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse token balances: {}", e)))
    }
}

fn upstream(endpoint: &str, err: reqwest::Error) -> AppError {
    AppError::UpstreamRequestFailed(format!("{} request failed: {}", endpoint, err))
}

fn check_status(endpoint: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(AppError::UpstreamRequestFailed(format!(
            "{} endpoint returned status {}",
            endpoint,
            response.status()
        )))
    }
}
