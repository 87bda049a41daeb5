//! Configuration management module.
//!
//! Handles loading configuration from environment variables. The loaded
//! `Config` is constructed once at process start and passed into every
//! service constructor; services never read the environment themselves.

use std::env;

use crate::chain::constants::OPTIMISM_RPC_URL;
use crate::error::AppError;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Private key for the signing wallet (hex string, with or without 0x prefix).
    pub private_key: String,
    /// API key for the Moralis chain-data API.
    pub moralis_api_key: String,
    /// Optimism JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `WALLET_PRIVATE_KEY`: Private key for the signing wallet (hex)
    /// - `MORALIS_API_KEY`: API key for the Moralis chain-data API
    ///
    /// Optional environment variables:
    /// - `OPTIMISM_RPC_URL`: JSON-RPC endpoint (default: public Optimism mainnet)
    /// - `LOG_LEVEL`: Logging level (default: info)
    ///
    /// Note: Only Optimism (chain ID 10) is supported.
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let private_key = env::var("WALLET_PRIVATE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingCredential("WALLET_PRIVATE_KEY".into()))?;

        let moralis_api_key = env::var("MORALIS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingCredential("MORALIS_API_KEY".into()))?;

        let rpc_url =
            env::var("OPTIMISM_RPC_URL").unwrap_or_else(|_| OPTIMISM_RPC_URL.to_string());

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self { private_key, moralis_api_key, rpc_url, log_level })
    }
}
