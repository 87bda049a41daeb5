//! Common utilities for integration tests.

use optimism_swap_mcp::{Config, OptimismSwapServer};

/// Helper to create a test server from environment variables.
pub fn create_test_server() -> Option<OptimismSwapServer> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Check if required environment variables are set
    let private_key = std::env::var("WALLET_PRIVATE_KEY").ok()?;
    let moralis_api_key = std::env::var("MORALIS_API_KEY").ok()?;

    if private_key.is_empty() || moralis_api_key.is_empty() {
        return None;
    }

    let rpc_url = std::env::var("OPTIMISM_RPC_URL")
        .unwrap_or_else(|_| "https://mainnet.optimism.io".to_string());

    let config = Config { private_key, moralis_api_key, rpc_url, log_level: "warn".to_string() };

    OptimismSwapServer::new(config).ok()
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_test_server() {
            Some(server) => server,
            None => {
                eprintln!("Skipping test: WALLET_PRIVATE_KEY or MORALIS_API_KEY not set");
                return;
            }
        }
    };
}
