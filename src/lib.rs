//! Optimism Swap MCP Server Library
//!
//! A Model Context Protocol server for token swaps on Optimism.
//! Provides tools for token lookup, USDC buy/sell quotes, swap execution,
//! and wallet balances.
//!
//! # Features
//!
//! - **Token Lookup**: Resolve token metadata by symbol via the aggregation router
//! - **Quotes**: Buy/sell quotes against USDC with configurable slippage
//! - **Swap Execution**: On-chain swaps with automatic spend-approval handling
//! - **Wallet Info**: Native and ERC-20 balances via the chain-data API
//!
//! # Example
//!
//! ```rust,ignore
//! use optimism_swap_mcp::{Config, OptimismSwapServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = OptimismSwapServer::new(config)?;
//!     // Run server...
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod mcp;
pub mod moralis;
pub mod protocolink;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use mcp::OptimismSwapServer;
