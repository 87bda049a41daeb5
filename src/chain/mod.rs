//! Optimism chain interaction module.
//!
//! Contains the RPC client, wallet management, and network constants.

pub mod client;
pub mod constants;
pub mod wallet;

pub use client::ChainClient;
pub use wallet::WalletManager;
