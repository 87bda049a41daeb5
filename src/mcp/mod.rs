//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::OptimismSwapServer;
pub use server::{GetTokenInfoInput, GetWalletInfoInput, QuoteInput, SwapTokensInput};
