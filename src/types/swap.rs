//! Swap-related types.

use serde::{Deserialize, Serialize};

/// Parameters for a swap execution.
#[derive(Debug, Clone)]
pub struct SwapParams {
    /// Input token symbol.
    pub token_in_symbol: String,
    /// Output token symbol.
    pub token_out_symbol: String,
    /// Human-readable input amount.
    pub amount_in: String,
    /// Slippage tolerance as a percentage (e.g., 0.5 for 0.5%).
    pub slippage_percent: f64,
    /// Recipient address; defaults to the configured wallet.
    pub recipient: Option<String>,
}

/// One side of a completed swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapSide {
    /// Token contract address.
    pub address: String,
    /// Token symbol.
    pub symbol: String,
    /// Human-readable amount.
    pub amount: String,
}

/// Result of a confirmed on-chain swap. Produced only after the chain
/// reports a success receipt; represents a completed, irreversible effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResult {
    /// Hash of the confirmed swap transaction.
    pub transaction_hash: String,
    /// Input side.
    pub from_token: SwapSide,
    /// Output side (amount as quoted, not as settled).
    pub to_token: SwapSide,
    /// Displayed exchange rate (quoted output / requested input).
    pub exchange_rate: String,
    /// Fee percent (flat constant).
    pub fee: f64,
    /// Hashes of spend-approval transactions confirmed before the swap,
    /// in submission order. Empty when no approvals were outstanding.
    pub approval_hashes: Vec<String>,
}
