//! Quote-related types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::types::TokenInfo;

/// A priced quotation for a token pair, normalized from the router's
/// response. Immutable, request-scoped, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Input token.
    pub token_in: TokenInfo,
    /// Output token.
    pub token_out: TokenInfo,
    /// Human-readable input amount.
    pub amount_in: String,
    /// Human-readable output amount.
    pub amount_out: String,
    /// Fee percent (flat constant, not derived from the pool).
    pub fee: f64,
    /// Displayed exchange rate, e.g. `1 USDC = 0.400000 OP`.
    pub exchange_rate: String,
    /// Pool path, when the router reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Render the displayed exchange rate as
/// `"1 <symbolIn> = <rate> <symbolOut>"` with exactly six fractional digits,
/// where `rate = amount_out / amount_in`.
pub fn format_exchange_rate(
    symbol_in: &str,
    amount_in: &str,
    symbol_out: &str,
    amount_out: &str,
) -> Result<String> {
    let amount_in: Decimal = amount_in
        .trim()
        .parse()
        .map_err(|e| AppError::Parse(format!("Invalid input amount '{}': {}", amount_in, e)))?;
    let amount_out: Decimal = amount_out
        .trim()
        .parse()
        .map_err(|e| AppError::Parse(format!("Invalid output amount '{}': {}", amount_out, e)))?;

    if amount_in.is_zero() {
        return Err(AppError::Parse("Input amount must be non-zero".to_string()));
    }

    let rate = amount_out / amount_in;
    Ok(format!("1 {} = {:.6} {}", symbol_in, rate, symbol_out))
}
