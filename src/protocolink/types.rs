//! Boundary types for the Protocolink aggregation API.
//!
//! Every call site converts into these shapes immediately; internal
//! components never depend on the API's own loose objects.

use serde::{Deserialize, Serialize};

/// Logic identifier for a Uniswap V3 swap-token operation.
pub const UNISWAP_V3_SWAP_RID: &str = "uniswap-v3:swap-token";

/// Token shape used by the aggregation API (tokenlists.org style).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    /// Chain ID where the token exists.
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    /// Token contract address.
    pub address: String,
    /// Number of decimals.
    pub decimals: u8,
    /// Token symbol (e.g., "USDC").
    pub symbol: String,
    /// Token name (e.g., "USD Coin").
    pub name: String,
    /// Logo URI (optional).
    #[serde(rename = "logoURI", default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

/// Token list response from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenListResponse {
    /// List of tokens.
    pub tokens: Vec<ApiToken>,
}

/// A token paired with a human-readable amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenAmount {
    /// The token.
    pub token: ApiToken,
    /// Human-readable amount (decimal string).
    pub amount: String,
}

/// Request body for the swap-token quotation endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRequest {
    /// Chain ID the quotation is for.
    pub chain_id: u64,
    /// Input token and amount.
    pub input: TokenAmount,
    /// Desired output token.
    pub token_out: ApiToken,
    /// Maximum price deviation in the router's basis-point-like unit
    /// (percent × 100).
    pub slippage: u32,
}

/// Priced quotation returned by the router.
///
/// Echoed back verbatim as the `fields` of a swap logic, so it keeps every
/// field the API reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTokenQuotation {
    /// Trade type reported by the router (e.g., "exactIn").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<String>,
    /// Input token and amount.
    pub input: TokenAmount,
    /// Priced output token and amount.
    pub output: TokenAmount,
    /// Pool path, when the router reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Slippage echoed back by the router (basis-point-like unit).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage: Option<u32>,
}

/// A swap logic: a quotation wrapped under the router's logic identifier.
#[derive(Debug, Clone, Serialize)]
pub struct SwapLogic {
    /// Logic identifier.
    pub rid: String,
    /// The quotation to execute.
    pub fields: SwapTokenQuotation,
}

impl SwapLogic {
    /// Package a quotation as a Uniswap V3 swap-token logic.
    pub fn swap_token(quotation: SwapTokenQuotation) -> Self {
        Self { rid: UNISWAP_V3_SWAP_RID.to_string(), fields: quotation }
    }
}

/// Account/chain envelope submitted for estimation and transaction building.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterData {
    /// Chain ID.
    pub chain_id: u64,
    /// Account the router acts for.
    pub account: String,
    /// Logics executed atomically by the router.
    pub logics: Vec<SwapLogic>,
}

/// A ready-to-send transaction payload (spend approval or final router call).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// Target contract address.
    pub to: String,
    /// Calldata (hex encoded).
    pub data: String,
    /// Value in wei (decimal string), absent for zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Estimation result: the spend approvals that must confirm before the
/// router may move the account's tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterEstimate {
    /// Outstanding approval transactions, in submission order.
    #[serde(default)]
    pub approvals: Vec<TransactionPayload>,
}
