//! Protocolink aggregation API client.
//!
//! The router owns all pricing and routing logic; this module is a typed
//! request/response boundary around its HTTP endpoints: token lists,
//! quotations, router-transaction estimation, and transaction building.

pub mod types;

use std::time::Duration;

use crate::error::{AppError, Result};

pub use types::{
    ApiToken, QuotationRequest, RouterData, RouterEstimate, SwapLogic, SwapTokenQuotation,
    TokenAmount, TransactionPayload, UNISWAP_V3_SWAP_RID,
};

use types::TokenListResponse;

/// Protocolink API base URL.
pub const PROTOCOLINK_API_URL: &str = "https://api.protocolink.com";

/// Protocol identifier used in swap-token endpoint paths.
const UNISWAP_V3_PROTOCOL: &str = "uniswap-v3";

/// Typed client for the Protocolink aggregation API.
#[derive(Clone)]
pub struct ProtocolinkClient {
    /// HTTP client.
    client: reqwest::Client,
    /// API base URL.
    base_url: String,
}

impl ProtocolinkClient {
    /// Create a client against the production API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(PROTOCOLINK_API_URL.to_string())
    }

    /// Create a client against a custom base URL (used by tests).
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Fetch the full swap-token list for a chain.
    pub async fn swap_token_list(&self, chain_id: u64) -> Result<Vec<ApiToken>> {
        let url = format!(
            "{}/v1/protocols/{}/swap-token/tokens",
            self.base_url, UNISWAP_V3_PROTOCOL
        );

        let response = self
            .client
            .get(&url)
            .query(&[("chainId", chain_id)])
            .send()
            .await
            .map_err(|e| upstream("token list", e))?;
        let response = check_status("token list", response)?;

        let body: TokenListResponse = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse token list: {}", e)))?;

        Ok(body.tokens)
    }

    /// Request a priced quotation for an exact-input swap.
    pub async fn swap_token_quotation(
        &self,
        request: &QuotationRequest,
    ) -> Result<SwapTokenQuotation> {
        let url = format!(
            "{}/v1/protocols/{}/swap-token/quote",
            self.base_url, UNISWAP_V3_PROTOCOL
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| upstream("quotation", e))?;
        let response = check_status("quotation", response)?;

        response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse quotation: {}", e)))
    }

    /// Estimate router data, reporting any outstanding spend approvals.
    ///
    /// `permit2Type=approve` requests plain approval transactions instead of
    /// signed permits.
    pub async fn estimate_router_data(&self, router_data: &RouterData) -> Result<RouterEstimate> {
        let url = format!("{}/v1/transactions/estimate", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[("permit2Type", "approve")])
            .json(router_data)
            .send()
            .await
            .map_err(|e| upstream("estimation", e))?;
        let response = check_status("estimation", response)?;

        response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse estimation: {}", e)))
    }

    /// Materialize the concrete router transaction request.
    pub async fn build_transaction_request(
        &self,
        router_data: &RouterData,
    ) -> Result<TransactionPayload> {
        let url = format!("{}/v1/transactions/build", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(router_data)
            .send()
            .await
            .map_err(|e| upstream("transaction build", e))?;
        let response = check_status("transaction build", response)?;

        response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("Failed to parse transaction request: {}", e)))
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
