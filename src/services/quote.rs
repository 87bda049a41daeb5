//! Quote service.
//!
//! Frames every quote against the USDC base token: buying spends USDC for
//! the target token, selling spends the target token for USDC. Pricing is
//! delegated entirely to the aggregation router.

use std::sync::Arc;

use crate::chain::constants::{
    BASE_TOKEN_SYMBOL, DEFAULT_FEE_PERCENT, OPTIMISM_CHAIN_ID, USDC_ADDRESS,
};
use crate::error::{AppError, Result};
use crate::protocolink::{ApiToken, ProtocolinkClient, QuotationRequest, SwapTokenQuotation, TokenAmount};
use crate::services::TokenSource;
use crate::types::{format_exchange_rate, QuoteResult, TokenInfo};

/// Convert a slippage percentage to the router's basis-point-like unit
/// (1% = 100).
pub(crate) fn to_basis_points(percent: f64) -> u32 {
    (percent * 100.0).round() as u32
}

/// Assign from/to roles for a base/target pair.
///
/// Buying puts the base token on the input side; selling inverts the roles.
fn order_pair(
    base: TokenInfo,
    target: TokenInfo,
    use_base_as_source: bool,
) -> (TokenInfo, TokenInfo) {
    if use_base_as_source {
        (base, target)
    } else {
        (target, base)
    }
}

/// Normalize a router quotation into a [`QuoteResult`].
fn build_quote_result(
    token_in: TokenInfo,
    token_out: TokenInfo,
    amount_in: &str,
    quotation: &SwapTokenQuotation,
) -> Result<QuoteResult> {
    let exchange_rate = format_exchange_rate(
        &token_in.symbol,
        amount_in,
        &token_out.symbol,
        &quotation.output.amount,
    )?;

    Ok(QuoteResult {
        token_in,
        token_out,
        amount_in: amount_in.to_string(),
        amount_out: quotation.output.amount.clone(),
        fee: DEFAULT_FEE_PERCENT,
        exchange_rate,
        path: quotation.path.clone(),
    })
}

/// Service producing buy/sell quotes against the USDC base token.
#[derive(Clone)]
pub struct QuoteService {
    tokens: Arc<dyn TokenSource>,
    router: ProtocolinkClient,
}

impl QuoteService {
    /// Create a new quote service.
    pub fn new(tokens: Arc<dyn TokenSource>, router: ProtocolinkClient) -> Self {
        Self { tokens, router }
    }

    /// Get a quote for the given token against USDC.
    ///
    /// With `use_base_as_source` the quote buys `token_symbol` with USDC;
    /// without it the quote sells `token_symbol` for USDC.
    pub async fn get_quote(
        &self,
        token_symbol: &str,
        amount_in: &str,
        slippage_percent: f64,
        use_base_as_source: bool,
    ) -> Result<QuoteResult> {
        tracing::info!(
            symbol = %token_symbol,
            amount = %amount_in,
            slippage = slippage_percent,
            side = if use_base_as_source { "buy" } else { "sell" },
            "Getting quote"
        );

        let target = self.resolve_target(token_symbol).await?;
        let base = self.resolve_base().await?;
        let (token_in, token_out) = order_pair(base, target, use_base_as_source);

        let request = QuotationRequest {
            chain_id: OPTIMISM_CHAIN_ID,
            input: TokenAmount {
                token: ApiToken::from(&token_in),
                amount: amount_in.to_string(),
            },
            token_out: ApiToken::from(&token_out),
            slippage: to_basis_points(slippage_percent),
        };

        let quotation = self.router.swap_token_quotation(&request).await?;

        build_quote_result(token_in, token_out, amount_in, &quotation)
    }

    /// Get a sell quote: `get_quote` with the source/target roles inverted.
    pub async fn get_sell_quote(
        &self,
        token_symbol: &str,
        amount_in: &str,
        slippage_percent: f64,
    ) -> Result<QuoteResult> {
        self.get_quote(token_symbol, amount_in, slippage_percent, false).await
    }

    /// Resolve the target token by symbol, taking the first match.
    async fn resolve_target(&self, symbol: &str) -> Result<TokenInfo> {
        self.tokens
            .find_by_symbol(symbol)
            .await
            .into_iter()
            .next()
            .ok_or_else(|| AppError::TokenNotFound(symbol.to_string()))
    }

    /// Resolve the USDC base token: symbol lookup first, then the fixed
    /// address as a fallback.
    async fn resolve_base(&self) -> Result<TokenInfo> {
        if let Some(token) =
            self.tokens.find_by_symbol(BASE_TOKEN_SYMBOL).await.into_iter().next()
        {
            return Ok(token);
        }

        self.tokens
            .find_by_address(&format!("{:?}", USDC_ADDRESS))
            .await
            .ok_or_else(|| AppError::TokenNotFound(BASE_TOKEN_SYMBOL.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticTokens(Vec<TokenInfo>);

    #[async_trait]
    impl TokenSource for StaticTokens {
        async fn list_all(&self) -> Vec<TokenInfo> {
            self.0.clone()
        }
    }

    fn usdc() -> TokenInfo {
        TokenInfo {
            address: "0x0b2c639c533813f4aa9d7837caf62653d097ff85".to_string(),
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            decimals: 6,
            logo_uri: None,
            chain_id: Some(10),
        }
    }

    fn op() -> TokenInfo {
        TokenInfo {
            address: "0x4200000000000000000000000000000000000042".to_string(),
            name: "Optimism".to_string(),
            symbol: "OP".to_string(),
            decimals: 18,
            logo_uri: None,
            chain_id: Some(10),
        }
    }

    fn quotation(amount_in: &str, amount_out: &str) -> SwapTokenQuotation {
        SwapTokenQuotation {
            trade_type: None,
            input: TokenAmount { token: ApiToken::from(&usdc()), amount: amount_in.to_string() },
            output: TokenAmount { token: ApiToken::from(&op()), amount: amount_out.to_string() },
            path: None,
            slippage: Some(50),
        }
    }

    fn service(tokens: Vec<TokenInfo>) -> QuoteService {
        QuoteService::new(
            Arc::new(StaticTokens(tokens)),
            ProtocolinkClient::with_base_url("http://localhost:0".to_string()).unwrap(),
        )
    }

    #[test]
    fn test_to_basis_points() {
        assert_eq!(to_basis_points(0.5), 50);
        assert_eq!(to_basis_points(1.0), 100);
        assert_eq!(to_basis_points(0.0), 0);
        assert_eq!(to_basis_points(2.55), 255);
    }

    #[test]
    fn test_order_pair_inverts_roles() {
        let (buy_in, buy_out) = order_pair(usdc(), op(), true);
        let (sell_in, sell_out) = order_pair(usdc(), op(), false);

        // The "from" token of one equals the "to" token of the other
        assert_eq!(buy_in, sell_out);
        assert_eq!(buy_out, sell_in);
        assert_eq!(buy_in.symbol, "USDC");
        assert_eq!(buy_out.symbol, "OP");
    }

    #[test]
    fn test_build_quote_result_scenario() {
        // 10 USDC into OP where the router reports output.amount = "4.0"
        let result = build_quote_result(usdc(), op(), "10", &quotation("10", "4.0")).unwrap();

        assert_eq!(result.amount_out, "4.0");
        assert_eq!(result.exchange_rate, "1 USDC = 0.400000 OP");
        assert_eq!(result.fee, 0.3);
        assert_eq!(result.token_in.symbol, "USDC");
        assert_eq!(result.token_out.symbol, "OP");
    }

    #[tokio::test]
    async fn test_resolve_target_unknown_symbol() {
        let service = service(vec![usdc(), op()]);

        match service.resolve_target("NOTAREALTOKEN").await {
            Err(AppError::TokenNotFound(symbol)) => assert_eq!(symbol, "NOTAREALTOKEN"),
            other => panic!("Expected TokenNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_resolve_target_case_insensitive() {
        let service = service(vec![usdc(), op()]);

        let token = service.resolve_target("op").await.unwrap();
        assert_eq!(token.symbol, "OP");
    }

    #[tokio::test]
    async fn test_resolve_base_by_symbol() {
        let service = service(vec![usdc(), op()]);
        let base = service.resolve_base().await.unwrap();
        assert_eq!(base.symbol, "USDC");
    }

    #[tokio::test]
    async fn test_resolve_base_falls_back_to_address() {
        // A list where the base token carries an unexpected symbol but sits
        // at the well-known address.
        let mut renamed = usdc();
        renamed.symbol = "USDC-RENAMED".to_string();

        let service = service(vec![renamed, op()]);
        let base = service.resolve_base().await.unwrap();
        assert_eq!(base.symbol, "USDC-RENAMED");
    }

    #[tokio::test]
    async fn test_resolve_base_missing_entirely() {
        let service = service(vec![op()]);

        match service.resolve_base().await {
            Err(AppError::TokenNotFound(symbol)) => assert_eq!(symbol, "USDC"),
            other => panic!("Expected TokenNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
