//! Swap execution service.
//!
//! A strictly sequential pipeline: resolve tokens, quote, estimate, submit
//! any outstanding spend approvals one at a time (each confirmed before the
//! next, since they apply to the account's nonce in order), then build,
//! submit, and confirm the router transaction itself. Approvals already
//! committed on-chain are never rolled back by a later failure.

use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;

use crate::chain::constants::{DEFAULT_FEE_PERCENT, OPTIMISM_CHAIN_ID};
use crate::chain::{ChainClient, WalletManager};
use crate::error::{AppError, Result};
use crate::protocolink::{
    ApiToken, ProtocolinkClient, QuotationRequest, RouterData, SwapLogic, TokenAmount,
    TransactionPayload,
};
use crate::services::quote::to_basis_points;
use crate::services::TokenSource;
use crate::types::{format_exchange_rate, SwapParams, SwapResult, SwapSide, TokenInfo};

/// Convert a router-issued payload into a signable transaction request.
fn to_transaction_request(payload: &TransactionPayload, from: Address) -> Result<TransactionRequest> {
    let to: Address = payload.to.parse().map_err(|e| {
        AppError::Parse(format!("Invalid transaction target '{}': {}", payload.to, e))
    })?;

    let data: Bytes = payload
        .data
        .parse()
        .map_err(|e| AppError::Parse(format!("Invalid calldata: {}", e)))?;

    let value = match payload.value.as_deref() {
        Some(v) if !v.is_empty() => U256::from_str(v).map_err(|e| {
            AppError::Parse(format!("Invalid transaction value '{}': {}", v, e))
        })?,
        _ => U256::ZERO,
    };

    Ok(TransactionRequest::default().from(from).to(to).input(data.into()).value(value))
}

/// Service executing swaps through the aggregation router.
#[derive(Clone)]
pub struct SwapExecutor {
    tokens: Arc<dyn TokenSource>,
    router: ProtocolinkClient,
    chain: ChainClient,
    wallet: WalletManager,
}

impl SwapExecutor {
    /// Create a new swap executor.
    pub fn new(
        tokens: Arc<dyn TokenSource>,
        router: ProtocolinkClient,
        chain: ChainClient,
        wallet: WalletManager,
    ) -> Self {
        Self { tokens, router, chain, wallet }
    }

    /// Execute a swap and block until the chain confirms it.
    ///
    /// Returns a [`SwapResult`] only after a success receipt; any failure at
    /// any step aborts the remaining steps.
    pub async fn execute(&self, params: SwapParams) -> Result<SwapResult> {
        tracing::info!(
            from = %params.token_in_symbol,
            to = %params.token_out_symbol,
            amount = %params.amount_in,
            slippage = params.slippage_percent,
            "Executing swap"
        );

        // 1. Resolve tokens (first match each)
        let token_in = self.resolve(&params.token_in_symbol).await?;
        let token_out = self.resolve(&params.token_out_symbol).await?;

        // 2. Resolve wallet and recipient. The router pays out to the
        // account; the recipient is resolved up front so a malformed
        // argument fails before anything touches the chain.
        let account = self.wallet.address();
        let recipient = self.wallet.resolve_recipient(params.recipient.as_deref())?;
        tracing::info!(account = %account, recipient = %recipient, "Wallet resolved");

        // 3. Quote the exact amount and slippage
        let request = QuotationRequest {
            chain_id: OPTIMISM_CHAIN_ID,
            input: TokenAmount {
                token: ApiToken::from(&token_in),
                amount: params.amount_in.clone(),
            },
            token_out: ApiToken::from(&token_out),
            slippage: to_basis_points(params.slippage_percent),
        };
        let quotation = self.router.swap_token_quotation(&request).await?;
        tracing::info!(
            expected_output = %quotation.output.amount,
            symbol = %token_out.symbol,
            "Quotation received"
        );

        // 4. Package the quotation into a router envelope
        let router_data = RouterData {
            chain_id: OPTIMISM_CHAIN_ID,
            account: format!("{:?}", account),
            logics: vec![SwapLogic::swap_token(quotation.clone())],
        };

        // 5. Estimate, reporting outstanding spend approvals
        let estimate = self.router.estimate_router_data(&router_data).await?;

        // 6. Submit approvals sequentially, each confirmed before the next
        let mut approval_hashes = Vec::with_capacity(estimate.approvals.len());
        if estimate.approvals.is_empty() {
            tracing::info!("No approvals needed");
        } else {
            tracing::info!(count = estimate.approvals.len(), "Executing approvals");
        }
        for (index, approval) in estimate.approvals.iter().enumerate() {
            let tx = to_transaction_request(approval, account)?;
            let hash = self.chain.send_transaction(tx).await?;
            tracing::info!(index, hash = %hash, "Approval transaction submitted");

            let receipt = self.chain.wait_for_receipt(hash).await?;
            if !receipt.status() {
                return Err(AppError::TransactionFailed(format!(
                    "approval {} ({:?}) reverted",
                    index, hash
                )));
            }
            tracing::info!(index, hash = %hash, "Approval confirmed");
            approval_hashes.push(format!("{:?}", hash));
        }

        // 7. Materialize the concrete router transaction
        let payload = self.router.build_transaction_request(&router_data).await?;

        // 8. Submit
        let tx = to_transaction_request(&payload, account)?;
        let hash = self.chain.send_transaction(tx).await?;
        tracing::info!(hash = %hash, "Swap transaction submitted");

        // 9. Confirm
        let receipt = self.chain.wait_for_receipt(hash).await?;
        if !receipt.status() {
            return Err(AppError::TransactionFailed(format!("swap {:?} reverted", hash)));
        }
        tracing::info!(hash = %hash, "Swap confirmed");

        // 10. Terminal: realized rate from requested input vs quoted output
        let exchange_rate = format_exchange_rate(
            &token_in.symbol,
            &params.amount_in,
            &token_out.symbol,
            &quotation.output.amount,
        )?;

        Ok(SwapResult {
            transaction_hash: format!("{:?}", hash),
            from_token: SwapSide {
                address: token_in.address,
                symbol: token_in.symbol,
                amount: params.amount_in,
            },
            to_token: SwapSide {
                address: token_out.address,
                symbol: token_out.symbol,
                amount: quotation.output.amount,
            },
            exchange_rate,
            fee: DEFAULT_FEE_PERCENT,
            approval_hashes,
        })
    }

    /// Resolve a token symbol, taking the first match.
    async fn resolve(&self, symbol: &str) -> Result<TokenInfo> {
        self.tokens
            .find_by_symbol(symbol)
            .await
            .into_iter()
            .next()
            .ok_or_else(|| AppError::TokenNotFound(symbol.to_string()))
    }
}
