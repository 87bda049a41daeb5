//! MCP server implementation.

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use crate::{
    chain::constants::OPTIMISM_CHAIN_ID,
    chain::{ChainClient, WalletManager},
    config::Config,
    error::AppError,
    moralis::MoralisClient,
    protocolink::ProtocolinkClient,
    services::{QuoteService, SwapExecutor, TokenDirectory, TokenSource, WalletInfoService},
    types::{QuoteResult, SwapParams, SwapResult, TokenInfo, WalletInfo},
};

/// Default slippage tolerance in percent.
const DEFAULT_SLIPPAGE_PERCENT: f64 = 0.5;

/// Optimism Swap MCP Server.
///
/// Provides tools for token lookup, buy/sell quoting, swap execution, and
/// wallet balances on Optimism.
#[derive(Clone)]
pub struct OptimismSwapServer {
    quote_service: QuoteService,
    swap_executor: SwapExecutor,
    wallet_info_service: WalletInfoService,
    token_directory: Arc<dyn TokenSource>,
    wallet_address: String,
    tool_router: ToolRouter<Self>,
}

impl OptimismSwapServer {
    /// Create a new Optimism Swap MCP Server.
    ///
    /// Note: This uses lazy initialization - no network calls are made during
    /// server startup. Connections are established when the first tool is
    /// invoked.
    pub fn new(config: Config) -> Result<Self, AppError> {
        tracing::info!("Initializing Optimism Swap MCP Server");

        // Wallet and chain clients (lazy - no network call yet)
        let wallet = WalletManager::from_private_key(&config.private_key)?;
        let chain = ChainClient::new(&config.rpc_url, &wallet)?;

        // External SDK boundary clients
        let router = ProtocolinkClient::new()?;
        let moralis = MoralisClient::new(config.moralis_api_key.clone())?;

        // Token directory for the fixed chain
        let token_directory: Arc<dyn TokenSource> =
            Arc::new(TokenDirectory::new(router.clone()));

        // Services
        let quote_service = QuoteService::new(token_directory.clone(), router.clone());
        let swap_executor =
            SwapExecutor::new(token_directory.clone(), router, chain, wallet.clone());
        let wallet_info_service = WalletInfoService::new(moralis, wallet.clone());

        let wallet_address = format!("{:?}", wallet.address());

        tracing::info!("Optimism Swap MCP Server initialized successfully");

        Ok(Self {
            quote_service,
            swap_executor,
            wallet_info_service,
            token_directory,
            wallet_address,
            tool_router: Self::tool_router(),
        })
    }
}

/// Input parameters for the get-token-info tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenInfoInput {
    /// Token symbol (e.g., "OP", "USDC").
    pub symbol: String,
    /// Chain ID (defaults to Optimism's chain ID: 10).
    #[serde(default)]
    pub chain_id: Option<u64>,
}

/// Input parameters for the get-quote and sell-quote tools.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    /// Token symbol to buy or sell (e.g., "OP").
    pub token_symbol: String,
    /// Amount of the input token. Must be positive.
    pub amount_in: f64,
    /// Slippage tolerance in percent (default: 0.5).
    #[serde(default)]
    pub slippage: Option<f64>,
}

/// Input parameters for the swap-tokens tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapTokensInput {
    /// Input token symbol (e.g., "USDC").
    pub token_in_symbol: String,
    /// Output token symbol (e.g., "OP").
    pub token_out_symbol: String,
    /// Amount of the input token. Must be positive.
    pub amount_in: f64,
    /// Slippage tolerance in percent (default: 0.5).
    #[serde(default)]
    pub slippage_tolerance: Option<f64>,
    /// Recipient address (optional, defaults to the configured wallet).
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Input parameters for the get-wallet-info tool.
#[derive(Debug, Clone, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetWalletInfoInput {
    /// Wallet address to query (defaults to the configured wallet).
    #[serde(default)]
    pub address: Option<String>,
    /// Whether to include token balances (default: true).
    #[serde(default)]
    pub include_balances: Option<bool>,
}

/// Reject non-positive or non-finite amounts before any resolution step.
fn validate_amount(amount: f64) -> Result<(), McpError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(McpError::invalid_params("amountIn must be a positive number", None));
    }
    Ok(())
}

/// Apply the default slippage and reject out-of-range values (0-50%).
fn validate_slippage(slippage: Option<f64>) -> Result<f64, McpError> {
    let slippage = slippage.unwrap_or(DEFAULT_SLIPPAGE_PERCENT);
    if !slippage.is_finite() || !(0.0..=50.0).contains(&slippage) {
        return Err(McpError::invalid_params(
            "slippage must be between 0 and 50 (percentage)",
            None,
        ));
    }
    Ok(slippage)
}

/// The single chain this server targets.
fn validate_chain_id(chain_id: Option<u64>) -> Result<(), McpError> {
    match chain_id {
        Some(id) if id != OPTIMISM_CHAIN_ID => Err(McpError::invalid_params(
            format!("Only Optimism (Chain ID: {}) is supported, got {}", OPTIMISM_CHAIN_ID, id),
            None,
        )),
        _ => Ok(()),
    }
}

fn render_token_info(token: &TokenInfo) -> String {
    format!(
        "Token Information:\n\
         Symbol: {}\n\
         Name: {}\n\
         Address: {}\n\
         Decimals: {}\n\
         Chain: Optimism (Chain ID: {})",
        token.symbol, token.name, token.address, token.decimals, OPTIMISM_CHAIN_ID
    )
}

fn render_quote(quote: &QuoteResult, selling: bool) -> String {
    let heading = if selling {
        format!("Selling {} for {}", quote.token_in.symbol, quote.token_out.symbol)
    } else {
        format!("Buying {} with {}", quote.token_out.symbol, quote.token_in.symbol)
    };

    format!(
        "Quote Information:\n\
         {}\n\
         Spend: {} {}\n\
         Receive: {} {}\n\
         Exchange Rate: {}\n\
         Fee: {}%",
        heading,
        quote.amount_in,
        quote.token_in.symbol,
        quote.amount_out,
        quote.token_out.symbol,
        quote.exchange_rate,
        quote.fee
    )
}

fn render_swap_result(result: &SwapResult) -> String {
    let mut text = format!(
        "Swap Executed Successfully!\n\n\
         Input: {} {}\n\
         Output: {} {}\n\
         Exchange Rate: {}\n\
         Fee: {}%\n",
        result.from_token.amount,
        result.from_token.symbol,
        result.to_token.amount,
        result.to_token.symbol,
        result.exchange_rate,
        result.fee
    );

    if !result.approval_hashes.is_empty() {
        text.push_str(&format!(
            "Approvals Confirmed: {}\n",
            result.approval_hashes.join(", ")
        ));
    }

    text.push_str(&format!(
        "Transaction Hash: {}\n\
         Network: Optimism (Chain ID: {})",
        result.transaction_hash, OPTIMISM_CHAIN_ID
    ));

    text
}

fn render_wallet_info(info: &WalletInfo, include_balances: bool) -> String {
    let mut text = format!(
        "Wallet Information:\n\
         Address: {}\n\
         Network: Optimism (Chain ID: {})",
        info.address, OPTIMISM_CHAIN_ID
    );

    if !include_balances {
        return text;
    }

    text.push_str("\n\nBalances:");
    for token in &info.tokens {
        text.push_str(&format!("\n{} {} ({})", token.balance, token.symbol, token.name));
    }

    // Only the synthetic native entry present
    if info.tokens.len() <= 1 {
        text.push_str("\nNo ERC-20 tokens found.");
    }

    text
}

fn render_failure(operation: &str, err: &AppError) -> String {
    format!("{} failed: {}", operation, err)
}

#[tool_router]
impl OptimismSwapServer {
    /// Look up a token by symbol on the fixed chain.
    ///
    /// Symbols are case-insensitive and not unique; the first match wins.
    #[tool(
        name = "get-token-info",
        description = "Get token information by symbol on Optimism (e.g., OP, USDC)"
    )]
    pub async fn get_token_info(
        &self,
        Parameters(input): Parameters<GetTokenInfoInput>,
    ) -> Result<String, McpError> {
        tracing::info!(symbol = %input.symbol, chain = ?input.chain_id, "get-token-info called");

        validate_chain_id(input.chain_id)?;
        let symbol = input.symbol.trim().to_uppercase();

        let matches = self.token_directory.find_by_symbol(&symbol).await;
        match matches.into_iter().next() {
            Some(token) => Ok(render_token_info(&token)),
            None => Ok(render_failure(
                "Token lookup",
                &AppError::TokenNotFound(symbol),
            )),
        }
    }

    /// Quote buying a token with USDC.
    #[tool(
        name = "get-quote",
        description = "Get a quote for buying a token with USDC on Optimism"
    )]
    pub async fn get_quote(
        &self,
        Parameters(input): Parameters<QuoteInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            symbol = %input.token_symbol,
            amount = input.amount_in,
            slippage = ?input.slippage,
            "get-quote called"
        );

        validate_amount(input.amount_in)?;
        let slippage = validate_slippage(input.slippage)?;
        let symbol = input.token_symbol.trim().to_uppercase();
        let amount = input.amount_in.to_string();

        match self.quote_service.get_quote(&symbol, &amount, slippage, true).await {
            Ok(quote) => Ok(render_quote(&quote, false)),
            Err(e) => Ok(render_failure("Quote", &e)),
        }
    }

    /// Quote selling a token for USDC.
    #[tool(
        name = "sell-quote",
        description = "Get a quote for selling a token for USDC on Optimism"
    )]
    pub async fn sell_quote(
        &self,
        Parameters(input): Parameters<QuoteInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            symbol = %input.token_symbol,
            amount = input.amount_in,
            slippage = ?input.slippage,
            "sell-quote called"
        );

        validate_amount(input.amount_in)?;
        let slippage = validate_slippage(input.slippage)?;
        let symbol = input.token_symbol.trim().to_uppercase();
        let amount = input.amount_in.to_string();

        match self.quote_service.get_sell_quote(&symbol, &amount, slippage).await {
            Ok(quote) => Ok(render_quote(&quote, true)),
            Err(e) => Ok(render_failure("Sell quote", &e)),
        }
    }

    /// Execute a token swap through the aggregation router, handling any
    /// required spend approvals, and block until the chain confirms it.
    #[tool(
        name = "swap-tokens",
        description = "Swap tokens on Optimism via Uniswap V3, handling approvals automatically. Executes a real on-chain transaction."
    )]
    pub async fn swap_tokens(
        &self,
        Parameters(input): Parameters<SwapTokensInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            from = %input.token_in_symbol,
            to = %input.token_out_symbol,
            amount = input.amount_in,
            slippage = ?input.slippage_tolerance,
            "swap-tokens called"
        );

        validate_amount(input.amount_in)?;
        let slippage = validate_slippage(input.slippage_tolerance)?;

        let params = SwapParams {
            token_in_symbol: input.token_in_symbol.trim().to_uppercase(),
            token_out_symbol: input.token_out_symbol.trim().to_uppercase(),
            amount_in: input.amount_in.to_string(),
            slippage_percent: slippage,
            recipient: input.recipient,
        };

        match self.swap_executor.execute(params).await {
            Ok(result) => Ok(render_swap_result(&result)),
            Err(e) => Ok(render_failure("Swap", &e)),
        }
    }

    /// Query native and ERC-20 balances for a wallet address.
    #[tool(
        name = "get-wallet-info",
        description = "Get wallet address, network, and token balances on Optimism"
    )]
    pub async fn get_wallet_info(
        &self,
        Parameters(input): Parameters<GetWalletInfoInput>,
    ) -> Result<String, McpError> {
        tracing::info!(
            address = ?input.address,
            include_balances = ?input.include_balances,
            "get-wallet-info called"
        );

        let include_balances = input.include_balances.unwrap_or(true);

        if !include_balances {
            let address = input
                .address
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .unwrap_or(&self.wallet_address)
                .to_string();
            return Ok(render_wallet_info(
                &WalletInfo { address, tokens: Vec::new() },
                false,
            ));
        }

        match self.wallet_info_service.wallet_info(input.address.as_deref()).await {
            Ok(info) => Ok(render_wallet_info(&info, true)),
            Err(e) => Ok(render_failure("Wallet info", &e)),
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for OptimismSwapServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "optimism-swap-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Optimism Swap MCP Server. Provides tools for token lookup, \
                 USDC buy/sell quotes, swap execution, and wallet balances."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SwapSide, TokenBalance};

    fn op_token() -> TokenInfo {
        TokenInfo {
            address: "0x4200000000000000000000000000000000000042".to_string(),
            name: "Optimism".to_string(),
            symbol: "OP".to_string(),
            decimals: 18,
            logo_uri: None,
            chain_id: Some(10),
        }
    }

    fn usdc_token() -> TokenInfo {
        TokenInfo {
            address: "0x0b2c639c533813f4aa9d7837caf62653d097ff85".to_string(),
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            decimals: 6,
            logo_uri: None,
            chain_id: Some(10),
        }
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(1.0).is_ok());
        assert!(validate_amount(0.0001).is_ok());

        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_slippage_default() {
        assert_eq!(validate_slippage(None).unwrap(), 0.5);
        assert_eq!(validate_slippage(Some(1.5)).unwrap(), 1.5);
    }

    #[test]
    fn test_validate_slippage_range() {
        assert!(validate_slippage(Some(-0.1)).is_err());
        assert!(validate_slippage(Some(51.0)).is_err());
        assert!(validate_slippage(Some(f64::NAN)).is_err());
        assert!(validate_slippage(Some(0.0)).is_ok());
        assert!(validate_slippage(Some(50.0)).is_ok());
    }

    #[test]
    fn test_validate_chain_id() {
        assert!(validate_chain_id(None).is_ok());
        assert!(validate_chain_id(Some(10)).is_ok());
        assert!(validate_chain_id(Some(1)).is_err());
    }

    #[test]
    fn test_render_token_info() {
        let text = render_token_info(&op_token());

        assert!(text.contains("Symbol: OP"));
        assert!(text.contains("Name: Optimism"));
        assert!(text.contains("Address: 0x4200000000000000000000000000000000000042"));
        assert!(text.contains("Decimals: 18"));
        assert!(text.contains("Chain: Optimism (Chain ID: 10)"));
    }

    #[test]
    fn test_render_buy_quote() {
        let quote = QuoteResult {
            token_in: usdc_token(),
            token_out: op_token(),
            amount_in: "10".to_string(),
            amount_out: "4.0".to_string(),
            fee: 0.3,
            exchange_rate: "1 USDC = 0.400000 OP".to_string(),
            path: None,
        };

        let text = render_quote(&quote, false);
        assert!(text.contains("Buying OP with USDC"));
        assert!(text.contains("Spend: 10 USDC"));
        assert!(text.contains("Receive: 4.0 OP"));
        assert!(text.contains("Exchange Rate: 1 USDC = 0.400000 OP"));
        assert!(text.contains("Fee: 0.3%"));
    }

    #[test]
    fn test_render_sell_quote() {
        let quote = QuoteResult {
            token_in: op_token(),
            token_out: usdc_token(),
            amount_in: "4".to_string(),
            amount_out: "10.0".to_string(),
            fee: 0.3,
            exchange_rate: "1 OP = 2.500000 USDC".to_string(),
            path: None,
        };

        let text = render_quote(&quote, true);
        assert!(text.contains("Selling OP for USDC"));
        assert!(text.contains("Spend: 4 OP"));
        assert!(text.contains("Receive: 10.0 USDC"));
    }

    #[test]
    fn test_render_swap_result_with_approvals() {
        let result = SwapResult {
            transaction_hash: "0xswap".to_string(),
            from_token: SwapSide {
                address: "0xa".to_string(),
                symbol: "USDC".to_string(),
                amount: "10".to_string(),
            },
            to_token: SwapSide {
                address: "0xb".to_string(),
                symbol: "OP".to_string(),
                amount: "4.0".to_string(),
            },
            exchange_rate: "1 USDC = 0.400000 OP".to_string(),
            fee: 0.3,
            approval_hashes: vec!["0xapproval".to_string()],
        };

        let text = render_swap_result(&result);
        assert!(text.contains("Swap Executed Successfully!"));
        assert!(text.contains("Input: 10 USDC"));
        assert!(text.contains("Output: 4.0 OP"));
        assert!(text.contains("Approvals Confirmed: 0xapproval"));
        assert!(text.contains("Transaction Hash: 0xswap"));
        assert!(text.contains("Network: Optimism (Chain ID: 10)"));
    }

    #[test]
    fn test_render_swap_result_without_approvals() {
        let result = SwapResult {
            transaction_hash: "0xswap".to_string(),
            from_token: SwapSide {
                address: "0xa".to_string(),
                symbol: "USDC".to_string(),
                amount: "10".to_string(),
            },
            to_token: SwapSide {
                address: "0xb".to_string(),
                symbol: "OP".to_string(),
                amount: "4.0".to_string(),
            },
            exchange_rate: "1 USDC = 0.400000 OP".to_string(),
            fee: 0.3,
            approval_hashes: Vec::new(),
        };

        let text = render_swap_result(&result);
        assert!(!text.contains("Approvals Confirmed"));
    }

    #[test]
    fn test_render_wallet_info_native_only() {
        // Zero ERC-20 balances: native entry only, four decimal places,
        // and a "no tokens found" note for the ERC-20 portion.
        let info = WalletInfo {
            address: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string(),
            tokens: vec![TokenBalance::native("1234560000000000000")],
        };

        let text = render_wallet_info(&info, true);
        assert!(text.contains("Address: 0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
        assert!(text.contains("Network: Optimism (Chain ID: 10)"));
        assert!(text.contains("1.2345 ETH (Ethereum)"));
        assert!(text.contains("No ERC-20 tokens found."));
    }

    #[test]
    fn test_render_wallet_info_with_tokens() {
        let info = WalletInfo {
            address: "0xabc".to_string(),
            tokens: vec![
                TokenBalance::native("1000000000000000000"),
                TokenBalance {
                    token_address: "0x0b2c639c533813f4aa9d7837caf62653d097ff85".to_string(),
                    name: "USD Coin".to_string(),
                    symbol: "USDC".to_string(),
                    decimals: 6,
                    balance_raw: "2500000".to_string(),
                    balance: "2.5000".to_string(),
                },
            ],
        };

        let text = render_wallet_info(&info, true);
        assert!(text.contains("1.0000 ETH (Ethereum)"));
        assert!(text.contains("2.5000 USDC (USD Coin)"));
        assert!(!text.contains("No ERC-20 tokens found."));
    }

    #[test]
    fn test_render_wallet_info_without_balances() {
        let info = WalletInfo { address: "0xabc".to_string(), tokens: Vec::new() };

        let text = render_wallet_info(&info, false);
        assert!(text.contains("Address: 0xabc"));
        assert!(!text.contains("Balances:"));
    }

    #[test]
    fn test_render_failure() {
        let text = render_failure("Swap", &AppError::TokenNotFound("XYZ".to_string()));
        assert_eq!(text, "Swap failed: Token not found: XYZ");
    }
}
