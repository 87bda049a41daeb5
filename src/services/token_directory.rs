//! Token directory backed by the aggregation router.
//!
//! Pure reads with no caching: every lookup re-fetches the full token list
//! for the fixed chain, so results always reflect what the router currently
//! serves.

use async_trait::async_trait;

use crate::chain::constants::OPTIMISM_CHAIN_ID;
use crate::protocolink::ProtocolinkClient;
use crate::types::TokenInfo;

/// Trait for token lookups.
///
/// Allows different implementations (router-backed, or fixture-backed for
/// testing).
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch the full token list for the fixed chain.
    ///
    /// On failure returns an empty sequence rather than propagating.
    async fn list_all(&self) -> Vec<TokenInfo>;

    /// Case-insensitive exact match on symbol. Symbols are not unique;
    /// zero, one, or more matches may come back and callers take the first.
    async fn find_by_symbol(&self, symbol: &str) -> Vec<TokenInfo> {
        filter_by_symbol(self.list_all().await, symbol)
    }

    /// Case-insensitive exact match on contract address.
    async fn find_by_address(&self, address: &str) -> Option<TokenInfo> {
        find_by_address(self.list_all().await, address)
    }

    /// Case-insensitive substring match against symbol and name.
    async fn search(&self, term: &str) -> Vec<TokenInfo> {
        search_tokens(self.list_all().await, term)
    }
}

/// Router-backed token directory.
#[derive(Clone)]
pub struct TokenDirectory {
    /// Aggregation API client.
    client: ProtocolinkClient,
    /// Target chain ID.
    chain_id: u64,
}

impl TokenDirectory {
    /// Create a directory for the fixed chain.
    pub fn new(client: ProtocolinkClient) -> Self {
        Self { client, chain_id: OPTIMISM_CHAIN_ID }
    }
}

#[async_trait]
impl TokenSource for TokenDirectory {
    async fn list_all(&self) -> Vec<TokenInfo> {
        match self.client.swap_token_list(self.chain_id).await {
            Ok(tokens) => tokens.into_iter().map(TokenInfo::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, chain_id = self.chain_id, "Failed to fetch token list");
                Vec::new()
            }
        }
    }
}

fn filter_by_symbol(tokens: Vec<TokenInfo>, symbol: &str) -> Vec<TokenInfo> {
    tokens.into_iter().filter(|t| t.symbol.eq_ignore_ascii_case(symbol)).collect()
}

fn find_by_address(tokens: Vec<TokenInfo>, address: &str) -> Option<TokenInfo> {
    tokens.into_iter().find(|t| t.address.eq_ignore_ascii_case(address))
}

fn search_tokens(tokens: Vec<TokenInfo>, term: &str) -> Vec<TokenInfo> {
    let term = term.to_lowercase();
    tokens
        .into_iter()
        .filter(|t| {
            t.symbol.to_lowercase().contains(&term) || t.name.to_lowercase().contains(&term)
        })
        .collect()
}
