//! Token and balance types.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::chain::constants::{NATIVE_TOKEN_ADDRESS, OPTIMISM_CHAIN_ID};
use crate::moralis::Erc20Balance;
use crate::protocolink::ApiToken;

/// Fractional digits used when displaying balances.
pub const BALANCE_DISPLAY_DECIMALS: usize = 4;

/// Information about a token, sourced from the aggregation router.
///
/// Symbols are not unique; lookups can return several of these and callers
/// take the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token contract address.
    pub address: String,
    /// Token name (e.g., "Optimism").
    pub name: String,
    /// Token symbol (e.g., "OP").
    pub symbol: String,
    /// Number of decimals.
    pub decimals: u8,
    /// Logo URI (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
    /// Chain ID (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

impl From<ApiToken> for TokenInfo {
    fn from(token: ApiToken) -> Self {
        Self {
            address: token.address,
            name: token.name,
            symbol: token.symbol,
            decimals: token.decimals,
            logo_uri: token.logo_uri,
            chain_id: Some(token.chain_id),
        }
    }
}

impl From<&TokenInfo> for ApiToken {
    fn from(token: &TokenInfo) -> Self {
        Self {
            chain_id: token.chain_id.unwrap_or(OPTIMISM_CHAIN_ID),
            address: token.address.clone(),
            decimals: token.decimals,
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            logo_uri: token.logo_uri.clone(),
        }
    }
}

/// A wallet balance entry (native coin or ERC-20).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Token contract address (zero address for the native coin).
    pub token_address: String,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Number of decimals.
    pub decimals: u8,
    /// Raw balance in smallest units.
    pub balance_raw: String,
    /// Human-readable balance.
    pub balance: String,
}

impl TokenBalance {
    /// Native-coin entry, listed under the zero-address placeholder.
    pub fn native(raw_balance: &str) -> Self {
        Self {
            token_address: format!("{:?}", NATIVE_TOKEN_ADDRESS),
            name: "Ethereum".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
            balance_raw: raw_balance.to_string(),
            balance: format_balance(raw_balance, 18),
        }
    }
}

impl From<Erc20Balance> for TokenBalance {
    fn from(entry: Erc20Balance) -> Self {
        let balance = format_balance(&entry.balance, entry.decimals);
        Self {
            token_address: entry.token_address,
            name: entry.name,
            symbol: entry.symbol,
            decimals: entry.decimals,
            balance_raw: entry.balance,
            balance,
        }
    }
}

/// Wallet address with its balance listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    /// The queried address.
    pub address: String,
    /// Balances, native coin first.
    pub tokens: Vec<TokenBalance>,
}

/// Format a raw integer balance by dividing by 10^decimals, displayed with
/// [`BALANCE_DISPLAY_DECIMALS`] fractional digits.
///
/// Unparseable input renders as "0.0000" rather than failing the whole
/// listing.
pub fn format_balance(raw: &str, decimals: u8) -> String {
    let value = match raw.trim().parse::<U256>() {
        Ok(value) => value,
        Err(_) => return format!("0.{}", "0".repeat(BALANCE_DISPLAY_DECIMALS)),
    };
    format_units_dp(value, decimals, BALANCE_DISPLAY_DECIMALS)
}

/// Format a U256 value with decimals to a fixed number of fractional digits
/// (truncating, not rounding).
pub fn format_units_dp(value: U256, decimals: u8, dp: usize) -> String {
    let value_str = value.to_string();
    let decimals = decimals as usize;

    let (integer, fraction) = if value_str.len() <= decimals {
        let zeros = decimals - value_str.len();
        ("0".to_string(), format!("{}{}", "0".repeat(zeros), value_str))
    } else {
        let (integer, fraction) = value_str.split_at(value_str.len() - decimals);
        (integer.to_string(), fraction.to_string())
    };

    if dp == 0 {
        return integer;
    }

    let mut fraction = fraction;
    if fraction.len() > dp {
        fraction.truncate(dp);
    } else {
        fraction.push_str(&"0".repeat(dp - fraction.len()));
    }

    format!("{}.{}", integer, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_info_from_api_token() {
        let api = ApiToken {
            chain_id: 10,
            address: "0x4200000000000000000000000000000000000042".to_string(),
            decimals: 18,
            symbol: "OP".to_string(),
            name: "Optimism".to_string(),
            logo_uri: Some("https://example.com/op.png".to_string()),
        };

        let info = TokenInfo::from(api);
        assert_eq!(info.symbol, "OP");
        assert_eq!(info.decimals, 18);
        assert_eq!(info.chain_id, Some(10));
    }

    #[test]
    fn test_api_token_from_token_info_defaults_chain() {
        let info = TokenInfo {
            address: "0xabc".to_string(),
            name: "Test".to_string(),
            symbol: "TST".to_string(),
            decimals: 8,
            logo_uri: None,
            chain_id: None,
        };

        let api = ApiToken::from(&info);
        assert_eq!(api.chain_id, OPTIMISM_CHAIN_ID);
        assert_eq!(api.decimals, 8);
    }

    #[test]
    fn test_token_info_serialization_skips_absent_fields() {
        let info = TokenInfo {
            address: "0xabc".to_string(),
            name: "Test".to_string(),
            symbol: "TST".to_string(),
            decimals: 8,
            logo_uri: None,
            chain_id: None,
        };

        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("logo_uri"));
        assert!(!json.contains("chain_id"));
    }

    #[test]
    fn test_native_balance_entry() {
        // 1.23456 ETH in wei
        let entry = TokenBalance::native("1234560000000000000");

        assert_eq!(entry.symbol, "ETH");
        assert_eq!(entry.decimals, 18);
        assert_eq!(entry.token_address, "0x0000000000000000000000000000000000000000");
        assert_eq!(entry.balance, "1.2345");
    }

    #[test]
    fn test_erc20_balance_conversion() {
        let entry = TokenBalance::from(Erc20Balance {
            token_address: "0x0b2c639c533813f4aa9d7837caf62653d097ff85".to_string(),
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            logo: None,
            decimals: 6,
            balance: "2500000".to_string(),
        });

        assert_eq!(entry.balance, "2.5000");
        assert_eq!(entry.balance_raw, "2500000");
    }

    #[test]
    fn test_format_balance_four_decimal_places() {
        assert_eq!(format_balance("1000000000000000000", 18), "1.0000");
        assert_eq!(format_balance("1500000", 6), "1.5000");
        assert_eq!(format_balance("0", 18), "0.0000");
        // 1 wei truncates to zero at display precision
        assert_eq!(format_balance("1", 18), "0.0000");
    }

    #[test]
    fn test_format_balance_unparseable_raw() {
        assert_eq!(format_balance("not-a-number", 18), "0.0000");
    }

    #[test]
    fn test_format_units_dp() {
        let one_eth = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_units_dp(one_eth, 18, 4), "1.0000");

        let value = U256::from(1_234_567u64);
        assert_eq!(format_units_dp(value, 6, 4), "1.2345");
        assert_eq!(format_units_dp(value, 6, 0), "1");
        assert_eq!(format_units_dp(value, 0, 2), "1234567.00");
    }
}
