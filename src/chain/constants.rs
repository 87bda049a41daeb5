//! Optimism network constants.
//!
//! The server targets exactly one chain; everything here is fixed at
//! compile time.

use alloy::primitives::{address, Address};

/// Optimism mainnet chain ID.
pub const OPTIMISM_CHAIN_ID: u64 = 10;

/// Default Optimism JSON-RPC endpoint.
pub const OPTIMISM_RPC_URL: &str = "https://mainnet.optimism.io";

/// Symbol of the quote/base token used for buy/sell framing.
pub const BASE_TOKEN_SYMBOL: &str = "USDC";

/// Native USDC address on Optimism, used as a fallback when the symbol
/// lookup yields nothing.
pub const USDC_ADDRESS: Address = address!("0b2C639c533813f4Aa9D7837CAf62653d097Ff85");

/// Placeholder address under which the native-coin balance is listed.
pub const NATIVE_TOKEN_ADDRESS: Address = Address::ZERO;

/// Flat fee percent reported with every quotation (Uniswap V3 default tier).
pub const DEFAULT_FEE_PERCENT: f64 = 0.3;
