//! Business logic services module.

pub mod quote;
pub mod swap;
pub mod token_directory;
pub mod wallet_info;

pub use quote::QuoteService;
pub use swap::SwapExecutor;
pub use token_directory::{TokenDirectory, TokenSource};
pub use wallet_info::WalletInfoService;
