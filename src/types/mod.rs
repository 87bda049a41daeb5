//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod quote;
pub mod swap;
pub mod token;

pub use quote::*;
pub use swap::*;
pub use token::*;
