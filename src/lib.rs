//! # Cryptopay Client
//!
//! An async Rust client library for the Cryptopay business API.
//!
//! ## Features
//!
//! - HMAC-SHA1 request signing with the exact canonical string the server expects
//! - Typed methods for rates, accounts, payment channels and coin withdrawals
//! - Structured server errors with access to every field the API returns
//! - Production and sandbox environments
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cryptopay_client::rest::CryptopayClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CryptopayClient::new("api_key", "api_secret", true)?;
//!     let accounts = client.list_accounts().await?;
//!     println!("Accounts: {:?}", accounts);
//!     Ok(())
//! }
//! ```
//!
//! Failed calls are also reported as `tracing` events at `WARN` level; install
//! any subscriber to see them.

pub mod auth;
pub mod error;
pub mod rest;

// Re-export commonly used types at crate root
pub use error::{ApiError, CryptopayError};
pub use rest::{CryptopayClient, CryptopayClientBuilder};

/// Result type alias using CryptopayError
pub type Result<T> = std::result::Result<T, CryptopayError>;
