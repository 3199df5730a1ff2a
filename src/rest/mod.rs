//! Cryptopay REST API client.
//!
//! Provides [`CryptopayClient`] with one method per API resource operation,
//! all built on the signed [`CryptopayClient::request`] primitive.

mod client;
mod endpoints;
mod types;

pub use client::{CryptopayClient, CryptopayClientBuilder};
pub use endpoints::*;
pub use types::*;
