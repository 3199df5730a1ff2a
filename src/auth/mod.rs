//! Authentication module for the Cryptopay API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - A pluggable clock for the signed `Date` header
//! - HMAC-SHA1 signature generation for every request

mod clock;
mod credentials;
mod signature;

pub use clock::{Clock, SystemClock};
pub use credentials::{API_KEY_VAR, API_SECRET_VAR, Credentials, EnvCredentials, SANDBOX_VAR};
pub use signature::{
    CONTENT_TYPE_JSON, SignedRequest, canonical_string, content_md5, encode_body, http_date,
    sign_request,
};
