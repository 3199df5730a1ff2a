//! Credential management for Cryptopay API authentication.

use secrecy::{ExposeSecret, SecretString};

use crate::error::CryptopayError;

/// Default environment variable holding the API key.
pub const API_KEY_VAR: &str = "CRYPTOPAY_API_KEY";

/// Default environment variable holding the API secret.
pub const API_SECRET_VAR: &str = "CRYPTOPAY_API_SECRET";

/// Environment variable selecting the sandbox environment.
pub const SANDBOX_VAR: &str = "CRYPTOPAY_SANDBOX";

/// API credentials containing the key and secret.
///
/// Both parts are guaranteed non-empty: construction fails otherwise.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    /// The API secret (private, used for signing)
    api_secret: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret.
    ///
    /// Returns [`CryptopayError::Config`] if either value is empty.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, CryptopayError> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.is_empty() || api_secret.is_empty() {
            return Err(CryptopayError::Config(
                "Missing apiKey or apiSecret parameter(s). These are required.".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            api_secret: SecretString::from(api_secret),
        })
    }

    /// The API key (public identifier).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the API secret for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Credentials loaded from environment variables.
///
/// By default, reads from `CRYPTOPAY_API_KEY` and `CRYPTOPAY_API_SECRET`.
pub struct EnvCredentials;

impl EnvCredentials {
    /// Try to create credentials from the default environment variables.
    ///
    /// Returns `None` if either variable is unset or empty.
    pub fn try_from_env() -> Option<Credentials> {
        Self::try_from_env_vars(API_KEY_VAR, API_SECRET_VAR)
    }

    /// Try to create credentials from custom environment variable names.
    pub fn try_from_env_vars(key_var: &str, secret_var: &str) -> Option<Credentials> {
        let api_key = std::env::var(key_var).ok()?;
        let api_secret = std::env::var(secret_var).ok()?;
        Credentials::new(api_key, api_secret).ok()
    }

    /// Whether `CRYPTOPAY_SANDBOX` asks for the sandbox environment.
    pub fn sandbox_from_env() -> bool {
        std::env::var(SANDBOX_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(false)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("my_key", "super_secret").unwrap();
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("my_key"));
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_credentials_expose_secret() {
        let creds = Credentials::new("key", "secret").unwrap();
        assert_eq!(creds.api_key(), "key");
        assert_eq!(creds.expose_secret(), "secret");
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = Credentials::new("", "secret").unwrap_err();
        assert!(matches!(err, CryptopayError::Config(_)));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let err = Credentials::new("key", "").unwrap_err();
        assert!(matches!(err, CryptopayError::Config(_)));
    }

    #[test]
    fn test_cloned_credentials_keep_key() {
        let creds = Credentials::new("key", "secret").unwrap();
        let cloned = creds.clone();
        assert_eq!(cloned.api_key(), "key");
        assert!(!cloned.api_key().is_empty());
        assert!(!cloned.expose_secret().is_empty());
    }

    #[test]
    fn test_missing_env_vars() {
        assert!(
            EnvCredentials::try_from_env_vars(
                "CRYPTOPAY_TEST_UNSET_KEY_VAR",
                "CRYPTOPAY_TEST_UNSET_SECRET_VAR"
            )
            .is_none()
        );
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
