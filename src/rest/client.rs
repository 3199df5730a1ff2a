//! Cryptopay REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, DATE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::{CONTENT_TYPE_JSON, Clock, Credentials, SignedRequest, SystemClock, encode_body};
use crate::error::{ApiError, CryptopayError};
use crate::rest::endpoints::{self, CRYPTOPAY_BASE_URL, CRYPTOPAY_SANDBOX_URL};
use crate::rest::types::{
    Account, Channel, ChannelPayment, CoinWithdrawal, CreateChannelParams,
    CreateCoinWithdrawalParams, Envelope, ErrorEnvelope, Rate, Transaction,
};

/// The Cryptopay business API client.
///
/// Every call signs and sends exactly one HTTP request. The client holds no
/// mutable state, so it can be cloned and shared across tasks freely.
///
/// # Example
///
/// ```rust,no_run
/// use cryptopay_client::rest::CryptopayClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CryptopayClient::new("api_key", "api_secret", true)?;
///
///     for rate in client.list_rates().await? {
///         println!("{:?}: {}", rate.pair, rate.rate);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CryptopayClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Arc<Credentials>,
    clock: Arc<dyn Clock>,
}

impl CryptopayClient {
    /// Create a client for production (`sandbox == false`) or the sandbox.
    ///
    /// Fails with [`CryptopayError::Config`] if the key or secret is empty.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        sandbox: bool,
    ) -> Result<Self, CryptopayError> {
        Self::builder()
            .api_key(api_key)
            .api_secret(api_secret)
            .sandbox(sandbox)
            .build()
    }

    /// Create a new client builder.
    pub fn builder() -> CryptopayClientBuilder {
        CryptopayClientBuilder::new()
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a signed request and return the raw response.
    ///
    /// The body is encoded once; the same bytes are signed and sent. Empty
    /// bodies are signed as empty content and not transmitted. Non-2xx
    /// responses are turned into [`CryptopayError::Api`] when the server sent
    /// a structured error, otherwise [`CryptopayError::HttpStatus`].
    ///
    /// Failures are reported through `tracing` before being returned.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, CryptopayError>
    where
        B: Serialize + ?Sized,
    {
        self.send_signed(method.clone(), path, body)
            .await
            .inspect_err(|err| report_failure(&method, path, err))
    }

    async fn send_signed<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, CryptopayError>
    where
        B: Serialize + ?Sized,
    {
        let content = encode_body(body)?;
        let signed = SignedRequest::new(
            &self.credentials,
            self.clock.as_ref(),
            method.as_str(),
            path,
            &content,
        )?;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http_client
            .request(method, &url)
            .header(AUTHORIZATION, signed.authorization(self.credentials.api_key()))
            .header(DATE, signed.date)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON);
        if !content.is_empty() {
            request = request.body(content);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(normalize_error(response).await)
        }
    }

    /// Send a signed request and unwrap the `data` field of the response.
    ///
    /// Each failure is reported through `tracing` exactly once.
    pub async fn call<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, CryptopayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method.clone(), path, body).await?;
        parse_envelope(response)
            .await
            .inspect_err(|err| report_failure(&method, path, err))
    }

    async fn get<T>(&self, path: &str) -> Result<T, CryptopayError>
    where
        T: DeserializeOwned,
    {
        self.call::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, CryptopayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::POST, path, body).await
    }

    // Rates.

    /// Get exchange rates for all supported currency pairs.
    pub async fn list_rates(&self) -> Result<Vec<Rate>, CryptopayError> {
        self.get(endpoints::RATES).await
    }

    /// Get the exchange rate for one currency pair.
    ///
    /// # Arguments
    ///
    /// * `pair` - The currency pair (e.g., "BTC-EUR")
    pub async fn get_pair_rate(&self, pair: &str) -> Result<Rate, CryptopayError> {
        self.get(&endpoints::pair_rate(pair)).await
    }

    // Accounts.

    /// Get all merchant accounts with their balances.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, CryptopayError> {
        self.get(endpoints::ACCOUNTS).await
    }

    /// Get the transactions of an account.
    pub async fn list_account_transactions(
        &self,
        account_id: &str,
    ) -> Result<Vec<Transaction>, CryptopayError> {
        self.get(&endpoints::account_transactions(account_id)).await
    }

    // Channels.

    /// Create a payment channel.
    pub async fn create_channel(
        &self,
        params: &CreateChannelParams,
    ) -> Result<Channel, CryptopayError> {
        self.post(endpoints::CHANNELS, Some(params)).await
    }

    /// Get all payment channels.
    pub async fn list_channels(&self) -> Result<Vec<Channel>, CryptopayError> {
        self.get(endpoints::CHANNELS).await
    }

    /// Get the payments received on a channel.
    pub async fn list_channel_payments(
        &self,
        channel_id: &str,
    ) -> Result<Vec<ChannelPayment>, CryptopayError> {
        self.get(&endpoints::channel_payments(channel_id)).await
    }

    // Coin withdrawals.

    /// Create a coin withdrawal. It is not executed until committed.
    pub async fn create_coin_withdrawal(
        &self,
        params: &CreateCoinWithdrawalParams,
    ) -> Result<CoinWithdrawal, CryptopayError> {
        self.post(endpoints::COIN_WITHDRAWALS, Some(params)).await
    }

    /// Commit a previously created coin withdrawal.
    ///
    /// # Arguments
    ///
    /// * `payment_id` - The `id` returned by [`create_coin_withdrawal`](Self::create_coin_withdrawal)
    pub async fn commit_coin_withdrawal(
        &self,
        payment_id: &str,
    ) -> Result<CoinWithdrawal, CryptopayError> {
        self.post::<_, ()>(&endpoints::commit_coin_withdrawal(payment_id), None)
            .await
    }
}

impl std::fmt::Debug for CryptopayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptopayClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Unwrap the `{ "data": ... }` envelope of a successful response.
async fn parse_envelope<T>(response: reqwest::Response) -> Result<T, CryptopayError>
where
    T: DeserializeOwned,
{
    let body = response.text().await?;
    serde_json::from_str::<Envelope<T>>(&body)
        .map(|envelope| envelope.data)
        .map_err(|e| {
            CryptopayError::InvalidResponse(format!(
                "Failed to parse response: {}. Body: {}",
                e, body
            ))
        })
}

/// Convert a non-2xx response into an error.
///
/// A body of the form `{ "error": { ... } }` becomes [`CryptopayError::Api`];
/// anything else is kept raw as [`CryptopayError::HttpStatus`].
async fn normalize_error(response: reqwest::Response) -> CryptopayError {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return CryptopayError::Http(e),
    };

    serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| ApiError::from_payload(status, envelope.error))
        .map(CryptopayError::Api)
        .unwrap_or(CryptopayError::HttpStatus { status, body })
}

fn report_failure(method: &Method, path: &str, err: &CryptopayError) {
    match err.api_error() {
        Some(api_error) => tracing::warn!(
            method = %method,
            path,
            error = %err,
            server_message = %api_error.message,
            "There was an error while contacting Cryptopay API"
        ),
        None => tracing::warn!(
            method = %method,
            path,
            error = %err,
            "There was an error while contacting Cryptopay API"
        ),
    }
}

/// Builder for [`CryptopayClient`].
pub struct CryptopayClientBuilder {
    api_key: Option<String>,
    api_secret: Option<String>,
    credentials: Option<Credentials>,
    sandbox: bool,
    base_url: Option<String>,
    clock: Option<Arc<dyn Clock>>,
    user_agent: Option<String>,
    max_retries: u32,
    timeout: Option<Duration>,
}

impl CryptopayClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            credentials: None,
            sandbox: false,
            base_url: None,
            clock: None,
            user_agent: None,
            max_retries: 0,
            timeout: None,
        }
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the API secret.
    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Use already validated credentials. Takes precedence over
    /// [`api_key`](Self::api_key) and [`api_secret`](Self::api_secret).
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Use the sandbox environment instead of production.
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set the base URL (useful for testing with a mock server).
    ///
    /// Overrides the environment chosen with [`sandbox`](Self::sandbox).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the clock used for the signed `Date` header.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Retry transient failures up to `retries` times with exponential backoff.
    ///
    /// Disabled by default.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set a total timeout for each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// Fails with [`CryptopayError::Config`] when credentials are missing or
    /// empty, and with [`CryptopayError::Url`] when the base URL is invalid.
    pub fn build(self) -> Result<CryptopayClient, CryptopayError> {
        let credentials = match self.credentials {
            Some(credentials) => credentials,
            None => Credentials::new(
                self.api_key.unwrap_or_default(),
                self.api_secret.unwrap_or_default(),
            )?,
        };

        let base_url = self.base_url.unwrap_or_else(|| {
            if self.sandbox {
                CRYPTOPAY_SANDBOX_URL.to_string()
            } else {
                CRYPTOPAY_BASE_URL.to_string()
            }
        });
        Url::parse(&base_url)?;
        let base_url = base_url.trim_end_matches('/').to_string();

        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("cryptopay-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("cryptopay-client"));
        headers.insert(USER_AGENT, header_value);

        let mut reqwest_builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            reqwest_builder = reqwest_builder.timeout(timeout);
        }
        let reqwest_client = reqwest_builder.build()?;

        let mut client_builder = ClientBuilder::new(reqwest_client).with(TracingMiddleware::default());
        if self.max_retries > 0 {
            let retry_policy =
                ExponentialBackoff::builder().build_with_max_retries(self.max_retries);
            client_builder =
                client_builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(CryptopayClient {
            http_client: client_builder.build(),
            base_url,
            credentials: Arc::new(credentials),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

impl Default for CryptopayClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
