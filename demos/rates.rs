//! Print exchange rates and account balances.
//!
//! Reads `CRYPTOPAY_API_KEY`, `CRYPTOPAY_API_SECRET` and `CRYPTOPAY_SANDBOX`
//! from the environment or a `.env` file.
//!
//! ```sh
//! RUST_LOG=cryptopay_client=debug cargo run --example rates
//! ```

use cryptopay_client::auth::EnvCredentials;
use cryptopay_client::rest::CryptopayClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let credentials = EnvCredentials::try_from_env()
        .ok_or("CRYPTOPAY_API_KEY and CRYPTOPAY_API_SECRET must be set")?;
    let client = CryptopayClient::builder()
        .credentials(credentials)
        .sandbox(EnvCredentials::sandbox_from_env())
        .build()?;

    for rate in client.list_rates().await? {
        println!("{}: {}", rate.pair.as_deref().unwrap_or("?"), rate.rate);
    }

    for account in client.list_accounts().await? {
        println!("{} {} ({})", account.balance, account.currency, account.id);
    }

    Ok(())
}
