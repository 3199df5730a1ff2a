//! REST API endpoint constants.

/// Base URL for the Cryptopay production API.
pub const CRYPTOPAY_BASE_URL: &str = "https://business.cryptopay.me";

/// Base URL for the Cryptopay sandbox API.
pub const CRYPTOPAY_SANDBOX_URL: &str = "https://business-sandbox.cryptopay.me";

/// List all exchange rates.
pub const RATES: &str = "/api/rates";

/// List account balances.
pub const ACCOUNTS: &str = "/api/accounts";

/// Create or list payment channels.
pub const CHANNELS: &str = "/api/channels";

/// Create a coin withdrawal.
pub const COIN_WITHDRAWALS: &str = "/api/coin_withdrawals";

// Path parameters are inserted as given.

/// Rate for a single currency pair (e.g. `BTC-EUR`).
pub fn pair_rate(pair: &str) -> String {
    format!("{RATES}/{pair}")
}

/// Transactions of one account.
pub fn account_transactions(account_id: &str) -> String {
    format!("{ACCOUNTS}/{account_id}/transactions")
}

/// Payments received by one channel.
pub fn channel_payments(channel_id: &str) -> String {
    format!("{CHANNELS}/{channel_id}/payments")
}

/// Commit a previously created coin withdrawal.
pub fn commit_coin_withdrawal(payment_id: &str) -> String {
    format!("{COIN_WITHDRAWALS}/{payment_id}/commit")
}
