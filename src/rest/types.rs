//! Request and response types for the Cryptopay REST API.
//!
//! Monetary amounts are decimal strings on the wire and map to [`Decimal`].
//! Fields the API may omit are optional; unknown fields are ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Success envelope: every 2xx response wraps its payload in `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// The payload
    pub data: T,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: serde_json::Value,
}

// Responses

/// Exchange rate for a currency pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    /// Currency pair (e.g., "BTC-EUR"); single-pair responses may omit it
    #[serde(default)]
    pub pair: Option<String>,
    /// Current rate
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
}

/// Merchant account balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID
    pub id: String,
    /// Account currency
    pub currency: String,
    /// Current balance
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    /// Owning project
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Account ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID
    pub id: String,
    /// Merchant reference
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Signed amount
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Transaction currency
    pub currency: String,
    /// Balance after the transaction
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub balance: Option<Decimal>,
    /// Fee charged
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub fee: Option<Decimal>,
    /// Fee currency
    #[serde(default)]
    pub fee_currency: Option<String>,
    /// ID of the originating resource
    #[serde(default)]
    pub reference_id: Option<String>,
    /// Kind of the originating resource
    #[serde(default)]
    pub reference_type: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Transaction status
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Payment channel: a static deposit address that converts incoming coins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel ID
    pub id: String,
    /// Channel status
    #[serde(default)]
    pub status: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Currency the customer pays in
    pub pay_currency: String,
    /// Currency credited to the merchant
    pub receiver_currency: String,
    /// Deposit address
    #[serde(default)]
    pub address: Option<String>,
    /// Payment URI (BIP21 style)
    #[serde(default)]
    pub uri: Option<String>,
    /// Merchant reference
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Owning project
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Incoming payment on a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPayment {
    /// Payment ID
    pub id: String,
    /// Channel the payment arrived on
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Payment status
    #[serde(default)]
    pub status: Option<String>,
    /// Merchant reference of the channel
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Amount paid
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub pay_amount: Option<Decimal>,
    /// Currency paid
    pub pay_currency: String,
    /// Amount credited
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub received_amount: Option<Decimal>,
    /// Currency credited
    #[serde(default)]
    pub received_currency: Option<String>,
    /// Fee charged
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub fee: Option<Decimal>,
    /// Fee currency
    #[serde(default)]
    pub fee_currency: Option<String>,
    /// Blockchain transaction hash
    #[serde(default)]
    pub txid: Option<String>,
    /// Deposit address
    #[serde(default)]
    pub address: Option<String>,
    /// Creation time (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Outbound coin withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinWithdrawal {
    /// Withdrawal ID, used to commit it
    pub id: String,
    /// Withdrawal status
    #[serde(default)]
    pub status: Option<String>,
    /// Merchant reference
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Destination address
    pub address: String,
    /// Amount debited from the account
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub charged_amount: Option<Decimal>,
    /// Currency debited
    pub charged_currency: String,
    /// Amount sent to the address
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub received_amount: Option<Decimal>,
    /// Currency sent
    pub received_currency: String,
    /// Fee charged
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub fee: Option<Decimal>,
    /// Fee currency
    #[serde(default)]
    pub fee_currency: Option<String>,
    /// Blockchain transaction hash, once broadcast
    #[serde(default)]
    pub txid: Option<String>,
    /// Creation time (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
}

// Requests

/// Parameters for creating a payment channel.
///
/// `name` and `description` are always sent, as empty strings when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateChannelParams {
    /// Currency the customer pays in
    pub pay_currency: String,
    /// Currency credited to the merchant
    pub receiver_currency: String,
    /// Merchant reference
    pub custom_id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
}

impl CreateChannelParams {
    /// Create channel parameters with empty name and description.
    pub fn new(
        pay_currency: impl Into<String>,
        receiver_currency: impl Into<String>,
        custom_id: impl Into<String>,
    ) -> Self {
        Self {
            pay_currency: pay_currency.into(),
            receiver_currency: receiver_currency.into(),
            custom_id: custom_id.into(),
            name: String::new(),
            description: String::new(),
        }
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Parameters for creating a coin withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCoinWithdrawalParams {
    /// Currency debited from the account
    pub charged_currency: String,
    /// Currency sent to the address
    pub received_currency: String,
    /// Amount to debit
    #[serde(with = "rust_decimal::serde::str")]
    pub charged_amount: Decimal,
    /// Destination address
    pub address: String,
    /// Merchant reference
    pub custom_id: String,
}

impl CreateCoinWithdrawalParams {
    /// Create coin withdrawal parameters.
    pub fn new(
        charged_currency: impl Into<String>,
        received_currency: impl Into<String>,
        charged_amount: Decimal,
        address: impl Into<String>,
        custom_id: impl Into<String>,
    ) -> Self {
        Self {
            charged_currency: charged_currency.into(),
            received_currency: received_currency.into(),
            charged_amount,
            address: address.into(),
            custom_id: custom_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_rates_envelope() {
        let body = json!({ "data": [{ "pair": "BTC-USD", "rate": "50000" }] });
        let envelope: Envelope<Vec<Rate>> = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].pair.as_deref(), Some("BTC-USD"));
        assert_eq!(envelope.data[0].rate, dec("50000"));
    }

    #[test]
    fn test_rate_without_pair() {
        let envelope: Envelope<Rate> =
            serde_json::from_value(json!({ "data": { "rate": "45000.12" } })).unwrap();
        assert!(envelope.data.pair.is_none());
        assert_eq!(envelope.data.rate, dec("45000.12"));
    }

    #[test]
    fn test_channel_params_default_empty_strings() {
        let params = CreateChannelParams::new("BTC", "EUR", "order-1");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "pay_currency": "BTC",
                "receiver_currency": "EUR",
                "custom_id": "order-1",
                "name": "",
                "description": ""
            })
        );
    }

    #[test]
    fn test_withdrawal_params_amount_as_string() {
        let params =
            CreateCoinWithdrawalParams::new("EUR", "BTC", dec("100.50"), "2N1addr", "payout-7");
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(
            json,
            r#"{"charged_currency":"EUR","received_currency":"BTC","charged_amount":"100.50","address":"2N1addr","custom_id":"payout-7"}"#
        );
    }

    #[test]
    fn test_coin_withdrawal_optional_fields() {
        let body = json!({
            "id": "cw_1",
            "status": "new",
            "address": "2N1addr",
            "charged_currency": "EUR",
            "received_currency": "BTC",
            "charged_amount": "100.50",
            "received_amount": null,
            "unexpected_field": 1
        });
        let withdrawal: CoinWithdrawal = serde_json::from_value(body).unwrap();
        assert_eq!(withdrawal.charged_amount, Some(dec("100.50")));
        assert!(withdrawal.received_amount.is_none());
        assert!(withdrawal.txid.is_none());
    }
}
