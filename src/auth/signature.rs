//! HMAC-SHA1 request signing for the Cryptopay API.
//!
//! Every request carries a signature computed over a canonical string:
//!
//! ```text
//! METHOD \n MD5_HEX(body) \n application/json \n DATE \n PATH
//! ```
//!
//! The string is signed with HMAC-SHA1 keyed by the API secret and the raw
//! digest is base64-encoded. It is sent as `Authorization: HMAC <key>:<sig>`
//! together with the exact `Date` value that was signed.
//!
//! An absent body, JSON `null` and `{}` all hash as the empty string.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use serde::Serialize;
use sha1::Sha1;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::auth::{Clock, Credentials};
use crate::error::CryptopayError;

type HmacSha1 = Hmac<Sha1>;

/// Content type covered by every signature.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// RFC 7231 IMF-fixdate, e.g. `Tue, 15 Nov 1994 08:12:31 GMT`.
const HTTP_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Serialize a request body into the exact content that is signed and sent.
///
/// `None`, `null` and an empty object produce an empty string.
pub fn encode_body<B>(body: Option<&B>) -> Result<String, CryptopayError>
where
    B: Serialize + ?Sized,
{
    let Some(body) = body else {
        return Ok(String::new());
    };

    let content = serde_json::to_string(body)?;
    if content == "{}" || content == "null" {
        Ok(String::new())
    } else {
        Ok(content)
    }
}

/// Lowercase hex MD5 digest of the request content.
pub fn content_md5(content: &str) -> String {
    format!("{:x}", Md5::digest(content.as_bytes()))
}

/// Format an instant as an RFC 7231 HTTP date in GMT.
pub fn http_date(instant: OffsetDateTime) -> Result<String, CryptopayError> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(HTTP_DATE)
        .map_err(|e| CryptopayError::Auth(format!("Failed to format request date: {e}")))
}

/// Build the newline-joined string that gets signed.
pub fn canonical_string(method: &str, content_md5: &str, date: &str, path: &str) -> String {
    [
        method.to_ascii_uppercase().as_str(),
        content_md5,
        CONTENT_TYPE_JSON,
        date,
        path,
    ]
    .join("\n")
}

/// Sign a request for the Cryptopay API.
///
/// # Arguments
///
/// * `credentials` - API credentials containing the secret
/// * `method` - HTTP method (case-insensitive)
/// * `path` - The endpoint path including the leading slash (e.g., "/api/rates")
/// * `content` - The encoded body, see [`encode_body`]
/// * `date` - The HTTP date that is also sent in the `Date` header
///
/// # Returns
///
/// Base64-encoded HMAC-SHA1 signature.
///
/// # Example
///
/// ```rust
/// use cryptopay_client::auth::{Credentials, sign_request};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "test_secret")?;
/// let signature = sign_request(
///     &credentials,
///     "GET",
///     "/api/rates",
///     "",
///     "Tue, 15 Nov 1994 08:12:31 GMT",
/// )?;
/// assert_eq!(signature, "2bACdiZvhx/xcMzGHzuYfp6jyGc=");
/// # Ok(())
/// # }
/// ```
pub fn sign_request(
    credentials: &Credentials,
    method: &str,
    path: &str,
    content: &str,
    date: &str,
) -> Result<String, CryptopayError> {
    let canonical = canonical_string(method, &content_md5(content), date, path);

    let mut hmac = HmacSha1::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| CryptopayError::Auth(format!("Invalid HMAC key: {e}")))?;
    hmac.update(canonical.as_bytes());

    Ok(BASE64.encode(hmac.finalize().into_bytes()))
}

/// A signature together with the date it was computed for.
///
/// Computed fresh for every call and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Base64 HMAC-SHA1 signature
    pub signature: String,
    /// HTTP date embedded in the signature, sent as the `Date` header
    pub date: String,
}

impl SignedRequest {
    /// Sign `content` for `method` and `path`, reading the clock once.
    pub fn new(
        credentials: &Credentials,
        clock: &dyn Clock,
        method: &str,
        path: &str,
        content: &str,
    ) -> Result<Self, CryptopayError> {
        let date = http_date(clock.now())?;
        let signature = sign_request(credentials, method, path, content, &date)?;
        tracing::debug!(method, path, date = %date, "signed request");
        Ok(Self { signature, date })
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self, api_key: &str) -> String {
        format!("HMAC {}:{}", api_key, self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    const DATE: &str = "Tue, 15 Nov 1994 08:12:31 GMT";
    const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

    struct FixedClock(OffsetDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> OffsetDateTime {
            self.0
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("test_key", "test_secret").unwrap()
    }

    #[test]
    fn test_empty_bodies_encode_to_empty_content() {
        assert_eq!(encode_body::<serde_json::Value>(None).unwrap(), "");
        assert_eq!(encode_body(Some(&json!({}))).unwrap(), "");
        assert_eq!(encode_body(Some(&json!(null))).unwrap(), "");

        #[derive(Serialize)]
        struct Empty {}
        assert_eq!(encode_body(Some(&Empty {})).unwrap(), "");
    }

    #[test]
    fn test_empty_body_hashes_as_empty_string() {
        let content = encode_body(Some(&json!({}))).unwrap();
        assert_eq!(content_md5(&content), EMPTY_MD5);
        assert_ne!(content_md5("{}"), EMPTY_MD5);
    }

    #[test]
    fn test_non_empty_body_is_compact_json() {
        let content = encode_body(Some(&json!({ "custom_id": "order-1" }))).unwrap();
        assert_eq!(content, r#"{"custom_id":"order-1"}"#);
    }

    #[test]
    fn test_http_date_format() {
        let date = http_date(datetime!(1994-11-15 08:12:31 UTC)).unwrap();
        assert_eq!(date, DATE);
    }

    #[test]
    fn test_http_date_pads_day_and_converts_offset() {
        let date = http_date(datetime!(2024-03-05 02:04:09 +2)).unwrap();
        assert_eq!(date, "Tue, 05 Mar 2024 00:04:09 GMT");
    }

    #[test]
    fn test_canonical_string_layout() {
        let canonical = canonical_string("get", EMPTY_MD5, DATE, "/api/rates");
        assert_eq!(
            canonical,
            format!("GET\n{EMPTY_MD5}\napplication/json\n{DATE}\n/api/rates")
        );
    }

    #[test]
    fn test_signature_known_answer_get() {
        let signature = sign_request(&credentials(), "GET", "/api/rates", "", DATE).unwrap();
        assert_eq!(signature, "2bACdiZvhx/xcMzGHzuYfp6jyGc=");
    }

    #[test]
    fn test_signature_known_answer_post() {
        let content = r#"{"pay_currency":"BTC","receiver_currency":"EUR","custom_id":"order-1","name":"","description":""}"#;
        assert_eq!(content_md5(content), "445f163a7ecd0804b9c06f829daa1c11");

        let signature = sign_request(&credentials(), "POST", "/api/channels", content, DATE).unwrap();
        assert_eq!(signature, "9xYNg2RCGcl26Fa004ahL20+LDY=");
    }

    #[test]
    fn test_signature_consistency() {
        let sig1 = sign_request(&credentials(), "POST", "/api/channels", "{}", DATE).unwrap();
        let sig2 = sign_request(&credentials(), "POST", "/api/channels", "{}", DATE).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_signature_changes_with_inputs() {
        let creds = credentials();
        let base = sign_request(&creds, "GET", "/api/rates", "", DATE).unwrap();

        let other_path = sign_request(&creds, "GET", "/api/accounts", "", DATE).unwrap();
        let other_method = sign_request(&creds, "POST", "/api/rates", "", DATE).unwrap();
        let other_date =
            sign_request(&creds, "GET", "/api/rates", "", "Wed, 16 Nov 1994 08:12:31 GMT").unwrap();
        let other_secret = sign_request(
            &Credentials::new("test_key", "other_secret").unwrap(),
            "GET",
            "/api/rates",
            "",
            DATE,
        )
        .unwrap();

        assert_ne!(base, other_path);
        assert_ne!(base, other_method);
        assert_ne!(base, other_date);
        assert_ne!(base, other_secret);
    }

    #[test]
    fn test_signed_request_uses_one_instant() {
        let clock = FixedClock(datetime!(1994-11-15 08:12:31 UTC));
        let signed =
            SignedRequest::new(&credentials(), &clock, "GET", "/api/rates", "").unwrap();

        assert_eq!(signed.date, DATE);
        assert_eq!(
            signed.signature,
            sign_request(&credentials(), "GET", "/api/rates", "", &signed.date).unwrap()
        );
        assert_eq!(
            signed.authorization("test_key"),
            "HMAC test_key:2bACdiZvhx/xcMzGHzuYfp6jyGc="
        );
    }
}
