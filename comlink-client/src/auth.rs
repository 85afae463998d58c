//! HMAC-SHA256 request signing for the comlink service
//!
//! When a comlink instance is started with an access key and secret key,
//! every request must carry an `X-Date` header with the request timestamp
//! and an `Authorization` header with an HMAC-SHA256 signature over the
//! timestamp, HTTP method, endpoint path, and an MD5 digest of the request
//! body. The server recomputes the signature independently, so the bytes
//! entering the HMAC here must match what is transmitted exactly.

use crate::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Environment variable holding the HMAC access key
pub const ACCESS_KEY_ENV: &str = "ACCESS_KEY";

/// Environment variable holding the HMAC secret key
pub const SECRET_KEY_ENV: &str = "SECRET_KEY";

/// Header carrying the request timestamp in milliseconds
pub const X_DATE_HEADER: &str = "X-Date";

/// Header carrying the access key and signature
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// HMAC credential pair for a secured comlink instance
///
/// Immutable once constructed. The secret key is redacted from `Debug`
/// output and must never be logged.
#[derive(Clone)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Create a credential pair from an access key and secret key
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read credentials from the `ACCESS_KEY` and `SECRET_KEY` environment
    /// variables
    ///
    /// Returns `Ok(None)` when neither variable is set. Setting only one of
    /// the two is a configuration error.
    pub fn from_env() -> Result<Option<Self>> {
        let access_key = std::env::var(ACCESS_KEY_ENV).ok();
        let secret_key = std::env::var(SECRET_KEY_ENV).ok();

        match (access_key, secret_key) {
            (Some(access), Some(secret)) => Ok(Some(Self::new(access, secret))),
            (Some(_), None) => Err(Error::missing_credential("secret_key")),
            (None, Some(_)) => Err(Error::missing_credential("access_key")),
            (None, None) => Ok(None),
        }
    }

    /// Get the public access key
    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

/// Signature headers for one signed request
///
/// The timestamp embedded in `x_date` is the same string that entered the
/// HMAC computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Value for the `X-Date` header
    pub x_date: String,
    /// Value for the `Authorization` header
    pub authorization: String,
}

/// Current wall-clock time as milliseconds since the Unix epoch
pub fn now_ms() -> Result<u128> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .map_err(|e| Error::signing(format!("system clock before Unix epoch: {e}")))
}

/// Sign one request, producing the `X-Date` and `Authorization` headers
///
/// `endpoint` is the path relative to the base URL without a leading slash,
/// including any query string (the query participates in signing). `body`
/// must be the exact JSON bytes that will be transmitted.
pub fn sign_request(
    credentials: &Credentials,
    endpoint: &str,
    body: &[u8],
    timestamp_ms: u128,
) -> Result<SignedHeaders> {
    let timestamp = timestamp_ms.to_string();
    let payload_digest = hex::encode(md5::compute(body).0);

    let mut mac = HmacSha256::new_from_slice(credentials.secret_key.as_bytes())
        .map_err(|e| Error::signing(e.to_string()))?;
    let path = format!("/{endpoint}");
    for value in [
        timestamp.as_str(),
        "POST",
        path.as_str(),
        payload_digest.as_str(),
    ] {
        mac.update(value.as_bytes());
    }
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(SignedHeaders {
        x_date: timestamp,
        authorization: format!(
            "HMAC-SHA256 Credential={},Signature={}",
            credentials.access_key, signature
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: u128 = 1_700_000_000_000;

    #[test]
    fn test_known_answer_player_payload() {
        // Reference value computed against the comlink server's own
        // signature check for this exact byte sequence.
        let credentials = Credentials::new("test-access", "test-secret");
        let body = br#"{"enums":false,"payload":{"allyCode":"123456789"}}"#;

        let headers = sign_request(&credentials, "player", body, TIMESTAMP).unwrap();

        assert_eq!(headers.x_date, "1700000000000");
        assert_eq!(
            headers.authorization,
            "HMAC-SHA256 Credential=test-access,Signature=\
             9a80eac6b791746d45a9c87385ce6d7411f1110be7e6d762e6895f5c812dc0d2"
        );
    }

    #[test]
    fn test_known_answer_empty_body() {
        let credentials = Credentials::new("test-access", "test-secret");

        let headers = sign_request(&credentials, "metadata", b"{}", TIMESTAMP).unwrap();

        assert_eq!(
            headers.authorization,
            "HMAC-SHA256 Credential=test-access,Signature=\
             1c7a51d7873531ea74c1a38d68640371c018d6aa816ce29f1506f7853a3249fe"
        );
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let body = br#"{"enums":false,"payload":{"allyCode":"123456789"}}"#;

        let first = sign_request(
            &Credentials::new("test-access", "test-secret"),
            "player",
            body,
            TIMESTAMP,
        )
        .unwrap();
        let second = sign_request(
            &Credentials::new("test-access", "another-secret"),
            "player",
            body,
            TIMESTAMP,
        )
        .unwrap();

        assert_ne!(first.authorization, second.authorization);
        assert!(second.authorization.ends_with(
            "8ceb5eefee0aa81ec872c74664e1f8c2b4da796008d54a2e1f3e4b8d68843f55"
        ));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let credentials = Credentials::new("key", "secret");
        let body = br#"{"payload":{}}"#;

        let first = sign_request(&credentials, "data", body, TIMESTAMP).unwrap();
        let second = sign_request(&credentials, "data", body, TIMESTAMP).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_signature_sensitive_to_body_changes() {
        let credentials = Credentials::new("key", "secret");

        let first = sign_request(&credentials, "data", br#"{"a":1}"#, TIMESTAMP).unwrap();
        let second = sign_request(&credentials, "data", br#"{"a":2}"#, TIMESTAMP).unwrap();

        assert_ne!(first.authorization, second.authorization);
    }

    #[test]
    fn test_signature_sensitive_to_endpoint() {
        let credentials = Credentials::new("key", "secret");

        let first = sign_request(&credentials, "player", b"{}", TIMESTAMP).unwrap();
        let second = sign_request(&credentials, "guild", b"{}", TIMESTAMP).unwrap();

        assert_ne!(first.authorization, second.authorization);
    }

    #[test]
    fn test_query_string_participates_in_signing() {
        let credentials = Credentials::new("key", "secret");

        let bare = sign_request(&credentials, "api", b"[]", TIMESTAMP).unwrap();
        let with_query =
            sign_request(&credentials, "api?flags=gameStyle", b"[]", TIMESTAMP).unwrap();

        assert_ne!(bare.authorization, with_query.authorization);
    }

    // Single test walks through every environment combination so the
    // process environment is never mutated from two tests at once.
    #[test]
    fn test_from_env_credential_combinations() {
        unsafe {
            std::env::set_var(ACCESS_KEY_ENV, "env-access");
            std::env::remove_var(SECRET_KEY_ENV);
        }
        assert!(matches!(
            Credentials::from_env(),
            Err(Error::MissingCredential {
                field: "secret_key"
            })
        ));

        unsafe {
            std::env::remove_var(ACCESS_KEY_ENV);
            std::env::set_var(SECRET_KEY_ENV, "env-secret");
        }
        assert!(matches!(
            Credentials::from_env(),
            Err(Error::MissingCredential {
                field: "access_key"
            })
        ));

        unsafe {
            std::env::set_var(ACCESS_KEY_ENV, "env-access");
        }
        let credentials = Credentials::from_env().unwrap().unwrap();
        assert_eq!(credentials.access_key(), "env-access");

        unsafe {
            std::env::remove_var(ACCESS_KEY_ENV);
            std::env::remove_var(SECRET_KEY_ENV);
        }
        assert!(Credentials::from_env().unwrap().is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::new("public-id", "very-secret");
        let output = format!("{credentials:?}");

        assert!(output.contains("public-id"));
        assert!(!output.contains("very-secret"));
        assert!(output.contains("<redacted>"));
    }
}
