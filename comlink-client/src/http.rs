//! HTTP client for the comlink service
//!
//! All game-data endpoints are JSON-over-POST against a configurable base
//! URL. A second base URL points at the companion stats service, which
//! shares the same dispatch and signing path.

use crate::auth::{self, Credentials};
use crate::params;
use crate::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

/// Default URL of the comlink service
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default URL of the companion stats service
pub const DEFAULT_STATS_URL: &str = "http://localhost:3223";

/// Async HTTP client for a comlink instance
///
/// The client owns a pooled `reqwest` connection resource for its lifetime.
/// Requests may be issued concurrently; each in-flight request is an
/// independently cancellable future. The credential pair is fixed at
/// construction and is the only state shared between requests.
#[derive(Debug, Clone)]
pub struct ComlinkClient {
    client: Client,
    base_url: String,
    stats_url: String,
    credentials: Option<Credentials>,
}

impl ComlinkClient {
    /// Create a new client for the comlink instance at `base_url`
    ///
    /// The stats URL defaults to [`DEFAULT_STATS_URL`]; no credentials are
    /// configured, so requests are sent unsigned.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: validate_base_url(base_url)?,
            stats_url: validate_base_url(DEFAULT_STATS_URL)?,
            credentials: None,
        })
    }

    /// Create a client with a custom reqwest client
    ///
    /// Useful for callers that need transport-level settings (timeouts,
    /// proxies) beyond the defaults.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the base URL of the companion stats service
    pub fn with_stats_url(mut self, stats_url: &str) -> Result<Self> {
        self.stats_url = validate_base_url(stats_url)?;
        Ok(self)
    }

    /// Set the HMAC credential pair
    ///
    /// Every subsequent request is signed. Credentials are immutable for
    /// the client's lifetime.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Read the HMAC credential pair from `ACCESS_KEY` and `SECRET_KEY`
    ///
    /// Leaves the client unsigned when neither variable is set. Setting
    /// only one of the two is a configuration error.
    pub fn with_credentials_from_env(mut self) -> Result<Self> {
        self.credentials = Credentials::from_env()?;
        Ok(self)
    }

    /// Get the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured stats service URL
    pub fn stats_url(&self) -> &str {
        &self.stats_url
    }

    /// Whether requests are HMAC signed
    pub fn is_signed(&self) -> bool {
        self.credentials.is_some()
    }

    /// POST a payload to a comlink endpoint and return the JSON response
    pub async fn post<P: Serialize + ?Sized>(&self, endpoint: &str, payload: &P) -> Result<Value> {
        self.dispatch(&self.base_url, endpoint, payload).await
    }

    /// POST a payload to a stats service endpoint and return the JSON
    /// response
    pub async fn post_stats<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &P,
    ) -> Result<Value> {
        self.dispatch(&self.stats_url, endpoint, payload).await
    }

    /// Calculate unit stats for a roster via the stats service
    ///
    /// `flags` and `language` become the `?flags=...&language=...` query
    /// string of the stats `api` endpoint. The query string participates
    /// in request signing.
    pub async fn compute_unit_stats(
        &self,
        roster: &[Value],
        flags: &[&str],
        language: Option<&str>,
    ) -> Result<Value> {
        let endpoint = match params::unit_stats_query_string(flags, language) {
            Some(query) => format!("api{query}"),
            None => "api".to_string(),
        };
        self.post_stats(&endpoint, roster).await
    }

    async fn dispatch<P: Serialize + ?Sized>(
        &self,
        base_url: &str,
        endpoint: &str,
        payload: &P,
    ) -> Result<Value> {
        // Serialized once so the signed bytes and the transmitted bytes
        // cannot diverge.
        let body = serde_json::to_vec(payload)?;
        let url = format!("{base_url}/{endpoint}");

        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(credentials) = &self.credentials {
            let signed = auth::sign_request(credentials, endpoint, &body, auth::now_ms()?)?;
            request = request
                .header(auth::X_DATE_HEADER, signed.x_date)
                .header(auth::AUTHORIZATION_HEADER, signed.authorization);
        }

        debug!("POST {url}");
        let response = request.body(body).send().await?;
        let status = response.status();
        trace!("Response status: {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Request to {endpoint} failed with status {status}");
            return Err(Error::server(status.as_u16(), body));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Parse and normalize a base URL, trimming any trailing slash
fn validate_base_url(base_url: &str) -> Result<String> {
    Url::parse(base_url)?;
    Ok(base_url.trim_end_matches('/').to_string())
}
