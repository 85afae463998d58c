//! Blocking wrapper around the async client
//!
//! Each call fully blocks the calling thread on a crate-owned
//! current-thread runtime. Signing and URL construction are shared with
//! [`ComlinkClient`]; only the transport call differs.

use crate::auth::Credentials;
use crate::http::ComlinkClient;
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

/// Blocking HTTP client for a comlink instance
///
/// Prefer [`ComlinkClient`] in async contexts.
#[derive(Debug)]
pub struct BlockingComlinkClient {
    inner: ComlinkClient,
    runtime: Runtime,
}

impl BlockingComlinkClient {
    /// Create a new blocking client for the comlink instance at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_client(ComlinkClient::new(base_url)?)
    }

    /// Wrap an already-configured async client
    pub fn from_client(inner: ComlinkClient) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    /// Set the base URL of the companion stats service
    pub fn with_stats_url(mut self, stats_url: &str) -> Result<Self> {
        self.inner = self.inner.with_stats_url(stats_url)?;
        Ok(self)
    }

    /// Set the HMAC credential pair
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.inner = self.inner.with_credentials(credentials);
        self
    }

    /// Read the HMAC credential pair from `ACCESS_KEY` and `SECRET_KEY`
    pub fn with_credentials_from_env(mut self) -> Result<Self> {
        self.inner = self.inner.with_credentials_from_env()?;
        Ok(self)
    }

    /// POST a payload to a comlink endpoint and return the JSON response
    pub fn post<P: Serialize + ?Sized>(&self, endpoint: &str, payload: &P) -> Result<Value> {
        self.runtime.block_on(self.inner.post(endpoint, payload))
    }

    /// POST a payload to a stats service endpoint and return the JSON
    /// response
    pub fn post_stats<P: Serialize + ?Sized>(&self, endpoint: &str, payload: &P) -> Result<Value> {
        self.runtime
            .block_on(self.inner.post_stats(endpoint, payload))
    }

    /// Calculate unit stats for a roster via the stats service
    pub fn compute_unit_stats(
        &self,
        roster: &[Value],
        flags: &[&str],
        language: Option<&str>,
    ) -> Result<Value> {
        self.runtime
            .block_on(self.inner.compute_unit_stats(roster, flags, language))
    }
}
