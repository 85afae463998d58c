//! HTTP client for the swgoh-comlink proxy service
//!
//! Comlink fronts the game's backend servers with a JSON-over-HTTP
//! interface. This crate builds the requests, signs them with HMAC-SHA256
//! when the instance requires it, and returns the raw JSON responses.
//! [`ComlinkClient`] is the async interface; [`BlockingComlinkClient`]
//! wraps it for synchronous callers.
//!
//! Diagnostics are emitted through `tracing` and are dropped unless the
//! caller installs a subscriber.

pub mod auth;
pub mod blocking;
pub mod error;
pub mod http;
pub mod params;
pub mod stats;

pub use auth::{Credentials, SignedHeaders, now_ms, sign_request};
pub use blocking::BlockingComlinkClient;
pub use error::{Error, Result};
pub use http::{ComlinkClient, DEFAULT_BASE_URL, DEFAULT_STATS_URL};
pub use params::{
    PlayerIdentifier, canonicalize, player_payload, sanitize_ally_code, unit_stats_query_string,
};
pub use stats::merge_unit_stats;
