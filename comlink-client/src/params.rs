//! Payload construction and parameter normalization
//!
//! The comlink service accumulated several historical spellings for the
//! same logical payload fields. Normalization is a fixed lookup table
//! applied before a request is constructed, so every request leaves with
//! the canonical field names.

use crate::{Error, Result};
use serde_json::{Map, Value, json};

/// Historical field spellings mapped to their canonical payload names
///
/// Canonical names win on conflict; an alias never overwrites a field the
/// caller already supplied under its canonical name.
pub const ALIASES: &[(&str, &str)] = &[
    ("includeRecent", "includeRecentGuildActivityInfo"),
    ("include_recent_guild_activity_info", "includeRecentGuildActivityInfo"),
    ("roster_list", "requestPayload"),
    ("units_list", "requestPayload"),
    ("player_details_only", "playerDetailsOnly"),
];

/// Rewrite aliased payload fields to their canonical names in place
pub fn canonicalize(payload: &mut Map<String, Value>) {
    for (alias, canonical) in ALIASES {
        if let Some(value) = payload.remove(*alias) {
            payload.entry((*canonical).to_string()).or_insert(value);
        }
    }
}

/// Identifier for a player record
///
/// The player endpoints accept exactly one of an ally code or an internal
/// player ID; the type makes supplying both unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerIdentifier {
    /// Nine-digit ally code, with or without dashes
    AllyCode(String),
    /// Opaque player ID from the game backend
    PlayerId(String),
}

/// Normalize an ally code: strip dashes, require exactly nine digits
pub fn sanitize_ally_code(allycode: &str) -> Result<String> {
    let cleaned = allycode.replace('-', "");
    if cleaned.len() != 9 || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_ally_code(allycode));
    }
    Ok(cleaned)
}

/// Build the payload object for the player endpoints
pub fn player_payload(identifier: &PlayerIdentifier, enums: bool) -> Result<Value> {
    let payload = match identifier {
        PlayerIdentifier::AllyCode(allycode) => {
            json!({ "allyCode": sanitize_ally_code(allycode)? })
        }
        PlayerIdentifier::PlayerId(player_id) => json!({ "playerId": player_id }),
    };
    Ok(json!({ "payload": payload, "enums": enums }))
}

/// Build the query string for the stats service `api` endpoint
///
/// Returns `None` when neither flags nor a language are given.
pub fn unit_stats_query_string(flags: &[&str], language: Option<&str>) -> Option<String> {
    let flag_part = (!flags.is_empty()).then(|| format!("flags={}", flags.join(",")));
    let language_part = language.map(|language| format!("language={language}"));

    let joined = [flag_part, language_part]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("&");

    (!joined.is_empty()).then(|| format!("?{joined}"))
}
