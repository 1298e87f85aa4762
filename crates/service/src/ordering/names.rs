//! Display-name collision handling.
//!
//! Names compare by [`name_key`] (NFKC, trimmed, whitespace collapsed, lowercased) while the
//! stored spelling keeps its casing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use unicode_normalization::UnicodeNormalization;

use super::errors::OrderingError;

/// NFKC-normalize, trim and collapse internal whitespace runs to one space.
pub fn normalize_name(raw: &str) -> String {
    let composed: String = raw.nfkc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key backing the case-insensitive unique index.
pub fn name_key(raw: &str) -> String {
    normalize_name(raw).to_lowercase()
}

/// Pick a name unused among `existing`, suffixing ` (n)` for the smallest free `n` in `2..=limit`.
pub fn resolve_name<I, S>(desired: &str, existing: I, limit: u32) -> Result<String, OrderingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve_name_at(desired, existing, limit, Utc::now())
}

/// As [`resolve_name`], with the clock used for the final timestamp suffix supplied by the caller.
pub fn resolve_name_at<I, S>(desired: &str, existing: I, limit: u32, now: DateTime<Utc>) -> Result<String, OrderingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let base = normalize_name(desired);
    if base.is_empty() {
        return Err(OrderingError::InvalidInput("name must not be empty".into()));
    }
    // key -> stored spelling
    let taken: HashMap<String, String> = existing
        .into_iter()
        .map(|s| (name_key(s.as_ref()), normalize_name(s.as_ref())))
        .collect();

    let base_key = base.to_lowercase();
    let Some(holder) = taken.get(&base_key) else {
        return Ok(base);
    };
    // Suffixes follow the spelling already stored so a family of names stays consistent.
    let stem = holder.clone();
    for n in 2..=limit {
        let candidate = format!("{stem} ({n})");
        if !taken.contains_key(&candidate.to_lowercase()) {
            return Ok(candidate);
        }
    }
    Ok(format!("{stem} ({})", now.timestamp_millis()))
}
