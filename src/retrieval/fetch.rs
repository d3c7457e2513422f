//! Single-request citation count fetch and validation.

use serde_json::Value;

use super::RetrievalError;
use crate::apis::CitationApi;
use crate::utils::Transport;

/// GET `url`, hand the JSON body to `api`'s decoder and validate the result.
///
/// Transport failures and non-JSON bodies are [`RetrievalError::BadApiResponse`];
/// decoder failures and anything that is not a non-negative integer are
/// [`RetrievalError::NoCitationCount`]. There is exactly one attempt.
pub async fn fetch_count(
    transport: &dyn Transport,
    url: &str,
    api: &dyn CitationApi,
) -> Result<u64, RetrievalError> {
    let response = transport.get_json(url).await.map_err(|e| {
        tracing::debug!("{} request failed: {}", api.name(), e);
        RetrievalError::BadApiResponse
    })?;

    let raw = api.decode(response).await.map_err(|e| {
        tracing::debug!("{} decoder failed: {}", api.name(), e);
        RetrievalError::NoCitationCount
    })?;

    coerce_count(&raw).ok_or_else(|| {
        tracing::debug!("{} returned an invalid citation count: {}", api.name(), raw);
        RetrievalError::NoCitationCount
    })
}

/// Interpret a decoded value as a citation count.
///
/// Accepts non-negative integers, non-negative finite numbers (truncated) and
/// strings that start with an integer (`"42"`, `" 42 citations"`).
pub fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Some(v);
            }
            if n.as_i64().is_some() {
                // Representable as i64 but not u64: negative
                return None;
            }
            let v = n.as_f64()?.trunc();
            // -0.5 truncates to -0.0, which counts as zero
            if !v.is_finite() || v < 0.0 || v > u64::MAX as f64 {
                return None;
            }
            Some(v as u64)
        }
        Value::String(s) => parse_leading_integer(s),
        _ => None,
    }
}

fn parse_leading_integer(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let value: u64 = rest[..digits_end].parse().ok()?;
    if negative && value != 0 {
        return None;
    }
    Some(value)
}
