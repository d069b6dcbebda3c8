//! Caller identity resolution from request headers.
//!
//! Nothing here is verified cryptographically. The headers are trusted as-is,
//! and any header that fails to parse is treated as if it were absent.

use axum::http::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{RuntimeMode, DEV_USER_ID};

/// Structured identity header: a JSON object.
pub const STRUCTURED_HEADER: &str = "x-telegram-user";
/// Loose identity header: JSON, or `key=value` pairs joined by `&`.
pub const LOOSE_HEADER: &str = "x-dev-user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Caller {
    fn development() -> Self {
        Self {
            id: DEV_USER_ID,
            username: Some("devuser".into()),
            first_name: Some("Dev".into()),
            last_name: None,
        }
    }
}

/// Resolve the caller from request headers. First match wins:
/// structured header, loose header, development fallback.
pub fn resolve_identity(headers: &HeaderMap, runtime_mode: RuntimeMode) -> Option<Caller> {
    if let Some(fields) = header_str(headers, STRUCTURED_HEADER).and_then(parse_json_object) {
        if let Some(id) = numeric_id(&fields) {
            return Some(Caller {
                id,
                username: string_field(&fields, "username"),
                first_name: string_field(&fields, "first_name"),
                last_name: string_field(&fields, "last_name"),
            });
        }
    }

    if let Some(fields) = header_str(headers, LOOSE_HEADER).and_then(parse_loose) {
        if let Some(id) = numeric_id(&fields) {
            return Some(Caller {
                id,
                username: string_field(&fields, "username").or_else(|| Some("dev".into())),
                first_name: string_field(&fields, "first_name").or_else(|| Some("Dev".into())),
                last_name: string_field(&fields, "last_name"),
            });
        }
    }

    if !runtime_mode.is_production() {
        return Some(Caller::development());
    }

    None
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_json_object(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_loose(raw: &str) -> Option<Map<String, Value>> {
    if let Some(map) = parse_json_object(raw) {
        return Some(map);
    }

    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).ok()?;
    let map: Map<String, Value> = pairs
        .into_iter()
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Accepts a JSON integer or a numeric string. Zero counts as no id.
fn numeric_id(fields: &Map<String, Value>) -> Option<i64> {
    let id = match fields.get("id")? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (id != 0).then_some(id)
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
