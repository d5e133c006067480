// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Small pure helpers: URL joining, query strings, deep merge

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Join a base URL and a path with exactly one `/` between them.
///
/// An empty base yields the path unchanged and an empty path yields the
/// base unchanged.
pub fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }

    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.strip_prefix('/').unwrap_or(path);

    format!("{}/{}", base, path)
}

/// Serialize a parameter mapping into a query string.
///
/// Arrays expand into repeated `key=value` pairs, `null` values are
/// dropped, and pairs keep the mapping's insertion order.
pub fn build_query(params: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();

    for (key, value) in params {
        let key = urlencoding::encode(key);
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    pairs.push(format!("{}={}", key, urlencoding::encode(&query_value(item))));
                }
            }
            other => pairs.push(format!("{}={}", key, urlencoding::encode(&query_value(other)))),
        }
    }

    pairs.join("&")
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Recursively merge `source` into `target`.
///
/// Objects merge key by key with `source` winning on leaves. Every other
/// value, arrays included, replaces the target wholesale.
pub fn merge_deep(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_maps(target, source),
        (target, source) => *target = source.clone(),
    }
}

/// Object-level variant of [`merge_deep`]
pub fn merge_maps(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        if let Some(existing) = target.get_mut(key) {
            if existing.is_object() && value.is_object() {
                merge_deep(existing, value);
                continue;
            }
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Parse a raw `Name: value` header block into a lower-cased mapping
pub fn parse_headers(raw: &str) -> IndexMap<String, String> {
    raw.split("\r\n")
        .filter_map(|line| line.split_once(": "))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .map(|(name, value)| (name.to_lowercase(), value.to_string()))
        .collect()
}
