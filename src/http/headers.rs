// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header normalization

use base64::Engine;

use super::request::RequestConfig;
use super::Headers;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const AUTHORIZATION: &str = "Authorization";
pub const USER_AGENT: &str = "User-Agent";

pub const APPLICATION_JSON: &str = "application/json";

/// Canonical spelling for a well-known header, if `name` is one
fn canonical_name(name: &str) -> Option<&'static str> {
    [CONTENT_TYPE, ACCEPT, AUTHORIZATION]
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(name))
}

/// Normalize request headers against the rest of the configuration.
///
/// Well-known names get canonical casing, a JSON content type is inferred
/// for bodies that are not multipart forms, and `auth` credentials become
/// a Basic `Authorization` header.
pub fn normalize_headers(headers: &Headers, config: &RequestConfig) -> Headers {
    let mut normalized = Headers::with_capacity(headers.len() + 2);

    for (name, value) in headers {
        let name = canonical_name(name).map(str::to_string).unwrap_or_else(|| name.clone());
        normalized.insert(name, value.clone());
    }

    if let Some(data) = config.data.as_ref().filter(|data| !data.is_empty()) {
        if !normalized.contains_key(CONTENT_TYPE) && !data.is_multipart() {
            normalized.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        }
    }

    if let Some(auth) = &config.auth {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", auth.username, auth.password));
        normalized.insert(AUTHORIZATION.to_string(), format!("Basic {}", encoded));
    }

    normalized
}
