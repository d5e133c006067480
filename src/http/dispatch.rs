// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport adapter: the one place a request hits the network
//!
//! Builds the final URL, arms the deadline, serializes the body, parses
//! the response by `response_type` and folds every failure into exactly
//! one of `Http`, `Network` or `Timeout`.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::request::{Body, RequestConfig, ResponseType};
use super::response::{Response, ResponseData, ResponseSnapshot};
use super::transport::{Transport, TransportBody, TransportFailure, TransportRequest};
use crate::error::{Error, Result};
use crate::util::{build_query, join_url};

/// Message carried by every deadline failure
pub const TIMEOUT_MESSAGE: &str = "Request timeout";

/// Cancels a token once the deadline passes; disarmed on drop
struct DeadlineTimer {
    handle: JoinHandle<()>,
}

impl DeadlineTimer {
    fn arm(token: &CancellationToken, timeout: Duration) -> Self {
        let token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            token.cancel();
        });
        Self { handle }
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Final URL: base and path joined, plus the query string if any
pub fn build_url(config: &RequestConfig) -> String {
    let mut url = join_url(
        config.base_url.as_deref().unwrap_or_default(),
        config.url.as_deref().unwrap_or_default(),
    );

    let query = build_query(&config.params);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    url
}

fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

fn encode_body(method: &Method, data: Option<&Body>) -> Result<Option<TransportBody>> {
    let Some(data) = data.filter(|data| !data.is_empty()) else {
        return Ok(None);
    };
    if !carries_body(method) {
        return Ok(None);
    }

    let body = match data {
        Body::Text(text) => TransportBody::Text(text.clone()),
        Body::Json(value) => TransportBody::Text(serde_json::to_string(value)?),
        Body::Form(form) => TransportBody::Multipart(form.clone()),
    };
    Ok(Some(body))
}

fn parse_body(response_type: ResponseType, body: Bytes) -> ResponseData {
    match response_type {
        ResponseType::Json => ResponseData::Json(serde_json::from_slice(&body).unwrap_or(Value::Null)),
        ResponseType::Text => ResponseData::Text(String::from_utf8_lossy(&body).into_owned()),
        ResponseType::Blob | ResponseType::ArrayBuffer => ResponseData::Binary(body),
    }
}

fn classify(failure: TransportFailure) -> Error {
    match failure {
        TransportFailure::Cancelled => Error::timeout(TIMEOUT_MESSAGE),
        TransportFailure::Other(message) => Error::network(message),
    }
}

/// Execute `config` against `transport`.
///
/// A caller-supplied `signal` replaces the internal deadline entirely: the
/// timer is only armed when no signal is given and the timeout is non-zero.
pub async fn dispatch(transport: &dyn Transport, config: RequestConfig) -> Result<Response> {
    let url = build_url(&config);
    let method = config.effective_method();
    let timeout = config.effective_timeout();

    let (cancellation, _timer) = match &config.signal {
        Some(signal) => (signal.clone(), None),
        None => {
            let token = CancellationToken::new();
            let timer = (!timeout.is_zero()).then(|| DeadlineTimer::arm(&token, timeout));
            (token, timer)
        }
    };

    let body = encode_body(&method, config.data.as_ref())?;

    tracing::debug!(
        method = %method,
        url = %url,
        timeout_ms = timeout.as_millis() as u64,
        has_body = body.is_some(),
        "Dispatching request"
    );

    let request = TransportRequest {
        url,
        method,
        headers: config.headers.clone(),
        body,
        cancellation,
        agent: config.agent.clone(),
    };

    let raw = transport.perform(request).await.map_err(classify)?;

    let response = Response {
        data: parse_body(config.effective_response_type(), raw.body),
        status: raw.status,
        status_text: raw.status_text,
        headers: raw.headers,
        config,
    };

    if !response.is_success() {
        let message = response
            .data
            .message()
            .unwrap_or_else(|| format!("HTTP Error {}", response.status));
        let snapshot: ResponseSnapshot = response.snapshot();
        return Err(Error::http(message, response.status, snapshot));
    }

    Ok(response)
}
