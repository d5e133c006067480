// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Ready-made interceptors

use async_trait::async_trait;

use super::interceptor::{ErrorAction, ErrorInterceptor, RequestInterceptor, ResponseInterceptor};
use crate::error::{Error, Result};
use crate::http::header::AUTHORIZATION;
use crate::http::{build_url, RequestConfig, Response, ResponseData};

/// Injects `Authorization: Bearer <token>` into every request
pub struct BearerAuth {
    token: String,
    /// Leave requests that already carry an Authorization header alone
    keep_existing: bool,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            keep_existing: false,
        }
    }

    /// Do not overwrite an Authorization header set elsewhere
    pub fn keep_existing(mut self, keep: bool) -> Self {
        self.keep_existing = keep;
        self
    }
}

#[async_trait]
impl RequestInterceptor for BearerAuth {
    async fn on_request(&self, config: RequestConfig) -> Result<RequestConfig> {
        if self.keep_existing && config.get_header(AUTHORIZATION).is_some() {
            return Ok(config);
        }
        Ok(config.header(AUTHORIZATION, format!("Bearer {}", self.token)))
    }
}

/// Logs requests, responses and failures through `tracing`
///
/// Register the same value at every stage it should observe.
#[derive(Debug, Clone, Default)]
pub struct RequestLogger {
    /// Log request bodies
    pub log_bodies: bool,
    /// Log response bodies
    pub log_responses: bool,
    /// Only log URLs containing this string
    pub url_filter: Option<String>,
}

impl RequestLogger {
    fn matches(&self, url: &str) -> bool {
        self.url_filter
            .as_deref()
            .map(|filter| url.contains(filter))
            .unwrap_or(true)
    }
}

#[async_trait]
impl RequestInterceptor for RequestLogger {
    async fn on_request(&self, config: RequestConfig) -> Result<RequestConfig> {
        let url = build_url(&config);
        if !self.matches(&url) {
            return Ok(config);
        }

        tracing::info!(method = %config.effective_method(), url = %url, "Request");

        if self.log_bodies {
            if let Some(ref body) = config.data {
                tracing::debug!(body = ?body, "Request body");
            }
        }

        Ok(config)
    }
}

#[async_trait]
impl ResponseInterceptor for RequestLogger {
    async fn on_response(&self, response: Response) -> Result<Response> {
        let url = build_url(&response.config);
        if !self.matches(&url) {
            return Ok(response);
        }

        tracing::info!(url = %url, status = response.status, "Response");

        if self.log_responses {
            match &response.data {
                ResponseData::Json(value) => tracing::debug!(body = %value, "Response body"),
                ResponseData::Text(text) => tracing::debug!(body = %text, "Response body"),
                ResponseData::Binary(bytes) => tracing::debug!(len = bytes.len(), "Response body"),
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl ErrorInterceptor for RequestLogger {
    async fn on_error(&self, error: Error) -> ErrorAction {
        tracing::warn!(kind = error.kind(), status = ?error.status(), error = %error, "Request failed");
        ErrorAction::Continue
    }
}
