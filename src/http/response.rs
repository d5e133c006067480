// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::request::RequestConfig;
use super::Headers;
use crate::error::{Error, Result};

/// Response body, parsed according to the request's response type
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// Parsed JSON; `Null` when the body was empty or not valid JSON
    Json(Value),
    /// Raw text
    Text(String),
    /// Opaque bytes (`blob` and `arraybuffer`)
    Binary(Bytes),
}

impl ResponseData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ResponseData::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The `message` field of a JSON object body.
    ///
    /// Strings are used as-is; numbers and `true` are stringified. Empty
    /// strings, `false`, zero, `null` and structured values yield `None`.
    pub fn message(&self) -> Option<String> {
        match self.as_json()?.get("message")? {
            Value::String(message) if !message.is_empty() => Some(message.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }
}

impl From<Value> for ResponseData {
    fn from(value: Value) -> Self {
        ResponseData::Json(value)
    }
}

impl From<String> for ResponseData {
    fn from(text: String) -> Self {
        ResponseData::Text(text)
    }
}

impl From<Bytes> for ResponseData {
    fn from(bytes: Bytes) -> Self {
        ResponseData::Binary(bytes)
    }
}

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct Response {
    /// Parsed response body
    pub data: ResponseData,
    /// Response status code
    pub status: u16,
    /// Status reason phrase
    pub status_text: String,
    /// Response headers, lower-cased names
    pub headers: Headers,
    /// The configuration that produced this response
    pub config: RequestConfig,
}

impl Response {
    /// Build a response that never touched the network, e.g. to resolve a
    /// failure from an error interceptor.
    pub fn from_data(data: impl Into<ResponseData>, config: RequestConfig) -> Self {
        Self {
            data: data.into(),
            status: 200,
            status_text: "OK".to_string(),
            headers: Headers::new(),
            config,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Deserialize a JSON body into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        match &self.data {
            ResponseData::Json(value) => serde_json::from_value(value.clone()).map_err(Error::from),
            ResponseData::Text(text) => serde_json::from_str(text).map_err(Error::from),
            ResponseData::Binary(bytes) => serde_json::from_slice(bytes).map_err(Error::from),
        }
    }

    /// Detach the parts that survive into an HTTP error
    pub fn snapshot(&self) -> ResponseSnapshot {
        ResponseSnapshot {
            data: self.data.clone(),
            headers: self.headers.clone(),
            status: self.status,
            status_text: self.status_text.clone(),
        }
    }
}

/// Response detail attached to an HTTP status error
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSnapshot {
    pub data: ResponseData,
    pub headers: Headers,
    pub status: u16,
    pub status_text: String,
}
