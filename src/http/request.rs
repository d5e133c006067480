// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Declarative request configuration

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::Headers;
use crate::error::Result;
use crate::util::{merge_deep, merge_maps};

/// Everything needed to describe one request
///
/// Every field is optional so that instance defaults and per-call values
/// can be layered with [`RequestConfig::merge`]. Absent fields fall back
/// to the documented defaults at dispatch time.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Request URL, joined onto `base_url` when both are set
    pub url: Option<String>,
    /// Request method (default `GET`)
    pub method: Option<Method>,
    /// Request headers, in insertion order
    pub headers: Headers,
    /// Request body
    pub data: Option<Body>,
    /// Base URL prefixed to `url`
    pub base_url: Option<String>,
    /// Request timeout; zero means no timeout
    pub timeout: Option<Duration>,
    /// Query string parameters, in insertion order
    pub params: Map<String, Value>,
    /// Caller-owned cancellation token
    pub signal: Option<CancellationToken>,
    /// Basic auth credentials
    pub auth: Option<Auth>,
    /// Proxy descriptor
    pub proxy: Option<ProxyConfig>,
    /// How to parse the response body (default `json`)
    pub response_type: Option<ResponseType>,
    /// Proxy agent resolved from `proxy`
    pub agent: Option<ProxyAgent>,
}

impl RequestConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the method
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set a header, replacing any value stored under the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set multiple headers
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Set the body
    pub fn data(mut self, data: impl Into<Body>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set a JSON body from any serializable value
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        self.data = Some(Body::Json(serde_json::to_value(data)?));
        Ok(self)
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the cancellation token observed by the transport
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Set basic auth credentials
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth::new(username, password));
        self
    }

    /// Set the proxy descriptor
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set the response type
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Method to send, `GET` when unset
    pub fn effective_method(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }

    /// Response type to parse, `json` when unset
    pub fn effective_response_type(&self) -> ResponseType {
        self.response_type.unwrap_or_default()
    }

    /// Timeout to arm, zero when unset
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(Duration::ZERO)
    }

    /// Look up a header by exact name
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Layer `over` on top of `self`.
    ///
    /// Mapping-valued fields (headers, params, JSON object bodies, the
    /// proxy descriptor) merge key by key; everything else set in `over`
    /// replaces the value in `self`.
    pub fn merge(mut self, over: RequestConfig) -> RequestConfig {
        for (name, value) in over.headers {
            self.headers.insert(name, value);
        }
        merge_maps(&mut self.params, &over.params);

        self.data = match (self.data, over.data) {
            (Some(Body::Json(mut base)), Some(Body::Json(top))) if base.is_object() => {
                merge_deep(&mut base, &top);
                Some(Body::Json(base))
            }
            (base, top) => top.or(base),
        };

        self.proxy = match (self.proxy, over.proxy) {
            (Some(base), Some(top)) => Some(base.merge(top)),
            (base, top) => top.or(base),
        };

        RequestConfig {
            url: over.url.or(self.url),
            method: over.method.or(self.method),
            headers: self.headers,
            data: self.data,
            base_url: over.base_url.or(self.base_url),
            timeout: over.timeout.or(self.timeout),
            params: self.params,
            signal: over.signal.or(self.signal),
            auth: over.auth.or(self.auth),
            proxy: self.proxy,
            response_type: over.response_type.or(self.response_type),
            agent: over.agent.or(self.agent),
        }
    }
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Structured value, serialized to JSON text on the wire
    Json(Value),
    /// Raw text, sent as-is
    Text(String),
    /// Multipart form; the transport picks the boundary and content type
    Form(FormData),
}

impl Body {
    /// Whether this body counts as "no data".
    ///
    /// `null`, `false`, zero and `""` JSON values are treated as absent,
    /// as are empty text and empty forms.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Json(Value::Null) | Body::Json(Value::Bool(false)) => true,
            Body::Json(Value::Number(n)) => n.as_f64() == Some(0.0),
            Body::Json(Value::String(s)) => s.is_empty(),
            Body::Json(_) => false,
            Body::Text(text) => text.is_empty(),
            Body::Form(form) => form.is_empty(),
        }
    }

    /// Whether this body is a multipart form
    pub fn is_multipart(&self) -> bool {
        matches!(self, Body::Form(_))
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<FormData> for Body {
    fn from(form: FormData) -> Self {
        Body::Form(form)
    }
}

/// Multipart form payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<(String, FormPart)>,
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File {
        bytes: Bytes,
        file_name: Option<String>,
        mime: Option<String>,
    },
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    /// Append a file field
    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Bytes>,
        file_name: Option<String>,
        mime: Option<String>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                bytes: bytes.into(),
                file_name,
                mime,
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Basic auth credential pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

impl Auth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Proxy descriptor, resolved into a [`ProxyAgent`] before dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Scheme of the proxy (default `http`)
    pub protocol: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub auth: Option<Auth>,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: None,
            host: Some(host.into()),
            port: Some(port),
            auth: None,
        }
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth::new(username, password));
        self
    }

    fn merge(self, over: ProxyConfig) -> ProxyConfig {
        ProxyConfig {
            protocol: over.protocol.or(self.protocol),
            host: over.host.or(self.host),
            port: over.port.or(self.port),
            auth: over.auth.or(self.auth),
        }
    }
}

/// Transport-level proxy agent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyAgent {
    url: String,
}

impl ProxyAgent {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// How the response body is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Json,
    Text,
    Blob,
    ArrayBuffer,
}
