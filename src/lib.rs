// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Zuzia - HTTP client with plugins and interceptors
//!
//! Every request runs through one pipeline: instance defaults are merged
//! in, headers are normalized, plugins and request interceptors may
//! rewrite the configuration, a single transport call is made, and
//! response or error interceptors shape the outcome.
//!
//! ## Features
//!
//! - Independent instances with their own defaults (`Client::create`)
//! - Request, response and error interceptors with removable handles
//! - Named plugins with optional lifecycle hooks
//! - Uniform failures: `Http`, `Network` or `Timeout`
//! - Timeouts and caller-driven cancellation
//! - JSON, text, binary and multipart bodies
//! - Basic auth and per-request proxies
//!
//! ## Example
//!
//! ```rust,no_run
//! use zuzia::{request_fn, Client, Error, RequestConfig};
//!
//! #[tokio::main]
//! async fn main() -> zuzia::Result<()> {
//!     let api = Client::default().create(
//!         RequestConfig::new().base_url("https://api.example.com"),
//!     );
//!
//!     api.use_request_interceptor(request_fn(|config: RequestConfig| async move {
//!         Ok::<_, Error>(config.header("X-Request-Source", "docs"))
//!     }));
//!
//!     let created = api
//!         .post("/items", serde_json::json!({"name": "widget"}), None)
//!         .await?;
//!     println!("{} {:?}", created.status, created.data);
//!
//!     match api.get("/missing", None).await {
//!         Err(e) if e.status() == Some(404) => println!("not found: {}", e),
//!         other => println!("{:?}", other.map(|r| r.status)),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod intercept;
pub mod util;

#[cfg(test)]
mod testing;

// Re-exports for convenience

// Client
pub use http::{Client, ClientBuilder};

// Request and response
pub use http::{
    Auth, Body, FormData, FormPart, Headers, ProxyConfig, RequestConfig, Response, ResponseData,
    ResponseSnapshot, ResponseType,
};

// Transport and providers
pub use http::{
    DefaultUserAgent, NoProxy, ProxyAgent, ProxyProvider, ReqwestTransport, Transport,
    TransportBody, TransportFailure, TransportRequest, TransportResponse, UrlProxyProvider,
    UserAgentProvider,
};

// Interceptors and plugins
pub use intercept::{
    error_fn, request_fn, response_fn, BearerAuth, ErrorAction, ErrorInterceptor,
    InterceptorHandle, Plugin, RequestInterceptor, RequestLogger, ResponseInterceptor,
};

// Errors
pub use error::{Error, Result};

// Cancellation signal accepted by `RequestConfig::signal`
pub use tokio_util::sync::CancellationToken;

/// Zuzia version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product token used in the default User-Agent
pub const PRODUCT: &str = "zuzia";
