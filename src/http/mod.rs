// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for zuzia
//!
//! Request configuration, header and option normalization, the transport
//! seam, and the adapter that turns a configuration into a response.

mod client;
mod dispatch;
mod headers;
mod options;
mod request;
mod response;
mod transport;

pub use client::{Client, ClientBuilder, DEFAULT_TIMEOUT};
pub use dispatch::{build_url, dispatch, TIMEOUT_MESSAGE};
pub use headers::normalize_headers;
pub use options::{
    apply_defaults, DefaultUserAgent, NoProxy, ProxyProvider, UrlProxyProvider, UserAgentProvider,
};
pub use request::{
    Auth, Body, FormData, FormPart, ProxyAgent, ProxyConfig, RequestConfig, ResponseType,
};
pub use response::{Response, ResponseData, ResponseSnapshot};
pub use transport::{
    ReqwestTransport, Transport, TransportBody, TransportFailure, TransportRequest,
    TransportResponse, MAX_PROXY_CLIENTS,
};

/// Header mapping that keeps insertion order
pub type Headers = indexmap::IndexMap<String, String>;

/// Well-known header names and values
pub mod header {
    pub use super::headers::{ACCEPT, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
}
