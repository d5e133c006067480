// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Network transport seam and its reqwest implementation

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;
use parking_lot::RwLock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::request::{FormData, FormPart, ProxyAgent};
use super::Headers;

/// Body handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportBody {
    Text(String),
    Multipart(FormData),
}

/// A fully resolved request, ready for the wire
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub method: Method,
    pub headers: Headers,
    pub body: Option<TransportBody>,
    /// Must be observed while the exchange is in flight
    pub cancellation: CancellationToken,
    pub agent: Option<ProxyAgent>,
}

/// Raw transport response with the body fully read
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    /// Lower-cased names, repeated headers joined with `", "`
    pub headers: Headers,
    pub body: Bytes,
}

/// Why the transport could not produce a response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    /// The cancellation token fired
    #[error("request was cancelled")]
    Cancelled,
    /// Anything else: DNS, connect, TLS, malformed URL, ...
    #[error("{0}")]
    Other(String),
}

/// The single capability that performs network I/O
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportFailure>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn perform(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        (**self).perform(request).await
    }
}

/// Most proxied clients kept alive by one [`ReqwestTransport`]
pub const MAX_PROXY_CLIENTS: usize = 32;

/// reqwest-backed transport
///
/// Requests with a proxy agent go through a dedicated client per proxy
/// URL, built on first use and cached. At most [`MAX_PROXY_CLIENTS`] are
/// kept; the least recently built one is dropped first.
pub struct ReqwestTransport {
    client: Client,
    proxied: RwLock<IndexMap<ProxyAgent, Client>>,
}

impl ReqwestTransport {
    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            proxied: RwLock::new(IndexMap::new()),
        }
    }

    fn client_for(&self, agent: Option<&ProxyAgent>) -> Result<Client, TransportFailure> {
        let Some(agent) = agent else {
            return Ok(self.client.clone());
        };

        if let Some(client) = self.proxied.read().get(agent) {
            return Ok(client.clone());
        }

        let proxy = reqwest::Proxy::all(agent.url())
            .map_err(|e| TransportFailure::Other(format!("Invalid proxy URL: {}", e)))?;
        let client = Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| TransportFailure::Other(e.to_string()))?;

        tracing::debug!(proxy = agent.url(), "Built proxied client");
        let mut proxied = self.proxied.write();
        if proxied.len() >= MAX_PROXY_CLIENTS && !proxied.contains_key(agent) {
            proxied.shift_remove_index(0);
        }
        proxied.insert(agent.clone(), client.clone());
        Ok(client)
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        let client = self.client_for(request.agent.as_ref())?;
        let url = Url::parse(&request.url)
            .map_err(|e| TransportFailure::Other(format!("Invalid URL '{}': {}", request.url, e)))?;

        let mut builder = client.request(request.method, url);
        let multipart = matches!(request.body, Some(TransportBody::Multipart(_)));

        for (name, value) in &request.headers {
            // reqwest sets the multipart boundary header itself
            if multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        match request.body {
            Some(TransportBody::Text(text)) => builder = builder.body(text),
            Some(TransportBody::Multipart(form)) => builder = builder.multipart(into_multipart(form)?),
            None => {}
        }

        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status();
            let headers = flatten_headers(response.headers());
            let body = response.bytes().await?;

            Ok::<_, reqwest::Error>(TransportResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                headers,
                body,
            })
        };

        tokio::select! {
            biased;
            _ = request.cancellation.cancelled() => Err(TransportFailure::Cancelled),
            result = exchange => result.map_err(|e| TransportFailure::Other(e.to_string())),
        }
    }
}

fn flatten_headers(headers: &reqwest::header::HeaderMap) -> Headers {
    let mut flat = Headers::with_capacity(headers.len());
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        flat.entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.clone());
    }
    flat
}

fn into_multipart(form: FormData) -> Result<Form, TransportFailure> {
    let mut multipart = Form::new();

    for (name, part) in form.parts() {
        let part = match part {
            FormPart::Text(value) => Part::text(value.clone()),
            FormPart::File {
                bytes,
                file_name,
                mime,
            } => {
                let mut part = Part::bytes(bytes.to_vec());
                if let Some(file_name) = file_name {
                    part = part.file_name(file_name.clone());
                }
                if let Some(mime) = mime {
                    part = part
                        .mime_str(mime)
                        .map_err(|e| TransportFailure::Other(format!("Invalid MIME type: {}", e)))?;
                }
                part
            }
        };
        multipart = multipart.part(name.clone(), part);
    }

    Ok(multipart)
}
