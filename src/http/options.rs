// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Derived defaults: User-Agent, proxy agent, timeout

use std::time::Duration;

use url::Url;

use super::headers::USER_AGENT;
use super::request::{ProxyAgent, ProxyConfig, RequestConfig};
use crate::{PRODUCT, VERSION};

/// Supplies the `User-Agent` header when the caller set none
pub trait UserAgentProvider: Send + Sync {
    fn user_agent(&self) -> String;
}

impl<F> UserAgentProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn user_agent(&self) -> String {
        self()
    }
}

/// `zuzia/<version>` followed by OS and architecture when known
#[derive(Debug, Clone)]
pub struct DefaultUserAgent {
    platform: Option<String>,
}

impl DefaultUserAgent {
    /// Detect platform info from the running binary
    pub fn detect() -> Self {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        let platform = match (os.is_empty(), arch.is_empty()) {
            (false, false) => Some(format!("({}; {})", os, arch)),
            (false, true) => Some(format!("({})", os)),
            _ => None,
        };
        Self { platform }
    }

    /// Bare product identifier, no platform info
    pub fn bare() -> Self {
        Self { platform: None }
    }
}

impl Default for DefaultUserAgent {
    fn default() -> Self {
        Self::detect()
    }
}

impl UserAgentProvider for DefaultUserAgent {
    fn user_agent(&self) -> String {
        let product = format!("{}/{}", PRODUCT, VERSION);
        match &self.platform {
            Some(platform) => format!("{} {}", product, platform),
            None => product,
        }
    }
}

/// Turns a proxy descriptor into a transport-level agent
///
/// `None` means "send without a proxy" and is never an error.
pub trait ProxyProvider: Send + Sync {
    fn resolve(&self, proxy: &ProxyConfig) -> Option<ProxyAgent>;
}

/// Builds `protocol://[user:pass@]host[:port]` proxy URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlProxyProvider;

impl ProxyProvider for UrlProxyProvider {
    fn resolve(&self, proxy: &ProxyConfig) -> Option<ProxyAgent> {
        let host = proxy.host.as_deref().filter(|h| !h.is_empty())?;
        let protocol = proxy.protocol.as_deref().unwrap_or("http");
        let protocol = protocol.trim_end_matches(':');

        let mut raw = format!("{}://", protocol);
        if let Some(auth) = &proxy.auth {
            raw.push_str(&format!(
                "{}:{}@",
                urlencoding::encode(&auth.username),
                urlencoding::encode(&auth.password)
            ));
        }
        raw.push_str(host);
        if let Some(port) = proxy.port {
            raw.push_str(&format!(":{}", port));
        }

        match Url::parse(&raw) {
            Ok(url) => Some(ProxyAgent::new(url.as_str().trim_end_matches('/'))),
            Err(e) => {
                tracing::warn!(host, error = %e, "Unusable proxy descriptor");
                None
            }
        }
    }
}

/// Never applies a proxy
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProxy;

impl ProxyProvider for NoProxy {
    fn resolve(&self, _proxy: &ProxyConfig) -> Option<ProxyAgent> {
        None
    }
}

/// Fill in derived defaults on a header-normalized configuration
pub fn apply_defaults(
    mut config: RequestConfig,
    user_agent: &dyn UserAgentProvider,
    proxies: &dyn ProxyProvider,
) -> RequestConfig {
    if !config.headers.contains_key(USER_AGENT) && !config.headers.contains_key("user-agent") {
        config
            .headers
            .insert(USER_AGENT.to_string(), user_agent.user_agent());
    }

    if let Some(proxy) = &config.proxy {
        config.agent = proxies.resolve(proxy);
        if config.agent.is_none() {
            tracing::warn!(?proxy, "Proxy not applied, sending directly");
        }
    }

    if config.timeout.is_none() {
        config.timeout = Some(Duration::ZERO);
    }

    config
}
