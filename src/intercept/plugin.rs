// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Plugins: named bundles of optional lifecycle hooks
//!
//! Hooks are checked for presence and only the ones a plugin sets are
//! called. `before_request` hooks run ahead of request interceptors,
//! `after_response` hooks ahead of response interceptors and `on_error`
//! hooks ahead of error interceptors.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::interceptor::ErrorAction;
use crate::error::{Error, Result};
use crate::http::{RequestConfig, Response};

pub type BeforeRequestHook =
    Arc<dyn Fn(RequestConfig) -> BoxFuture<'static, Result<RequestConfig>> + Send + Sync>;
pub type AfterResponseHook =
    Arc<dyn Fn(Response) -> BoxFuture<'static, Result<Response>> + Send + Sync>;
pub type OnErrorHook = Arc<dyn Fn(Error) -> BoxFuture<'static, ErrorAction> + Send + Sync>;

/// Name given to plugins built with [`Plugin::default`]
pub const UNNAMED_PLUGIN: &str = "unnamed-plugin";

/// A named set of optional hooks
///
/// # Example
///
/// ```rust,no_run
/// use zuzia::{Error, Plugin, RequestConfig};
///
/// let plugin = Plugin::new("api-key").before_request(|config: RequestConfig| async move {
///     Ok::<_, Error>(config.header("X-Api-Key", "secret"))
/// });
/// assert!(plugin.has_before_request());
/// ```
#[derive(Clone)]
pub struct Plugin {
    name: String,
    before_request: Option<BeforeRequestHook>,
    after_response: Option<AfterResponseHook>,
    on_error: Option<OnErrorHook>,
}

impl Plugin {
    /// Create a plugin with no hooks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_request: None,
            after_response: None,
            on_error: None,
        }
    }

    /// Set the hook that may rewrite the configuration before dispatch
    pub fn before_request<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(RequestConfig) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RequestConfig>> + Send + 'static,
    {
        self.before_request = Some(Arc::new(move |config: RequestConfig| hook(config).boxed()));
        self
    }

    /// Set the hook that may rewrite a successful response
    pub fn after_response<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response>> + Send + 'static,
    {
        self.after_response = Some(Arc::new(move |response: Response| hook(response).boxed()));
        self
    }

    /// Set the hook that sees failures before error interceptors do
    pub fn on_error<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Error) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ErrorAction> + Send + 'static,
    {
        self.on_error = Some(Arc::new(move |error: Error| hook(error).boxed()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_before_request(&self) -> bool {
        self.before_request.is_some()
    }

    pub fn has_after_response(&self) -> bool {
        self.after_response.is_some()
    }

    pub fn has_on_error(&self) -> bool {
        self.on_error.is_some()
    }

    pub(crate) fn on_error_hook(&self) -> Option<&OnErrorHook> {
        self.on_error.as_ref()
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new(UNNAMED_PLUGIN)
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("before_request", &self.has_before_request())
            .field("after_response", &self.has_after_response())
            .field("on_error", &self.has_on_error())
            .finish()
    }
}

/// Run every `before_request` hook in registration order.
///
/// The first failing hook stops the pipeline; its error comes back
/// wrapped in [`Error::Plugin`].
pub async fn run_before_request(plugins: &[Plugin], mut config: RequestConfig) -> Result<RequestConfig> {
    for plugin in plugins {
        if let Some(hook) = &plugin.before_request {
            tracing::debug!(plugin = %plugin.name, "Running before_request hook");
            config = hook(config)
                .await
                .map_err(|e| Error::plugin(plugin.name.clone(), e))?;
        }
    }
    Ok(config)
}

/// Run every `after_response` hook in registration order
pub async fn run_after_response(plugins: &[Plugin], mut response: Response) -> Result<Response> {
    for plugin in plugins {
        if let Some(hook) = &plugin.after_response {
            tracing::debug!(plugin = %plugin.name, "Running after_response hook");
            response = hook(response)
                .await
                .map_err(|e| Error::plugin(plugin.name.clone(), e))?;
        }
    }
    Ok(response)
}
