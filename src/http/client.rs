// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client instance: defaults, registries and the request pipeline
//!
//! `request` runs, in order: defaults merge, header normalization,
//! derived defaults, plugin `before_request` hooks, request interceptors,
//! dispatch, plugin `after_response` hooks, response interceptors. A
//! failure during dispatch or the response stages goes through plugin
//! `on_error` hooks and then error interceptors, any of which may resolve
//! it into a response. Plugin and request interceptor failures return
//! straight to the caller.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Method;

use super::dispatch::dispatch;
use super::header::{ACCEPT, APPLICATION_JSON, CONTENT_TYPE};
use super::headers::normalize_headers;
use super::options::{apply_defaults, DefaultUserAgent, ProxyProvider, UrlProxyProvider, UserAgentProvider};
use super::request::{Body, RequestConfig};
use super::response::Response;
use super::transport::{ReqwestTransport, Transport};
use crate::error::{Error, Result};
use crate::intercept::{
    run_after_response, run_before_request, ErrorAction, ErrorInterceptor, InterceptorHandle,
    Plugin, Registry, RequestInterceptor, ResponseInterceptor,
};

/// Timeout of the instance built by [`Client::default`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared infrastructure, reused by instances spawned with [`Client::create`]
#[derive(Clone)]
struct Services {
    transport: Arc<dyn Transport>,
    user_agent: Arc<dyn UserAgentProvider>,
    proxies: Arc<dyn ProxyProvider>,
}

struct ClientInner {
    defaults: RequestConfig,
    services: Services,
    request_interceptors: Arc<Registry<dyn RequestInterceptor>>,
    response_interceptors: Arc<Registry<dyn ResponseInterceptor>>,
    error_interceptors: Arc<Registry<dyn ErrorInterceptor>>,
    plugins: RwLock<Vec<Plugin>>,
}

/// An independent client instance
///
/// Cloning a `Client` yields another handle to the same instance; use
/// [`Client::create`] for a fresh instance with its own defaults and
/// empty registries.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use zuzia::{Client, RequestConfig};
///
/// #[tokio::main]
/// async fn main() -> zuzia::Result<()> {
///     let api = Client::default().create(
///         RequestConfig::new()
///             .base_url("https://api.example.com")
///             .timeout(Duration::from_secs(5)),
///     );
///
///     let users = api.get("/users", None).await?;
///     println!("{} {:?}", users.status, users.data);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Create an instance with the given defaults and the stock services
    pub fn new(defaults: RequestConfig) -> Self {
        Self::builder().defaults(defaults).build()
    }

    /// Start building an instance with custom services
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a new independent instance with its own defaults.
    ///
    /// The new instance shares this one's transport and providers but
    /// none of its defaults, interceptors or plugins.
    pub fn create(&self, defaults: RequestConfig) -> Client {
        Self::from_parts(defaults, self.inner.services.clone())
    }

    fn from_parts(defaults: RequestConfig, services: Services) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                defaults,
                services,
                request_interceptors: Arc::new(Registry::new()),
                response_interceptors: Arc::new(Registry::new()),
                error_interceptors: Arc::new(Registry::new()),
                plugins: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Instance defaults
    pub fn defaults(&self) -> &RequestConfig {
        &self.inner.defaults
    }

    /// Register a request interceptor
    pub fn use_request_interceptor<I: RequestInterceptor + 'static>(&self, interceptor: I) -> InterceptorHandle {
        let registry = &self.inner.request_interceptors;
        InterceptorHandle::new(registry.add(Arc::new(interceptor)), registry)
    }

    /// Register a response interceptor
    pub fn use_response_interceptor<I: ResponseInterceptor + 'static>(&self, interceptor: I) -> InterceptorHandle {
        let registry = &self.inner.response_interceptors;
        InterceptorHandle::new(registry.add(Arc::new(interceptor)), registry)
    }

    /// Register an error interceptor
    pub fn use_error_interceptor<I: ErrorInterceptor + 'static>(&self, interceptor: I) -> InterceptorHandle {
        let registry = &self.inner.error_interceptors;
        InterceptorHandle::new(registry.add(Arc::new(interceptor)), registry)
    }

    /// Append a plugin
    pub fn register_plugin(&self, plugin: Plugin) {
        tracing::debug!(plugin = plugin.name(), "Registering plugin");
        self.inner.plugins.write().push(plugin);
    }

    /// Remove every plugin with this name. Returns how many were removed.
    pub fn unregister_plugin(&self, name: &str) -> usize {
        let mut plugins = self.inner.plugins.write();
        let before = plugins.len();
        plugins.retain(|plugin| plugin.name() != name);
        before - plugins.len()
    }

    /// Names of the registered plugins, in order
    pub fn plugins(&self) -> Vec<String> {
        self.inner
            .plugins
            .read()
            .iter()
            .map(|plugin| plugin.name().to_string())
            .collect()
    }

    /// Execute a request through the full pipeline
    pub async fn request(&self, config: RequestConfig) -> Result<Response> {
        let services = &self.inner.services;

        let mut config = self.inner.defaults.clone().merge(config);
        config.headers = normalize_headers(&config.headers, &config);
        let config = apply_defaults(config, services.user_agent.as_ref(), services.proxies.as_ref());

        let plugins = self.inner.plugins.read().clone();
        let mut config = run_before_request(&plugins, config).await?;

        for interceptor in self.inner.request_interceptors.snapshot() {
            config = interceptor.on_request(config).await?;
        }

        match self.exchange(&plugins, config).await {
            Ok(response) => Ok(response),
            Err(error) => self.recover(&plugins, error).await,
        }
    }

    async fn exchange(&self, plugins: &[Plugin], config: RequestConfig) -> Result<Response> {
        let mut response = dispatch(self.inner.services.transport.as_ref(), config).await?;

        response = run_after_response(plugins, response).await?;
        for interceptor in self.inner.response_interceptors.snapshot() {
            response = interceptor.on_response(response).await?;
        }

        Ok(response)
    }

    async fn recover(&self, plugins: &[Plugin], error: Error) -> Result<Response> {
        tracing::debug!(kind = error.kind(), error = %error, "Running error handlers");
        let mut current = error;

        for hook in plugins.iter().filter_map(Plugin::on_error_hook) {
            match hook(current.clone()).await {
                ErrorAction::Continue => {}
                ErrorAction::Resolve(response) => return Ok(response),
                ErrorAction::Fail(error) => current = error,
            }
        }

        for interceptor in self.inner.error_interceptors.snapshot() {
            match interceptor.on_error(current.clone()).await {
                ErrorAction::Continue => {}
                ErrorAction::Resolve(response) => return Ok(response),
                ErrorAction::Fail(error) => current = error,
            }
        }

        Err(current)
    }

    async fn without_body(&self, method: Method, url: &str, config: Option<RequestConfig>) -> Result<Response> {
        self.request(config.unwrap_or_default().method(method).url(url))
            .await
    }

    async fn with_body(
        &self,
        method: Method,
        url: &str,
        data: Body,
        config: Option<RequestConfig>,
    ) -> Result<Response> {
        self.request(config.unwrap_or_default().method(method).url(url).data(data))
            .await
    }

    /// Execute a GET request
    pub async fn get(&self, url: &str, config: impl Into<Option<RequestConfig>>) -> Result<Response> {
        self.without_body(Method::GET, url, config.into()).await
    }

    /// Execute a DELETE request
    pub async fn delete(&self, url: &str, config: impl Into<Option<RequestConfig>>) -> Result<Response> {
        self.without_body(Method::DELETE, url, config.into()).await
    }

    /// Execute a HEAD request
    pub async fn head(&self, url: &str, config: impl Into<Option<RequestConfig>>) -> Result<Response> {
        self.without_body(Method::HEAD, url, config.into()).await
    }

    /// Execute an OPTIONS request
    pub async fn options(&self, url: &str, config: impl Into<Option<RequestConfig>>) -> Result<Response> {
        self.without_body(Method::OPTIONS, url, config.into()).await
    }

    /// Execute a POST request
    pub async fn post(
        &self,
        url: &str,
        data: impl Into<Body>,
        config: impl Into<Option<RequestConfig>>,
    ) -> Result<Response> {
        self.with_body(Method::POST, url, data.into(), config.into()).await
    }

    /// Execute a PUT request
    pub async fn put(
        &self,
        url: &str,
        data: impl Into<Body>,
        config: impl Into<Option<RequestConfig>>,
    ) -> Result<Response> {
        self.with_body(Method::PUT, url, data.into(), config.into()).await
    }

    /// Execute a PATCH request
    pub async fn patch(
        &self,
        url: &str,
        data: impl Into<Body>,
        config: impl Into<Option<RequestConfig>>,
    ) -> Result<Response> {
        self.with_body(Method::PATCH, url, data.into(), config.into()).await
    }
}

impl Default for Client {
    /// The stock instance: JSON `Content-Type`/`Accept` and a 10 s timeout
    fn default() -> Self {
        Self::new(
            RequestConfig::new()
                .header(CONTENT_TYPE, APPLICATION_JSON)
                .header(ACCEPT, APPLICATION_JSON)
                .timeout(DEFAULT_TIMEOUT),
        )
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("defaults", &self.inner.defaults)
            .field("request_interceptors", &self.inner.request_interceptors.len())
            .field("response_interceptors", &self.inner.response_interceptors.len())
            .field("error_interceptors", &self.inner.error_interceptors.len())
            .field("plugins", &self.plugins())
            .finish()
    }
}

/// Builder for [`Client`] with custom services
#[derive(Default)]
pub struct ClientBuilder {
    defaults: RequestConfig,
    transport: Option<Arc<dyn Transport>>,
    user_agent: Option<Arc<dyn UserAgentProvider>>,
    proxies: Option<Arc<dyn ProxyProvider>>,
}

impl ClientBuilder {
    /// Set instance defaults
    pub fn defaults(mut self, defaults: RequestConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the network transport (default: [`ReqwestTransport`])
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the User-Agent provider (default: [`DefaultUserAgent`])
    pub fn user_agent<U: UserAgentProvider + 'static>(mut self, provider: U) -> Self {
        self.user_agent = Some(Arc::new(provider));
        self
    }

    /// Set the proxy-agent provider (default: [`UrlProxyProvider`])
    pub fn proxy_provider<P: ProxyProvider + 'static>(mut self, provider: P) -> Self {
        self.proxies = Some(Arc::new(provider));
        self
    }

    /// Build the instance
    pub fn build(self) -> Client {
        let services = Services {
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::default())),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| Arc::new(DefaultUserAgent::detect())),
            proxies: self.proxies.unwrap_or_else(|| Arc::new(UrlProxyProvider)),
        };
        Client::from_parts(self.defaults, services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{FormData, ProxyConfig, ResponseData, ResponseType, TransportBody};
    use crate::intercept::{error_fn, request_fn, response_fn};
    use crate::testing::{MockReply, MockTransport};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client_with(transport: &Arc<MockTransport>, defaults: RequestConfig) -> Client {
        Client::builder()
            .defaults(defaults)
            .transport(transport.clone())
            .user_agent(|| "zuzia-test".to_string())
            .build()
    }

    #[tokio::test]
    async fn test_get_with_base_url() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(
            &transport,
            RequestConfig::new()
                .base_url("https://api.example.com")
                .timeout(Duration::from_millis(10_000)),
        );

        let response = api.get("/users", None).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "https://api.example.com/users");
        assert_eq!(sent.method, Method::GET);
        assert!(sent.body.is_none());
        assert_eq!(response.config.timeout, Some(Duration::from_millis(10_000)));
    }

    #[tokio::test]
    async fn test_post_serializes_json() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new());

        api.post("/items", json!({"name": "x"}), None).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.headers.get(CONTENT_TYPE).map(String::as_str), Some(APPLICATION_JSON));
        assert_eq!(sent.body, Some(TransportBody::Text("{\"name\":\"x\"}".to_string())));
    }

    #[tokio::test]
    async fn test_shortcuts_set_method() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new().base_url("http://h.test"));

        api.delete("/a", None).await.unwrap();
        api.head("/b", None).await.unwrap();
        api.options("/c", None).await.unwrap();
        api.put("/d", "raw", None).await.unwrap();
        api.patch("/e", json!({"op": 1}), RequestConfig::new().param("v", 2))
            .await
            .unwrap();

        let sent: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.url, r.body.is_some()))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Method::DELETE, "http://h.test/a".to_string(), false),
                (Method::HEAD, "http://h.test/b".to_string(), false),
                (Method::OPTIONS, "http://h.test/c".to_string(), false),
                (Method::PUT, "http://h.test/d".to_string(), true),
                (Method::PATCH, "http://h.test/e?v=2".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_never_sends_body() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new());

        api.get("http://h.test/", RequestConfig::new().data(json!({"q": 1})))
            .await
            .unwrap();

        let sent = transport.last_request().unwrap();
        assert!(sent.body.is_none());
        assert_eq!(sent.headers.get(CONTENT_TYPE).map(String::as_str), Some(APPLICATION_JSON));
    }

    #[tokio::test]
    async fn test_defaults_merge_with_call() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(
            &transport,
            RequestConfig::new()
                .header("accept", "application/json")
                .header("X-Tenant", "acme")
                .param("page", 1),
        );

        api.get(
            "http://h.test/list",
            RequestConfig::new().header("X-Tenant", "globex").param("size", 50),
        )
        .await
        .unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "http://h.test/list?page=1&size=50");
        assert_eq!(sent.headers.get("Accept").map(String::as_str), Some("application/json"));
        assert_eq!(sent.headers.get("X-Tenant").map(String::as_str), Some("globex"));
        assert_eq!(sent.headers.get("User-Agent").map(String::as_str), Some("zuzia-test"));
    }

    #[tokio::test]
    async fn test_basic_auth_and_multipart() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new().auth("user", "pass"));

        api.post("http://h.test/upload", FormData::new().text("a", "b"), None)
            .await
            .unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(
            sent.headers.get("Authorization").map(String::as_str),
            Some("Basic dXNlcjpwYXNz")
        );
        assert!(!sent.headers.contains_key(CONTENT_TYPE));
        assert!(matches!(sent.body, Some(TransportBody::Multipart(_))));
    }

    #[tokio::test]
    async fn test_proxy_agent_reaches_transport() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new().proxy(ProxyConfig::new("proxy.local", 8080)));

        api.get("http://h.test/", None).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.agent.map(|a| a.url().to_string()), Some("http://proxy.local:8080".to_string()));
    }

    #[tokio::test]
    async fn test_interceptors_run_in_order() {
        let transport = Arc::new(MockTransport::new().reply(MockReply::json(200, json!({"n": 1}))));
        let api = client_with(&transport, RequestConfig::new());

        api.register_plugin(Plugin::new("stamp").before_request(|config: RequestConfig| async move {
            Ok::<_, Error>(config.header("X-Steps", "plugin"))
        }));
        api.use_request_interceptor(request_fn(|config: RequestConfig| async move {
            let steps = config.get_header("X-Steps").unwrap_or_default().to_string();
            Ok::<_, Error>(config.header("X-Steps", format!("{},first", steps)))
        }));
        api.use_request_interceptor(request_fn(|config: RequestConfig| async move {
            let steps = config.get_header("X-Steps").unwrap_or_default().to_string();
            Ok::<_, Error>(config.header("X-Steps", format!("{},second", steps)))
        }));
        api.use_response_interceptor(response_fn(|mut response: Response| async move {
            response.data = ResponseData::Json(json!({"n": 2}));
            Ok::<_, Error>(response)
        }));

        let response = api.get("http://h.test/", None).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.headers.get("X-Steps").map(String::as_str), Some("plugin,first,second"));
        assert_eq!(response.data, ResponseData::Json(json!({"n": 2})));
        assert_eq!(response.config.get_header("X-Steps"), Some("plugin,first,second"));
    }

    #[tokio::test]
    async fn test_removed_interceptor_is_skipped() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new());

        let handle = api.use_request_interceptor(request_fn(|config: RequestConfig| async move {
            Ok::<_, Error>(config.header("X-Removed", "no"))
        }));
        assert!(handle.remove());
        assert!(!handle.remove());

        api.get("http://h.test/", None).await.unwrap();

        assert!(!transport.last_request().unwrap().headers.contains_key("X-Removed"));
    }

    #[tokio::test]
    async fn test_error_interceptor_resolves() {
        let transport = Arc::new(MockTransport::new().reply(MockReply::json(500, json!({}))));
        let api = client_with(&transport, RequestConfig::new());

        api.use_error_interceptor(error_fn(|error: Error| async move {
            assert_eq!(error.status(), Some(500));
            ErrorAction::Resolve(Response::from_data(json!({"fallback": true}), RequestConfig::new()))
        }));

        let response = api.get("http://h.test/", None).await.unwrap();
        assert_eq!(response.data, ResponseData::Json(json!({"fallback": true})));
    }

    #[tokio::test]
    async fn test_error_interceptor_chain_sees_new_failure() {
        let transport = Arc::new(MockTransport::new().reply(MockReply::Fail("refused".into())));
        let api = client_with(&transport, RequestConfig::new());

        api.use_error_interceptor(error_fn(|_error: Error| async move { ErrorAction::Continue }));
        api.use_error_interceptor(error_fn(|error: Error| async move {
            assert!(error.is_network());
            ErrorAction::Fail(Error::other("rewrapped"))
        }));
        api.use_error_interceptor(error_fn(|error: Error| async move {
            assert_eq!(error.to_string(), "rewrapped");
            ErrorAction::Continue
        }));

        let err = api.get("http://h.test/", None).await.unwrap_err();
        assert_eq!(err.to_string(), "rewrapped");
    }

    #[tokio::test]
    async fn test_unhandled_failure_surfaces_verbatim() {
        let transport = Arc::new(MockTransport::new().reply(MockReply::json(404, json!({"message": "X"}))));
        let api = client_with(&transport, RequestConfig::new());

        let err = api.get("http://h.test/", None).await.unwrap_err();

        assert!(err.is_http());
        assert_eq!(err.to_string(), "X");
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_plugin_failure_skips_error_interceptors() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new());
        let seen = Arc::new(AtomicUsize::new(0));

        api.register_plugin(Plugin::new("deny").before_request(|_config: RequestConfig| async move {
            Err::<RequestConfig, _>(Error::other("denied"))
        }));
        let counter = seen.clone();
        api.use_error_interceptor(error_fn(move |_error: Error| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { ErrorAction::Continue }
        }));

        let err = api.get("http://h.test/", None).await.unwrap_err();

        assert!(err.is_plugin());
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_request_interceptor_failure_skips_error_interceptors() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new());
        let seen = Arc::new(AtomicUsize::new(0));

        api.use_request_interceptor(request_fn(|_config: RequestConfig| async move {
            Err::<RequestConfig, _>(Error::interceptor("nope"))
        }));
        let counter = seen.clone();
        api.use_error_interceptor(error_fn(move |_error: Error| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { ErrorAction::Resolve(Response::from_data(json!("swallowed"), RequestConfig::new())) }
        }));

        let err = api.get("http://h.test/", None).await.unwrap_err();

        assert!(matches!(&err, Error::Interceptor(message) if message == "nope"));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_after_response_failure_reaches_error_handlers() {
        let transport = Arc::new(MockTransport::new().reply(MockReply::json(200, json!({"raw": true}))));
        let api = client_with(&transport, RequestConfig::new());
        let hook_calls = Arc::new(AtomicUsize::new(0));

        api.register_plugin(Plugin::new("validate").after_response(|_response: Response| async move {
            Err::<Response, _>(Error::other("unexpected shape"))
        }));
        let counter = hook_calls.clone();
        api.register_plugin(Plugin::new("observer").on_error(move |error: Error| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                assert!(matches!(&error, Error::Plugin { plugin, .. } if plugin == "validate"));
                ErrorAction::Continue
            }
        }));
        api.use_error_interceptor(error_fn(|error: Error| async move {
            match error {
                Error::Plugin { .. } => {
                    ErrorAction::Resolve(Response::from_data(json!({"repaired": true}), RequestConfig::new()))
                }
                other => ErrorAction::Fail(other),
            }
        }));

        let response = api.get("http://h.test/", None).await.unwrap();

        assert_eq!(response.data, ResponseData::Json(json!({"repaired": true})));
        assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_falsy_body_is_not_sent() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new());

        for data in [json!(false), json!(0), json!("")] {
            api.post("http://h.test/", data, None).await.unwrap();

            let sent = transport.last_request().unwrap();
            assert!(sent.body.is_none());
            assert!(!sent.headers.contains_key(CONTENT_TYPE));
        }
    }

    #[tokio::test]
    async fn test_response_interceptor_failure_is_recoverable() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new());

        api.use_response_interceptor(response_fn(|_response: Response| async move {
            Err::<Response, _>(Error::interceptor("bad shape"))
        }));
        api.use_error_interceptor(error_fn(|error: Error| async move {
            match error {
                Error::Interceptor(_) => {
                    ErrorAction::Resolve(Response::from_data(json!("recovered"), RequestConfig::new()))
                }
                other => ErrorAction::Fail(other),
            }
        }));

        let response = api.get("http://h.test/", None).await.unwrap();
        assert_eq!(response.data, ResponseData::Json(json!("recovered")));
    }

    #[tokio::test]
    async fn test_plugin_on_error_runs_before_interceptors() {
        let transport = Arc::new(MockTransport::new().reply(MockReply::Fail("down".into())));
        let api = client_with(&transport, RequestConfig::new());

        api.register_plugin(Plugin::new("offline").on_error(|error: Error| async move {
            if error.is_network() {
                ErrorAction::Resolve(Response::from_data(json!({"cached": true}), RequestConfig::new()))
            } else {
                ErrorAction::Continue
            }
        }));
        api.use_error_interceptor(error_fn(|_error: Error| async move {
            ErrorAction::Fail(Error::other("interceptor should not run"))
        }));

        let response = api.get("http://h.test/", None).await.unwrap();
        assert_eq!(response.data, ResponseData::Json(json!({"cached": true})));
    }

    #[tokio::test]
    async fn test_timeout_through_pipeline() {
        let transport = Arc::new(MockTransport::new().reply(MockReply::Hang));
        let api = client_with(&transport, RequestConfig::new().timeout(Duration::from_millis(20)));

        let err = api.get("http://h.test/slow", None).await.unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_response_type_text() {
        let transport = Arc::new(MockTransport::new().reply(MockReply::text(200, "plain body")));
        let api = client_with(&transport, RequestConfig::new());

        let response = api
            .get("http://h.test/", RequestConfig::new().response_type(ResponseType::Text))
            .await
            .unwrap();

        assert_eq!(response.data, ResponseData::Text("plain body".to_string()));
        assert_eq!(response.content_type(), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_create_is_independent() {
        let transport = Arc::new(MockTransport::new());
        let root = client_with(&transport, RequestConfig::new().header("X-Root", "1"));
        root.use_request_interceptor(request_fn(|config: RequestConfig| async move {
            Ok::<_, Error>(config.header("X-Intercepted", "root"))
        }));
        root.register_plugin(Plugin::new("root-only"));

        let child = root.create(RequestConfig::new().base_url("http://child.test"));
        child.get("/x", None).await.unwrap();

        let sent = transport.last_request().unwrap();
        assert_eq!(sent.url, "http://child.test/x");
        assert!(!sent.headers.contains_key("X-Root"));
        assert!(!sent.headers.contains_key("X-Intercepted"));
        assert!(child.plugins().is_empty());
        assert_eq!(root.plugins(), vec!["root-only".to_string()]);
    }

    #[tokio::test]
    async fn test_unregister_plugin() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new());
        api.register_plugin(Plugin::new("a"));
        api.register_plugin(Plugin::new("b"));
        api.register_plugin(Plugin::new("a"));

        assert_eq!(api.unregister_plugin("a"), 2);
        assert_eq!(api.plugins(), vec!["b".to_string()]);
        assert_eq!(api.unregister_plugin("missing"), 0);
    }

    #[test]
    fn test_default_instance() {
        let client = Client::default();
        let defaults = client.defaults();
        assert_eq!(defaults.get_header(CONTENT_TYPE), Some(APPLICATION_JSON));
        assert_eq!(defaults.get_header(ACCEPT), Some(APPLICATION_JSON));
        assert_eq!(defaults.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_independent() {
        let transport = Arc::new(MockTransport::new());
        let api = client_with(&transport, RequestConfig::new().base_url("http://h.test"));

        let (a, b) = tokio::join!(
            api.get("/a", RequestConfig::new().header("X-Call", "a")),
            api.get("/b", RequestConfig::new().header("X-Call", "b")),
        );

        assert_eq!(a.unwrap().config.get_header("X-Call"), Some("a"));
        assert_eq!(b.unwrap().config.get_header("X-Call"), Some("b"));
        assert_eq!(transport.requests().len(), 2);
    }
}
