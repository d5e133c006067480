// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interceptor traits and registries
//!
//! Three stages: request (config in, config out), response (response in,
//! response out) and error (failure in, [`ErrorAction`] out).

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::http::{RequestConfig, Response};

/// Runs on the configuration just before dispatch
///
/// # Example
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use zuzia::{RequestConfig, RequestInterceptor, Result};
///
/// struct TraceId;
///
/// #[async_trait]
/// impl RequestInterceptor for TraceId {
///     async fn on_request(&self, config: RequestConfig) -> Result<RequestConfig> {
///         Ok(config.header("X-Trace-Id", "abc123"))
///     }
/// }
/// ```
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn on_request(&self, config: RequestConfig) -> Result<RequestConfig>;
}

/// Runs on every successful response
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn on_response(&self, response: Response) -> Result<Response>;
}

/// Runs on every failed exchange, in registration order
#[async_trait]
pub trait ErrorInterceptor: Send + Sync {
    async fn on_error(&self, error: Error) -> ErrorAction;
}

/// Outcome of an error interceptor
#[derive(Debug, Clone)]
pub enum ErrorAction {
    /// Hand the current failure to the next interceptor unchanged
    Continue,
    /// Stop and return this response from `request`
    Resolve(Response),
    /// Replace the current failure; the next interceptor sees this one
    Fail(Error),
}

/// Request interceptor backed by an async closure
pub struct RequestFn<F>(F);

/// Response interceptor backed by an async closure
pub struct ResponseFn<F>(F);

/// Error interceptor backed by an async closure
pub struct ErrorFn<F>(F);

/// Wrap an async closure as a [`RequestInterceptor`]
pub fn request_fn<F, Fut>(f: F) -> RequestFn<F>
where
    F: Fn(RequestConfig) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestConfig>> + Send,
{
    RequestFn(f)
}

/// Wrap an async closure as a [`ResponseInterceptor`]
pub fn response_fn<F, Fut>(f: F) -> ResponseFn<F>
where
    F: Fn(Response) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    ResponseFn(f)
}

/// Wrap an async closure as an [`ErrorInterceptor`]
pub fn error_fn<F, Fut>(f: F) -> ErrorFn<F>
where
    F: Fn(Error) -> Fut + Send + Sync,
    Fut: Future<Output = ErrorAction> + Send,
{
    ErrorFn(f)
}

#[async_trait]
impl<F, Fut> RequestInterceptor for RequestFn<F>
where
    F: Fn(RequestConfig) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RequestConfig>> + Send,
{
    async fn on_request(&self, config: RequestConfig) -> Result<RequestConfig> {
        (self.0)(config).await
    }
}

#[async_trait]
impl<F, Fut> ResponseInterceptor for ResponseFn<F>
where
    F: Fn(Response) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    async fn on_response(&self, response: Response) -> Result<Response> {
        (self.0)(response).await
    }
}

#[async_trait]
impl<F, Fut> ErrorInterceptor for ErrorFn<F>
where
    F: Fn(Error) -> Fut + Send + Sync,
    Fut: Future<Output = ErrorAction> + Send,
{
    async fn on_error(&self, error: Error) -> ErrorAction {
        (self.0)(error).await
    }
}

/// Ordered interceptor list with identity-based removal
pub(crate) struct Registry<T: ?Sized> {
    next_id: AtomicU64,
    entries: RwLock<Vec<(u64, Arc<T>)>>,
}

impl<T: ?Sized> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, item: Arc<T>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().push((id, item));
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.write();
        match entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Current entries, in registration order
    pub(crate) fn snapshot(&self) -> Vec<Arc<T>> {
        self.entries.read().iter().map(|(_, item)| item.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}

trait Deregister: Send + Sync {
    fn deregister(&self, id: u64) -> bool;
}

impl<T: ?Sized + Send + Sync> Deregister for Registry<T> {
    fn deregister(&self, id: u64) -> bool {
        self.remove(id)
    }
}

/// Removes one registered interceptor
///
/// Dropping the handle leaves the interceptor in place.
pub struct InterceptorHandle {
    id: u64,
    registry: Weak<dyn Deregister>,
}

impl InterceptorHandle {
    pub(crate) fn new<T: ?Sized + Send + Sync + 'static>(id: u64, registry: &Arc<Registry<T>>) -> Self {
        let registry: Arc<dyn Deregister> = registry.clone();
        Self {
            id,
            registry: Arc::downgrade(&registry),
        }
    }

    /// Remove the interceptor. Returns false if it was already gone.
    pub fn remove(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.deregister(self.id))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for InterceptorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorHandle").field("id", &self.id).finish()
    }
}
