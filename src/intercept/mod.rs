// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Pipeline extension points: interceptors and plugins

mod builtin;
mod interceptor;
mod plugin;

pub use builtin::{BearerAuth, RequestLogger};
pub(crate) use interceptor::Registry;
pub use interceptor::{
    error_fn, request_fn, response_fn, ErrorAction, ErrorFn, ErrorInterceptor, InterceptorHandle,
    RequestFn, RequestInterceptor, ResponseFn, ResponseInterceptor,
};
pub use plugin::{
    run_after_response, run_before_request, AfterResponseHook, BeforeRequestHook, OnErrorHook,
    Plugin, UNNAMED_PLUGIN,
};
