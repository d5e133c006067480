// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for zuzia
//!
//! A failed request surfaces exactly one transport-level variant
//! (`Http`, `Network` or `Timeout`). Plugin and interceptor failures have
//! their own variants so callers can tell "the server said no" apart from
//! "our own middleware said no".

use thiserror::Error;

use crate::http::ResponseSnapshot;

/// Result type alias for zuzia operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for zuzia
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The transport round-trip succeeded but the status code is not 2xx
    #[error("{message}")]
    Http {
        message: String,
        status: u16,
        response: Box<ResponseSnapshot>,
    },

    /// The transport call itself failed (DNS, refused connection, TLS, ...)
    #[error("Network error: {message}")]
    Network { message: String },

    /// The cancellation token fired before the response arrived
    #[error("{message}")]
    Timeout { message: String },

    /// A plugin hook failed
    #[error("Plugin '{plugin}' failed: {source}")]
    Plugin {
        plugin: String,
        #[source]
        source: Box<Error>,
    },

    /// An interceptor rejected the value flowing through it
    #[error("Interceptor error: {0}")]
    Interceptor(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an HTTP status error
    pub fn http(message: impl Into<String>, status: u16, response: ResponseSnapshot) -> Self {
        Error::Http {
            message: message.into(),
            status,
            response: Box::new(response),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network { message: msg.into() }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout { message: msg.into() }
    }

    /// Wrap a hook failure with the name of the plugin that raised it
    pub fn plugin(plugin: impl Into<String>, source: Error) -> Self {
        Error::Plugin {
            plugin: plugin.into(),
            source: Box::new(source),
        }
    }

    /// Create an interceptor error
    pub fn interceptor<S: Into<String>>(msg: S) -> Self {
        Error::Interceptor(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    /// Check if this is an HTTP status error
    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http { .. })
    }

    /// Check if this came from a plugin hook
    pub fn is_plugin(&self) -> bool {
        matches!(self, Error::Plugin { .. })
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status().map(|s| (400..500).contains(&s)).unwrap_or(false)
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status().map(|s| (500..600).contains(&s)).unwrap_or(false)
    }

    /// Get HTTP status code if available
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the response snapshot of an HTTP status error
    pub fn response(&self) -> Option<&ResponseSnapshot> {
        match self {
            Error::Http { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Stable kind name, handy for logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Http { .. } => "HttpError",
            Error::Network { .. } => "NetworkError",
            Error::Timeout { .. } => "TimeoutError",
            Error::Plugin { .. } => "PluginError",
            Error::Interceptor(_) => "InterceptorError",
            Error::Serialization(_) => "SerializationError",
            Error::Other(_) => "Error",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
