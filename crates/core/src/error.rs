//! Unified error types for wikilink.
//!
//! Cache and credential errors are absorbed by the cache-aside layer and only
//! reach a caller when a cache operation is invoked directly. Upstream errors
//! are terminal for the request that triggered them.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the wikilink service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The secrets broker rejected the login or could not be reached.
    #[error("AUTH_ERROR: {0}")]
    Auth(String),

    /// The broker returned a secret without the expected fields.
    #[error("CREDENTIAL_ERROR: {0}")]
    Credential(String),

    /// Cache backend unreachable, timed out, or failed the command.
    #[error("CACHE_ERROR: {0}")]
    CacheTransport(String),

    /// Upstream returned a non-2xx status or the request failed in transit.
    #[error("UPSTREAM_ERROR: {0}")]
    UpstreamTransport(String),

    /// Upstream body was not the expected JSON shape.
    #[error("UPSTREAM_DECODE_ERROR: {0}")]
    UpstreamDecode(String),
}

impl Error {
    /// Whether this error came from the cache or credential layer.
    ///
    /// These never fail a cache-aside request; the request degrades to an
    /// uncached upstream call instead.
    pub fn is_cache_layer(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::Credential(_) | Error::CacheTransport(_))
    }

    /// Whether this error came from an upstream provider.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::UpstreamTransport(_) | Error::UpstreamDecode(_))
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::CacheTransport(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::CacheTransport(msg) => (-32002, msg.clone()),
            Error::UpstreamTransport(msg) => (-32008, msg.clone()),
            Error::Auth(msg) => (-32009, msg.clone()),
            Error::Credential(msg) => (-32013, msg.clone()),
            Error::UpstreamDecode(msg) => (-32014, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
