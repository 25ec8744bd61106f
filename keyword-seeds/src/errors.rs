//! Error types for seed keyword generation.
//!
//! Remote failures are reported in two layers: [`ServiceError`] is what a
//! [`TargetingIdeaService`](crate::service::TargetingIdeaService) returns for a
//! single call, and [`QueryError`] is what the fetcher reports after collapsing
//! any such failure into one all-or-nothing outcome.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// The main error type for keyword seed operations.
#[derive(Debug, Error)]
pub enum KeywordSeedError {
    /// The remote targeting idea query failed.
    #[error("{0}")]
    Query(#[from] QueryError),

    /// The same keyword text was returned more than once.
    #[error("{0}")]
    DuplicateKeyword(#[from] DuplicateKeywordError),

    /// A returned idea could not be interpreted.
    #[error("Malformed targeting idea at offset {offset}: {reason}")]
    MalformedIdea {
        /// Page offset the idea was returned on.
        offset: i32,
        /// What was wrong with it.
        reason: String,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeywordSeedError {
    /// Creates a malformed idea error.
    #[must_use]
    pub fn malformed_idea(offset: i32, reason: impl Into<String>) -> Self {
        Self::MalformedIdea {
            offset,
            reason: reason.into(),
        }
    }

    /// Whether this error came from the remote service.
    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

/// Failure of a single call to the targeting idea service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The service processed the request and rejected it.
    #[error("API error{}: {message}", code.as_ref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    Api {
        /// Service specific error code, if reported.
        code: Option<String>,
        /// Error message.
        message: String,
    },

    /// The service rejected the request because a rate limit was exceeded.
    #[error("Rate exceeded: {message} (retry after {}ms)", retry_after.as_millis())]
    RateExceeded {
        /// How long the service asked the caller to wait.
        retry_after: Duration,
        /// Error message.
        message: String,
    },

    /// The service could not be reached or the response could not be read.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ServiceError {
    /// Creates an API error.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            code: None,
            message: message.into(),
        }
    }

    /// Creates an API error with a service error code.
    #[must_use]
    pub fn api_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Creates a rate exceeded error.
    #[must_use]
    pub fn rate_exceeded(retry_after: Duration, message: impl Into<String>) -> Self {
        Self::RateExceeded {
            retry_after,
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Whether the limiter may retry this failure.
    #[must_use]
    pub fn is_rate_exceeded(&self) -> bool {
        matches!(self, Self::RateExceeded { .. })
    }

    /// Which side of the wire failed.
    #[must_use]
    pub fn kind(&self) -> QueryErrorKind {
        match self {
            Self::Api { .. } | Self::RateExceeded { .. } => QueryErrorKind::Service,
            Self::Transport(_) => QueryErrorKind::Transport,
        }
    }
}

/// Classification of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryErrorKind {
    /// Service-level fault.
    Service,
    /// Transport or connectivity fault.
    Transport,
}

/// Error raised when querying the targeting idea service fails.
#[derive(Debug, Clone, Error)]
#[error("{message}: {source}")]
pub struct QueryError {
    /// Human readable description.
    pub message: String,
    /// Fault classification.
    pub kind: QueryErrorKind,
    /// The underlying call failure.
    #[source]
    pub source: ServiceError,
}

impl QueryError {
    /// Message for service-level faults.
    pub const SERVICE_MESSAGE: &'static str = "Problem while querying the targeting idea service";

    /// Message for transport faults.
    pub const TRANSPORT_MESSAGE: &'static str =
        "Problem while connecting to the targeting idea service";

    /// Wraps a service-level fault.
    #[must_use]
    pub fn service(source: ServiceError) -> Self {
        Self {
            message: Self::SERVICE_MESSAGE.to_string(),
            kind: QueryErrorKind::Service,
            source,
        }
    }

    /// Wraps a transport fault.
    #[must_use]
    pub fn transport(source: ServiceError) -> Self {
        Self {
            message: Self::TRANSPORT_MESSAGE.to_string(),
            kind: QueryErrorKind::Transport,
            source,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("message".to_string(), serde_json::json!(self.message));
        map.insert("kind".to_string(), serde_json::json!(self.kind));
        map.insert("cause".to_string(), serde_json::json!(self.source.to_string()));
        map
    }
}

impl From<ServiceError> for QueryError {
    fn from(err: ServiceError) -> Self {
        match err.kind() {
            QueryErrorKind::Service => Self::service(err),
            QueryErrorKind::Transport => Self::transport(err),
        }
    }
}

impl From<ServiceError> for KeywordSeedError {
    fn from(err: ServiceError) -> Self {
        Self::Query(err.into())
    }
}

/// Error raised when a keyword is returned twice and duplicates are rejected.
#[derive(Debug, Clone, Error)]
#[error("Duplicate keyword '{keyword}' returned at offset {offset}")]
pub struct DuplicateKeywordError {
    /// The repeated keyword text.
    pub keyword: String,
    /// Page offset of the repeated occurrence.
    pub offset: i32,
}

impl DuplicateKeywordError {
    /// Creates a new duplicate keyword error.
    #[must_use]
    pub fn new(keyword: impl Into<String>, offset: i32) -> Self {
        Self {
            keyword: keyword.into(),
            offset,
        }
    }
}
