//! Error types for the MemoryDB resource providers.
//!
//! This module provides the error hierarchy for all handler operations:
//! model validation, remote MemoryDB API calls, and stabilization polling.
//! Errors carry structured context (resource type, identifier) so the
//! invoking orchestrator can render messages; the core never formats
//! user-facing text itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Resource model errors.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// MemoryDB API errors.
    #[error("MemoryDB API error: {0}")]
    Api(#[from] ApiError),

    /// Stabilization errors.
    #[error("Stabilization error: {0}")]
    Stabilize(#[from] StabilizeError),

    /// Serialization errors (request, context or event payloads).
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Resource model errors.
///
/// These fail fast, before any remote call is issued.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The request did not carry the expected resource state.
    #[error("Request is missing the {which} resource state")]
    MissingState {
        /// Which state is missing ("desired" or "previous").
        which: &'static str,
    },

    /// The model does not carry its primary identifier.
    #[error("{type_name} model is missing its primary identifier")]
    MissingIdentifier {
        /// Resource type name.
        type_name: &'static str,
    },

    /// Model validation failed.
    #[error("Validation failed for {type_name}: {message}")]
    Validation {
        /// Resource type name.
        type_name: &'static str,
        /// Description of the validation failure.
        message: String,
    },
}

/// MemoryDB API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The remote resource does not exist.
    #[error("{type_name} not found: {identifier}")]
    NotFound {
        /// Resource type name.
        type_name: &'static str,
        /// Primary identifier of the missing resource.
        identifier: String,
    },

    /// The service throttled the request.
    #[error("Request throttled by the MemoryDB service")]
    Throttling,

    /// The service rejected the request.
    #[error("MemoryDB service error {code}: {message}")]
    Service {
        /// Service error code.
        code: String,
        /// Error message from the service.
        message: String,
    },

    /// Network error reaching the service.
    #[error("Network error communicating with MemoryDB: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The service returned a response the provider cannot interpret.
    #[error("Invalid response from MemoryDB: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Stabilization errors.
#[derive(Debug, Error)]
pub enum StabilizeError {
    /// Poll budget exhausted before the resource reached a stable status.
    #[error("{type_name} {identifier} did not stabilize within {attempts} polls")]
    Timeout {
        /// Resource type name.
        type_name: &'static str,
        /// Primary identifier of the resource.
        identifier: String,
        /// Number of polls performed.
        attempts: u32,
    },

    /// The resource reached a terminal failure status.
    #[error("{type_name} {identifier} entered terminal status: {status}")]
    Failed {
        /// Resource type name.
        type_name: &'static str,
        /// Primary identifier of the resource.
        identifier: String,
        /// The terminal status observed.
        status: String,
    },
}

/// Handler error codes reported back to the provisioning orchestrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum HandlerErrorCode {
    /// The resource does not exist.
    NotFound,
    /// The request was throttled; the orchestrator should retry.
    Throttling,
    /// The resource failed to reach a stable state in time.
    NotStabilized,
    /// The request model is invalid.
    InvalidRequest,
    /// The downstream service rejected the request.
    GeneralServiceException,
    /// A network-level failure occurred.
    NetworkFailure,
    /// Internal provider failure.
    InternalFailure,
}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is retryable by the orchestrator.
    ///
    /// NotFound is deliberately not retryable: a vanished resource is a
    /// terminal condition for every handler except delete stabilization,
    /// which consumes it before it ever reaches this mapping.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError::Throttling | ApiError::Network { .. })
        )
    }

    /// Returns the suggested retry delay in seconds, if applicable.
    #[must_use]
    pub const fn retry_delay_secs(&self) -> Option<u64> {
        match self {
            Self::Api(ApiError::Throttling) => Some(10),
            Self::Api(ApiError::Network { .. }) => Some(5),
            _ => None,
        }
    }

    /// Maps this error onto the orchestrator-facing error code.
    #[must_use]
    pub const fn error_code(&self) -> HandlerErrorCode {
        match self {
            Self::Model(_) => HandlerErrorCode::InvalidRequest,
            Self::Api(api) => match api {
                ApiError::NotFound { .. } => HandlerErrorCode::NotFound,
                ApiError::Throttling => HandlerErrorCode::Throttling,
                ApiError::Network { .. } => HandlerErrorCode::NetworkFailure,
                ApiError::Service { .. } | ApiError::InvalidResponse { .. } => {
                    HandlerErrorCode::GeneralServiceException
                }
            },
            Self::Stabilize(_) => HandlerErrorCode::NotStabilized,
            Self::Serialization(_) | Self::Io(_) | Self::Internal(_) => {
                HandlerErrorCode::InternalFailure
            }
        }
    }
}

impl ModelError {
    /// Creates a validation error for the given resource type.
    #[must_use]
    pub fn validation(type_name: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            type_name,
            message: message.into(),
        }
    }
}

impl ApiError {
    /// Creates a not-found error for the given resource.
    #[must_use]
    pub fn not_found(type_name: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            type_name,
            identifier: identifier.into(),
        }
    }

    /// Creates a network error with the given message.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error with the given message.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns true if this error is the distinguished not-found signal.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_terminal() {
        let err = ProviderError::Api(ApiError::not_found("User", "user-1"));
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), HandlerErrorCode::NotFound);
    }

    #[test]
    fn test_throttling_is_retryable() {
        let err = ProviderError::Api(ApiError::Throttling);
        assert!(err.is_retryable());
        assert_eq!(err.retry_delay_secs(), Some(10));
        assert_eq!(err.error_code(), HandlerErrorCode::Throttling);
    }

    #[test]
    fn test_timeout_distinct_from_not_found() {
        let err = ProviderError::Stabilize(StabilizeError::Timeout {
            type_name: "Cluster",
            identifier: String::from("cache-1"),
            attempts: 120,
        });
        assert_eq!(err.error_code(), HandlerErrorCode::NotStabilized);
    }

    #[test]
    fn test_validation_maps_to_invalid_request() {
        let err = ProviderError::Model(ModelError::validation("Acl", "empty tag key"));
        assert_eq!(err.error_code(), HandlerErrorCode::InvalidRequest);
    }
}
