// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors crossing every layer boundary, from the store up to the GraphQL resolvers.
///
/// None of these are retried by the layer that observes them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Persistence failure. The message is for logs only and must not reach a client.
    #[error("storage error: {0}")]
    Storage(String),

    /// Gateway-to-server call failure (transport, deadline or server-side internal error).
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: u64) -> Self {
        Self::NotFound(format!("{entity} with id {id} not found"))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Unauthenticated(_) => ErrorCode::Unauthenticated,
            Self::Storage(_) => ErrorCode::Internal,
            Self::Upstream(_) => ErrorCode::Upstream,
        }
    }

    /// Message that is safe to show to a caller. Internal failures are replaced by a generic text.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(message) => message.clone(),
            Self::InvalidArgument(_) | Self::Unauthenticated(_) => self.to_string(),
            Self::Storage(_) => "An internal error occurred.".to_string(),
            Self::Upstream(_) => "The task service is unavailable.".to_string(),
        }
    }
}

/// Stable, client-visible error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    InvalidArgument,
    Unauthenticated,
    Internal,
    Upstream,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Internal => "INTERNAL",
            Self::Upstream => "UPSTREAM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ServiceError::not_found("task", 5), ErrorCode::NotFound)]
    #[case(ServiceError::invalid_argument("bad date"), ErrorCode::InvalidArgument)]
    #[case(ServiceError::unauthenticated("no session"), ErrorCode::Unauthenticated)]
    #[case(ServiceError::storage("disk full"), ErrorCode::Internal)]
    #[case(ServiceError::upstream("connection refused"), ErrorCode::Upstream)]
    fn test_error_codes(#[case] error: ServiceError, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let error = ServiceError::storage("no such table: tasks");
        assert!(!error.public_message().contains("tasks"));

        let error = ServiceError::upstream("tcp connect error 127.0.0.1:50051");
        assert!(!error.public_message().contains("127.0.0.1"));
    }

    #[test]
    fn test_not_found_message_names_entity_and_id() {
        assert_eq!(
            ServiceError::not_found("subtask", 42).to_string(),
            "subtask with id 42 not found"
        );
    }

    #[test]
    fn test_error_code_serializes_in_screaming_case() {
        let json = serde_json::to_string(&ErrorCode::InvalidArgument).unwrap();
        assert_eq!(json, "\"INVALID_ARGUMENT\"");
        assert_eq!(ErrorCode::InvalidArgument.as_str(), "INVALID_ARGUMENT");
    }
}
