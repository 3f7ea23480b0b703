//! Shared primitives for all Rust crates in Warden.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Warden crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Default tenant of a freshly installed identity server.
pub const SUPER_TENANT_DOMAIN: &str = "carbon.super";

/// Tenant domain used as the `/t/{tenant}` path segment of every backend call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantDomain(String);

impl TenantDomain {
    /// Creates a validated tenant domain.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_lowercase();
        if value.is_empty() {
            return Err(AppError::Validation(
                "tenant domain must not be empty".to_owned(),
            ));
        }

        if value.contains('/') || value.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "tenant domain '{value}' must not contain '/' or whitespace"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the super tenant domain.
    #[must_use]
    pub fn super_tenant() -> Self {
        Self(SUPER_TENANT_DOMAIN.to_owned())
    }

    /// Returns the underlying domain string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the tenant-qualified path prefix, for example `/t/carbon.super`.
    #[must_use]
    pub fn path_prefix(&self) -> String {
        format!("/t/{}", self.0)
    }
}

impl Default for TenantDomain {
    fn default() -> Self {
        Self::super_tenant()
    }
}

impl Display for TenantDomain {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant. Never reaches the network.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation conflicts with current state, such as a request already in flight.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated against the backend.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by backend authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Naming policy could not be fetched or compiled.
    #[error("naming policy unavailable: {0}")]
    PolicyUnavailable(String),

    /// Entity API rejected an update request.
    #[error("update failed: {0}")]
    UpdateFailed(String),

    /// Entity API rejected a delete request.
    #[error("delete failed: {0}")]
    DeleteFailed(String),

    /// Approval task action is not legal in the task's current state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
