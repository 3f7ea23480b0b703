//! Naming policies enforced on role and group names.

use regex::Regex;
use warden_core::{AppError, AppResult};

/// Role name pattern of the primary user store.
pub const PRIMARY_ROLE_NAME_PATTERN: &str = r"^[\S]{3,30}$";

/// Compiled naming policy of one user store.
///
/// Candidates must match the pattern in full, and the empty string never does.
#[derive(Debug, Clone)]
pub struct NamingPolicy {
    pattern: String,
    matcher: Regex,
}

impl NamingPolicy {
    /// Compiles a naming policy from its pattern source.
    pub fn new(pattern: impl Into<String>) -> AppResult<Self> {
        let pattern = pattern.into();
        let matcher = Regex::new(format!("^(?:{pattern})$").as_str()).map_err(|error| {
            AppError::Validation(format!("invalid naming policy pattern '{pattern}': {error}"))
        })?;

        Ok(Self { pattern, matcher })
    }

    /// Returns the primary user-store role name policy.
    pub fn primary() -> AppResult<Self> {
        Self::new(PRIMARY_ROLE_NAME_PATTERN)
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns whether the candidate is an acceptable name.
    #[must_use]
    pub fn is_valid(&self, candidate: &str) -> bool {
        !candidate.is_empty() && self.matcher.is_match(candidate)
    }
}

impl PartialEq for NamingPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for NamingPolicy {}

/// Validates a candidate name against a pattern source.
///
/// A pattern that does not compile accepts nothing.
#[must_use]
pub fn validate(candidate: &str, pattern: &str) -> bool {
    NamingPolicy::new(pattern).is_ok_and(|policy| policy.is_valid(candidate))
}
