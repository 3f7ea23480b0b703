use std::sync::Arc;

use tracing::warn;
use warden_core::{AppError, AppResult};
use warden_domain::NamingPolicy;

use crate::NamingPolicyService;

/// Fetches and compiles naming policies.
#[derive(Clone)]
pub struct NamingPolicyValidator {
    policy_service: Arc<dyn NamingPolicyService>,
}

impl NamingPolicyValidator {
    /// Creates a validator over a policy service.
    #[must_use]
    pub fn new(policy_service: Arc<dyn NamingPolicyService>) -> Self {
        Self { policy_service }
    }

    /// Fetches the policy of a user store; `None` or an empty store means the primary store.
    ///
    /// Every failure, including an uncompilable pattern, is reported as
    /// [`AppError::PolicyUnavailable`].
    pub async fn fetch_policy(&self, store: Option<&str>) -> AppResult<NamingPolicy> {
        let store = store.map(str::trim).filter(|value| !value.is_empty());

        let pattern = self
            .policy_service
            .fetch_pattern(store)
            .await
            .map_err(|error| {
                warn!(store = ?store, error = %error, "naming policy fetch failed");
                AppError::PolicyUnavailable(format!(
                    "could not fetch naming policy for store '{}': {error}",
                    store.unwrap_or("PRIMARY")
                ))
            })?;

        NamingPolicy::new(pattern).map_err(|error| {
            warn!(store = ?store, error = %error, "naming policy pattern rejected");
            AppError::PolicyUnavailable(error.to_string())
        })
    }

    /// Returns whether the candidate matches the pattern in full.
    #[must_use]
    pub fn validate(candidate: &str, pattern: &str) -> bool {
        warden_domain::validate(candidate, pattern)
    }
}
