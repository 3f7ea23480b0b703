use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;
use warden_application::NamingPolicyService;
use warden_core::{AppError, AppResult};

use crate::BackendClient;

const PRIMARY_STORE: &str = "PRIMARY";
const ROLE_NAME_PROPERTY: &str = "RolenameJavaScriptRegEx";

#[derive(Debug, Deserialize)]
struct UserStoreResponse {
    #[serde(default)]
    properties: Vec<UserStoreProperty>,
}

#[derive(Debug, Deserialize)]
struct UserStoreProperty {
    name: String,
    value: String,
}

/// Resolves role name patterns from user-store configuration.
///
/// The primary store pattern comes from configuration; secondary stores are
/// read from the user-store management API.
#[derive(Clone)]
pub struct UserStoreNamingPolicyService {
    backend: BackendClient,
    primary_pattern: String,
}

impl UserStoreNamingPolicyService {
    /// Creates a policy service with the configured primary store pattern.
    #[must_use]
    pub fn new(backend: BackendClient, primary_pattern: impl Into<String>) -> Self {
        Self {
            backend,
            primary_pattern: primary_pattern.into(),
        }
    }

    /// Returns the user-store identifier used by the management API.
    #[must_use]
    pub fn store_id(store: &str) -> String {
        URL_SAFE_NO_PAD.encode(store.as_bytes())
    }
}

#[async_trait]
impl NamingPolicyService for UserStoreNamingPolicyService {
    async fn fetch_pattern(&self, store: Option<&str>) -> AppResult<String> {
        let store = match store.map(str::trim) {
            Some(store) if !store.is_empty() && !store.eq_ignore_ascii_case(PRIMARY_STORE) => {
                store
            }
            _ => return Ok(self.primary_pattern.clone()),
        };

        let url = self.backend.endpoint(
            format!("api/server/v1/userstores/{}", Self::store_id(store)).as_str(),
        );
        debug!(store = %store, "fetching user-store naming policy");

        let response: UserStoreResponse = self
            .backend
            .send_json(self.backend.request(Method::GET, url), "user-store lookup")
            .await?;

        response
            .properties
            .into_iter()
            .find(|property| property.name == ROLE_NAME_PROPERTY)
            .map(|property| property.value)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "user store '{store}' has no {ROLE_NAME_PROPERTY} property"
                ))
            })
    }
}
