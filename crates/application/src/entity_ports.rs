use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::PatchRequest;

/// Port for role and group persistence on the backend.
#[async_trait]
pub trait EntityApi: Send + Sync {
    /// Applies a SCIM PatchOp request to an entity.
    async fn update_entity(&self, entity_id: &str, patch: &PatchRequest) -> AppResult<()>;

    /// Deletes an entity.
    async fn delete_entity(&self, entity_id: &str) -> AppResult<()>;
}

/// Port returning naming policy patterns per user store.
#[async_trait]
pub trait NamingPolicyService: Send + Sync {
    /// Returns the name pattern of a store, or of the primary store when `store` is `None`.
    async fn fetch_pattern(&self, store: Option<&str>) -> AppResult<String>;
}

/// Callback invoked after an entity was updated successfully.
pub trait EntityUpdateListener: Send + Sync {
    /// Called with the identifier of the updated entity.
    fn on_entity_updated(&self, entity_id: &str);
}
