use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use warden_application::EntityApi;
use warden_core::AppResult;
use warden_domain::{EntityKind, PatchRequest};

use crate::BackendClient;
use crate::backend_client::path_segment;

/// SCIM2 adapter for role and group updates.
#[derive(Clone)]
pub struct ScimEntityApi {
    backend: BackendClient,
    kind: EntityKind,
}

impl ScimEntityApi {
    /// Creates an adapter for one entity kind.
    #[must_use]
    pub fn new(backend: BackendClient, kind: EntityKind) -> Self {
        Self { backend, kind }
    }

    fn resource_path(&self, entity_id: &str) -> AppResult<String> {
        let entity_id = path_segment(entity_id, self.kind.as_str())?;
        let collection = match self.kind {
            EntityKind::Role => "Roles",
            EntityKind::Group => "Groups",
        };
        Ok(format!("scim2/{collection}/{entity_id}"))
    }
}

#[async_trait]
impl EntityApi for ScimEntityApi {
    async fn update_entity(&self, entity_id: &str, patch: &PatchRequest) -> AppResult<()> {
        let url = self.backend.endpoint(self.resource_path(entity_id)?.as_str());
        debug!(entity_id = %entity_id, kind = self.kind.as_str(), "patching scim resource");

        let builder = self.backend.request(Method::PATCH, url).json(patch);
        self.backend
            .send_empty(builder, format!("{} update", self.kind.as_str()).as_str())
            .await
    }

    async fn delete_entity(&self, entity_id: &str) -> AppResult<()> {
        let url = self.backend.endpoint(self.resource_path(entity_id)?.as_str());
        debug!(entity_id = %entity_id, kind = self.kind.as_str(), "deleting scim resource");

        let builder = self.backend.request(Method::DELETE, url);
        self.backend
            .send_empty(builder, format!("{} delete", self.kind.as_str()).as_str())
            .await
    }
}
