use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use url::Url;
use warden_application::ApprovalApi;
use warden_core::AppResult;
use warden_domain::{ApprovalAction, ApprovalStates, ApprovalTaskDetails, ApprovalTaskSummary};

use crate::BackendClient;
use crate::backend_client::path_segment;

const APPROVAL_TASKS_PATH: &str = "api/users/v1/me/approval-tasks";

/// HTTP adapter for the caller's approval tasks.
#[derive(Clone)]
pub struct HttpApprovalApi {
    backend: BackendClient,
}

impl HttpApprovalApi {
    /// Creates an approval API adapter.
    #[must_use]
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    fn task_url(&self, task_id: &str, suffix: &str) -> AppResult<Url> {
        let task_id = path_segment(task_id, "approval task")?;
        Ok(self
            .backend
            .endpoint(format!("{APPROVAL_TASKS_PATH}/{task_id}{suffix}").as_str()))
    }
}

#[async_trait]
impl ApprovalApi for HttpApprovalApi {
    async fn list_summaries(&self, filter: ApprovalStates) -> AppResult<Vec<ApprovalTaskSummary>> {
        let mut url = self.backend.endpoint(APPROVAL_TASKS_PATH);
        if let Some(status) = filter.status_filter()? {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }

        debug!(filter = %filter, "listing approval tasks");
        self.backend
            .send_json(
                self.backend.request(Method::GET, url),
                "approval task listing",
            )
            .await
    }

    async fn get_details(&self, task_id: &str) -> AppResult<ApprovalTaskDetails> {
        let url = self.task_url(task_id, "")?;
        self.backend
            .send_json(
                self.backend.request(Method::GET, url),
                "approval task lookup",
            )
            .await
    }

    async fn act(&self, task_id: &str, action: &ApprovalAction) -> AppResult<ApprovalTaskDetails> {
        let url = self.task_url(task_id, "/state")?;
        debug!(task_id = %task_id, action = action.action.as_str(), "updating approval task state");

        self.backend
            .send_empty(
                self.backend.request(Method::PUT, url).json(action),
                "approval task state update",
            )
            .await?;

        self.get_details(task_id).await
    }
}
