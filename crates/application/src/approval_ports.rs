use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::{ApprovalAction, ApprovalStates, ApprovalTaskDetails, ApprovalTaskSummary};

/// Port for the backend approval task API.
#[async_trait]
pub trait ApprovalApi: Send + Sync {
    /// Lists approval tasks visible to the caller.
    async fn list_summaries(&self, filter: ApprovalStates) -> AppResult<Vec<ApprovalTaskSummary>>;

    /// Returns the full record of one task.
    async fn get_details(&self, task_id: &str) -> AppResult<ApprovalTaskDetails>;

    /// Performs an action on one task and returns its updated record.
    async fn act(&self, task_id: &str, action: &ApprovalAction) -> AppResult<ApprovalTaskDetails>;
}
