use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use warden_core::{AppError, AppResult};
use warden_domain::{
    ApprovalAction, ApprovalActionKind, ApprovalDecision, ApprovalStates, ApprovalTaskDetails,
    ApprovalTaskSummary, TaskState, TaskStatus,
};

use crate::ApprovalApi;

/// Tracks approval task states and guards actions with the transition table.
pub struct ApprovalTaskRegistry {
    api: Arc<dyn ApprovalApi>,
    states: RwLock<HashMap<String, TaskState>>,
}

impl ApprovalTaskRegistry {
    /// Creates an empty registry over the approval API.
    #[must_use]
    pub fn new(api: Arc<dyn ApprovalApi>) -> Self {
        Self {
            api,
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Lists tasks, tracks their statuses and returns them ordered by
    /// priority then creation time.
    pub async fn list(&self, filter: ApprovalStates) -> AppResult<Vec<ApprovalTaskSummary>> {
        filter.status_filter()?;

        let mut summaries = self.api.list_summaries(filter).await?;
        {
            let mut states = self.states.write().await;
            for summary in &summaries {
                let decision = states
                    .get(summary.id.as_str())
                    .map_or(ApprovalDecision::Pending, |state| state.decision);
                states.insert(summary.id.clone(), TaskState::new(summary.status, decision));
            }
        }

        summaries.sort_by_cached_key(|summary| (summary.priority, summary.created_at().ok()));
        debug!(filter = %filter, count = summaries.len(), "listed approval tasks");
        Ok(summaries)
    }

    /// Fetches one task and tracks its decision.
    pub async fn details(&self, task_id: &str) -> AppResult<ApprovalTaskDetails> {
        let details = self.api.get_details(task_id).await?;
        self.track_decision(task_id, details.approval_status).await;
        Ok(details)
    }

    /// Returns the tracked state of a task.
    pub async fn state(&self, task_id: &str) -> Option<TaskState> {
        self.states.read().await.get(task_id).copied()
    }

    /// Performs an action on a tracked task.
    ///
    /// Illegal actions fail with [`AppError::InvalidTransition`] before any
    /// API call. A failed API call leaves the tracked state untouched.
    pub async fn act(
        &self,
        task_id: &str,
        action: ApprovalActionKind,
    ) -> AppResult<ApprovalTaskDetails> {
        let current = self.state(task_id).await.ok_or_else(|| {
            AppError::NotFound(format!("approval task '{task_id}' is not tracked"))
        })?;

        let next = current.apply(action).inspect_err(|error| {
            warn!(
                task_id = %task_id,
                action = %action.as_str(),
                error = %error,
                "rejected approval action"
            );
        })?;

        info!(task_id = %task_id, action = %action.as_str(), "performing approval action");
        let details = self
            .api
            .act(task_id, &ApprovalAction::new(action))
            .await
            .inspect_err(|error| {
                warn!(
                    task_id = %task_id,
                    action = %action.as_str(),
                    error = %error,
                    "approval action failed"
                );
            })?;

        let stored = TaskState::new(next.status, details.approval_status);
        self.states.write().await.insert(task_id.to_owned(), stored);
        info!(
            task_id = %task_id,
            status = %stored.status.as_str(),
            decision = %stored.decision.as_str(),
            "approval task updated"
        );
        Ok(details)
    }

    async fn track_decision(&self, task_id: &str, decision: ApprovalDecision) {
        let mut states = self.states.write().await;
        match states.get_mut(task_id) {
            Some(state) => state.decision = decision,
            None if decision.is_final() => {
                states.insert(
                    task_id.to_owned(),
                    TaskState::new(TaskStatus::Completed, decision),
                );
            }
            None => {}
        }
    }
}
