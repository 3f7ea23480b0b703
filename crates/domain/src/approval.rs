//! Approval task model and its lifecycle transitions.
//!
//! A task moves through `READY -> RESERVED -> COMPLETED` while its decision
//! moves from `PENDING` to either `APPROVE` or `REJECT`. [`TaskState::apply`]
//! holds the only legal transitions.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult};

/// Every state and action token understood by the approval API.
///
/// `Default` and `All` are list filter sentinels and never describe a stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStates {
    /// Backend default listing.
    Default,
    /// Task is waiting to be claimed.
    Ready,
    /// Task reached a final decision.
    Completed,
    /// Task is claimed by an approver.
    Reserved,
    /// Decision not recorded yet.
    Pending,
    /// Claim a ready task.
    Claim,
    /// Release a reserved task.
    Release,
    /// Approve a reserved task.
    Approve,
    /// Reject a reserved task.
    Reject,
    /// Every task regardless of status.
    All,
}

impl ApprovalStates {
    /// Returns the stable transport value for this token.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
            Self::Reserved => "RESERVED",
            Self::Pending => "PENDING",
            Self::Claim => "CLAIM",
            Self::Release => "RELEASE",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
            Self::All => "ALL",
        }
    }

    /// Returns all known tokens.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ApprovalStates] = &[
            ApprovalStates::Default,
            ApprovalStates::Ready,
            ApprovalStates::Completed,
            ApprovalStates::Reserved,
            ApprovalStates::Pending,
            ApprovalStates::Claim,
            ApprovalStates::Release,
            ApprovalStates::Approve,
            ApprovalStates::Reject,
            ApprovalStates::All,
        ];

        ALL
    }

    /// Interprets this token as a task list filter.
    ///
    /// `None` means no status restriction.
    pub fn status_filter(self) -> AppResult<Option<TaskStatus>> {
        match self {
            Self::Default | Self::All => Ok(None),
            Self::Ready => Ok(Some(TaskStatus::Ready)),
            Self::Reserved => Ok(Some(TaskStatus::Reserved)),
            Self::Completed => Ok(Some(TaskStatus::Completed)),
            other => Err(AppError::Validation(format!(
                "'{}' is not a task list filter",
                other.as_str()
            ))),
        }
    }
}

impl Display for ApprovalStates {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStates {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|state| state.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| AppError::Validation(format!("unknown approval state '{value}'")))
    }
}

/// Lifecycle status of an approval task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Waiting to be claimed.
    Ready,
    /// Claimed by an approver.
    Reserved,
    /// Terminal.
    Completed,
}

impl TaskStatus {
    /// Returns the stable transport value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        ApprovalStates::from(*self).as_str()
    }
}

impl From<TaskStatus> for ApprovalStates {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Ready => Self::Ready,
            TaskStatus::Reserved => Self::Reserved,
            TaskStatus::Completed => Self::Completed,
        }
    }
}

/// Recorded decision of an approval task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalDecision {
    /// No decision yet.
    Pending,
    /// Approved. Terminal.
    Approve,
    /// Rejected. Terminal.
    Reject,
}

impl ApprovalDecision {
    /// Returns the stable transport value for this decision.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        ApprovalStates::from(*self).as_str()
    }

    /// Returns whether the decision can no longer change.
    #[must_use]
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl From<ApprovalDecision> for ApprovalStates {
    fn from(value: ApprovalDecision) -> Self {
        match value {
            ApprovalDecision::Pending => Self::Pending,
            ApprovalDecision::Approve => Self::Approve,
            ApprovalDecision::Reject => Self::Reject,
        }
    }
}

/// Action an approver may request on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalActionKind {
    /// Reserve a ready task.
    Claim,
    /// Return a reserved task to the ready pool.
    Release,
    /// Approve a reserved task.
    Approve,
    /// Reject a reserved task.
    Reject,
}

impl ApprovalActionKind {
    /// Returns the stable transport value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        ApprovalStates::from(*self).as_str()
    }
}

impl From<ApprovalActionKind> for ApprovalStates {
    fn from(value: ApprovalActionKind) -> Self {
        match value {
            ApprovalActionKind::Claim => Self::Claim,
            ApprovalActionKind::Release => Self::Release,
            ApprovalActionKind::Approve => Self::Approve,
            ApprovalActionKind::Reject => Self::Reject,
        }
    }
}

impl FromStr for ApprovalActionKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match ApprovalStates::from_str(value)? {
            ApprovalStates::Claim => Ok(Self::Claim),
            ApprovalStates::Release => Ok(Self::Release),
            ApprovalStates::Approve => Ok(Self::Approve),
            ApprovalStates::Reject => Ok(Self::Reject),
            other => Err(AppError::Validation(format!(
                "'{}' is not an approval action",
                other.as_str()
            ))),
        }
    }
}

/// Request body for one approval action call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalAction {
    /// Action to perform on the task.
    pub action: ApprovalActionKind,
}

impl ApprovalAction {
    /// Creates an action request.
    #[must_use]
    pub fn new(action: ApprovalActionKind) -> Self {
        Self { action }
    }
}

/// Opaque key/value pair. Duplicate keys are legal and keep their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: String,
}

/// Listing projection of an approval task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalTaskSummary {
    /// Unique task identifier.
    pub id: String,
    /// Unique task name, distinct from `id`.
    pub name: String,
    /// Display value for the operation awaiting approval.
    pub presentation_subject: String,
    /// Display value for the task.
    pub presentation_name: String,
    /// Type tag of the task.
    pub task_type: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Task priority.
    pub priority: i32,
    /// Creation time as string-encoded epoch milliseconds.
    pub created_time_in_millis: String,
}

impl ApprovalTaskSummary {
    /// Parses the creation time into a UTC timestamp.
    pub fn created_at(&self) -> AppResult<DateTime<Utc>> {
        let millis = self
            .created_time_in_millis
            .trim()
            .parse::<i64>()
            .map_err(|error| {
                AppError::Validation(format!(
                    "invalid createdTimeInMillis '{}' for task '{}': {error}",
                    self.created_time_in_millis, self.id
                ))
            })?;

        DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            AppError::Validation(format!(
                "createdTimeInMillis '{millis}' for task '{}' is out of range",
                self.id
            ))
        })
    }
}

/// Full record of one approval task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalTaskDetails {
    /// Unique task identifier.
    pub id: String,
    /// Subject of the approval.
    pub subject: String,
    /// Task description.
    pub description: String,
    /// Task priority.
    pub priority: i32,
    /// Principal that requested the operation.
    pub initiator: String,
    /// Decision, `PENDING` until the task completes.
    pub approval_status: ApprovalDecision,
    /// Principals the task is assigned to.
    #[serde(default)]
    pub assignees: Vec<Property>,
    /// Extension properties.
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Status and decision pair the transition table operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskState {
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Recorded decision.
    pub decision: ApprovalDecision,
}

impl TaskState {
    /// Creates a state from both components.
    #[must_use]
    pub fn new(status: TaskStatus, decision: ApprovalDecision) -> Self {
        Self { status, decision }
    }

    /// Creates a state for a task whose decision has not been observed.
    #[must_use]
    pub fn pending(status: TaskStatus) -> Self {
        Self::new(status, ApprovalDecision::Pending)
    }

    /// Returns whether no action is legal anymore.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status == TaskStatus::Completed || self.decision.is_final()
    }

    /// Applies one action and returns the resulting state.
    ///
    /// Illegal combinations fail with [`AppError::InvalidTransition`]; `self`
    /// is never modified.
    pub fn apply(self, action: ApprovalActionKind) -> AppResult<Self> {
        if self.decision.is_final() {
            return Err(self.invalid(action, "decision is already final"));
        }

        match (action, self.status) {
            (ApprovalActionKind::Claim, TaskStatus::Ready) => {
                Ok(Self::pending(TaskStatus::Reserved))
            }
            (ApprovalActionKind::Release, TaskStatus::Reserved) => {
                Ok(Self::pending(TaskStatus::Ready))
            }
            (ApprovalActionKind::Approve, TaskStatus::Reserved) => Ok(Self::new(
                TaskStatus::Completed,
                ApprovalDecision::Approve,
            )),
            (ApprovalActionKind::Reject, TaskStatus::Reserved) => Ok(Self::new(
                TaskStatus::Completed,
                ApprovalDecision::Reject,
            )),
            (ApprovalActionKind::Claim, _) => Err(self.invalid(action, "task must be READY")),
            (_, _) => Err(self.invalid(action, "task must be RESERVED")),
        }
    }

    fn invalid(self, action: ApprovalActionKind, reason: &str) -> AppError {
        AppError::InvalidTransition(format!(
            "cannot {} task in status {} with decision {}: {reason}",
            action.as_str(),
            self.status.as_str(),
            self.decision.as_str()
        ))
    }
}
