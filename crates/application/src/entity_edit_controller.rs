use std::fmt::{Display, Formatter};
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;
use warden_domain::{EditableEntity, EntityKind};

use crate::{
    Destination, EntityApi, EntityUpdateListener, NamingPolicyValidator, NavigationSignal,
    Notification, NotificationSink,
};

mod messages;
mod session;

pub use session::EntityEditSession;

use session::SessionState;

/// Identifier of one edit session, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EditSessionId(Uuid);

impl EditSessionId {
    /// Creates a random session identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EditSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EditSessionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Submission phase of an edit session.
///
/// `Idle -> Editing -> Submitting -> {Succeeded, Failed}`; any edit after a
/// finished submission returns to `Editing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditPhase {
    /// Session opened, nothing edited yet.
    Idle,
    /// Candidate name changed since the last submission.
    Editing,
    /// An update request is outstanding.
    Submitting,
    /// Last submission was accepted.
    Succeeded,
    /// Last submission was rejected; the candidate name is kept for retry.
    Failed,
}

/// Validity of the candidate name against the session's naming policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameValidity {
    /// Candidate matches the policy.
    Valid,
    /// Candidate violates the policy.
    Invalid,
    /// No policy available yet; submission stays disabled.
    Indeterminate,
}

impl NameValidity {
    fn from_match(is_valid: bool) -> Self {
        if is_valid { Self::Valid } else { Self::Invalid }
    }
}

/// Result of asking a session for its naming policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyStatus {
    /// A policy is available.
    Loaded,
    /// A fetch is outstanding; no second fetch was started.
    Pending,
    /// The policy could not be fetched.
    Unavailable,
}

/// Result of an update submission that reached the Entity API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
    /// Update accepted.
    Succeeded,
    /// Update rejected; an error notification was emitted.
    Failed,
    /// Session closed before the response arrived; nothing was applied.
    Discarded,
}

/// Result of a confirmed delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteOutcome {
    /// Entity deleted and navigation requested.
    Deleted,
    /// Delete rejected; an error notification was emitted.
    Failed,
    /// Session closed before the response arrived; nothing was applied.
    Discarded,
}

/// Orchestrates rename and delete workflows for roles and groups.
#[derive(Clone)]
pub struct EntityEditController {
    entity_api: Arc<dyn EntityApi>,
    validator: NamingPolicyValidator,
    notifications: Arc<dyn NotificationSink>,
    navigation: Arc<dyn NavigationSignal>,
    update_listener: Option<Arc<dyn EntityUpdateListener>>,
}

impl EntityEditController {
    /// Creates a controller from its collaborators.
    #[must_use]
    pub fn new(
        entity_api: Arc<dyn EntityApi>,
        validator: NamingPolicyValidator,
        notifications: Arc<dyn NotificationSink>,
        navigation: Arc<dyn NavigationSignal>,
    ) -> Self {
        Self {
            entity_api,
            validator,
            notifications,
            navigation,
            update_listener: None,
        }
    }

    /// Adds a callback invoked after every successful update.
    #[must_use]
    pub fn with_update_listener(mut self, update_listener: Arc<dyn EntityUpdateListener>) -> Self {
        self.update_listener = Some(update_listener);
        self
    }

    /// Opens an edit session for one entity.
    ///
    /// The display name is split into its store prefix and bare name; the
    /// naming policy is fetched lazily by [`EntityEditSession::ensure_policy`].
    #[must_use]
    pub fn open_session(&self, entity: EditableEntity) -> EntityEditSession {
        let qualified = entity.qualified_name();
        let state = SessionState::new(qualified.store_prefix, qualified.name);

        EntityEditSession::new(
            EditSessionId::new(),
            Arc::new(entity),
            self.clone(),
            Arc::new(Mutex::new(state)),
        )
    }

    fn notify(&self, notification: Notification) {
        self.notifications.notify(notification);
    }

    fn entity_updated(&self, entity_id: &str) {
        if let Some(listener) = &self.update_listener {
            listener.on_entity_updated(entity_id);
        }
    }

    fn navigate_to_list(&self, kind: EntityKind) {
        let destination = match kind {
            EntityKind::Role => Destination::RoleList,
            EntityKind::Group => Destination::GroupList,
        };
        self.navigation.navigate(destination);
    }
}

#[cfg(test)]
mod tests;
