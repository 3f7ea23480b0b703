use std::fmt::{Display, Formatter};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

impl NotificationLevel {
    /// Returns the stable level value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        }
    }
}

/// User-facing outcome notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Short title.
    pub message: String,
    /// Longer explanation.
    pub description: String,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            description: description.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            description: description.into(),
        }
    }
}

impl Display for Notification {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "[{}] {}: {}",
            self.level.as_str(),
            self.message,
            self.description
        )
    }
}

/// Port receiving user-facing notifications.
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification.
    fn notify(&self, notification: Notification);
}

/// Screen a caller is asked to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Role list screen.
    RoleList,
    /// Group list screen.
    GroupList,
}

impl Destination {
    /// Returns the console route of the destination.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::RoleList => "/roles",
            Self::GroupList => "/groups",
        }
    }
}

/// Port receiving navigation intents.
pub trait NavigationSignal: Send + Sync {
    /// Requests navigation to a destination.
    fn navigate(&self, destination: Destination);
}
