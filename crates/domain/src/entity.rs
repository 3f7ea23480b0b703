use serde::{Deserialize, Serialize};
use warden_core::NonEmptyString;

use crate::QualifiedName;

/// Kind of entity an edit session targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Role entity.
    Role,
    /// Group entity.
    Group,
}

impl EntityKind {
    /// Maps the `isGroup` discriminator to an entity kind.
    #[must_use]
    pub fn from_is_group(is_group: bool) -> Self {
        if is_group { Self::Group } else { Self::Role }
    }

    /// Returns whether this is a group.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Returns the lowercase noun for messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Group => "group",
        }
    }

    /// Returns the capitalized noun for message titles.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Role => "Role",
            Self::Group => "Group",
        }
    }
}

/// Role or group targeted by an edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableEntity {
    entity_id: NonEmptyString,
    display_name: String,
    kind: EntityKind,
}

impl EditableEntity {
    /// Creates an editable entity reference.
    #[must_use]
    pub fn new(entity_id: NonEmptyString, display_name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            entity_id,
            display_name: display_name.into(),
            kind,
        }
    }

    /// Returns the stable entity identifier.
    #[must_use]
    pub fn entity_id(&self) -> &NonEmptyString {
        &self.entity_id
    }

    /// Returns the current display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the entity kind.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the display name split into store prefix and bare name.
    #[must_use]
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::parse(self.display_name.as_str())
    }
}
