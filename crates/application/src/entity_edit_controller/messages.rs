use warden_domain::EntityKind;

use crate::Notification;

pub(super) fn update_succeeded(kind: EntityKind) -> Notification {
    Notification::success(
        format!("{} updated successfully", kind.title()),
        format!("Successfully updated the {}.", kind.as_str()),
    )
}

pub(super) fn update_failed(kind: EntityKind) -> Notification {
    Notification::error(
        "Something went wrong",
        format!("Could not update the {}.", kind.as_str()),
    )
}

pub(super) fn members_updated(kind: EntityKind) -> Notification {
    Notification::success(
        format!("{} members updated successfully", kind.title()),
        format!("Successfully updated the members of the {}.", kind.as_str()),
    )
}

pub(super) fn members_update_failed(kind: EntityKind) -> Notification {
    Notification::error(
        "Something went wrong",
        format!("Could not update the members of the {}.", kind.as_str()),
    )
}

pub(super) fn delete_succeeded(kind: EntityKind) -> Notification {
    Notification::success(
        format!("{} deleted successfully", kind.title()),
        format!("Successfully deleted the {}.", kind.as_str()),
    )
}

pub(super) fn delete_failed(kind: EntityKind) -> Notification {
    Notification::error(
        "Something went wrong",
        format!("Could not delete the {}.", kind.as_str()),
    )
}

pub(super) fn policy_unavailable(kind: EntityKind) -> Notification {
    Notification::error(
        "Naming policy unavailable",
        format!(
            "Could not load the {} name policy of the user store. Updates are disabled.",
            kind.as_str()
        ),
    )
}
