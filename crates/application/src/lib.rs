//! Application services and ports.

#![forbid(unsafe_code)]

mod approval_ports;
mod approval_task_registry;
mod entity_edit_controller;
mod entity_ports;
mod naming_policy_validator;
mod notification_ports;

pub use approval_ports::ApprovalApi;
pub use approval_task_registry::ApprovalTaskRegistry;
pub use entity_edit_controller::{
    DeleteOutcome, EditPhase, EditSessionId, EntityEditController, EntityEditSession,
    NameValidity, PolicyStatus, SubmitOutcome,
};
pub use entity_ports::{EntityApi, EntityUpdateListener, NamingPolicyService};
pub use naming_policy_validator::NamingPolicyValidator;
pub use notification_ports::{
    Destination, NavigationSignal, Notification, NotificationLevel, NotificationSink,
};
