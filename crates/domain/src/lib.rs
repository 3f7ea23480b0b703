//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod approval;
mod connector;
mod display_name;
mod entity;
mod membership;
mod naming_policy;
mod scim;

pub use approval::{
    ApprovalAction, ApprovalActionKind, ApprovalDecision, ApprovalStates, ApprovalTaskDetails,
    ApprovalTaskSummary, Property, TaskState, TaskStatus,
};
pub use connector::{OUTBOUND_CONNECTORS, OutboundConnector, find_outbound_connector};
pub use display_name::{STORE_SEPARATOR, QualifiedName, compose_display_name, split_display_name};
pub use entity::{EditableEntity, EntityKind};
pub use membership::{GroupRef, MemberRef, MemberSelection, RoleMembers, UserRef};
pub use naming_policy::{NamingPolicy, PRIMARY_ROLE_NAME_PATTERN, validate};
pub use scim::{PATCH_OP_SCHEMA, PatchOpKind, PatchOperation, PatchRequest};
