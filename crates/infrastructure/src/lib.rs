//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod backend_client;
mod http_approval_api;
mod recording_navigation_signal;
mod scim_entity_api;
mod tracing_notification_sink;
mod userstore_naming_policy_service;

pub use backend_client::BackendClient;
pub use http_approval_api::HttpApprovalApi;
pub use recording_navigation_signal::RecordingNavigationSignal;
pub use scim_entity_api::ScimEntityApi;
pub use tracing_notification_sink::TracingNotificationSink;
pub use userstore_naming_policy_service::UserStoreNamingPolicyService;
