//! SCIM 2.0 PatchOp request envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Schema URN every PatchOp request carries.
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// PatchOp operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOpKind {
    /// Adds values to a multi-valued attribute.
    Add,
    /// Removes the values selected by `path`.
    Remove,
    /// Replaces attribute values.
    Replace,
}

/// One operation inside a PatchOp request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation kind.
    pub op: PatchOpKind,
    /// Optional attribute path or filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Optional operation value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// PatchOp request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    /// Message schemas.
    pub schemas: Vec<String>,
    /// Ordered operations.
    #[serde(rename = "Operations")]
    pub operations: Vec<PatchOperation>,
}

impl PatchRequest {
    /// Creates a PatchOp request from operations.
    #[must_use]
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            schemas: vec![PATCH_OP_SCHEMA.to_owned()],
            operations,
        }
    }

    /// Creates the request that renames an entity.
    #[must_use]
    pub fn replace_display_name(display_name: &str) -> Self {
        Self::new(vec![PatchOperation {
            op: PatchOpKind::Replace,
            path: None,
            value: Some(json!({ "displayName": display_name })),
        }])
    }

    /// Returns the display name a rename request sets, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.operations
            .iter()
            .filter(|operation| operation.op == PatchOpKind::Replace)
            .find_map(|operation| {
                operation
                    .value
                    .as_ref()
                    .and_then(|value| value.get("displayName"))
                    .and_then(Value::as_str)
            })
    }
}
