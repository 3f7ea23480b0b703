//! Typed member selections for role assignment.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use warden_core::{AppError, AppResult};

use crate::{PatchOpKind, PatchOperation, PatchRequest};

/// Member reference that can be assigned to a role.
pub trait MemberRef: Clone + PartialEq {
    /// Multi-valued SCIM attribute holding this kind of member.
    const ATTRIBUTE: &'static str;

    /// Returns the member identifier.
    fn member_id(&self) -> &str;

    /// Returns the human-readable member name.
    fn display(&self) -> &str;
}

/// Group reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRef {
    /// Group identifier.
    pub id: String,
    /// Group display name.
    pub display_name: String,
}

impl MemberRef for GroupRef {
    const ATTRIBUTE: &'static str = "groups";

    fn member_id(&self) -> &str {
        self.id.as_str()
    }

    fn display(&self) -> &str {
        self.display_name.as_str()
    }
}

/// User reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    /// User identifier.
    pub id: String,
    /// Login name.
    pub user_name: String,
}

impl MemberRef for UserRef {
    const ATTRIBUTE: &'static str = "users";

    fn member_id(&self) -> &str {
        self.id.as_str()
    }

    fn display(&self) -> &str {
        self.user_name.as_str()
    }
}

/// Initial and currently selected members of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSelection<T: MemberRef> {
    initial: Vec<T>,
    selected: Vec<T>,
}

impl<T: MemberRef> Default for MemberSelection<T> {
    fn default() -> Self {
        Self {
            initial: Vec::new(),
            selected: Vec::new(),
        }
    }
}

impl<T: MemberRef> MemberSelection<T> {
    /// Starts a selection from the members currently assigned.
    #[must_use]
    pub fn new(initial: Vec<T>) -> Self {
        Self {
            selected: initial.clone(),
            initial,
        }
    }

    /// Replaces the selected members.
    pub fn set_selected(&mut self, selected: Vec<T>) {
        self.selected = selected;
    }

    /// Selects one more member unless already selected.
    pub fn select(&mut self, member: T) {
        if !self.contains_selected(member.member_id()) {
            self.selected.push(member);
        }
    }

    /// Deselects a member by identifier.
    pub fn deselect(&mut self, member_id: &str) {
        self.selected.retain(|member| member.member_id() != member_id);
    }

    /// Returns the selected members.
    #[must_use]
    pub fn selected(&self) -> &[T] {
        self.selected.as_slice()
    }

    /// Returns members selected now but not initially, in selection order.
    #[must_use]
    pub fn added(&self) -> Vec<&T> {
        self.selected
            .iter()
            .filter(|member| !contains(&self.initial, member.member_id()))
            .collect()
    }

    /// Returns members assigned initially but no longer selected, in initial order.
    #[must_use]
    pub fn removed(&self) -> Vec<&T> {
        self.initial
            .iter()
            .filter(|member| !self.contains_selected(member.member_id()))
            .collect()
    }

    /// Returns whether the selection differs from the initial assignment.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.added().is_empty() || !self.removed().is_empty()
    }

    fn contains_selected(&self, member_id: &str) -> bool {
        contains(&self.selected, member_id)
    }
}

fn contains<T: MemberRef>(members: &[T], member_id: &str) -> bool {
    members.iter().any(|member| member.member_id() == member_id)
}

/// Group and user selections of one role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleMembers {
    /// Group selection.
    pub groups: MemberSelection<GroupRef>,
    /// User selection.
    pub users: MemberSelection<UserRef>,
}

impl RoleMembers {
    /// Returns whether either selection changed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.groups.is_changed() || self.users.is_changed()
    }

    /// Builds the PatchOp request applying the selection changes.
    ///
    /// Additions share one `add` operation; each removal gets its own
    /// `remove` operation with a value filter path.
    pub fn to_patch_request(&self) -> AppResult<PatchRequest> {
        if !self.is_changed() {
            return Err(AppError::Validation(
                "member selection has no changes".to_owned(),
            ));
        }

        let mut additions = Map::new();
        insert_additions(&mut additions, &self.groups);
        insert_additions(&mut additions, &self.users);

        let mut operations = Vec::new();
        if !additions.is_empty() {
            operations.push(PatchOperation {
                op: PatchOpKind::Add,
                path: None,
                value: Some(Value::Object(additions)),
            });
        }

        push_removals(&mut operations, &self.groups);
        push_removals(&mut operations, &self.users);

        Ok(PatchRequest::new(operations))
    }
}

fn insert_additions<T: MemberRef>(additions: &mut Map<String, Value>, selection: &MemberSelection<T>) {
    let added = selection.added();
    if added.is_empty() {
        return;
    }

    let values = added
        .into_iter()
        .map(|member| json!({ "value": member.member_id(), "display": member.display() }))
        .collect();
    additions.insert(T::ATTRIBUTE.to_owned(), Value::Array(values));
}

fn push_removals<T: MemberRef>(operations: &mut Vec<PatchOperation>, selection: &MemberSelection<T>) {
    operations.extend(selection.removed().into_iter().map(|member| PatchOperation {
        op: PatchOpKind::Remove,
        path: Some(format!(
            "{}[value eq {}]",
            T::ATTRIBUTE,
            filter_literal(member.member_id())
        )),
        value: None,
    }));
}

/// Renders a SCIM filter comparison value as a JSON string literal.
fn filter_literal(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}
