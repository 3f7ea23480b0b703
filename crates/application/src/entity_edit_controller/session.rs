use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use warden_core::{AppError, AppResult};
use warden_domain::{EditableEntity, NamingPolicy, PatchRequest, RoleMembers, compose_display_name};

use crate::Notification;

use super::{
    DeleteOutcome, EditPhase, EditSessionId, EntityEditController, NameValidity, PolicyStatus,
    SubmitOutcome, messages,
};

/// Mutable state of one edit session. Never locked across a collaborator call.
#[derive(Debug)]
pub(super) struct SessionState {
    name_prefix: String,
    name_value: String,
    policy: Option<NamingPolicy>,
    policy_fetch_in_flight: bool,
    validity: NameValidity,
    phase: EditPhase,
    delete_confirmation_pending: bool,
    delete_in_flight: bool,
    alive: bool,
}

impl SessionState {
    pub(super) fn new(name_prefix: String, name_value: String) -> Self {
        Self {
            name_prefix,
            name_value,
            policy: None,
            policy_fetch_in_flight: false,
            validity: NameValidity::Indeterminate,
            phase: EditPhase::Idle,
            delete_confirmation_pending: false,
            delete_in_flight: false,
            alive: true,
        }
    }

    fn revalidate(&mut self) {
        self.validity = match &self.policy {
            Some(policy) => NameValidity::from_match(policy.is_valid(self.name_value.as_str())),
            None => NameValidity::Indeterminate,
        };
    }

    fn begin_update(&mut self) -> AppResult<()> {
        if !self.alive {
            return Err(closed());
        }

        if self.phase == EditPhase::Submitting {
            return Err(AppError::Conflict(
                "a submission is already in flight for this session".to_owned(),
            ));
        }

        self.phase = EditPhase::Submitting;
        Ok(())
    }
}

fn closed() -> AppError {
    AppError::Conflict("edit session is closed".to_owned())
}

/// Handle to one role or group edit session.
///
/// Clones share the same session state.
#[derive(Clone)]
pub struct EntityEditSession {
    id: EditSessionId,
    entity: Arc<EditableEntity>,
    controller: EntityEditController,
    state: Arc<Mutex<SessionState>>,
}

impl EntityEditSession {
    pub(super) fn new(
        id: EditSessionId,
        entity: Arc<EditableEntity>,
        controller: EntityEditController,
        state: Arc<Mutex<SessionState>>,
    ) -> Self {
        Self {
            id,
            entity,
            controller,
            state,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn id(&self) -> EditSessionId {
        self.id
    }

    /// Returns the entity this session edits.
    #[must_use]
    pub fn entity(&self) -> &EditableEntity {
        &self.entity
    }

    /// Returns the user-store prefix, empty for the primary store.
    pub async fn name_prefix(&self) -> String {
        self.state.lock().await.name_prefix.clone()
    }

    /// Returns the candidate bare name.
    pub async fn name_value(&self) -> String {
        self.state.lock().await.name_value.clone()
    }

    /// Returns the display name a submission would send.
    pub async fn composed_display_name(&self) -> String {
        let state = self.state.lock().await;
        compose_display_name(state.name_prefix.as_str(), state.name_value.as_str())
    }

    /// Returns the validity of the candidate name.
    pub async fn validity(&self) -> NameValidity {
        self.state.lock().await.validity
    }

    /// Returns whether the candidate name is known to be valid.
    pub async fn is_name_valid(&self) -> bool {
        self.validity().await == NameValidity::Valid
    }

    /// Returns the submission phase.
    pub async fn phase(&self) -> EditPhase {
        self.state.lock().await.phase
    }

    /// Returns the loaded naming policy pattern, if any.
    pub async fn policy_pattern(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .policy
            .as_ref()
            .map(|policy| policy.pattern().to_owned())
    }

    /// Returns whether the delete confirmation gate is open.
    pub async fn delete_confirmation_pending(&self) -> bool {
        self.state.lock().await.delete_confirmation_pending
    }

    /// Returns whether the session is still open.
    pub async fn is_alive(&self) -> bool {
        self.state.lock().await.alive
    }

    /// Loads the naming policy once per session.
    ///
    /// Returns [`PolicyStatus::Pending`] without another fetch while one is
    /// outstanding.
    pub async fn ensure_policy(&self) -> PolicyStatus {
        self.fetch_policy(false).await
    }

    /// Fetches the naming policy again, keeping the previous one on failure.
    pub async fn refresh_policy(&self) -> PolicyStatus {
        self.fetch_policy(true).await
    }

    async fn fetch_policy(&self, force: bool) -> PolicyStatus {
        let store = {
            let mut state = self.state.lock().await;
            if !state.alive {
                return PolicyStatus::Unavailable;
            }

            if state.policy.is_some() && !force {
                return PolicyStatus::Loaded;
            }

            if state.policy_fetch_in_flight {
                return PolicyStatus::Pending;
            }

            state.policy_fetch_in_flight = true;
            state.name_prefix.clone()
        };

        debug!(session_id = %self.id, store = %store, "fetching naming policy");
        let result = self
            .controller
            .validator
            .fetch_policy(Some(store.as_str()))
            .await;

        let mut state = self.state.lock().await;
        state.policy_fetch_in_flight = false;
        if !state.alive {
            debug!(session_id = %self.id, "discarding naming policy for closed session");
            return PolicyStatus::Unavailable;
        }

        match result {
            Ok(policy) => {
                state.policy = Some(policy);
                state.revalidate();
                PolicyStatus::Loaded
            }
            Err(error) => {
                drop(state);
                warn!(
                    session_id = %self.id,
                    entity_id = %self.entity.entity_id(),
                    error = %error,
                    "naming policy unavailable"
                );
                self.controller
                    .notify(messages::policy_unavailable(self.entity.kind()));
                PolicyStatus::Unavailable
            }
        }
    }

    /// Updates the candidate name and revalidates it against the loaded policy.
    pub async fn on_name_change(&self, raw: impl Into<String>) -> NameValidity {
        let mut state = self.state.lock().await;
        state.name_value = raw.into();
        state.revalidate();
        if state.phase != EditPhase::Submitting {
            state.phase = EditPhase::Editing;
        }

        state.validity
    }

    /// Submits the composed display name to the Entity API.
    ///
    /// Refused locally when the name is empty or invalid, when no policy is
    /// loaded, or while another submission is in flight. Entity API failures
    /// are reported through an error notification and
    /// [`SubmitOutcome::Failed`].
    pub async fn submit(&self) -> AppResult<SubmitOutcome> {
        let display_name = {
            let mut state = self.state.lock().await;
            if !state.alive {
                return Err(closed());
            }

            if state.phase == EditPhase::Submitting {
                return Err(AppError::Conflict(
                    "a submission is already in flight for this session".to_owned(),
                ));
            }

            if state.name_value.is_empty() {
                return Err(AppError::Validation(format!(
                    "{} name must not be empty",
                    self.entity.kind().as_str()
                )));
            }

            match state.validity {
                NameValidity::Valid => {}
                NameValidity::Invalid => {
                    return Err(AppError::Validation(format!(
                        "{} name '{}' does not match the naming policy",
                        self.entity.kind().as_str(),
                        state.name_value
                    )));
                }
                NameValidity::Indeterminate => {
                    return Err(AppError::PolicyUnavailable(
                        "naming policy is not loaded; name validity is indeterminate".to_owned(),
                    ));
                }
            }

            state.phase = EditPhase::Submitting;
            compose_display_name(state.name_prefix.as_str(), state.name_value.as_str())
        };

        info!(
            session_id = %self.id,
            entity_id = %self.entity.entity_id(),
            display_name = %display_name,
            "submitting entity rename"
        );
        let patch = PatchRequest::replace_display_name(display_name.as_str());
        let outcome = self
            .finish_update(
                patch,
                messages::update_succeeded(self.entity.kind()),
                messages::update_failed(self.entity.kind()),
            )
            .await;

        Ok(outcome)
    }

    /// Submits group and user assignment changes to the Entity API.
    ///
    /// Shares the in-flight guard with [`Self::submit`].
    pub async fn submit_members(&self, members: &RoleMembers) -> AppResult<SubmitOutcome> {
        let patch = members.to_patch_request()?;
        self.state.lock().await.begin_update()?;

        info!(
            session_id = %self.id,
            entity_id = %self.entity.entity_id(),
            operations = patch.operations.len(),
            "submitting member assignment"
        );
        let outcome = self
            .finish_update(
                patch,
                messages::members_updated(self.entity.kind()),
                messages::members_update_failed(self.entity.kind()),
            )
            .await;

        Ok(outcome)
    }

    async fn finish_update(
        &self,
        patch: PatchRequest,
        success: Notification,
        failure: Notification,
    ) -> SubmitOutcome {
        let entity_id = self.entity.entity_id().as_str();
        let result = self
            .controller
            .entity_api
            .update_entity(entity_id, &patch)
            .await
            .map_err(|error| AppError::UpdateFailed(error.to_string()));

        let mut state = self.state.lock().await;
        if !state.alive {
            debug!(session_id = %self.id, "discarding update result for closed session");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                state.phase = EditPhase::Succeeded;
                drop(state);
                info!(session_id = %self.id, entity_id = %entity_id, "entity updated");
                self.controller.entity_updated(entity_id);
                self.controller.notify(success);
                SubmitOutcome::Succeeded
            }
            Err(error) => {
                state.phase = EditPhase::Failed;
                drop(state);
                warn!(
                    session_id = %self.id,
                    entity_id = %entity_id,
                    error = %error,
                    "entity update failed"
                );
                self.controller.notify(failure);
                SubmitOutcome::Failed
            }
        }
    }

    /// Opens the delete confirmation gate without contacting the backend.
    pub async fn request_delete(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.alive {
            return Err(closed());
        }

        state.delete_confirmation_pending = true;
        Ok(())
    }

    /// Closes the delete confirmation gate.
    pub async fn cancel_delete(&self) {
        self.state.lock().await.delete_confirmation_pending = false;
    }

    /// Returns whether a typed confirmation equals the entity's display name.
    #[must_use]
    pub fn assertion_matches(&self, typed_assertion: &str) -> bool {
        typed_assertion == self.entity.display_name()
    }

    /// Deletes the entity once the confirmation gate is open.
    ///
    /// The confirmation surface enforces the typed assertion; this call issues
    /// the delete regardless. The gate closes whatever the outcome, and a
    /// successful delete closes the session and requests navigation to the
    /// entity list.
    pub async fn confirm_delete(&self, typed_assertion: &str) -> AppResult<DeleteOutcome> {
        {
            let mut state = self.state.lock().await;
            if !state.alive {
                return Err(closed());
            }

            if !state.delete_confirmation_pending {
                return Err(AppError::Conflict(
                    "delete confirmation was not requested".to_owned(),
                ));
            }

            if state.delete_in_flight {
                return Err(AppError::Conflict(
                    "a delete is already in flight for this session".to_owned(),
                ));
            }

            state.delete_in_flight = true;
        }

        let entity_id = self.entity.entity_id().as_str();
        if !self.assertion_matches(typed_assertion) {
            warn!(
                session_id = %self.id,
                entity_id = %entity_id,
                "delete confirmed with an assertion that differs from the display name"
            );
        }

        info!(session_id = %self.id, entity_id = %entity_id, "deleting entity");
        let result = self
            .controller
            .entity_api
            .delete_entity(entity_id)
            .await
            .map_err(|error| AppError::DeleteFailed(error.to_string()));

        let mut state = self.state.lock().await;
        state.delete_in_flight = false;
        state.delete_confirmation_pending = false;
        if !state.alive {
            debug!(session_id = %self.id, "discarding delete result for closed session");
            return Ok(DeleteOutcome::Discarded);
        }

        match result {
            Ok(()) => {
                state.alive = false;
                drop(state);
                info!(session_id = %self.id, entity_id = %entity_id, "entity deleted");
                self.controller
                    .notify(messages::delete_succeeded(self.entity.kind()));
                self.controller.navigate_to_list(self.entity.kind());
                Ok(DeleteOutcome::Deleted)
            }
            Err(error) => {
                drop(state);
                warn!(
                    session_id = %self.id,
                    entity_id = %entity_id,
                    error = %error,
                    "entity delete failed"
                );
                self.controller
                    .notify(messages::delete_failed(self.entity.kind()));
                Ok(DeleteOutcome::Failed)
            }
        }
    }

    /// Tears the session down. Results of outstanding calls are discarded.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.alive = false;
        state.delete_confirmation_pending = false;
        debug!(session_id = %self.id, "edit session closed");
    }
}
