use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use warden_core::{AppError, AppResult, NonEmptyString};
use warden_domain::{
    EditableEntity, EntityKind, PatchOpKind, PatchRequest, RoleMembers, UserRef,
};

use crate::{
    Destination, EntityApi, EntityUpdateListener, NamingPolicyService, NamingPolicyValidator,
    NavigationSignal, Notification, NotificationLevel, NotificationSink,
};

use super::{
    DeleteOutcome, EditPhase, EntityEditController, NameValidity, PolicyStatus, SubmitOutcome,
};

#[derive(Default)]
struct FakeEntityApi {
    updates: Mutex<Vec<(String, PatchRequest)>>,
    deletes: Mutex<Vec<String>>,
    fail: AtomicBool,
    gate: Option<Arc<Notify>>,
    started: Arc<Notify>,
}

impl FakeEntityApi {
    fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Self::default()
        }
    }

    fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    async fn wait_at_gate(&self) {
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }

    fn outcome(&self) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset".to_owned()));
        }

        Ok(())
    }

    async fn updated_display_names(&self) -> Vec<String> {
        self.updates
            .lock()
            .await
            .iter()
            .filter_map(|(_, patch)| patch.display_name().map(str::to_owned))
            .collect()
    }
}

#[async_trait]
impl EntityApi for FakeEntityApi {
    async fn update_entity(&self, entity_id: &str, patch: &PatchRequest) -> AppResult<()> {
        self.updates
            .lock()
            .await
            .push((entity_id.to_owned(), patch.clone()));
        self.wait_at_gate().await;
        self.outcome()
    }

    async fn delete_entity(&self, entity_id: &str) -> AppResult<()> {
        self.deletes.lock().await.push(entity_id.to_owned());
        self.wait_at_gate().await;
        self.outcome()
    }
}

struct FakePolicyService {
    pattern: Mutex<Option<String>>,
    requested_stores: Mutex<Vec<Option<String>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    started: Arc<Notify>,
}

impl FakePolicyService {
    fn with_pattern(pattern: &str) -> Self {
        Self {
            pattern: Mutex::new(Some(pattern.to_owned())),
            requested_stores: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
            started: Arc::new(Notify::new()),
        }
    }

    fn unreachable() -> Self {
        Self {
            pattern: Mutex::new(None),
            ..Self::with_pattern("")
        }
    }
}

#[async_trait]
impl NamingPolicyService for FakePolicyService {
    async fn fetch_pattern(&self, store: Option<&str>) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested_stores
            .lock()
            .await
            .push(store.map(str::to_owned));
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.pattern
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::Internal("userstore service unreachable".to_owned()))
    }
}

#[derive(Default)]
struct RecordingSink {
    notifications: StdMutex<Vec<Notification>>,
}

impl RecordingSink {
    fn levels(&self) -> Vec<NotificationLevel> {
        self.notifications
            .lock()
            .map(|notifications| {
                notifications
                    .iter()
                    .map(|notification| notification.level)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

#[derive(Default)]
struct RecordingNavigation {
    destinations: StdMutex<Vec<Destination>>,
}

impl RecordingNavigation {
    fn destinations(&self) -> Vec<Destination> {
        self.destinations
            .lock()
            .map(|destinations| destinations.clone())
            .unwrap_or_default()
    }
}

impl NavigationSignal for RecordingNavigation {
    fn navigate(&self, destination: Destination) {
        if let Ok(mut destinations) = self.destinations.lock() {
            destinations.push(destination);
        }
    }
}

#[derive(Default)]
struct RecordingListener {
    updated: StdMutex<Vec<String>>,
}

impl RecordingListener {
    fn updated(&self) -> Vec<String> {
        self.updated
            .lock()
            .map(|updated| updated.clone())
            .unwrap_or_default()
    }
}

impl EntityUpdateListener for RecordingListener {
    fn on_entity_updated(&self, entity_id: &str) {
        if let Ok(mut updated) = self.updated.lock() {
            updated.push(entity_id.to_owned());
        }
    }
}

struct Harness {
    controller: EntityEditController,
    entity_api: Arc<FakeEntityApi>,
    policy_service: Arc<FakePolicyService>,
    notifications: Arc<RecordingSink>,
    navigation: Arc<RecordingNavigation>,
    listener: Arc<RecordingListener>,
}

fn harness(entity_api: FakeEntityApi, policy_service: FakePolicyService) -> Harness {
    let entity_api = Arc::new(entity_api);
    let policy_service = Arc::new(policy_service);
    let notifications = Arc::new(RecordingSink::default());
    let navigation = Arc::new(RecordingNavigation::default());
    let listener = Arc::new(RecordingListener::default());
    let controller = EntityEditController::new(
        entity_api.clone(),
        NamingPolicyValidator::new(policy_service.clone()),
        notifications.clone(),
        navigation.clone(),
    )
    .with_update_listener(listener.clone());

    Harness {
        controller,
        entity_api,
        policy_service,
        notifications,
        navigation,
        listener,
    }
}

fn entity(display_name: &str, kind: EntityKind) -> AppResult<EditableEntity> {
    Ok(EditableEntity::new(
        NonEmptyString::new("role-1")?,
        display_name,
        kind,
    ))
}

const NAME_PATTERN: &str = r"^[\S]{3,30}$";

#[tokio::test]
async fn secondary_store_name_is_split_and_recomposed() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("SECONDARY/alice", EntityKind::Role)?);

    assert_eq!(session.name_prefix().await, "SECONDARY");
    assert_eq!(session.name_value().await, "alice");
    assert_eq!(session.phase().await, EditPhase::Idle);
    assert_eq!(session.ensure_policy().await, PolicyStatus::Loaded);

    let outcome = session.submit().await?;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(
        harness.entity_api.updated_display_names().await,
        vec!["SECONDARY/alice".to_owned()]
    );
    assert_eq!(
        *harness.policy_service.requested_stores.lock().await,
        vec![Some("SECONDARY".to_owned())]
    );
    Ok(())
}

#[tokio::test]
async fn multi_separator_name_uses_primary_store_policy() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("STORE/team/ops", EntityKind::Role)?);

    assert_eq!(session.name_prefix().await, "");
    assert_eq!(session.name_value().await, "STORE/team/ops");
    assert_eq!(session.ensure_policy().await, PolicyStatus::Loaded);
    assert_eq!(
        *harness.policy_service.requested_stores.lock().await,
        vec![None]
    );
    assert_eq!(session.composed_display_name().await, "STORE/team/ops");
    Ok(())
}

#[tokio::test]
async fn primary_store_name_submits_bare_name() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Group)?);

    assert_eq!(session.name_prefix().await, "");
    assert_eq!(session.ensure_policy().await, PolicyStatus::Loaded);
    assert!(session.is_name_valid().await);

    let outcome = session.submit().await?;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(session.phase().await, EditPhase::Succeeded);
    assert_eq!(
        harness.entity_api.updated_display_names().await,
        vec!["bob".to_owned()]
    );
    assert_eq!(
        *harness.policy_service.requested_stores.lock().await,
        vec![None]
    );
    assert_eq!(harness.listener.updated(), vec!["role-1".to_owned()]);
    assert_eq!(
        harness.notifications.levels(),
        vec![NotificationLevel::Success]
    );
    Ok(())
}

#[tokio::test]
async fn submit_without_policy_is_refused() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);

    assert_eq!(session.validity().await, NameValidity::Indeterminate);
    let result = session.submit().await;

    assert!(matches!(result, Err(AppError::PolicyUnavailable(_))));
    assert!(harness.entity_api.updates.lock().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_and_empty_names_never_reach_the_api() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);
    session.ensure_policy().await;

    assert_eq!(
        session.on_name_change("has space").await,
        NameValidity::Invalid
    );
    assert!(matches!(
        session.submit().await,
        Err(AppError::Validation(_))
    ));

    assert_eq!(session.on_name_change("").await, NameValidity::Invalid);
    assert!(matches!(
        session.submit().await,
        Err(AppError::Validation(_))
    ));

    assert!(harness.entity_api.updates.lock().await.is_empty());
    assert_eq!(session.phase().await, EditPhase::Editing);
    Ok(())
}

#[tokio::test]
async fn failed_update_keeps_name_and_allows_retry() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::failing(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);
    session.ensure_policy().await;
    session.on_name_change("robert").await;

    let outcome = session.submit().await?;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.phase().await, EditPhase::Failed);
    assert_eq!(session.name_value().await, "robert");
    assert_eq!(harness.notifications.levels(), vec![NotificationLevel::Error]);
    assert!(harness.listener.updated().is_empty());

    harness.entity_api.fail.store(false, Ordering::SeqCst);
    let retried = session.submit().await?;

    assert_eq!(retried, SubmitOutcome::Succeeded);
    assert_eq!(
        harness.entity_api.updated_display_names().await,
        vec!["robert".to_owned(), "robert".to_owned()]
    );
    Ok(())
}

#[tokio::test]
async fn only_one_submission_is_in_flight() -> AppResult<()> {
    let gate = Arc::new(Notify::new());
    let harness = harness(
        FakeEntityApi::gated(gate.clone()),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);
    session.ensure_policy().await;

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.submit().await }
    });
    harness.entity_api.started.notified().await;

    assert_eq!(session.phase().await, EditPhase::Submitting);
    assert!(matches!(
        session.submit().await,
        Err(AppError::Conflict(_))
    ));

    gate.notify_one();

    assert!(matches!(first.await, Ok(Ok(SubmitOutcome::Succeeded))));
    assert_eq!(harness.entity_api.updates.lock().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn closed_session_discards_late_update_result() -> AppResult<()> {
    let gate = Arc::new(Notify::new());
    let harness = harness(
        FakeEntityApi::gated(gate.clone()),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);
    session.ensure_policy().await;

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.submit().await }
    });
    harness.entity_api.started.notified().await;
    session.close().await;
    gate.notify_one();

    assert!(matches!(pending.await, Ok(Ok(SubmitOutcome::Discarded))));
    assert!(harness.notifications.levels().is_empty());
    assert!(harness.listener.updated().is_empty());
    assert!(matches!(
        session.submit().await,
        Err(AppError::Conflict(_))
    ));
    Ok(())
}

#[tokio::test]
async fn policy_is_fetched_once_per_session() -> AppResult<()> {
    let gate = Arc::new(Notify::new());
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService {
            gate: Some(gate.clone()),
            ..FakePolicyService::with_pattern(NAME_PATTERN)
        },
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.ensure_policy().await }
    });
    harness.policy_service.started.notified().await;

    assert_eq!(session.ensure_policy().await, PolicyStatus::Pending);
    gate.notify_one();
    assert!(matches!(first.await, Ok(PolicyStatus::Loaded)));

    session.on_name_change("robert").await;
    session.on_name_change("roberta").await;

    assert_eq!(session.ensure_policy().await, PolicyStatus::Loaded);
    assert_eq!(harness.policy_service.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn unavailable_policy_blocks_submission_and_notifies() -> AppResult<()> {
    let harness = harness(FakeEntityApi::default(), FakePolicyService::unreachable());
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);

    assert_eq!(session.ensure_policy().await, PolicyStatus::Unavailable);
    assert_eq!(session.on_name_change("robert").await, NameValidity::Indeterminate);
    assert!(matches!(
        session.submit().await,
        Err(AppError::PolicyUnavailable(_))
    ));
    assert_eq!(harness.notifications.levels(), vec![NotificationLevel::Error]);
    Ok(())
}

#[tokio::test]
async fn refresh_failure_keeps_previous_policy() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);
    session.ensure_policy().await;
    *harness.policy_service.pattern.lock().await = None;

    assert_eq!(session.refresh_policy().await, PolicyStatus::Unavailable);
    assert_eq!(session.policy_pattern().await.as_deref(), Some(NAME_PATTERN));
    assert!(session.is_name_valid().await);
    Ok(())
}

#[tokio::test]
async fn delete_requires_open_confirmation_gate() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);

    assert!(matches!(
        session.confirm_delete("bob").await,
        Err(AppError::Conflict(_))
    ));

    session.request_delete().await?;
    assert!(session.delete_confirmation_pending().await);
    session.cancel_delete().await;
    assert!(!session.delete_confirmation_pending().await);
    assert!(harness.entity_api.deletes.lock().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn confirmed_delete_navigates_to_entity_list() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("PRIMARY/ops", EntityKind::Group)?);

    assert!(session.assertion_matches("PRIMARY/ops"));
    assert!(!session.assertion_matches("ops"));

    session.request_delete().await?;
    let outcome = session.confirm_delete("PRIMARY/ops").await?;

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(
        *harness.entity_api.deletes.lock().await,
        vec!["role-1".to_owned()]
    );
    assert_eq!(harness.navigation.destinations(), vec![Destination::GroupList]);
    assert_eq!(
        harness.notifications.levels(),
        vec![NotificationLevel::Success]
    );
    assert!(!session.is_alive().await);
    Ok(())
}

#[tokio::test]
async fn failed_delete_closes_gate_without_navigation() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::failing(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);

    session.request_delete().await?;
    let outcome = session.confirm_delete("bob").await?;

    assert_eq!(outcome, DeleteOutcome::Failed);
    assert!(!session.delete_confirmation_pending().await);
    assert!(session.is_alive().await);
    assert!(harness.navigation.destinations().is_empty());
    assert_eq!(harness.notifications.levels(), vec![NotificationLevel::Error]);
    Ok(())
}

#[tokio::test]
async fn member_changes_are_sent_as_patch_operations() -> AppResult<()> {
    let harness = harness(
        FakeEntityApi::default(),
        FakePolicyService::with_pattern(NAME_PATTERN),
    );
    let session = harness
        .controller
        .open_session(entity("bob", EntityKind::Role)?);

    let mut members = RoleMembers::default();
    assert!(matches!(
        session.submit_members(&members).await,
        Err(AppError::Validation(_))
    ));

    members.users.select(UserRef {
        id: "u-1".to_owned(),
        user_name: "alice".to_owned(),
    });
    let outcome = session.submit_members(&members).await?;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    let updates = harness.entity_api.updates.lock().await;
    assert_eq!(updates.len(), 1);
    assert!(
        updates
            .first()
            .is_some_and(|(_, patch)| patch.operations.iter().all(|op| op.op == PatchOpKind::Add))
    );
    Ok(())
}
