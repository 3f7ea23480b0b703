use std::sync::Arc;

use warden_application::{
    ApprovalTaskRegistry, DeleteOutcome, EntityEditController, EntityEditSession,
    NamingPolicyValidator, PolicyStatus, SubmitOutcome,
};
use warden_core::{AppError, AppResult, NonEmptyString, TenantDomain};
use warden_domain::{
    ApprovalStates, EditableEntity, EntityKind, GroupRef, MemberRef, MemberSelection,
    OUTBOUND_CONNECTORS, RoleMembers, UserRef,
};
use warden_infrastructure::{
    BackendClient, HttpApprovalApi, RecordingNavigationSignal, ScimEntityApi,
    TracingNotificationSink, UserStoreNamingPolicyService,
};

use crate::cli::{ApprovalCommands, EntityTarget, MemberArg, RoleCommands};
use crate::console_config::ConsoleConfig;

/// Adapters and services shared by every command.
pub struct ConsoleServices {
    backend: BackendClient,
    registry: ApprovalTaskRegistry,
    validator: NamingPolicyValidator,
}

impl ConsoleServices {
    pub fn build(config: &ConsoleConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
        let backend = BackendClient::new(
            http_client,
            config.server_url.as_str(),
            config.access_token.as_str(),
            config.tenant.clone(),
        )?;

        let registry = ApprovalTaskRegistry::new(Arc::new(HttpApprovalApi::new(backend.clone())));
        let validator = NamingPolicyValidator::new(Arc::new(UserStoreNamingPolicyService::new(
            backend.clone(),
            config.primary_role_name_pattern.as_str(),
        )));

        Ok(Self {
            backend,
            registry,
            validator,
        })
    }

    fn open_session(&self, target: &EntityTarget) -> AppResult<EntityEditSession> {
        let kind = target.kind();
        let controller = EntityEditController::new(
            Arc::new(ScimEntityApi::new(self.backend.clone(), kind)),
            self.validator.clone(),
            Arc::new(TracingNotificationSink::new()),
            Arc::new(RecordingNavigationSignal::new()),
        );
        let entity = EditableEntity::new(
            NonEmptyString::new(target.id.as_str())?,
            target.display_name.as_str(),
            kind,
        );

        Ok(controller.open_session(entity))
    }
}

pub async fn run_approvals(services: &ConsoleServices, command: ApprovalCommands) -> AppResult<()> {
    match command {
        ApprovalCommands::List { status } => {
            let tasks = services.registry.list(status).await?;
            if tasks.is_empty() {
                println!("no approval tasks");
            }
            for task in tasks {
                let created = task
                    .created_at()
                    .map(|created| created.to_rfc3339())
                    .unwrap_or_else(|_| task.created_time_in_millis.clone());
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    task.id,
                    task.status.as_str(),
                    task.priority,
                    created,
                    task.presentation_subject
                );
            }
            Ok(())
        }
        ApprovalCommands::Show { id } => {
            let details = services.registry.details(id.as_str()).await?;
            print_json(&details)
        }
        ApprovalCommands::Act { id, action } => {
            services.registry.list(ApprovalStates::All).await?;
            let details = services.registry.act(id.as_str(), action).await?;
            print_json(&details)
        }
    }
}

pub async fn run_roles(services: &ConsoleServices, command: RoleCommands) -> AppResult<()> {
    match command {
        RoleCommands::Rename { target, new_name } => {
            let session = services.open_session(&target)?;
            load_policy(&session).await?;
            session.on_name_change(new_name).await;

            let outcome = session.submit().await?;
            session.close().await;
            match outcome {
                SubmitOutcome::Succeeded => {
                    println!("{}", session.composed_display_name().await);
                    Ok(())
                }
                SubmitOutcome::Failed | SubmitOutcome::Discarded => Err(AppError::UpdateFailed(
                    format!("{} '{}' was not renamed", target.kind().as_str(), target.id),
                )),
            }
        }
        RoleCommands::Delete { target, confirm } => {
            let session = services.open_session(&target)?;
            if !session.assertion_matches(confirm.as_str()) {
                return Err(AppError::Validation(format!(
                    "confirmation '{confirm}' does not match display name '{}'",
                    target.display_name
                )));
            }

            session.request_delete().await?;
            match session.confirm_delete(confirm.as_str()).await? {
                DeleteOutcome::Deleted => Ok(()),
                DeleteOutcome::Failed | DeleteOutcome::Discarded => Err(AppError::DeleteFailed(
                    format!("{} '{}' was not deleted", target.kind().as_str(), target.id),
                )),
            }
        }
        RoleCommands::Members {
            target,
            add_users,
            remove_users,
            add_groups,
            remove_groups,
        } => {
            if target.kind() == EntityKind::Group {
                return Err(AppError::Validation(
                    "member assignment applies to roles only".to_owned(),
                ));
            }

            reject_conflicts("user", &add_users, &remove_users)?;
            reject_conflicts("group", &add_groups, &remove_groups)?;

            let members = RoleMembers {
                groups: selection(remove_groups, add_groups, |member| GroupRef {
                    id: member.id,
                    display_name: member.name,
                }),
                users: selection(remove_users, add_users, |member| UserRef {
                    id: member.id,
                    user_name: member.name,
                }),
            };

            let session = services.open_session(&target)?;
            let outcome = session.submit_members(&members).await?;
            session.close().await;
            match outcome {
                SubmitOutcome::Succeeded => Ok(()),
                SubmitOutcome::Failed | SubmitOutcome::Discarded => Err(AppError::UpdateFailed(
                    format!("members of role '{}' were not updated", target.id),
                )),
            }
        }
    }
}

pub fn print_connectors(tenant: &TenantDomain) -> AppResult<()> {
    for connector in OUTBOUND_CONNECTORS {
        println!(
            "{}\t{}\t{}\t{}",
            connector.connector_id,
            connector.name,
            connector.display_name,
            connector.self_path(tenant)
        );
    }

    Ok(())
}

async fn load_policy(session: &EntityEditSession) -> AppResult<()> {
    match session.ensure_policy().await {
        PolicyStatus::Loaded => Ok(()),
        PolicyStatus::Pending | PolicyStatus::Unavailable => Err(AppError::PolicyUnavailable(
            format!(
                "naming policy for '{}' could not be loaded",
                session.entity().display_name()
            ),
        )),
    }
}

fn reject_conflicts(member_kind: &str, added: &[MemberArg], removed: &[MemberArg]) -> AppResult<()> {
    let conflict = added
        .iter()
        .find(|member| removed.iter().any(|other| other.id == member.id));

    match conflict {
        Some(member) => Err(AppError::Validation(format!(
            "{member_kind} '{}' is both added and removed",
            member.id
        ))),
        None => Ok(()),
    }
}

/// Builds a selection whose initial members are the removals, then applies
/// the removals and additions.
fn selection<T, F>(removed: Vec<MemberArg>, added: Vec<MemberArg>, to_ref: F) -> MemberSelection<T>
where
    T: MemberRef,
    F: Fn(MemberArg) -> T,
{
    let initial: Vec<T> = removed.into_iter().map(&to_ref).collect();
    let removed_ids: Vec<String> = initial
        .iter()
        .map(|member| member.member_id().to_owned())
        .collect();

    let mut selection = MemberSelection::new(initial);
    for member_id in &removed_ids {
        selection.deselect(member_id.as_str());
    }
    for member in added {
        selection.select(to_ref(member));
    }

    selection
}

fn print_json<T>(value: &T) -> AppResult<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use warden_core::AppError;
    use warden_domain::{MemberSelection, UserRef};

    use super::{reject_conflicts, selection};
    use crate::cli::MemberArg;

    fn member(id: &str) -> MemberArg {
        MemberArg {
            id: id.to_owned(),
            name: format!("name-{id}"),
        }
    }

    fn user_selection(removed: Vec<MemberArg>, added: Vec<MemberArg>) -> MemberSelection<UserRef> {
        selection(removed, added, |member| UserRef {
            id: member.id,
            user_name: member.name,
        })
    }

    #[test]
    fn member_in_both_lists_is_rejected() {
        let result = reject_conflicts("user", &[member("u-1"), member("u-2")], &[member("u-2")]);

        assert!(matches!(
            result,
            Err(AppError::Validation(message)) if message.contains("'u-2' is both added and removed")
        ));
    }

    #[test]
    fn disjoint_lists_are_accepted() {
        assert!(reject_conflicts("group", &[member("g-1")], &[member("g-2")]).is_ok());
        assert!(reject_conflicts("group", &[], &[]).is_ok());
    }

    #[test]
    fn selection_reports_removals_and_additions() {
        let users = user_selection(vec![member("u-1")], vec![member("u-2")]);

        let added: Vec<&str> = users
            .added()
            .into_iter()
            .map(|user| user.id.as_str())
            .collect();
        let removed: Vec<&str> = users
            .removed()
            .into_iter()
            .map(|user| user.id.as_str())
            .collect();

        assert_eq!(added, vec!["u-2"]);
        assert_eq!(removed, vec!["u-1"]);
    }
}
