use clap::{Args, Parser, Subcommand};
use warden_domain::{ApprovalActionKind, ApprovalStates, EntityKind};

/// Warden - approval and role administration console.
#[derive(Parser, Debug)]
#[command(name = "warden-console")]
#[command(version)]
#[command(about = "Review approval tasks and administer roles and groups.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with the caller's approval tasks
    Approvals {
        #[command(subcommand)]
        command: ApprovalCommands,
    },

    /// Rename, delete or reassign roles and groups
    Roles {
        #[command(subcommand)]
        command: RoleCommands,
    },

    /// Print outbound provisioning connector metadata
    Connectors,
}

#[derive(Subcommand, Debug)]
pub enum ApprovalCommands {
    /// List approval tasks ordered by priority then creation time
    List {
        /// Status filter (DEFAULT, ALL, READY, RESERVED, COMPLETED)
        #[arg(long, default_value = "DEFAULT")]
        status: ApprovalStates,
    },

    /// Show one approval task
    Show {
        /// Task identifier
        id: String,
    },

    /// Perform an action (CLAIM, RELEASE, APPROVE, REJECT) on a task
    Act {
        /// Task identifier
        id: String,

        /// Action to perform
        action: ApprovalActionKind,
    },
}

#[derive(Args, Debug, Clone)]
pub struct EntityTarget {
    /// Entity identifier
    pub id: String,

    /// Current display name, including any user-store prefix
    pub display_name: String,

    /// Target a group instead of a role
    #[arg(long)]
    pub group: bool,
}

impl EntityTarget {
    pub fn kind(&self) -> EntityKind {
        EntityKind::from_is_group(self.group)
    }
}

#[derive(Subcommand, Debug)]
pub enum RoleCommands {
    /// Rename a role or group, keeping its user-store prefix
    Rename {
        #[command(flatten)]
        target: EntityTarget,

        /// New name without the user-store prefix
        new_name: String,
    },

    /// Delete a role or group
    Delete {
        #[command(flatten)]
        target: EntityTarget,

        /// Display name typed again to confirm the delete
        #[arg(long)]
        confirm: String,
    },

    /// Add or remove role members
    Members {
        #[command(flatten)]
        target: EntityTarget,

        /// User to assign, as id:user-name
        #[arg(long = "add-user", value_parser = parse_member)]
        add_users: Vec<MemberArg>,

        /// User to unassign, as id:user-name
        #[arg(long = "remove-user", value_parser = parse_member)]
        remove_users: Vec<MemberArg>,

        /// Group to assign, as id:display-name
        #[arg(long = "add-group", value_parser = parse_member)]
        add_groups: Vec<MemberArg>,

        /// Group to unassign, as id:display-name
        #[arg(long = "remove-group", value_parser = parse_member)]
        remove_groups: Vec<MemberArg>,
    },
}

/// Member given on the command line as `id:name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberArg {
    pub id: String,
    pub name: String,
}

fn parse_member(value: &str) -> Result<MemberArg, String> {
    let (id, name) = value
        .split_once(':')
        .ok_or_else(|| format!("expected id:name, got '{value}'"))?;
    let (id, name) = (id.trim(), name.trim());
    if id.is_empty() || name.is_empty() {
        return Err(format!("expected id:name, got '{value}'"));
    }

    Ok(MemberArg {
        id: id.to_owned(),
        name: name.to_owned(),
    })
}
