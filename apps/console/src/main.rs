//! Warden administration console.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod console_config;

use std::env;

use clap::Parser;
use tracing::error;
use warden_core::AppError;

use crate::cli::{Cli, Commands};
use crate::commands::ConsoleServices;
use crate::console_config::{ConsoleConfig, init_tracing, tenant_domain};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Connectors => {
            let tenant = tenant_domain(&|name: &str| env::var(name).ok())?;
            commands::print_connectors(&tenant)
        }
        Commands::Approvals { command } => {
            let services = ConsoleServices::build(&ConsoleConfig::load()?)?;
            commands::run_approvals(&services, command).await
        }
        Commands::Roles { command } => {
            let services = ConsoleServices::build(&ConsoleConfig::load()?)?;
            commands::run_roles(&services, command).await
        }
    };

    if let Err(error) = &result {
        error!(error = %error, "command failed");
    }

    result
}
