//! Tudu command-line client.

#![forbid(unsafe_code)]

mod backend;
mod cli_args;
mod client_config;
mod entity_commands;

use clap::Parser;
use tracing::info;
use tudu_core::{AppError, AppResult};

use crate::backend::Backend;
use crate::cli_args::{Cli, Command};
use crate::client_config::{ClientConfig, DEFAULT_PAGE_SIZE, init_tracing};
use crate::entity_commands::{EntityAction, routes_report};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    execute(Cli::parse(), ClientConfig::load).await
}

/// Dispatches a parsed command. Configuration is only loaded for REST runs.
async fn execute(
    cli: Cli,
    load_config: impl FnOnce() -> AppResult<ClientConfig>,
) -> AppResult<()> {
    let (entity, action) = match cli.command {
        Command::Routes => return print_json(&routes_report()),
        Command::List {
            entity,
            page,
            size,
            sort,
            query,
        } => (
            entity,
            EntityAction::List {
                page,
                size,
                sort,
                query,
            },
        ),
        Command::Get { entity, id } => (entity, EntityAction::Get(id)),
        Command::Create {
            entity,
            assignments,
        } => (entity, EntityAction::Create(assignments)),
        Command::Update {
            entity,
            id,
            assignments,
        } => (entity, EntityAction::Update(id, assignments)),
        Command::Patch {
            entity,
            id,
            assignments,
        } => (entity, EntityAction::Patch(id, assignments)),
        Command::Delete { entity, id } => (entity, EntityAction::Delete(id)),
    };

    let (backend, page_size) = if cli.offline {
        info!("using in-process backend");
        (Backend::in_memory(), DEFAULT_PAGE_SIZE)
    } else {
        let config = load_config()?;
        info!(api_base_url = %config.api_base_url, "using REST backend");
        (Backend::rest(&config)?, config.page_size)
    };

    let report = entity_commands::run(&backend, page_size, entity.as_str(), action).await?;
    println!("{}", report.render()?);
    report.into_result()
}

fn print_json(value: &serde_json::Value) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tudu_core::{AppError, AppResult};

    use super::execute;
    use crate::cli_args::Cli;
    use crate::client_config::ClientConfig;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap_or_else(|_| unreachable!())
    }

    fn broken_config() -> AppResult<ClientConfig> {
        Err(AppError::Validation(
            "invalid TUDU_PAGE_SIZE value 'abc'".to_owned(),
        ))
    }

    #[tokio::test]
    async fn routes_and_offline_runs_ignore_broken_configuration() {
        assert_eq!(execute(parse(&["tudu", "routes"]), broken_config).await, Ok(()));
        assert_eq!(
            execute(parse(&["tudu", "--offline", "list", "task"]), broken_config).await,
            Ok(())
        );
    }

    #[tokio::test]
    async fn rest_runs_surface_configuration_errors() {
        let result = execute(parse(&["tudu", "list", "task"]), broken_config).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn offline_lookup_of_missing_entity_is_not_found() {
        let result = execute(parse(&["tudu", "--offline", "get", "task", "1"]), broken_config).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
