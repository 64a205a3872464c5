use clap::{Parser, Subcommand};
use tudu_application::SortSpec;
use tudu_core::EntityId;

/// Command-line client for the Tudu REST backend.
#[derive(Debug, Parser)]
#[command(name = "tudu", version)]
pub struct Cli {
    /// Run against an in-process backend instead of the REST API.
    ///
    /// Every run starts from empty collections, so `get`, `update`, `patch` and `delete`
    /// report not found. Configuration is not loaded.
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List or search a collection.
    List {
        /// Route path or slice name, e.g. `task` or `user-tasks`.
        entity: String,
        /// One-based page number.
        #[arg(long)]
        page: Option<u32>,
        /// Items per page; defaults to TUDU_PAGE_SIZE.
        #[arg(long)]
        size: Option<u32>,
        /// Sort as `field` or `field,asc|desc`.
        #[arg(long)]
        sort: Option<SortSpec>,
        /// Full-text search query.
        #[arg(long)]
        query: Option<String>,
    },
    /// Show one entity.
    Get { entity: String, id: EntityId },
    /// Create an entity from `--set field=value` assignments.
    Create {
        entity: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
    /// Replace an entity, starting from its stored values.
    Update {
        entity: String,
        id: EntityId,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
    /// Send only the assigned fields as a merge patch.
    Patch {
        entity: String,
        id: EntityId,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
    /// Delete an entity.
    Delete { entity: String, id: EntityId },
    /// Print the entity menu.
    Routes,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }

    Ok((field.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use tudu_core::EntityId;

    use super::{Cli, Command, parse_assignment};

    #[test]
    fn assignment_keeps_equals_signs_in_value() {
        assert_eq!(
            parse_assignment("description=a=b"),
            Ok(("description".to_owned(), "a=b".to_owned()))
        );
        assert!(parse_assignment("=value").is_err());
        assert!(parse_assignment("title").is_err());
    }

    #[test]
    fn patch_collects_repeated_assignments() {
        let cli = Cli::try_parse_from([
            "tudu", "patch", "workspace", "7", "--set", "name=Ops", "--set", "users=3,7",
        ]);

        let Ok(Cli {
            offline: false,
            command: Command::Patch {
                entity,
                id,
                assignments,
            },
        }) = cli
        else {
            unreachable!()
        };
        assert_eq!(entity, "workspace");
        assert_eq!(id, EntityId::new(7));
        assert_eq!(
            assignments,
            vec![
                ("name".to_owned(), "Ops".to_owned()),
                ("users".to_owned(), "3,7".to_owned())
            ]
        );
    }

    #[test]
    fn list_parses_sort_spec() {
        let cli = Cli::try_parse_from(["tudu", "--offline", "list", "task", "--sort", "dueDate,desc"]);

        let Ok(Cli {
            offline: true,
            command: Command::List { sort: Some(sort), .. },
        }) = cli
        else {
            unreachable!()
        };
        assert_eq!(sort.to_param(), "dueDate,desc");
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(Cli::try_parse_from(["tudu", "get", "task", "abc"]).is_err());
    }

    #[test]
    fn offline_help_states_collections_start_empty() {
        let help = Cli::command().render_long_help().to_string();

        assert!(help.contains("starts from empty collections"));
        assert!(help.contains("report not found"));
    }
}
