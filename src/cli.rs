use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::form::SubGroupRow;

#[derive(Parser)]
#[command(name = "groupdesk")]
#[command(about = "Admin client for group and access-request management")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage groups and their subgroups
    #[command(visible_alias = "g")]
    Groups {
        #[command(subcommand)]
        action: GroupsAction,
    },

    /// Review pending access requests
    #[command(visible_alias = "r")]
    Requests {
        #[command(subcommand)]
        action: RequestsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum GroupsAction {
    /// List groups, one page at a time
    Ls {
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single group with its subgroups
    Show {
        /// Group ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new group
    Create {
        /// Group name
        name: String,

        /// Folder path
        #[arg(long)]
        path: String,

        /// Description
        #[arg(short, long)]
        description: String,

        /// Subgroup as name:path[:description], can be repeated
        #[arg(long = "sub", value_parser = parse_subgroup, action = clap::ArgAction::Append)]
        subgroups: Vec<SubGroupRow>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an existing group (subgroups you don't remove keep their ids)
    Edit {
        /// Group ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New folder path
        #[arg(long)]
        path: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// Add a subgroup as name:path[:description], can be repeated
        #[arg(long = "add-sub", value_parser = parse_subgroup, action = clap::ArgAction::Append)]
        add_subgroups: Vec<SubGroupRow>,

        /// Remove the subgroup at this position (1-based), can be repeated
        #[arg(long = "remove-sub", action = clap::ArgAction::Append)]
        remove_subgroups: Vec<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a group
    Delete {
        /// Group ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum RequestsAction {
    /// List pending requests
    Ls {
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Approve a pending request
    Approve {
        /// Request ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reject a pending request
    Reject {
        /// Request ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, timeout, page_size, auth.token)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (base_url, timeout, page_size, auth.token)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            EditOptions, cmd_config_get, cmd_config_set, cmd_config_show, cmd_group_create,
            cmd_group_delete, cmd_group_edit, cmd_group_ls, cmd_group_show, cmd_request_decide,
            cmd_request_ls,
        };
        use crate::requests::Decision;

        let out = |json: bool| OutputOptions { json };

        match self {
            Commands::Groups { action } => match action {
                GroupsAction::Ls { page, json } => cmd_group_ls(page, out(json)).await,
                GroupsAction::Show { id, json } => cmd_group_show(&id, out(json)).await,
                GroupsAction::Create {
                    name,
                    path,
                    description,
                    subgroups,
                    json,
                } => cmd_group_create(&name, &path, &description, subgroups, out(json)).await,
                GroupsAction::Edit {
                    id,
                    name,
                    path,
                    description,
                    add_subgroups,
                    remove_subgroups,
                    json,
                } => {
                    let opts = EditOptions {
                        name,
                        folder_path: path,
                        description,
                        add_subgroups,
                        remove_subgroups,
                    };
                    cmd_group_edit(&id, opts, out(json)).await
                }
                GroupsAction::Delete { id, force, json } => {
                    cmd_group_delete(&id, force, out(json)).await
                }
            },

            Commands::Requests { action } => match action {
                RequestsAction::Ls { page, json } => cmd_request_ls(page, out(json)).await,
                RequestsAction::Approve { id, json } => {
                    cmd_request_decide(&id, Decision::Approve, out(json)).await
                }
                RequestsAction::Reject { id, json } => {
                    cmd_request_decide(&id, Decision::Reject, out(json)).await
                }
            },

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(out(json)),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, out(json)),
                ConfigAction::Get { key, json } => cmd_config_get(&key, out(json)),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Parse `name:path[:description]` into a new (unpersisted) subgroup row
fn parse_subgroup(s: &str) -> Result<SubGroupRow, String> {
    let mut parts = s.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    let folder_path = parts.next().unwrap_or_default().trim();
    let description = parts.next().unwrap_or_default().trim();

    if name.is_empty() || folder_path.is_empty() {
        return Err(format!(
            "Invalid subgroup '{s}'. Expected name:path[:description]"
        ));
    }

    Ok(SubGroupRow {
        id: None,
        name: name.to_string(),
        folder_path: folder_path.to_string(),
        description: description.to_string(),
    })
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "groupdesk", &mut io::stdout());
}
