mod config;
mod groups;
pub mod interactive;
mod requests;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use groups::{
    EditOptions, cmd_group_create, cmd_group_delete, cmd_group_edit, cmd_group_ls, cmd_group_show,
};
pub use requests::{cmd_request_decide, cmd_request_ls};

use serde_json::Value;

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::hierarchy::GroupHierarchy;
use crate::requests::RequestQueue;
use crate::store::HttpStore;

/// Result of a command, renderable as JSON or text
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print as JSON when requested, otherwise the text form (falling back to JSON)
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

/// Pretty-print a JSON value to stdout
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Build a loaded hierarchy from the configured backend
async fn load_hierarchy() -> Result<GroupHierarchy<HttpStore>> {
    let config = Config::load()?;
    let store = HttpStore::from_config(&config)?;
    let groups = GroupHierarchy::with_page_size(store, config.page_size);
    groups.load().await?;
    Ok(groups)
}

/// Build a loaded request queue from the configured backend
async fn load_queue() -> Result<RequestQueue<HttpStore>> {
    let config = Config::load()?;
    let store = HttpStore::from_config(&config)?;
    let queue = RequestQueue::with_page_size(store, config.page_size);
    queue.load().await?;
    Ok(queue)
}
