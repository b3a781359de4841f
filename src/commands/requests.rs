//! Access-request commands: `requests ls|approve|reject`

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, load_queue};
use crate::cli::OutputOptions;
use crate::error::{GroupdeskError, Result};
use crate::requests::Decision;

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Requester")]
    requester: String,
    #[tabled(rename = "Group")]
    target_group: String,
    #[tabled(rename = "Note")]
    note: String,
}

/// List one page of pending requests
pub async fn cmd_request_ls(page: usize, output: OutputOptions) -> Result<()> {
    let queue = load_queue().await?;
    queue.set_page(page);
    let view = queue.page();
    let total = queue.requests().len();

    let json_output = json!({
        "requests": view.requests,
        "page": view.current_page,
        "total_pages": view.total_pages,
        "total": total,
    });

    let text = if total == 0 {
        "No pending requests.".dimmed().to_string()
    } else {
        let rows: Vec<RequestRow> = view
            .requests
            .iter()
            .map(|r| RequestRow {
                id: r.id.as_ref().map_or_else(|| "-".to_string(), ToString::to_string),
                requester: r.requester.clone(),
                target_group: r.target_group.clone(),
                note: r.note.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        format!(
            "{table}\n\n{}",
            format!(
                "Page {} of {} ({total} pending)",
                view.current_page, view.total_pages
            )
            .dimmed()
        )
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Approve or reject a pending request
pub async fn cmd_request_decide(id: &str, decision: Decision, output: OutputOptions) -> Result<()> {
    let queue = load_queue().await?;
    let request = queue
        .requests()
        .into_iter()
        .find(|r| r.id.as_ref().is_some_and(|rid| rid.to_string() == id))
        .ok_or_else(|| GroupdeskError::RequestNotFound(id.to_string()))?;

    queue.decide_request(&request, decision).await?;

    let label = match decision {
        Decision::Approve => decision.past_tense().green().to_string(),
        Decision::Reject => decision.past_tense().red().to_string(),
    };

    CommandOutput::new(json!({
        "action": decision.verb(),
        "id": request.id,
        "requester": request.requester,
        "group": request.target_group,
    }))
    .with_text(format!(
        "{label} request {id} from {} for {}",
        request.requester.cyan(),
        request.target_group
    ))
    .print(output)
}
