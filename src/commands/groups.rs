//! Group commands: `groups ls|show|create|edit|delete`

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::interactive::{StdinConfirm, is_stdin_tty};
use super::{CommandOutput, load_hierarchy};
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{GroupdeskError, Result};
use crate::form::{GroupForm, SubGroupRow};
use crate::hierarchy::{AlwaysConfirm, DeleteOutcome, GroupHierarchy};
use crate::model::Group;
use crate::store::{GroupStore, HttpStore};

/// A row in the group listing; subgroups follow their parent, indented
#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Folder")]
    folder_path: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn display_id(group_id: Option<&crate::identity::Identifier>) -> String {
    group_id.map_or_else(|| "-".to_string(), ToString::to_string)
}

fn table_rows(groups: &[Group]) -> Vec<GroupRow> {
    let mut rows = Vec::new();
    for group in groups {
        rows.push(GroupRow {
            id: display_id(group.id.as_ref()),
            name: group.name.clone(),
            folder_path: group.folder_path.clone(),
            description: group.description.clone(),
        });
        for sub in &group.subgroups {
            rows.push(GroupRow {
                id: format!("  {}", display_id(sub.id.as_ref())),
                name: format!("  └ {}", sub.name),
                folder_path: sub.folder_path.clone(),
                description: sub.description.clone(),
            });
        }
    }
    rows
}

fn render_table(groups: &[Group]) -> String {
    let mut table = Table::new(table_rows(groups));
    table.with(Style::rounded());
    table.to_string()
}

/// Find a loaded group by the id the user typed
fn find_group<S: GroupStore>(groups: &GroupHierarchy<S>, input: &str) -> Result<Group> {
    find_by_input(groups.groups(), input)
}

fn find_by_input(groups: Vec<Group>, input: &str) -> Result<Group> {
    groups
        .into_iter()
        .find(|g| g.id.as_ref().is_some_and(|id| id.to_string() == input))
        .ok_or_else(|| GroupdeskError::GroupNotFound(input.to_string()))
}

/// List one page of groups
pub async fn cmd_group_ls(page: usize, output: OutputOptions) -> Result<()> {
    let groups = load_hierarchy().await?;
    groups.set_page(page);
    let view = groups.page();

    let json_output = json!({
        "groups": view.groups,
        "page": view.current_page,
        "total_pages": view.total_pages,
        "total": groups.len(),
    });

    let text = if groups.is_empty() {
        "No groups found.".dimmed().to_string()
    } else if view.groups.is_empty() {
        format!(
            "Page {} is empty ({} page(s) available).",
            view.current_page, view.total_pages
        )
    } else {
        format!(
            "{}\n\n{}",
            render_table(&view.groups),
            format!(
                "Page {} of {} ({} group(s))",
                view.current_page,
                view.total_pages,
                groups.len()
            )
            .dimmed()
        )
    };

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Show a single group
pub async fn cmd_group_show(id: &str, output: OutputOptions) -> Result<()> {
    let groups = load_hierarchy().await?;
    let group = find_group(&groups, id)?;

    let mut text = format!(
        "{} {}\n{}: {}\n{}: {}\n",
        display_id(group.id.as_ref()).cyan(),
        group.name.bold(),
        "folder".cyan(),
        group.folder_path,
        "description".cyan(),
        group.description,
    );
    if group.subgroups.is_empty() {
        text.push_str(&format!("{}", "no subgroups".dimmed()));
    } else {
        text.push_str(&format!("{}:\n", "subgroups".cyan()));
        for (i, sub) in group.subgroups.iter().enumerate() {
            text.push_str(&format!(
                "  {}. {} {} ({})",
                i + 1,
                sub.name,
                sub.folder_path.dimmed(),
                display_id(sub.id.as_ref()),
            ));
            if !sub.description.is_empty() {
                text.push_str(&format!(" - {}", sub.description));
            }
            text.push('\n');
        }
    }

    CommandOutput::new(serde_json::to_value(&group)?)
        .with_text(text.trim_end().to_string())
        .print(output)
}

/// Create a new group
pub async fn cmd_group_create(
    name: &str,
    folder_path: &str,
    description: &str,
    subgroups: Vec<SubGroupRow>,
    output: OutputOptions,
) -> Result<()> {
    let config = Config::load()?;
    let groups = GroupHierarchy::with_page_size(HttpStore::from_config(&config)?, config.page_size);

    let mut form = GroupForm::new();
    form.open_create();
    form.name = name.to_string();
    form.folder_path = folder_path.to_string();
    form.description = description.to_string();
    for row in subgroups {
        let idx = form.add_subgroup_row();
        if let Some(slot) = form.row_mut(idx) {
            *slot = row;
        }
    }

    let group = form.submit(&groups).await?;

    CommandOutput::new(json!({
        "action": "created",
        "group": group,
    }))
    .with_text(format!(
        "Created group {} ({})",
        group.name.cyan(),
        display_id(group.id.as_ref())
    ))
    .print(output)
}

/// Field changes for `groups edit`
#[derive(Debug, Default)]
pub struct EditOptions {
    pub name: Option<String>,
    pub folder_path: Option<String>,
    pub description: Option<String>,
    pub add_subgroups: Vec<SubGroupRow>,
    /// 1-based positions in the current subgroup list
    pub remove_subgroups: Vec<usize>,
}

/// Apply edits to an open form. Removals use positions from before any change.
fn apply_edits(form: &mut GroupForm, opts: EditOptions) -> Result<()> {
    let count = form.rows().len();
    let mut positions = opts.remove_subgroups;
    if let Some(&bad) = positions.iter().find(|&&p| p == 0 || p > count) {
        return Err(GroupdeskError::Validation(format!(
            "no subgroup at position {bad} (group has {count})"
        )));
    }
    positions.sort_unstable();
    positions.dedup();
    for position in positions.into_iter().rev() {
        form.remove_subgroup_row(position - 1);
    }

    if let Some(name) = opts.name {
        form.name = name;
    }
    if let Some(folder_path) = opts.folder_path {
        form.folder_path = folder_path;
    }
    if let Some(description) = opts.description {
        form.description = description;
    }
    for row in opts.add_subgroups {
        let idx = form.add_subgroup_row();
        if let Some(slot) = form.row_mut(idx) {
            *slot = row;
        }
    }
    Ok(())
}

/// Edit an existing group
pub async fn cmd_group_edit(id: &str, opts: EditOptions, output: OutputOptions) -> Result<()> {
    let groups = load_hierarchy().await?;
    let existing = find_group(&groups, id)?;

    let mut form = GroupForm::new();
    form.open_edit(&existing)?;
    apply_edits(&mut form, opts)?;

    let group = form.submit(&groups).await?;

    CommandOutput::new(json!({
        "action": "updated",
        "group": group,
    }))
    .with_text(format!(
        "Updated group {} ({})",
        group.name.cyan(),
        display_id(group.id.as_ref())
    ))
    .print(output)
}

/// Delete a group, asking first unless `--force`
pub async fn cmd_group_delete(id: &str, force: bool, output: OutputOptions) -> Result<()> {
    if !force && !is_stdin_tty() {
        return Err(GroupdeskError::ConfirmationRequired(
            "Refusing to delete without confirmation. Use --force in non-interactive mode."
                .to_string(),
        ));
    }

    let groups = load_hierarchy().await?;
    let group = find_group(&groups, id)?;

    let outcome = if force {
        groups.delete(&group, &AlwaysConfirm).await?
    } else {
        groups.delete(&group, &StdinConfirm).await?
    };

    match outcome {
        DeleteOutcome::Deleted(deleted) => CommandOutput::new(json!({
            "action": "deleted",
            "id": deleted,
            "name": group.name,
        }))
        .with_text(format!("Deleted group {} ({deleted})", group.name.cyan()))
        .print(output),
        DeleteOutcome::Declined => CommandOutput::new(json!({
            "action": "declined",
            "id": group.id,
        }))
        .with_text("Aborted.".dimmed().to_string())
        .print(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identifier;
    use crate::model::SubGroup;

    fn sub(id: u64, name: &str) -> SubGroup {
        SubGroup {
            id: Some(Identifier::from(id)),
            name: name.to_string(),
            folder_path: format!("/{name}"),
            description: String::new(),
        }
    }

    fn group() -> Group {
        Group {
            id: Some(Identifier::from(1)),
            name: "Wealth".to_string(),
            folder_path: "/w".to_string(),
            description: "d".to_string(),
            subgroups: vec![sub(10, "a"), sub(11, "b"), sub(12, "c")],
        }
    }

    fn row(name: &str) -> SubGroupRow {
        SubGroupRow {
            id: None,
            name: name.to_string(),
            folder_path: format!("/{name}"),
            description: String::new(),
        }
    }

    #[test]
    fn test_find_by_input_matches_numeric_and_text_ids() {
        let mut text = group();
        text.id = Some(Identifier::from("g-7"));
        let groups = vec![group(), text];

        let found = find_by_input(groups.clone(), "1").unwrap();
        assert_eq!(found.id, Some(Identifier::from(1)));
        let found = find_by_input(groups.clone(), "g-7").unwrap();
        assert_eq!(found.id, Some(Identifier::from("g-7")));

        let err = find_by_input(groups, "2").unwrap_err();
        assert!(matches!(err, GroupdeskError::GroupNotFound(_)));
    }

    #[test]
    fn test_apply_edits_removes_by_original_position() {
        let mut form = GroupForm::new();
        form.open_edit(&group()).unwrap();
        let opts = EditOptions {
            remove_subgroups: vec![1, 3],
            add_subgroups: vec![row("d")],
            ..Default::default()
        };
        apply_edits(&mut form, opts).unwrap();

        let names: Vec<_> = form.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d"]);
        assert_eq!(form.rows()[0].id, Some(Identifier::from(11)));
        assert_eq!(form.rows()[1].id, None);
    }

    #[test]
    fn test_apply_edits_rejects_bad_position() {
        let mut form = GroupForm::new();
        form.open_edit(&group()).unwrap();
        let opts = EditOptions {
            remove_subgroups: vec![4],
            ..Default::default()
        };
        let err = apply_edits(&mut form, opts).unwrap_err();
        assert!(matches!(err, GroupdeskError::Validation(_)));
        assert_eq!(form.rows().len(), 3);
    }

    #[test]
    fn test_apply_edits_overrides_fields() {
        let mut form = GroupForm::new();
        form.open_edit(&group()).unwrap();
        let opts = EditOptions {
            description: Some("new".to_string()),
            ..Default::default()
        };
        apply_edits(&mut form, opts).unwrap();
        assert_eq!(form.name, "Wealth");
        assert_eq!(form.description, "new");
    }

    #[test]
    fn test_table_rows_indent_subgroups() {
        let rows = table_rows(&[group()]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].id, "1");
        assert!(rows[1].name.contains("└ a"));
    }
}
