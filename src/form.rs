//! Create/edit form state for groups.
//!
//! The form is a small state machine:
//! - `Closed`: nothing open
//! - `CreatingNew`: blank form, submit creates
//! - `EditingExisting(id)`: pre-filled form, submit updates `id`
//!
//! A failed submit never closes the form, so entered data survives a remote
//! rejection.

use crate::error::{GroupdeskError, Result};
use crate::hierarchy::GroupHierarchy;
use crate::identity::Identifier;
use crate::model::{Group, GroupDraft, SubGroupDraft};
use crate::store::GroupStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Closed,
    CreatingNew,
    EditingExisting(Identifier),
}

/// One editable subgroup row.
///
/// `id` is whatever the backend assigned; rows added in this session have
/// none. Rows are addressed by position because several blank rows may exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubGroupRow {
    pub id: Option<Identifier>,
    pub name: String,
    pub folder_path: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct GroupForm {
    mode: FormMode,
    pub name: String,
    pub folder_path: String,
    pub description: String,
    rows: Vec<SubGroupRow>,
    error: Option<String>,
}

impl GroupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    /// Inline error from the last failed submit
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rows(&self) -> &[SubGroupRow] {
        &self.rows
    }

    /// Open a blank form for a new group
    pub fn open_create(&mut self) {
        self.clear();
        self.mode = FormMode::CreatingNew;
    }

    /// Open the form pre-filled from an existing group.
    ///
    /// Every subgroup row keeps the id it was loaded with.
    pub fn open_edit(&mut self, group: &Group) -> Result<()> {
        let id = group
            .id
            .clone()
            .ok_or_else(|| GroupdeskError::MissingId("edit group".to_string()))?;

        self.clear();
        self.mode = FormMode::EditingExisting(id);
        self.name = group.name.clone();
        self.folder_path = group.folder_path.clone();
        self.description = group.description.clone();
        self.rows = group
            .subgroups
            .iter()
            .map(|sub| SubGroupRow {
                id: sub.id.clone(),
                name: sub.name.clone(),
                folder_path: sub.folder_path.clone(),
                description: sub.description.clone(),
            })
            .collect();
        Ok(())
    }

    /// Close without submitting
    pub fn cancel(&mut self) {
        self.clear();
    }

    /// Append a blank, unpersisted row; returns its index
    pub fn add_subgroup_row(&mut self) -> usize {
        self.rows.push(SubGroupRow::default());
        self.rows.len() - 1
    }

    /// Remove the row at `index`. Returns the removed row, if any.
    pub fn remove_subgroup_row(&mut self, index: usize) -> Option<SubGroupRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut SubGroupRow> {
        self.rows.get_mut(index)
    }

    /// Payload from the current field values, trimmed, rows in order
    pub fn draft(&self) -> GroupDraft {
        GroupDraft {
            name: self.name.trim().to_string(),
            folder_path: self.folder_path.trim().to_string(),
            description: self.description.trim().to_string(),
            subgroups: self
                .rows
                .iter()
                .map(|row| SubGroupDraft {
                    id: row.id.clone(),
                    name: row.name.trim().to_string(),
                    folder_path: row.folder_path.trim().to_string(),
                    description: row.description.trim().to_string(),
                })
                .collect(),
        }
    }

    /// Submit to the hierarchy: create or update depending on mode, never both.
    ///
    /// On success the form closes. On failure the mode and fields are kept and
    /// the message becomes the inline error.
    pub async fn submit<S: GroupStore>(&mut self, groups: &GroupHierarchy<S>) -> Result<Group> {
        self.error = None;
        let draft = self.draft();

        let result = match &self.mode {
            FormMode::Closed => return Err(GroupdeskError::FormClosed),
            FormMode::CreatingNew => groups.create(draft).await,
            FormMode::EditingExisting(id) => groups.update(id, draft).await,
        };

        match result {
            Ok(group) => {
                self.clear();
                Ok(group)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubGroup;

    fn existing() -> Group {
        Group {
            id: Some(Identifier::from(1)),
            name: "Wealth".to_string(),
            folder_path: "/w".to_string(),
            description: "d".to_string(),
            subgroups: vec![
                SubGroup {
                    id: Some(Identifier::from(10)),
                    name: "India".to_string(),
                    folder_path: "/w/in".to_string(),
                    description: String::new(),
                },
                SubGroup {
                    id: Some(Identifier::from("x-11")),
                    name: "Global".to_string(),
                    folder_path: "/w/gl".to_string(),
                    description: String::new(),
                },
            ],
        }
    }

    #[test]
    fn test_open_create_clears_fields() {
        let mut form = GroupForm::new();
        form.open_edit(&existing()).unwrap();
        form.open_create();
        assert_eq!(form.mode(), &FormMode::CreatingNew);
        assert!(form.name.is_empty());
        assert!(form.rows().is_empty());
    }

    #[test]
    fn test_open_edit_prefills_and_keeps_ids() {
        let mut form = GroupForm::new();
        form.open_edit(&existing()).unwrap();
        assert_eq!(form.mode(), &FormMode::EditingExisting(Identifier::from(1)));
        assert_eq!(form.name, "Wealth");

        let ids: Vec<_> = form.draft().subgroups.into_iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![Some(Identifier::from(10)), Some(Identifier::from("x-11"))]
        );
    }

    #[test]
    fn test_open_edit_without_id_fails() {
        let mut group = existing();
        group.id = None;
        let mut form = GroupForm::new();
        assert!(matches!(
            form.open_edit(&group),
            Err(GroupdeskError::MissingId(_))
        ));
        assert!(!form.is_open());
    }

    #[test]
    fn test_blank_rows_removed_by_position() {
        let mut form = GroupForm::new();
        form.open_create();
        form.add_subgroup_row();
        let second = form.add_subgroup_row();
        form.add_subgroup_row();
        form.row_mut(second).unwrap().name = "middle".to_string();

        let removed = form.remove_subgroup_row(second).unwrap();
        assert_eq!(removed.name, "middle");
        assert_eq!(form.rows().len(), 2);
        assert!(form.rows().iter().all(|r| r.id.is_none() && r.name.is_empty()));

        assert!(form.remove_subgroup_row(5).is_none());
    }

    #[test]
    fn test_draft_trims_values() {
        let mut form = GroupForm::new();
        form.open_create();
        form.name = "  Wealth ".to_string();
        let i = form.add_subgroup_row();
        form.row_mut(i).unwrap().folder_path = " /w/in ".to_string();

        let draft = form.draft();
        assert_eq!(draft.name, "Wealth");
        assert_eq!(draft.subgroups[0].folder_path, "/w/in");
    }

    #[test]
    fn test_cancel_closes() {
        let mut form = GroupForm::new();
        form.open_edit(&existing()).unwrap();
        form.cancel();
        assert_eq!(form.mode(), &FormMode::Closed);
        assert!(form.rows().is_empty());
    }
}
