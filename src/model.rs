//! Canonical domain types.
//!
//! These are storage-format agnostic: wire field names are handled entirely
//! in [`crate::store::wire`].

use serde::{Deserialize, Serialize};

use crate::error::{GroupdeskError, Result};
use crate::identity::Identifier;

/// A top-level group and its subgroups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Assigned by the backend; `None` for a group it never confirmed
    pub id: Option<Identifier>,
    pub name: String,
    pub folder_path: String,
    pub description: String,
    /// Display order
    pub subgroups: Vec<SubGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubGroup {
    /// `None` only for rows added locally and not yet persisted
    pub id: Option<Identifier>,
    pub name: String,
    pub folder_path: String,
    pub description: String,
}

/// A pending request from a user to join a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub id: Option<Identifier>,
    pub requester: String,
    pub target_group: String,
    pub note: String,
}

/// Create/update payload in canonical field names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDraft {
    pub name: String,
    pub folder_path: String,
    pub description: String,
    pub subgroups: Vec<SubGroupDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubGroupDraft {
    pub id: Option<Identifier>,
    pub name: String,
    pub folder_path: String,
    pub description: String,
}

impl GroupDraft {
    /// Check required fields before anything is sent.
    ///
    /// Group-level fields are checked first, then subgroup rows in order; the
    /// first failing row is named by its 1-based position.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.name) || is_blank(&self.folder_path) {
            return Err(GroupdeskError::Validation(
                "Group name and folder path are required.".to_string(),
            ));
        }
        if is_blank(&self.description) {
            return Err(GroupdeskError::Validation(
                "Group description is required.".to_string(),
            ));
        }
        for (index, row) in self.subgroups.iter().enumerate() {
            if is_blank(&row.name) || is_blank(&row.folder_path) {
                return Err(GroupdeskError::Validation(format!(
                    "SubGroup {} requires name and path.",
                    index + 1
                )));
            }
        }
        Ok(())
    }

    /// Rebuild a group locally from this payload, used when the backend
    /// accepted a mutation without returning the stored record.
    pub fn into_group(self, id: Option<Identifier>) -> Group {
        Group {
            id,
            name: self.name,
            folder_path: self.folder_path,
            description: self.description,
            subgroups: self
                .subgroups
                .into_iter()
                .map(|row| SubGroup {
                    id: row.id,
                    name: row.name,
                    folder_path: row.folder_path,
                    description: row.description,
                })
                .collect(),
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
