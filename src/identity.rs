//! Identity and field aliasing for backend records.
//!
//! The backend has shipped several naming conventions over time (`id` vs `_id`
//! vs `groupId`, `groupname` vs `name`, ...). Every lookup into a raw record
//! goes through the alias tables here so the rest of the crate only ever sees
//! canonical values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque record identifier.
///
/// Keeps the JSON scalar it was read from, so `1` and `"1"` are different
/// identifiers. User input is matched against its `Display` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(serde_json::Number),
    Text(String),
}

impl Identifier {
    /// Read an identifier out of a JSON scalar. Null, booleans, arrays and
    /// objects are not identifiers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Identifier::Number(n.clone())),
            Value::String(s) => Some(Identifier::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Identifier::Number(n) => Value::Number(n.clone()),
            Identifier::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{n}"),
            Identifier::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for Identifier {
    fn from(n: u64) -> Self {
        Identifier::Number(n.into())
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier::Text(s.to_string())
    }
}

/// Which alias list applies to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    Group,
    SubGroup,
    Request,
}

impl RecordShape {
    /// Identifier aliases in priority order
    pub fn id_aliases(self) -> &'static [&'static str] {
        match self {
            RecordShape::Group => &["id", "_id", "groupId", "uuid"],
            // `groupId` on a subgroup row is the parent's key, never its own
            RecordShape::SubGroup => &["id", "subGroupId", "sub_group_id", "uuid"],
            RecordShape::Request => &["id", "_id"],
        }
    }
}

pub const GROUP_NAME_ALIASES: &[&str] = &["groupname", "name"];
pub const SUBGROUP_NAME_ALIASES: &[&str] = &["subGroupname", "sub_groupname", "groupname", "name"];
pub const PATH_ALIASES: &[&str] = &["source_path", "path", "folderPath"];
pub const DESCRIPTION_ALIASES: &[&str] = &["description", "desc"];
pub const SUBGROUP_LIST_ALIASES: &[&str] = &["subGroups", "subgroups"];
pub const REQUESTER_ALIASES: &[&str] = &["user.name", "user.username", "username"];
pub const TARGET_GROUP_ALIASES: &[&str] = &["group.name", "group.groupname", "group"];
pub const NOTE_ALIASES: &[&str] = &["note", "message", "requestNote"];

/// Resolve a record's identifier: the first alias holding a non-null scalar.
pub fn resolve_id(record: &Value, shape: RecordShape) -> Option<Identifier> {
    shape
        .id_aliases()
        .iter()
        .find_map(|alias| lookup(record, alias).and_then(Identifier::from_value))
}

/// Resolve a display field: the first alias holding a string or number.
///
/// Aliases may be dotted (`user.name`) to reach into a nested object.
pub fn resolve_field(record: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| match lookup(record, alias)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Resolve a nested list by alias; missing or non-array values give `None`.
pub fn resolve_list<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Vec<Value>> {
    aliases
        .iter()
        .find_map(|alias| lookup(record, alias).and_then(Value::as_array))
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() { None } else { Some(current) }
}
