//! Translation between backend JSON and the canonical model.
//!
//! The backend speaks `groupname` / `source_path` / `subGroups` /
//! `subGroupname` and wraps responses inconsistently. Nothing outside this
//! module should know that.

use serde_json::{Map, Value, json};

use crate::identity::{
    self, DESCRIPTION_ALIASES, GROUP_NAME_ALIASES, NOTE_ALIASES, PATH_ALIASES, RecordShape,
    REQUESTER_ALIASES, SUBGROUP_LIST_ALIASES, SUBGROUP_NAME_ALIASES, TARGET_GROUP_ALIASES,
};
use crate::model::{AccessRequest, Group, GroupDraft, SubGroup};

/// Placeholder for request fields the backend left out
const MISSING: &str = "—";

const LIST_ENVELOPES: &[&str] = &["groups", "data"];
const RECORD_ENVELOPES: &[&str] = &["group", "data"];

/// Decode a list response: `{groups: [...]}`, `{data: [...]}` or a bare array.
///
/// Anything else decodes to an empty list.
pub fn decode_groups(body: &Value) -> Vec<Group> {
    unwrap_list(body).iter().map(decode_group).collect()
}

/// Decode a single-record response: `{group: {...}}`, `{data: {...}}` or a
/// bare object. Returns `None` when the body carries no recognizable record.
pub fn decode_single_group(body: &Value) -> Option<Group> {
    let record = RECORD_ENVELOPES
        .iter()
        .find_map(|key| body.get(key).filter(|v| v.is_object()))
        .unwrap_or(body);

    if !record.is_object() || !looks_like_group(record) {
        return None;
    }
    Some(decode_group(record))
}

pub fn decode_group(record: &Value) -> Group {
    let subgroups = identity::resolve_list(record, SUBGROUP_LIST_ALIASES)
        .map(|rows| rows.iter().map(decode_subgroup).collect())
        .unwrap_or_default();

    Group {
        id: identity::resolve_id(record, RecordShape::Group),
        name: field(record, GROUP_NAME_ALIASES),
        folder_path: field(record, PATH_ALIASES),
        description: field(record, DESCRIPTION_ALIASES),
        subgroups,
    }
}

fn decode_subgroup(record: &Value) -> SubGroup {
    SubGroup {
        id: identity::resolve_id(record, RecordShape::SubGroup),
        name: field(record, SUBGROUP_NAME_ALIASES),
        folder_path: field(record, PATH_ALIASES),
        description: field(record, DESCRIPTION_ALIASES),
    }
}

/// Decode the pending-requests listing
pub fn decode_requests(body: &Value) -> Vec<AccessRequest> {
    unwrap_list(body).iter().map(decode_request).collect()
}

fn decode_request(record: &Value) -> AccessRequest {
    AccessRequest {
        id: identity::resolve_id(record, RecordShape::Request),
        requester: identity::resolve_field(record, REQUESTER_ALIASES)
            .unwrap_or_else(|| MISSING.to_string()),
        target_group: identity::resolve_field(record, TARGET_GROUP_ALIASES)
            .unwrap_or_else(|| MISSING.to_string()),
        note: identity::resolve_field(record, NOTE_ALIASES).unwrap_or_else(|| MISSING.to_string()),
    }
}

/// Encode a create/update body.
///
/// Subgroup rows always carry `id`, `null` for rows never persisted, so the
/// backend updates known rows instead of recreating them.
pub fn encode_draft(draft: &GroupDraft) -> Value {
    let subgroups: Vec<Value> = draft
        .subgroups
        .iter()
        .map(|row| {
            json!({
                "id": row.id.as_ref().map(|id| id.to_value()).unwrap_or(Value::Null),
                "subGroupname": row.name,
                "source_path": row.folder_path,
                "description": row.description,
            })
        })
        .collect();

    json!({
        "groupname": draft.name,
        "source_path": draft.folder_path,
        "description": draft.description,
        "subGroups": subgroups,
    })
}

/// Human-readable message for a failed response.
///
/// Prefers the body's `message` field, then the raw body, then the status.
pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body)
        && let Some(message) = message_field(&map)
    {
        return message;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn message_field(map: &Map<String, Value>) -> Option<String> {
    map.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

fn unwrap_list(body: &Value) -> &[Value] {
    LIST_ENVELOPES
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .or_else(|| body.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn looks_like_group(record: &Value) -> bool {
    identity::resolve_id(record, RecordShape::Group).is_some()
        || identity::resolve_field(record, GROUP_NAME_ALIASES).is_some()
}

fn field(record: &Value, aliases: &[&str]) -> String {
    identity::resolve_field(record, aliases).unwrap_or_default()
}
