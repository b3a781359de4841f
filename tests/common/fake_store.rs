//! In-memory store with call recording and failure injection

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use groupdesk::{
    AccessRequest, Group, GroupDraft, GroupStore, GroupdeskError, Identifier, RequestStore,
    Result, SubGroup,
};

#[derive(Debug, Clone)]
pub enum Failure {
    Rejected(u16, String),
    Transport(String),
}

impl Failure {
    fn to_error(&self) -> GroupdeskError {
        match self {
            Failure::Rejected(status, message) => GroupdeskError::Rejected {
                status: *status,
                message: message.clone(),
            },
            Failure::Transport(message) => GroupdeskError::Transport(message.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(GroupDraft),
    Update(Identifier, GroupDraft),
    Delete(Identifier),
    ListPending,
    Approve(Identifier),
    Reject(Identifier),
}

#[derive(Default)]
pub struct FakeStore {
    groups: Mutex<Vec<Group>>,
    requests: Mutex<Vec<AccessRequest>>,
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<Failure>>,
    next_id: AtomicU64,
    /// Mutations return no record, like a backend that answers `{}`
    silent: AtomicBool,
    delete_gate: Option<Arc<Notify>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            ..Default::default()
        }
    }

    pub fn with_groups(groups: Vec<Group>) -> Self {
        let store = Self::new();
        *store.groups.lock() = groups;
        store
    }

    pub fn with_requests(requests: Vec<AccessRequest>) -> Self {
        let store = Self::new();
        *store.requests.lock() = requests;
        store
    }

    /// Hold every delete until `gate` is notified
    pub fn with_delete_gate(mut self, gate: Arc<Notify>) -> Self {
        self.delete_gate = Some(gate);
        self
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock() = Some(failure);
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn set_silent(&self, silent: bool) {
        self.silent.store(silent, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| !matches!(c, Call::List | Call::ListPending))
            .count()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().push(call);
        match &*self.failure.lock() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn assign_ids(&self, draft: &GroupDraft, id: Identifier) -> Group {
        Group {
            id: Some(id),
            name: draft.name.clone(),
            folder_path: draft.folder_path.clone(),
            description: draft.description.clone(),
            subgroups: draft
                .subgroups
                .iter()
                .map(|row| SubGroup {
                    id: Some(row.id.clone().unwrap_or_else(|| self.fresh_id())),
                    name: row.name.clone(),
                    folder_path: row.folder_path.clone(),
                    description: row.description.clone(),
                })
                .collect(),
        }
    }

    fn fresh_id(&self) -> Identifier {
        Identifier::from(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl GroupStore for FakeStore {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.record(Call::List)?;
        Ok(self.groups.lock().clone())
    }

    async fn create_group(&self, draft: &GroupDraft) -> Result<Option<Group>> {
        self.record(Call::Create(draft.clone()))?;
        let group = self.assign_ids(draft, self.fresh_id());
        self.groups.lock().insert(0, group.clone());
        Ok((!self.silent.load(Ordering::SeqCst)).then_some(group))
    }

    async fn update_group(&self, id: &Identifier, draft: &GroupDraft) -> Result<Option<Group>> {
        self.record(Call::Update(id.clone(), draft.clone()))?;
        let group = self.assign_ids(draft, id.clone());
        if let Some(slot) = self
            .groups
            .lock()
            .iter_mut()
            .find(|g| g.id.as_ref() == Some(id))
        {
            *slot = group.clone();
        }
        Ok((!self.silent.load(Ordering::SeqCst)).then_some(group))
    }

    async fn delete_group(&self, id: &Identifier) -> Result<()> {
        self.record(Call::Delete(id.clone()))?;
        if let Some(gate) = &self.delete_gate {
            gate.notified().await;
        }
        self.groups.lock().retain(|g| g.id.as_ref() != Some(id));
        Ok(())
    }
}

impl RequestStore for FakeStore {
    async fn list_pending(&self) -> Result<Vec<AccessRequest>> {
        self.record(Call::ListPending)?;
        Ok(self.requests.lock().clone())
    }

    async fn approve(&self, id: &Identifier) -> Result<()> {
        self.record(Call::Approve(id.clone()))?;
        self.requests.lock().retain(|r| r.id.as_ref() != Some(id));
        Ok(())
    }

    async fn reject(&self, id: &Identifier) -> Result<()> {
        self.record(Call::Reject(id.clone()))?;
        self.requests.lock().retain(|r| r.id.as_ref() != Some(id));
        Ok(())
    }
}

pub fn group(id: u64, name: &str) -> Group {
    Group {
        id: Some(Identifier::from(id)),
        name: name.to_string(),
        folder_path: format!("/{}", name.to_lowercase()),
        description: format!("{name} group"),
        subgroups: Vec::new(),
    }
}

pub fn groups(n: u64) -> Vec<Group> {
    (1..=n).map(|i| group(i, &format!("G{i}"))).collect()
}

pub fn request(id: u64, requester: &str) -> AccessRequest {
    AccessRequest {
        id: Some(Identifier::from(id)),
        requester: requester.to_string(),
        target_group: "Wealth".to_string(),
        note: "please".to_string(),
    }
}

pub fn draft(name: &str) -> GroupDraft {
    GroupDraft {
        name: name.to_string(),
        folder_path: format!("/{}", name.to_lowercase()),
        description: format!("{name} group"),
        subgroups: Vec::new(),
    }
}
