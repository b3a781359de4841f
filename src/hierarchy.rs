//! In-memory group hierarchy with optimistic updates.
//!
//! Mutations are sent to the store and, on success, the store's claimed
//! result is merged into the local collection. There is no re-fetch after a
//! mutation. The collection lives behind a mutex that is only held between
//! suspension points, so completions for different targets may interleave
//! freely while each one applies atomically.

use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::busy::{BusyKey, BusySet};
use crate::error::{GroupdeskError, Result};
use crate::identity::Identifier;
use crate::model::{Group, GroupDraft};
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::store::GroupStore;

/// Human-in-the-loop approval for destructive operations
pub trait ConfirmGate {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Gate that approves everything (used for `--force`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmGate for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Identifier),
    /// The confirmation gate said no; nothing was sent
    Declined,
}

/// Snapshot of the visible page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPage {
    pub groups: Vec<Group>,
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Debug)]
struct HierarchyState {
    groups: Vec<Group>,
    current_page: usize,
    loading: bool,
    last_error: Option<String>,
}

/// Group collection backed by a remote store
pub struct GroupHierarchy<S> {
    store: S,
    state: Mutex<HierarchyState>,
    busy: BusySet,
    page_size: NonZeroUsize,
}

impl<S: GroupStore> GroupHierarchy<S> {
    pub fn new(store: S) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: S, page_size: NonZeroUsize) -> Self {
        Self {
            store,
            state: Mutex::new(HierarchyState {
                groups: Vec::new(),
                current_page: 1,
                loading: false,
                last_error: None,
            }),
            busy: BusySet::new(),
            page_size,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the collection with the store's current listing.
    ///
    /// On failure the collection is cleared rather than left stale, and the
    /// error is recorded as well as returned.
    pub async fn load(&self) -> Result<()> {
        let _guard = self.busy.claim(BusyKey::Listing)?;
        {
            let mut state = self.state.lock();
            state.loading = true;
            state.last_error = None;
        }

        let result = self.store.list_groups().await;

        let mut state = self.state.lock();
        state.loading = false;
        match result {
            Ok(groups) => {
                tracing::info!(count = groups.len(), "loaded groups");
                state.groups = groups;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to load groups: {e}");
                state.groups.clear();
                state.current_page = 1;
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Create a group and show it at the top of the first page.
    pub async fn create(&self, draft: GroupDraft) -> Result<Group> {
        let _guard = self.busy.claim(BusyKey::NewGroup)?;
        draft.validate()?;

        tracing::debug!(name = %draft.name, "creating group");
        let claimed = self.store.create_group(&draft).await.inspect_err(|e| {
            tracing::warn!("create group failed: {e}");
        })?;
        let group = claimed.unwrap_or_else(|| draft.into_group(None));

        let mut state = self.state.lock();
        state.groups.insert(0, group.clone());
        state.current_page = 1;
        tracing::info!(id = ?group.id, "created group");
        Ok(group)
    }

    /// Update a group in place; its position in the list is kept.
    pub async fn update(&self, id: &Identifier, draft: GroupDraft) -> Result<Group> {
        let _guard = self.busy.claim(BusyKey::Group(id.clone()))?;
        draft.validate()?;

        tracing::debug!(%id, "updating group");
        let claimed = self.store.update_group(id, &draft).await.inspect_err(|e| {
            tracing::warn!(%id, "update group failed: {e}");
        })?;
        let mut group = claimed.unwrap_or_else(|| draft.into_group(Some(id.clone())));
        // An echoed request body has no id of its own
        group.id.get_or_insert_with(|| id.clone());

        let mut state = self.state.lock();
        if let Some(slot) = state
            .groups
            .iter_mut()
            .find(|g| g.id.as_ref() == Some(id))
        {
            *slot = group.clone();
        }
        tracing::info!(%id, "updated group");
        Ok(group)
    }

    /// Delete a group after confirmation.
    ///
    /// Fails locally without asking when the group has no id.
    pub async fn delete(&self, group: &Group, gate: &impl ConfirmGate) -> Result<DeleteOutcome> {
        let id = group
            .id
            .clone()
            .ok_or_else(|| GroupdeskError::MissingId("delete group".to_string()))?;
        let _guard = self.busy.claim(BusyKey::Group(id.clone()))?;

        if !gate.confirm(&format!("Delete group '{}' ({id})", group.name)) {
            tracing::debug!(%id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        self.store.delete_group(&id).await.inspect_err(|e| {
            tracing::warn!(%id, "delete group failed: {e}");
        })?;

        let mut state = self.state.lock();
        state.groups.retain(|g| g.id.as_ref() != Some(&id));
        state.current_page =
            pagination::page_after_removal(state.current_page, state.groups.len(), self.page_size);
        tracing::info!(%id, "deleted group");
        Ok(DeleteOutcome::Deleted(id))
    }

    /// Current page of groups
    pub fn page(&self) -> GroupPage {
        let state = self.state.lock();
        let page = pagination::paginate(&state.groups, self.page_size, state.current_page);
        GroupPage {
            groups: page.visible.to_vec(),
            current_page: page.current_page,
            total_pages: page.total_pages,
        }
    }

    /// Jump to a page. Out-of-range pages are accepted and render empty.
    pub fn set_page(&self, page: usize) {
        self.state.lock().current_page = page;
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().current_page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn groups(&self) -> Vec<Group> {
        self.state.lock().groups.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().groups.is_empty()
    }

    pub fn find(&self, id: &Identifier) -> Option<Group> {
        self.state
            .lock()
            .groups
            .iter()
            .find(|g| g.id.as_ref() == Some(id))
            .cloned()
    }

    pub fn is_busy(&self, key: &BusyKey) -> bool {
        self.busy.contains(key)
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }
}
