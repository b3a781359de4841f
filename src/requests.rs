//! Pending access-request queue.
//!
//! Same shape as the group hierarchy: load replaces, approve/reject remove
//! the request locally once the backend acknowledges.

use std::num::NonZeroUsize;

use parking_lot::Mutex;

use crate::busy::{BusyKey, BusySet};
use crate::error::{GroupdeskError, Result};
use crate::identity::Identifier;
use crate::model::AccessRequest;
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::store::RequestStore;

/// What to do with a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn verb(self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Decision::Approve => "Approved",
            Decision::Reject => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPage {
    pub requests: Vec<AccessRequest>,
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Debug)]
struct QueueState {
    requests: Vec<AccessRequest>,
    current_page: usize,
    loading: bool,
    last_error: Option<String>,
}

pub struct RequestQueue<S> {
    store: S,
    state: Mutex<QueueState>,
    busy: BusySet,
    page_size: NonZeroUsize,
}

impl<S: RequestStore> RequestQueue<S> {
    pub fn new(store: S) -> Self {
        Self::with_page_size(store, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: S, page_size: NonZeroUsize) -> Self {
        Self {
            store,
            state: Mutex::new(QueueState {
                requests: Vec::new(),
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

    /// Replace the queue with the backend's pending list; cleared on failure.
    pub async fn load(&self) -> Result<()> {
        let _guard = self.busy.claim(BusyKey::Listing)?;
        {
            let mut state = self.state.lock();
            state.loading = true;
            state.last_error = None;
        }

        let result = self.store.list_pending().await;

        let mut state = self.state.lock();
        state.loading = false;
        match result {
            Ok(requests) => {
                tracing::info!(count = requests.len(), "loaded pending requests");
                state.requests = requests;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to load pending requests: {e}");
                state.requests.clear();
                state.current_page = 1;
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn approve(&self, id: &Identifier) -> Result<()> {
        self.decide(id, Decision::Approve).await
    }

    pub async fn reject(&self, id: &Identifier) -> Result<()> {
        self.decide(id, Decision::Reject).await
    }

    /// Send a decision and drop the request from the queue once acknowledged.
    pub async fn decide(&self, id: &Identifier, decision: Decision) -> Result<()> {
        let _guard = self.busy.claim(BusyKey::Request(id.clone()))?;

        tracing::debug!(%id, action = decision.verb(), "sending decision");
        let sent = match decision {
            Decision::Approve => self.store.approve(id).await,
            Decision::Reject => self.store.reject(id).await,
        };
        sent.inspect_err(|e| {
            tracing::warn!(%id, action = decision.verb(), "decision failed: {e}");
        })?;

        let mut state = self.state.lock();
        state.requests.retain(|r| r.id.as_ref() != Some(id));
        state.current_page =
            pagination::page_after_removal(state.current_page, state.requests.len(), self.page_size);
        tracing::info!(%id, action = decision.verb(), "request decided");
        Ok(())
    }

    /// Decide on a request taken from the list, failing locally if it has no id.
    pub async fn decide_request(&self, request: &AccessRequest, decision: Decision) -> Result<()> {
        let id = request.id.as_ref().ok_or_else(|| {
            GroupdeskError::MissingId(format!("{} request", decision.verb()))
        })?;
        self.decide(id, decision).await
    }

    pub fn page(&self) -> RequestPage {
        let state = self.state.lock();
        let page = pagination::paginate(&state.requests, self.page_size, state.current_page);
        RequestPage {
            requests: page.visible.to_vec(),
            current_page: page.current_page,
            total_pages: page.total_pages,
        }
    }

    pub fn set_page(&self, page: usize) {
        self.state.lock().current_page = page;
    }

    pub fn requests(&self) -> Vec<AccessRequest> {
        self.state.lock().requests.clone()
    }

    pub fn is_busy(&self, id: &Identifier) -> bool {
        self.busy.contains(&BusyKey::Request(id.clone()))
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }
}
