//! Per-target in-flight markers.
//!
//! A marker is claimed before a remote call is dispatched and released when
//! the returned guard drops, so every exit path clears it.

use std::fmt;
use std::sync::Arc;

use dashmap::DashSet;

use crate::error::{GroupdeskError, Result};
use crate::identity::Identifier;

/// What an in-flight operation targets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BusyKey {
    /// A full listing refresh
    Listing,
    /// A create submission (there is no id yet)
    NewGroup,
    Group(Identifier),
    Request(Identifier),
}

impl fmt::Display for BusyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusyKey::Listing => write!(f, "a refresh"),
            BusyKey::NewGroup => write!(f, "a group creation"),
            BusyKey::Group(id) => write!(f, "an operation on group {id}"),
            BusyKey::Request(id) => write!(f, "an operation on request {id}"),
        }
    }
}

/// Shared set of busy markers
#[derive(Debug, Clone, Default)]
pub struct BusySet {
    keys: Arc<DashSet<BusyKey>>,
}

impl BusySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, failing with `Busy` if it is already held.
    pub fn claim(&self, key: BusyKey) -> Result<BusyGuard> {
        if !self.keys.insert(key.clone()) {
            tracing::debug!(%key, "rejected: target busy");
            return Err(GroupdeskError::Busy(key.to_string()));
        }
        Ok(BusyGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    pub fn contains(&self, key: &BusyKey) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Releases its marker on drop
#[must_use = "the busy marker is released as soon as the guard is dropped"]
pub struct BusyGuard {
    keys: Arc<DashSet<BusyKey>>,
    key: BusyKey,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}
