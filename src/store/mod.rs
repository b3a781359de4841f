//! Remote store contract.
//!
//! The admin core talks to the backend only through these traits. The HTTP
//! implementation lives in [`http`]; wire-format translation in [`wire`].

pub mod http;
pub mod wire;

use std::future::Future;

use crate::error::Result;
use crate::identity::Identifier;
use crate::model::{AccessRequest, Group, GroupDraft};

pub use http::HttpStore;

/// Group CRUD against the backend
pub trait GroupStore: Send + Sync {
    /// Fetch every group the backend knows about
    fn list_groups(&self) -> impl Future<Output = Result<Vec<Group>>> + Send;

    /// Persist a new group.
    ///
    /// `Ok(None)` means the backend acknowledged the write without returning
    /// a usable record.
    fn create_group(
        &self,
        draft: &GroupDraft,
    ) -> impl Future<Output = Result<Option<Group>>> + Send;

    /// Replace an existing group. Same `Ok(None)` convention as create.
    fn update_group(
        &self,
        id: &Identifier,
        draft: &GroupDraft,
    ) -> impl Future<Output = Result<Option<Group>>> + Send;

    fn delete_group(&self, id: &Identifier) -> impl Future<Output = Result<()>> + Send;
}

/// Pending access-request operations
pub trait RequestStore: Send + Sync {
    fn list_pending(&self) -> impl Future<Output = Result<Vec<AccessRequest>>> + Send;

    fn approve(&self, id: &Identifier) -> impl Future<Output = Result<()>> + Send;

    fn reject(&self, id: &Identifier) -> impl Future<Output = Result<()>> + Send;
}
