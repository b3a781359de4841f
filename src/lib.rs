pub mod busy;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod hierarchy;
pub mod identity;
pub mod model;
pub mod pagination;
pub mod paths;
pub mod requests;
pub mod store;

pub use busy::{BusyKey, BusySet};
pub use config::Config;
pub use error::{GroupdeskError, Result};
pub use form::{FormMode, GroupForm, SubGroupRow};
pub use hierarchy::{AlwaysConfirm, ConfirmGate, DeleteOutcome, GroupHierarchy, GroupPage};
pub use identity::{Identifier, RecordShape};
pub use model::{AccessRequest, Group, GroupDraft, SubGroup, SubGroupDraft};
pub use requests::{Decision, RequestPage, RequestQueue};
pub use store::{GroupStore, HttpStore, RequestStore};
