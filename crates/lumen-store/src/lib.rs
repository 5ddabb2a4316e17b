//! Single-writer store for light-chain projects.
//!
//! [`DomainStore`] owns the chains, nodes, selection and UI settings, applies
//! every change through named actions, keeps an undo/redo history of whole
//! snapshots and notifies subscribers after each committed change.

pub mod config;
pub mod error;
mod history;
pub mod persist;
pub mod state;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use persist::{load_project, save_project};
pub use state::ProjectState;
pub use store::{DeletePolicy, DomainStore, SubscriptionId};
