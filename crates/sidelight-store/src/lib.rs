//! sidelight-store: persistence and the observable group state store.
//!
//! `GroupStore` owns the workspace's groups and mute flag, persists every
//! mutation through an injected [`storage::KeyValueStorage`], and fans out
//! typed change notifications through [`signal::Signal`] registries.

pub mod signal;
pub mod state;
pub mod storage;

pub use signal::{Signal, SubscriptionId};
pub use state::{
    storage_key, GroupEvent, GroupStore, Mutation, Opened, SelectionEvent, StoreError,
    STORAGE_NAMESPACE,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
