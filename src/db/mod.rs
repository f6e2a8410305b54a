// SPDX-License-Identifier: MIT

//! Persistence layer: key-value backends and the typed local store.

pub mod backend;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, StoreError};
pub use store::{LedgerError, LocalStore, QuotaPolicy};

/// Fixed keys of the persisted state.
pub mod keys {
    pub const RECORDS: &str = "records";
    pub const USER_PROFILE: &str = "user_profile";
    pub const IS_AUTHENTICATED: &str = "is_authenticated";
}
