// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Storage Module
//!
//! Persistent key/value storage for the validation marker. The guard only
//! needs three string operations, so backends stay thin:
//!
//! - `memory` - process-local map, for tests and hosts without a disk
//! - `redb_store` - embedded redb database, survives restarts
//!
//! ## Storage Layout
//!
//! ```text
//! session_storage (table)
//!   session-guard.validating -> "true"    # present while a round is in flight
//! ```

pub mod marker;
pub mod memory;
pub mod redb_store;

pub use marker::ValidationMarker;
pub use memory::MemoryStorage;
pub use redb_store::RedbStorage;

/// Error type for session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value storage with browser local-storage semantics.
///
/// Values are strings. A missing key reads as `None`; removing a missing key
/// is not an error.
pub trait SessionStorage: Send + Sync {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}
