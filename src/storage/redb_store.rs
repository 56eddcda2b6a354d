// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session storage backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `session_storage`: key → value (both UTF-8 strings)

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{SessionStorage, StorageResult};

/// File name used when opening storage inside a data directory.
pub const DATABASE_FILE: &str = "session-guard.redb";

/// key → value.
const SESSION_STORAGE: TableDefinition<&str, &str> = TableDefinition::new("session_storage");

/// Embedded persistent session storage.
pub struct RedbStorage {
    db: Database,
}

impl std::fmt::Debug for RedbStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStorage").finish_non_exhaustive()
    }
}

impl RedbStorage {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SESSION_STORAGE)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Open (or create) `session-guard.redb` inside `dir`.
    pub fn open_in_dir(dir: &Path) -> StorageResult<Self> {
        Self::open(&dir.join(DATABASE_FILE))
    }
}

impl SessionStorage for RedbStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSION_STORAGE)?;
        match table.get(key)? {
            Some(v) => Ok(Some(v.value().to_string())),
            None => Ok(None),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION_STORAGE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION_STORAGE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_storage() -> (RedbStorage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = RedbStorage::open_in_dir(dir.path()).unwrap();
        (storage, dir)
    }

    #[test]
    fn missing_key_reads_none() {
        let (storage, _dir) = temp_storage();
        assert_eq!(storage.get_item("absent").unwrap(), None);
    }

    #[test]
    fn set_get_remove() {
        let (storage, _dir) = temp_storage();
        storage.set_item("session-guard.validating", "true").unwrap();
        assert_eq!(
            storage.get_item("session-guard.validating").unwrap().as_deref(),
            Some("true")
        );

        storage.remove_item("session-guard.validating").unwrap();
        assert_eq!(storage.get_item("session-guard.validating").unwrap(), None);

        // Second removal is a no-op
        storage.remove_item("session-guard.validating").unwrap();
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let storage = RedbStorage::open_in_dir(dir.path()).unwrap();
            storage.set_item("marker", "true").unwrap();
        }

        let reopened = RedbStorage::open_in_dir(dir.path()).unwrap();
        assert_eq!(reopened.get_item("marker").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = RedbStorage::open_in_dir(&nested).unwrap();
        storage.set_item("k", "v").unwrap();
        assert!(nested.join(DATABASE_FILE).exists());
    }
}
