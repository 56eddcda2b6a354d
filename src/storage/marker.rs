// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The persisted "validation in flight" flag.
//!
//! The marker is advisory: it is read and then written without any atomic
//! compare-and-set, so two hosts sharing a storage backend can both start a
//! round. It never expires on its own.

use std::sync::Arc;

use super::{SessionStorage, StorageResult};

/// Default key the marker is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "session-guard.validating";

/// Value written while a round is in flight.
const MARKER_VALUE: &str = "true";

/// Handle on the validation marker in a storage backend.
#[derive(Clone)]
pub struct ValidationMarker {
    storage: Arc<dyn SessionStorage>,
    key: String,
}

impl std::fmt::Debug for ValidationMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationMarker")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl ValidationMarker {
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Storage key of the marker.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether a round is marked as in flight. An empty value counts as unset.
    pub fn is_set(&self) -> StorageResult<bool> {
        Ok(self
            .storage
            .get_item(&self.key)?
            .is_some_and(|value| !value.is_empty()))
    }

    /// Mark a round as in flight.
    pub fn set(&self) -> StorageResult<()> {
        self.storage.set_item(&self.key, MARKER_VALUE)
    }

    /// Clear the marker.
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove_item(&self.key)
    }
}
