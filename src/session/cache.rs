// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory cache of the last loaded user.
//!
//! One cache belongs to one middleware instance and is shared (via `Arc`)
//! with the validation rounds that instance spawns. A cached user that is not
//! expired short-circuits validation without touching storage or the
//! identity provider.

use std::sync::{PoisonError, RwLock};

use super::user::User;

/// Cached user slot.
#[derive(Debug, Default)]
pub struct SessionCache {
    user: RwLock<Option<User>>,
}

impl SessionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached user.
    pub fn set_stored_user(&self, user: User) {
        let mut slot = self.user.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(user);
    }

    /// Drop the cached user.
    pub fn remove_stored_user(&self) {
        let mut slot = self.user.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// Clone of the cached user, if any.
    pub fn stored_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a cached user exists and has not expired.
    pub fn has_live_user(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|user| !user.is_expired())
    }
}
