// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Current-location source, read when building the sign-in redirect and when
//! checking the callback route.

use std::sync::{PoisonError, RwLock};

use url::Url;

/// Where the application currently is.
pub trait CurrentLocation: Send + Sync {
    fn current_url(&self) -> Url;
}

/// A location the host updates as it navigates.
#[derive(Debug)]
pub struct SharedLocation {
    url: RwLock<Url>,
}

impl SharedLocation {
    pub fn new(url: Url) -> Self {
        Self {
            url: RwLock::new(url),
        }
    }

    /// Record a navigation.
    pub fn navigate(&self, url: Url) {
        *self.url.write().unwrap_or_else(PoisonError::into_inner) = url;
    }
}

impl CurrentLocation for SharedLocation {
    fn current_url(&self) -> Url {
        self.url
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CurrentLocation for Url {
    fn current_url(&self) -> Url {
        self.clone()
    }
}
