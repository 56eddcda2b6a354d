// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated user record as returned by the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record handed back by an [`IdentityClient`](crate::client::IdentityClient).
///
/// Only expiry is interpreted by the guard. Everything else the provider
/// supplies (subject, tokens, profile claims) travels untouched in `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct User {
    /// Explicit expiry flag set by the provider client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,

    /// Absolute expiry, consulted when `expired` is not set. Epoch seconds on
    /// the wire.
    #[serde(
        default,
        with = "chrono::serde::ts_seconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,

    /// Remaining provider fields.
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Build a user from provider profile fields.
    pub fn from_profile(profile: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Set the explicit expiry flag.
    pub fn with_expired(mut self, expired: bool) -> Self {
        self.expired = Some(expired);
        self
    }

    /// Set the absolute expiry.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the session this user represents can no longer be trusted.
    ///
    /// The provider's flag wins; otherwise `expires_at` is compared to now.
    /// A user with neither is treated as live.
    pub fn is_expired(&self) -> bool {
        match (self.expired, self.expires_at) {
            (Some(flag), _) => flag,
            (None, Some(at)) => at <= Utc::now(),
            (None, None) => false,
        }
    }

    /// Subject claim, if the provider supplied one.
    pub fn subject(&self) -> Option<&str> {
        self.profile.get("sub").and_then(|v| v.as_str())
    }
}
