// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provider client contract.
//!
//! The guard never speaks the provider protocol itself. Hosts plug in
//! whatever client owns tokens and redirects (an OIDC user manager, a
//! platform SDK, a test double).

use std::future::Future;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::session::User;

/// State carried through the sign-in redirect and handed back on callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectState {
    /// Where the user was when the session was found missing.
    pub redirect_url: String,
}

/// Argument to [`IdentityClient::signin_redirect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninRequest {
    pub data: RedirectState,
}

impl SigninRequest {
    /// Request a sign-in that returns to `url` afterwards.
    pub fn returning_to(url: &Url) -> Self {
        Self::with_redirect_url(url.as_str())
    }

    /// Request a sign-in with a raw redirect URL. Empty when the host has no
    /// notion of a current location.
    pub fn with_redirect_url(redirect_url: impl Into<String>) -> Self {
        Self {
            data: RedirectState {
                redirect_url: redirect_url.into(),
            },
        }
    }
}

/// Client for the external identity provider.
pub trait IdentityClient: Send + Sync + 'static {
    /// Error returned when the user cannot be loaded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the current user. `Ok(None)` means no session exists.
    fn get_user(&self) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send;

    /// Hand control to the provider's interactive sign-in flow.
    fn signin_redirect(&self, request: SigninRequest);
}
