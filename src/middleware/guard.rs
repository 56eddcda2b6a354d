// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared guard state and the two round completion handlers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::Dispatch;
use crate::client::{IdentityClient, SigninRequest};
use crate::error::GuardError;
use crate::location::CurrentLocation;
use crate::session::{user_expired, user_found, Action, SessionCache, SessionEvent, User};
use crate::storage::ValidationMarker;

use super::round::RoundOutcome;

/// State shared by a middleware instance and every round it spawns.
pub struct SessionGuard<C> {
    pub(crate) client: C,
    pub(crate) cache: SessionCache,
    pub(crate) marker: ValidationMarker,
    pub(crate) location: Option<Arc<dyn CurrentLocation>>,
    pub(crate) trigger_auth_flow: bool,
    pub(crate) callback_route: Option<String>,
}

impl<C> std::fmt::Debug for SessionGuard<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("marker", &self.marker)
            .field("trigger_auth_flow", &self.trigger_auth_flow)
            .field("callback_route", &self.callback_route)
            .finish_non_exhaustive()
    }
}

impl<C: IdentityClient> SessionGuard<C> {
    /// The identity client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The validation marker.
    pub fn marker(&self) -> &ValidationMarker {
        &self.marker
    }

    /// Whether a missing user triggers the sign-in redirect.
    pub fn triggers_auth_flow(&self) -> bool {
        self.trigger_auth_flow
    }

    pub fn set_stored_user(&self, user: User) {
        self.cache.set_stored_user(user);
    }

    pub fn remove_stored_user(&self) {
        self.cache.remove_stored_user();
    }

    pub fn stored_user(&self) -> Option<User> {
        self.cache.stored_user()
    }

    /// Whether the host is currently on the sign-in callback route.
    pub(crate) fn on_callback_route(&self) -> bool {
        match (&self.callback_route, &self.location) {
            (Some(route), Some(location)) => location.current_url().path() == route,
            _ => false,
        }
    }

    fn signin_request(&self) -> SigninRequest {
        match &self.location {
            Some(location) => SigninRequest::returning_to(&location.current_url()),
            None => SigninRequest::with_redirect_url(String::new()),
        }
    }

    /// Completion handler for a fetch that returned.
    ///
    /// A missing or expired user dispatches `USER_EXPIRED` and leaves the
    /// marker set; with the auth flow enabled the sign-in redirect runs and
    /// `action` is dropped. A live user clears the marker, is cached, and
    /// `USER_FOUND` precedes `action` down the chain. Failing to clear the
    /// marker is logged and does not hold back the user or the action.
    pub fn user_loaded<A, N>(
        &self,
        next: &N,
        user: Option<User>,
        action: A,
    ) -> Result<RoundOutcome<N::Output>, GuardError<C::Error>>
    where
        A: Action + From<SessionEvent>,
        N: Dispatch<A> + ?Sized,
    {
        let Some(user) = user.filter(|u| !u.is_expired()) else {
            debug!(action_type = action.action_type(), "No live user session");
            let _ = next.dispatch(user_expired());

            if self.trigger_auth_flow {
                let request = self.signin_request();
                info!(
                    redirect_url = %request.data.redirect_url,
                    "Handing off to sign-in redirect"
                );
                self.client.signin_redirect(request);
                return Ok(RoundOutcome::Redirected);
            }

            return Ok(RoundOutcome::Forwarded(next.dispatch(action)));
        };

        if let Err(e) = self.marker.clear() {
            warn!(error = %e, "Failed to clear validation marker after loading user");
        }
        self.cache.set_stored_user(user.clone());
        info!(subject = user.subject(), "User session validated");

        let _ = next.dispatch(user_found(user));
        Ok(RoundOutcome::Forwarded(next.dispatch(action)))
    }

    /// Completion handler for a fetch that failed.
    ///
    /// Clears the marker so a later action can retry, drops the cached user,
    /// and returns the error for the round to resolve with.
    pub fn user_load_failed(&self, error: C::Error) -> GuardError<C::Error> {
        if let Err(e) = self.marker.clear() {
            warn!(error = %e, "Failed to clear validation marker after fetch error");
        }
        self.cache.remove_stored_user();
        GuardError::IdentityFetch(error)
    }
}
