// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Validation Middleware
//!
//! Wraps a store's dispatch chain in three stages, mirroring the usual
//! `store => next => action` middleware shape:
//!
//! ```rust,ignore
//! let middleware = session_guard::create(client, |state: &AppState, action: &AppAction| {
//!     action.requires_session()
//! });
//! let dispatch = middleware.bind(|| app_state.snapshot()).wrap(reducer_dispatch);
//!
//! match dispatch.dispatch(action)? {
//!     Dispatched::Forwarded(result) => { /* passed straight through */ }
//!     Dispatched::Validating(round) => { /* held until the user fetch completes */ }
//! }
//! ```
//!
//! ## Decision
//!
//! For every action:
//!
//! 1. `should_validate(state, action)` false → forward.
//! 2. On the sign-in callback route → forward.
//! 3. Cached user present and not expired → forward.
//! 4. Validation marker set (a round is already in flight) → forward.
//! 5. Otherwise clear the cache, set the marker and spawn a round that loads
//!    the user; the action is held by the round.
//!
//! A round that finds a live user dispatches `USER_FOUND` and then the held
//! action. One that finds none dispatches `USER_EXPIRED`, then either starts
//! the sign-in redirect (dropping the action) or forwards the action. A failed
//! fetch clears the marker and resolves the round with the client's error.

pub mod guard;
pub mod round;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::client::IdentityClient;
use crate::config::GuardConfig;
use crate::error::GuardError;
use crate::location::CurrentLocation;
use crate::session::{Action, SessionCache, SessionEvent, User};
use crate::storage::marker::DEFAULT_STORAGE_KEY;
use crate::storage::{MemoryStorage, SessionStorage, ValidationMarker};

pub use guard::SessionGuard;
pub use round::{Dispatched, RoundOutcome, ValidationRound};

/// Predicate deciding whether an action needs a validated session.
pub type ShouldValidate<S, A> = Arc<dyn Fn(&S, &A) -> bool + Send + Sync>;

/// Read access to the store's current state.
pub trait StateSource: Send + Sync + 'static {
    type State;

    fn get_state(&self) -> Self::State;
}

impl<F, S> StateSource for F
where
    F: Fn() -> S + Send + Sync + 'static,
{
    type State = S;

    fn get_state(&self) -> S {
        self()
    }
}

/// The next link of the dispatch chain.
pub trait Dispatch<A>: Send + Sync + 'static {
    type Output: Send + 'static;

    fn dispatch(&self, action: A) -> Self::Output;
}

impl<A, F, R> Dispatch<A> for F
where
    F: Fn(A) -> R + Send + Sync + 'static,
    R: Send + 'static,
{
    type Output = R;

    fn dispatch(&self, action: A) -> R {
        self(action)
    }
}

/// Create a middleware that validates actions matching `should_validate`.
pub fn create<C, S, A>(
    client: C,
    should_validate: impl Fn(&S, &A) -> bool + Send + Sync + 'static,
) -> SessionMiddleware<C, S, A>
where
    C: IdentityClient,
    S: 'static,
    A: 'static,
{
    SessionMiddleware::builder(client)
        .should_validate(should_validate)
        .build()
}

/// Builder for [`SessionMiddleware`].
pub struct SessionMiddlewareBuilder<C, S, A> {
    client: C,
    should_validate: ShouldValidate<S, A>,
    storage: Arc<dyn SessionStorage>,
    storage_key: String,
    location: Option<Arc<dyn CurrentLocation>>,
    trigger_auth_flow: bool,
    callback_route: Option<String>,
}

fn validate_everything<S, A>(_: &S, _: &A) -> bool {
    true
}

impl<C, S, A> SessionMiddlewareBuilder<C, S, A>
where
    C: IdentityClient,
    S: 'static,
    A: 'static,
{
    fn new(client: C) -> Self {
        Self {
            client,
            should_validate: Arc::new(validate_everything::<S, A>),
            storage: Arc::new(MemoryStorage::new()),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            location: None,
            trigger_auth_flow: true,
            callback_route: None,
        }
    }

    /// Only validate actions matching `predicate`. Defaults to every action.
    pub fn should_validate(
        mut self,
        predicate: impl Fn(&S, &A) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.should_validate = Arc::new(predicate);
        self
    }

    /// Storage for the validation marker. Defaults to [`MemoryStorage`].
    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = storage;
        self
    }

    /// Key the marker is stored under.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Source of the current URL for redirects and the callback route check.
    pub fn location(mut self, location: Arc<dyn CurrentLocation>) -> Self {
        self.location = Some(location);
        self
    }

    /// Redirect to sign-in when no user is found. Defaults to `true`.
    pub fn trigger_auth_flow(mut self, trigger: bool) -> Self {
        self.trigger_auth_flow = trigger;
        self
    }

    /// Path on which validation never runs. Needs a [`location`](Self::location).
    pub fn callback_route(mut self, route: impl Into<String>) -> Self {
        self.callback_route = Some(route.into());
        self
    }

    /// Apply marker key, auth flow switch and callback route from `config`.
    /// Storage is left to the caller; see [`GuardConfig::open_storage`].
    pub fn config(mut self, config: &GuardConfig) -> Self {
        self.storage_key = config.storage_key.clone();
        self.trigger_auth_flow = config.trigger_auth_flow;
        self.callback_route = config.callback_route.clone();
        self
    }

    pub fn build(self) -> SessionMiddleware<C, S, A> {
        SessionMiddleware {
            guard: Arc::new(SessionGuard {
                client: self.client,
                cache: SessionCache::new(),
                marker: ValidationMarker::new(self.storage, self.storage_key),
                location: self.location,
                trigger_auth_flow: self.trigger_auth_flow,
                callback_route: self.callback_route,
            }),
            should_validate: self.should_validate,
        }
    }
}

/// Session validation middleware, not yet bound to a store.
pub struct SessionMiddleware<C, S, A> {
    guard: Arc<SessionGuard<C>>,
    should_validate: ShouldValidate<S, A>,
}

impl<C, S, A> Clone for SessionMiddleware<C, S, A> {
    fn clone(&self) -> Self {
        Self {
            guard: Arc::clone(&self.guard),
            should_validate: Arc::clone(&self.should_validate),
        }
    }
}

impl<C, S, A> SessionMiddleware<C, S, A>
where
    C: IdentityClient,
    S: 'static,
    A: 'static,
{
    /// Middleware that validates every action.
    pub fn new(client: C) -> Self {
        Self::builder(client).build()
    }

    pub fn builder(client: C) -> SessionMiddlewareBuilder<C, S, A> {
        SessionMiddlewareBuilder::new(client)
    }

    /// Shared guard state, including the round completion handlers.
    pub fn guard(&self) -> &Arc<SessionGuard<C>> {
        &self.guard
    }

    pub fn set_stored_user(&self, user: User) {
        self.guard.set_stored_user(user);
    }

    pub fn remove_stored_user(&self) {
        self.guard.remove_stored_user();
    }

    pub fn stored_user(&self) -> Option<User> {
        self.guard.stored_user()
    }

    /// Attach the store whose state feeds `should_validate`.
    pub fn bind<St>(&self, store: St) -> BoundMiddleware<C, St, A>
    where
        St: StateSource<State = S>,
    {
        BoundMiddleware {
            guard: Arc::clone(&self.guard),
            should_validate: Arc::clone(&self.should_validate),
            store: Arc::new(store),
        }
    }
}

/// Middleware bound to a store, waiting for the rest of the chain.
pub struct BoundMiddleware<C, St: StateSource, A> {
    guard: Arc<SessionGuard<C>>,
    should_validate: ShouldValidate<St::State, A>,
    store: Arc<St>,
}

impl<C, St, A> BoundMiddleware<C, St, A>
where
    C: IdentityClient,
    St: StateSource,
{
    /// Put the middleware in front of `next`.
    pub fn wrap<N>(&self, next: N) -> GuardedDispatch<C, St, A, N>
    where
        N: Dispatch<A>,
    {
        GuardedDispatch {
            guard: Arc::clone(&self.guard),
            should_validate: Arc::clone(&self.should_validate),
            store: Arc::clone(&self.store),
            next: Arc::new(next),
        }
    }
}

/// The guarded dispatch function.
pub struct GuardedDispatch<C, St: StateSource, A, N> {
    guard: Arc<SessionGuard<C>>,
    should_validate: ShouldValidate<St::State, A>,
    store: Arc<St>,
    next: Arc<N>,
}

impl<C, St: StateSource, A, N> Clone for GuardedDispatch<C, St, A, N> {
    fn clone(&self) -> Self {
        Self {
            guard: Arc::clone(&self.guard),
            should_validate: Arc::clone(&self.should_validate),
            store: Arc::clone(&self.store),
            next: Arc::clone(&self.next),
        }
    }
}

impl<C, St, A, N> GuardedDispatch<C, St, A, N>
where
    C: IdentityClient,
    St: StateSource,
    A: Action + From<SessionEvent>,
    N: Dispatch<A>,
{
    /// Dispatch `action` through the guard.
    ///
    /// Never blocks. When a round has to start this must run inside a Tokio
    /// runtime; the round is spawned onto it.
    pub fn dispatch(
        &self,
        action: A,
    ) -> Result<Dispatched<N::Output, C::Error>, GuardError<C::Error>> {
        let state = self.store.get_state();
        if !(self.should_validate)(&state, &action) {
            return Ok(Dispatched::Forwarded(self.next.dispatch(action)));
        }

        if self.guard.on_callback_route() {
            debug!(action_type = action.action_type(), "On sign-in callback route, skipping validation");
            return Ok(Dispatched::Forwarded(self.next.dispatch(action)));
        }

        if self.guard.cache.has_live_user() {
            return Ok(Dispatched::Forwarded(self.next.dispatch(action)));
        }

        if self.guard.marker.is_set()? {
            debug!(action_type = action.action_type(), "Validation already in flight");
            return Ok(Dispatched::Forwarded(self.next.dispatch(action)));
        }

        let runtime = tokio::runtime::Handle::try_current()?;

        self.guard.cache.remove_stored_user();
        self.guard.marker.set()?;

        let round_id = Uuid::new_v4();
        info!(%round_id, action_type = action.action_type(), "Starting session validation round");

        let guard = Arc::clone(&self.guard);
        let next = Arc::clone(&self.next);
        let round = async move {
            match guard.client.get_user().await {
                Ok(user) => guard.user_loaded(next.as_ref(), user, action),
                Err(e) => Err(guard.user_load_failed(e)),
            }
        };
        let handle = runtime.spawn(round.instrument(tracing::info_span!("validation_round", %round_id)));

        Ok(Dispatched::Validating(ValidationRound::new(round_id, handle)))
    }
}
