// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session Guard - session validation for store dispatch chains
//!
//! A dispatch-chain middleware that holds actions needing an authenticated
//! session until the identity provider has confirmed one, caching the result
//! so later actions pass straight through.
//!
//! ## Modules
//!
//! - `middleware` - the guard, its dispatch chain stages and validation rounds
//! - `session` - user record, session cache, injected session actions
//! - `storage` - persistent validation marker (memory, redb)
//! - `client` - identity provider contract
//! - `location` - current-location source for redirects
//! - `config` - environment configuration
//! - `logging` - tracing subscriber setup

pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod middleware;
pub mod session;
pub mod storage;

pub use client::{IdentityClient, RedirectState, SigninRequest};
pub use config::GuardConfig;
pub use error::GuardError;
pub use location::{CurrentLocation, SharedLocation};
pub use middleware::{
    create, BoundMiddleware, Dispatch, Dispatched, GuardedDispatch, RoundOutcome,
    SessionGuard, SessionMiddleware, SessionMiddlewareBuilder, StateSource, ValidationRound,
};
pub use session::{Action, SessionCache, SessionEvent, User};
pub use storage::{MemoryStorage, RedbStorage, SessionStorage, StorageError, ValidationMarker};
