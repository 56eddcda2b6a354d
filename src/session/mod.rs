// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Module
//!
//! The user record, the in-memory session cache, and the session actions the
//! guard injects into the dispatch chain.

pub mod actions;
pub mod cache;
pub mod user;

pub use actions::{user_expired, user_found, Action, SessionEvent, USER_EXPIRED, USER_FOUND};
pub use cache::SessionCache;
pub use user::User;
