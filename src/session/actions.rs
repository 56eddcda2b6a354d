// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Actions the guard injects into the dispatch chain.

use super::user::User;

/// Action type of [`SessionEvent::UserFound`].
pub const USER_FOUND: &str = "session-guard/USER_FOUND";

/// Action type of [`SessionEvent::UserExpired`].
pub const USER_EXPIRED: &str = "session-guard/USER_EXPIRED";

/// A message flowing through the dispatch chain.
///
/// The guard only reads the type for logging; it never inspects or rewrites
/// the payload.
pub trait Action: Send + 'static {
    /// Discriminating type string.
    fn action_type(&self) -> &str;
}

/// Session signals dispatched by the guard.
///
/// The host's action type must be constructible from these
/// (`A: From<SessionEvent>`) so the guard can push them down the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// An authenticated, unexpired user was loaded.
    UserFound(User),
    /// No usable user session exists.
    UserExpired,
}

impl SessionEvent {
    /// The type string this event carries into the chain.
    pub fn action_type(&self) -> &'static str {
        match self {
            SessionEvent::UserFound(_) => USER_FOUND,
            SessionEvent::UserExpired => USER_EXPIRED,
        }
    }
}

impl Action for SessionEvent {
    fn action_type(&self) -> &str {
        SessionEvent::action_type(self)
    }
}

/// Build a `USER_FOUND` action.
pub fn user_found<A: From<SessionEvent>>(user: User) -> A {
    A::from(SessionEvent::UserFound(user))
}

/// Build a `USER_EXPIRED` action.
pub fn user_expired<A: From<SessionEvent>>() -> A {
    A::from(SessionEvent::UserExpired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types() {
        assert_eq!(SessionEvent::UserExpired.action_type(), USER_EXPIRED);
        assert_eq!(
            SessionEvent::UserFound(User::default()).action_type(),
            USER_FOUND
        );
    }

    #[test]
    fn constructors_wrap_events() {
        let found: SessionEvent = user_found(User::default().with_expired(false));
        assert!(matches!(found, SessionEvent::UserFound(u) if u.expired == Some(false)));

        let expired: SessionEvent = user_expired();
        assert_eq!(expired, SessionEvent::UserExpired);
    }
}
