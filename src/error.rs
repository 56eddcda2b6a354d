// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::storage::StorageError;

/// Failure of a guarded dispatch or of a validation round.
///
/// `E` is the identity client's error type.
#[derive(Debug, thiserror::Error)]
pub enum GuardError<E> {
    /// The identity client could not load the user. Displays exactly as the
    /// client's own error.
    #[error(transparent)]
    IdentityFetch(E),

    /// The marker could not be read or written.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    /// A round had to start but no Tokio runtime was available to run it.
    #[error("no async runtime for the validation round: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// The spawned round panicked or was cancelled before finishing.
    #[error("validation round aborted: {0}")]
    RoundAborted(String),
}

impl<E> GuardError<E> {
    /// The client error, when this is an identity fetch failure.
    pub fn identity_error(&self) -> Option<&E> {
        match self {
            GuardError::IdentityFetch(e) => Some(e),
            _ => None,
        }
    }
}
