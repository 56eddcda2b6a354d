// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! What a guarded dispatch hands back.

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::GuardError;

/// Result of a finished validation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome<R> {
    /// The original action went down the chain; carries the chain's result.
    Forwarded(R),
    /// No usable session; control went to the sign-in redirect and the
    /// original action was dropped.
    Redirected,
}

impl<R> RoundOutcome<R> {
    pub fn forwarded(self) -> Option<R> {
        match self {
            RoundOutcome::Forwarded(r) => Some(r),
            RoundOutcome::Redirected => None,
        }
    }
}

/// A validation round running on the Tokio runtime.
///
/// Dropping the handle does not cancel the round.
#[derive(Debug)]
pub struct ValidationRound<R, E> {
    round_id: Uuid,
    handle: JoinHandle<Result<RoundOutcome<R>, GuardError<E>>>,
}

impl<R, E> ValidationRound<R, E> {
    pub(crate) fn new(
        round_id: Uuid,
        handle: JoinHandle<Result<RoundOutcome<R>, GuardError<E>>>,
    ) -> Self {
        Self { round_id, handle }
    }

    /// Correlation id, also attached to the round's log events.
    pub fn id(&self) -> Uuid {
        self.round_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the round to finish.
    pub async fn outcome(self) -> Result<RoundOutcome<R>, GuardError<E>> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(GuardError::RoundAborted(e.to_string())),
        }
    }
}

/// Immediate result of [`GuardedDispatch::dispatch`](super::GuardedDispatch::dispatch).
#[derive(Debug)]
pub enum Dispatched<R, E> {
    /// The action passed straight through; carries the chain's result.
    Forwarded(R),
    /// The action is held until the user fetch completes.
    Validating(ValidationRound<R, E>),
}

impl<R, E> Dispatched<R, E> {
    /// The chain's result, if the action passed straight through.
    pub fn forwarded(self) -> Option<R> {
        match self {
            Dispatched::Forwarded(r) => Some(r),
            Dispatched::Validating(_) => None,
        }
    }

    pub fn is_validating(&self) -> bool {
        matches!(self, Dispatched::Validating(_))
    }

    /// The pending round, if one was started.
    pub fn into_round(self) -> Option<ValidationRound<R, E>> {
        match self {
            Dispatched::Validating(round) => Some(round),
            Dispatched::Forwarded(_) => None,
        }
    }
}
