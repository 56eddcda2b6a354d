// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recording fakes for the middleware tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::oneshot;
use url::Url;

use super::Dispatch;
use crate::client::{IdentityClient, SigninRequest};
use crate::session::{Action, SessionEvent, User};
use crate::storage::{MemoryStorage, SessionStorage, StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

pub type FetchResult = Result<Option<User>, FakeError>;

enum Reply {
    Ready(FetchResult),
    Gated(oneshot::Receiver<FetchResult>),
}

#[derive(Default)]
struct ClientState {
    replies: Mutex<VecDeque<Reply>>,
    get_user_calls: AtomicUsize,
    redirects: Mutex<Vec<SigninRequest>>,
}

/// Identity client that replays queued replies. With nothing queued,
/// `get_user` resolves to `Ok(None)`.
#[derive(Clone, Default)]
pub struct FakeClient {
    state: Arc<ClientState>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, result: FetchResult) {
        self.state
            .replies
            .lock()
            .unwrap()
            .push_back(Reply::Ready(result));
    }

    /// Queue a reply that resolves when the returned sender fires.
    pub fn reply_later(&self) -> oneshot::Sender<FetchResult> {
        let (tx, rx) = oneshot::channel();
        self.state
            .replies
            .lock()
            .unwrap()
            .push_back(Reply::Gated(rx));
        tx
    }

    pub fn get_user_calls(&self) -> usize {
        self.state.get_user_calls.load(Ordering::SeqCst)
    }

    pub fn redirects(&self) -> Vec<SigninRequest> {
        self.state.redirects.lock().unwrap().clone()
    }
}

impl IdentityClient for FakeClient {
    type Error = FakeError;

    fn get_user(&self) -> impl Future<Output = FetchResult> + Send {
        self.state.get_user_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.state.replies.lock().unwrap().pop_front();
        async move {
            match reply {
                Some(Reply::Ready(result)) => result,
                Some(Reply::Gated(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(FakeError("reply dropped".into()))),
                None => Ok(None),
            }
        }
    }

    fn signin_redirect(&self, request: SigninRequest) {
        self.state.redirects.lock().unwrap().push(request);
    }
}

/// Memory storage that logs every call as `get:key`, `set:key=value` or
/// `remove:key`.
#[derive(Default)]
pub struct RecordingStorage {
    inner: MemoryStorage,
    ops: Mutex<Vec<String>>,
    fail_writes: AtomicBool,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    /// Make every later `set_item` / `remove_item` fail.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StorageError::Io(std::io::Error::other("storage offline")))
        } else {
            Ok(())
        }
    }
}

impl SessionStorage for RecordingStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.ops.lock().unwrap().push(format!("get:{key}"));
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ops.lock().unwrap().push(format!("set:{key}={value}"));
        self.check_writable()?;
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.ops.lock().unwrap().push(format!("remove:{key}"));
        self.check_writable()?;
        self.inner.remove_item(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestAction {
    App(String),
    Session(SessionEvent),
}

impl From<SessionEvent> for TestAction {
    fn from(event: SessionEvent) -> Self {
        TestAction::Session(event)
    }
}

impl Action for TestAction {
    fn action_type(&self) -> &str {
        match self {
            TestAction::App(t) => t,
            TestAction::Session(event) => event.action_type(),
        }
    }
}

pub fn some_action() -> TestAction {
    TestAction::App("SOME_ACTION".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestState {
    pub some: &'static str,
}

pub fn state() -> TestState {
    TestState { some: "state" }
}

pub fn page_url() -> Url {
    Url::parse("http://some.url.com/orders?page=2").unwrap()
}

pub fn sample_user() -> User {
    match json!({ "sub": "user_123", "some": "user" }) {
        serde_json::Value::Object(profile) => User::from_profile(profile),
        _ => unreachable!(),
    }
}

/// Dispatch chain tail that records every action and returns it.
#[derive(Clone, Default)]
pub struct RecordingChain {
    dispatched: Arc<Mutex<Vec<TestAction>>>,
}

impl RecordingChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<TestAction> {
        self.dispatched.lock().unwrap().clone()
    }
}

impl Dispatch<TestAction> for RecordingChain {
    type Output = TestAction;

    fn dispatch(&self, action: TestAction) -> TestAction {
        self.dispatched.lock().unwrap().push(action.clone());
        action
    }
}
