// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

#![allow(dead_code)]

use async_trait::async_trait;
use orgview_core::{Backend, BackendError, ReadRequest, WriteRequest};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use tokio::sync::oneshot;

type Outcome = Result<Value, BackendError>;

enum Reply {
    Ready(Outcome),
    Gated(oneshot::Receiver<Outcome>),
}

/// Scripted backend recording every request it receives.
///
/// Replies are consumed in request order; a gated reply holds the request
/// open until the test resolves it through the returned sender.
#[derive(Default)]
pub struct FakeBackend {
    reads: Mutex<Vec<ReadRequest>>,
    writes: Mutex<Vec<WriteRequest>>,
    read_replies: Mutex<VecDeque<Reply>>,
    write_replies: Mutex<VecDeque<Reply>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_read(&self, outcome: Outcome) {
        self.read_replies.lock().push_back(Reply::Ready(outcome));
    }

    pub fn reply_write(&self, outcome: Outcome) {
        self.write_replies.lock().push_back(Reply::Ready(outcome));
    }

    pub fn gate_read(&self) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.read_replies.lock().push_back(Reply::Gated(rx));
        tx
    }

    pub fn gate_write(&self) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.write_replies.lock().push_back(Reply::Gated(rx));
        tx
    }

    pub fn reads(&self) -> Vec<ReadRequest> {
        self.reads.lock().clone()
    }

    pub fn writes(&self) -> Vec<WriteRequest> {
        self.writes.lock().clone()
    }

    /// Yield until at least `n` reads have reached the backend.
    pub async fn wait_for_reads(&self, n: usize) {
        while self.reads.lock().len() < n {
            tokio::task::yield_now().await;
        }
    }

    pub async fn wait_for_writes(&self, n: usize) {
        while self.writes.lock().len() < n {
            tokio::task::yield_now().await;
        }
    }

    async fn resolve(reply: Option<Reply>) -> Outcome {
        match reply {
            Some(Reply::Ready(outcome)) => outcome,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(BackendError::Transport("gate dropped".to_string()))),
            None => Ok(json!({})),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn get(&self, request: ReadRequest) -> Result<Value, BackendError> {
        self.reads.lock().push(request);
        let reply = self.read_replies.lock().pop_front();
        Self::resolve(reply).await
    }

    async fn post(&self, request: WriteRequest) -> Result<Value, BackendError> {
        self.writes.lock().push(request);
        let reply = self.write_replies.lock().pop_front();
        Self::resolve(reply).await
    }
}
