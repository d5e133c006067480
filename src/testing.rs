// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scripted in-memory transport for unit tests

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::Value;

use crate::http::{
    Headers, Transport, TransportFailure, TransportRequest, TransportResponse,
};

/// What the mock does with the next request
pub(crate) enum MockReply {
    Respond(TransportResponse),
    Fail(String),
    /// Wait until the request is cancelled
    Hang,
    /// Sleep (cancellably), then apply the inner reply
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    pub(crate) fn json(status: u16, body: Value) -> Self {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        MockReply::Respond(TransportResponse {
            status,
            status_text: reason(status),
            headers,
            body: Bytes::from(body.to_string()),
        })
    }

    pub(crate) fn text(status: u16, body: &str) -> Self {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());
        MockReply::Respond(TransportResponse {
            status,
            status_text: reason(status),
            headers,
            body: Bytes::from(body.to_string()),
        })
    }
}

fn reason(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

/// Replays queued replies in order and records every request it sees.
/// Answers `200 {}` once the queue is empty.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, reply: MockReply) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        let token = request.cancellation.clone();
        self.requests.lock().push(request);

        let mut reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| MockReply::json(200, Value::Object(Default::default())));

        loop {
            match reply {
                MockReply::Respond(response) => return Ok(response),
                MockReply::Fail(message) => return Err(TransportFailure::Other(message)),
                MockReply::Hang => {
                    token.cancelled().await;
                    return Err(TransportFailure::Cancelled);
                }
                MockReply::Delayed(delay, inner) => {
                    tokio::select! {
                        _ = token.cancelled() => return Err(TransportFailure::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    reply = *inner;
                }
            }
        }
    }
}
