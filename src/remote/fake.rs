use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::errors::{DebtError, Result};
use crate::remote::{ApiReply, ApiRequest, HttpTransport};

/// scripted transport: answers requests in order and remembers what it was sent
#[derive(Default)]
pub(crate) struct FakeTransport {
    replies: Mutex<VecDeque<Result<ApiReply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, status: u16, body: Value) -> Self {
        self.push(Ok(ApiReply::new(status, body.to_string())));
        self
    }

    pub(crate) fn raw_reply(self, status: u16, body: &str) -> Self {
        self.push(Ok(ApiReply::new(status, body)));
        self
    }

    pub(crate) fn network_error(self, message: &str) -> Self {
        self.push(Err(DebtError::remote(message)));
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, reply: Result<ApiReply>) {
        self.replies.lock().unwrap().push_back(reply);
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DebtError::remote("no scripted reply left")))
    }
}
