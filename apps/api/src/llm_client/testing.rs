//! Canned-response chat backend for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ChatBackend, ChatMessage, Completion, CompletionOptions, LlmClient, LlmError};

enum Reply {
    Text(String),
    Status(u16),
}

/// Replays queued answers in order; the last answer repeats once the queue drains.
pub struct FixedBackend {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FixedBackend {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(answers.into_iter().map(|a| Reply::Text(a.into())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Reply::Status(status)])),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn client<I, S>(answers: I) -> LlmClient
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LlmClient::new(Arc::new(Self::new(answers)))
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FixedBackend {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _options: CompletionOptions,
    ) -> Result<Completion, LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().map(|r| match r {
                Reply::Text(t) => Reply::Text(t.clone()),
                Reply::Status(s) => Reply::Status(*s),
            })
        };

        match reply {
            Some(Reply::Text(text)) => Ok(Completion { text }),
            Some(Reply::Status(status)) => Err(LlmError::Api {
                status,
                message: "canned failure".to_string(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}
