#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use babylog_core::llm::{ChatReply, ChatRequest, CompletionClient, FunctionCall, LlmError};
use babylog_core::{ActivityLogRepository, LogRowId, StorageError};
use babylog_parser::NormalizedActivity;

type Responder = Box<dyn Fn() -> Result<ChatReply, LlmError> + Send + Sync>;

/// Completion client that answers every request the same way and remembers
/// what it was asked.
pub struct ScriptedClient {
    respond: Responder,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(respond: impl Fn() -> Result<ChatReply, LlmError> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn function_call(name: &str, arguments: &str) -> Self {
        let name = name.to_string();
        let arguments = arguments.to_string();
        Self::new(move || {
            Ok(ChatReply {
                content: None,
                function_call: Some(FunctionCall {
                    name: name.clone(),
                    arguments: arguments.clone(),
                }),
            })
        })
    }

    pub fn text(content: &str) -> Self {
        let content = content.to_string();
        Self::new(move || {
            Ok(ChatReply {
                content: Some(content.clone()),
                function_call: None,
            })
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, LlmError> {
        self.requests.lock().expect("lock").push(request);
        (self.respond)()
    }
}

/// In-memory activity log. When `fail` is set, the write is abandoned before
/// it becomes visible.
#[derive(Default)]
pub struct MemoryLog {
    pub rows: Mutex<Vec<NormalizedActivity>>,
    pub attempts: Mutex<usize>,
    pub fail: bool,
}

impl MemoryLog {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<NormalizedActivity> {
        self.rows.lock().expect("lock").clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().expect("lock")
    }
}

#[async_trait]
impl ActivityLogRepository for MemoryLog {
    async fn insert(&self, activity: &NormalizedActivity) -> Result<LogRowId, StorageError> {
        *self.attempts.lock().expect("lock") += 1;

        let mut staged = self.rows();
        staged.push(activity.clone());
        if self.fail {
            return Err(StorageError::Database(sqlx::Error::Protocol(
                "simulated failure mid-transaction".into(),
            )));
        }

        let id = staged.len() as i64;
        *self.rows.lock().expect("lock") = staged;
        Ok(LogRowId(id))
    }
}
