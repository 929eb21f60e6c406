//! In-memory conversation state.
//!
//! Sessions hold an ordered message list plus a command queue of length at
//! most one (the quick-question slot). Nothing here is persisted; ending a
//! session discards its state.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::rag::answer::QueryType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A quick question waiting to be processed at the top of the next
/// interaction cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedCommand {
    pub query: String,
    pub query_type: QueryType,
}

/// Quick-question request as submitted by the interface.
#[derive(Debug, Clone, Deserialize)]
pub struct QuickQuestion {
    pub kind: QueryType,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub symptom: Option<String>,
}

impl QuickQuestion {
    /// Compose the canned query text for this quick question.
    pub fn into_command(self) -> QueuedCommand {
        let service = self.service_name.as_deref().unwrap_or("").trim().to_string();
        let symptom = self.symptom.as_deref().unwrap_or("").trim().to_string();
        let filled = !service.is_empty() && !symptom.is_empty();

        let query = match self.kind {
            QueryType::Repair => {
                if filled {
                    format!("{} {}에 대한 복구방법 안내", service, symptom)
                } else {
                    "서비스와 현상에 대해 복구방법 안내".to_string()
                }
            }
            QueryType::Cause => {
                if filled {
                    format!("{} {} 현상에 대한 대표 원인 안내", service, symptom)
                } else {
                    "현상에 대한 대표 원인 안내".to_string()
                }
            }
            QueryType::History => {
                if filled {
                    format!("{} {}에 대한 과거 대응방법", service, symptom)
                } else {
                    "서비스와 현상에 대한 과거 대응방법".to_string()
                }
            }
            QueryType::Similar => {
                if filled {
                    format!("타 서비스에서 {} 동일 현상에 대한 대응이력조회", symptom)
                } else {
                    "타 서비스에 동일 현상에 대한 대응이력조회".to_string()
                }
            }
            QueryType::Default => {
                if filled {
                    format!("{} {}", service, symptom)
                } else {
                    String::new()
                }
            }
        };

        QueuedCommand {
            query,
            query_type: self.kind,
        }
    }
}

#[derive(Default)]
struct SessionState {
    messages: Vec<ConversationMessage>,
    pending: Option<QueuedCommand>,
}

/// Session-scoped conversation store shared across handlers.
#[derive(Default)]
pub struct ConversationStore {
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(session_id.clone(), SessionState::default());
        session_id
    }

    /// End the session and discard its state.
    pub fn end_session(&self, session_id: &str) -> bool {
        self.sessions.lock().unwrap().remove(session_id).is_some()
    }

    pub fn messages(&self, session_id: &str) -> Result<Vec<ConversationMessage>, ApiError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .map(|state| state.messages.clone())
            .ok_or_else(|| ApiError::NotFound("세션을 찾을 수 없습니다.".to_string()))
    }

    pub fn append(
        &self,
        session_id: &str,
        message: ConversationMessage,
    ) -> Result<(), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let state = sessions
            .get_mut(session_id)
            .ok_or_else(|| ApiError::NotFound("세션을 찾을 수 없습니다.".to_string()))?;
        state.messages.push(message);
        Ok(())
    }

    /// Queue a quick question; a previously queued one is replaced, keeping
    /// the queue length at most one.
    pub fn enqueue(&self, session_id: &str, command: QueuedCommand) -> Result<(), ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let state = sessions
            .get_mut(session_id)
            .ok_or_else(|| ApiError::NotFound("세션을 찾을 수 없습니다.".to_string()))?;
        state.pending = Some(command);
        Ok(())
    }

    /// Drain the queued command, if any.
    pub fn take_pending(&self, session_id: &str) -> Option<QueuedCommand> {
        self.sessions
            .lock()
            .unwrap()
            .get_mut(session_id)
            .and_then(|state| state.pending.take())
    }
}
