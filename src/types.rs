use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const SESSION_PREFIX: &str = "task";
pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DETAILS_CHARS: usize = 2000;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum TaskError {
    #[error("{0}")]
    Validation(String),
    #[error("Session {0} not found")]
    SessionNotFound(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub done: bool,
    pub session_name: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn create(title: &str, details: &str) -> Result<Self, TaskError> {
        let title = title.trim();
        let details = details.trim();

        if title.is_empty() {
            return Err(TaskError::Validation(
                "Task title cannot be empty".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(TaskError::Validation(format!(
                "Task title cannot exceed {MAX_TITLE_CHARS} characters"
            )));
        }
        if details.chars().count() > MAX_DETAILS_CHARS {
            return Err(TaskError::Validation(format!(
                "Task details cannot exceed {MAX_DETAILS_CHARS} characters"
            )));
        }

        let id = Uuid::new_v4().simple().to_string();
        Ok(Self {
            session_name: session_name_for(&id),
            id,
            title: title.to_string(),
            details: details.to_string(),
            done: false,
            created_at: Utc::now(),
        })
    }

    pub fn toggle_done(&mut self) {
        self.done = !self.done;
    }

    /// Initial instruction handed verbatim to the assistant.
    pub fn build_prompt(&self) -> String {
        if self.details.is_empty() {
            self.title.clone()
        } else {
            format!("{}. {}", self.title, self.details)
        }
    }

    pub fn started_label(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

pub fn session_name_for(task_id: &str) -> String {
    format!("{SESSION_PREFIX}-{task_id}")
}
