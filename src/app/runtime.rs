//! Runtime traits and implementations for tmux, storage and terminal handoff

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};

use crate::settings::Settings;
use crate::store::JsonTaskStore;
use crate::tmux::{
    SessionSpec, tmux_attach_session, tmux_bind_detach_key, tmux_capture_pane,
    tmux_create_session, tmux_kill_session, tmux_session_exists,
};
use crate::types::Task;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CreateSessionRequest {
    pub session_name: String,
    pub prompt: String,
    pub working_dir: PathBuf,
    pub width: u16,
    pub height: u16,
    pub yolo: bool,
}

/// Runtime trait for the external session multiplexer
pub trait SessionRuntime {
    fn create_session(&self, request: &CreateSessionRequest) -> Result<()>;
    /// Empty output means "no session", never "session printed nothing".
    fn capture_output(&self, session_name: &str, lines: usize) -> String;
    fn attach(&self, session_name: &str) -> Result<Option<i32>>;
    fn kill_session(&self, session_name: &str);
    fn session_exists(&self, session_name: &str) -> bool;
}

/// Runtime trait for durable storage of the task collection
pub trait TaskStore {
    fn init(&self) -> Result<()>;
    fn load_tasks(&self) -> Result<Vec<Task>>;
    fn save_tasks(&self, tasks: &[Task]) -> Result<()>;
}

/// Exclusive ownership of the terminal display.
///
/// `release` must leave the terminal usable by a foreign full-screen client;
/// `reacquire` restores the dashboard before the next frame is drawn.
pub trait DisplayHandoff {
    fn release(&mut self) -> Result<()>;
    fn reacquire(&mut self) -> Result<()>;
}

/// Real implementation of SessionRuntime using tmux commands
#[derive(Debug, Clone)]
pub struct TmuxSessionRuntime {
    assistant_command: Vec<String>,
    prompt_flag: String,
    yolo_flag: String,
    detach_key: String,
}

impl TmuxSessionRuntime {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            assistant_command: settings
                .assistant_command
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            prompt_flag: settings.prompt_flag.clone(),
            yolo_flag: settings.yolo_flag.clone(),
            detach_key: settings.detach_key.clone(),
        }
    }

    pub fn assistant_command_line(&self, prompt: &str, yolo: bool) -> Vec<String> {
        let mut command = self.assistant_command.clone();
        if !self.prompt_flag.is_empty() {
            command.push(self.prompt_flag.clone());
        }
        command.push(prompt.to_string());
        if yolo && !self.yolo_flag.is_empty() {
            command.push(self.yolo_flag.clone());
        }
        command
    }
}

impl SessionRuntime for TmuxSessionRuntime {
    fn create_session(&self, request: &CreateSessionRequest) -> Result<()> {
        let command = self.assistant_command_line(&request.prompt, request.yolo);
        tmux_create_session(&SessionSpec {
            name: &request.session_name,
            working_dir: &request.working_dir,
            width: request.width,
            height: request.height,
            command: &command,
        })
    }

    fn capture_output(&self, session_name: &str, lines: usize) -> String {
        match tmux_capture_pane(session_name, lines) {
            Ok(output) => output,
            Err(err) => {
                debug!(session_name, error = %err, "capture failed; treating as missing session");
                String::new()
            }
        }
    }

    fn attach(&self, session_name: &str) -> Result<Option<i32>> {
        tmux_bind_detach_key(&self.detach_key)?;
        let status = tmux_attach_session(session_name)?;
        Ok(status.code())
    }

    fn kill_session(&self, session_name: &str) {
        if let Err(err) = tmux_kill_session(session_name) {
            warn!(session_name, error = %err, "failed to kill tmux session");
        }
    }

    fn session_exists(&self, session_name: &str) -> bool {
        tmux_session_exists(session_name)
    }
}

impl TaskStore for JsonTaskStore {
    fn init(&self) -> Result<()> {
        JsonTaskStore::init(self)
    }

    fn load_tasks(&self) -> Result<Vec<Task>> {
        JsonTaskStore::load_tasks(self)
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        JsonTaskStore::save_tasks(self, tasks)
    }
}
