use std::time::{Duration, Instant};

pub const NO_ACTIVE_SESSION: &str = "\n [No active session]";
pub const NO_TASK_SELECTED: &str = "\n [No task selected]";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ActiveDialog {
    None,
    NewTask(NewTaskDialogState),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NewTaskField {
    Title,
    Details,
    Yolo,
    Create,
    Cancel,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewTaskDialogState {
    pub title_input: String,
    pub details_input: String,
    pub yolo: bool,
    pub focused_field: NewTaskField,
    pub error: Option<String>,
}

impl Default for NewTaskDialogState {
    fn default() -> Self {
        Self {
            title_input: String::new(),
            details_input: String::new(),
            yolo: false,
            focused_field: NewTaskField::Title,
            error: None,
        }
    }
}

/// Display bookkeeping for one task, keyed by task id. Never persisted.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PreviewState {
    pub last_output: String,
    pub manual_scroll_override: bool,
}

/// What the preview pane currently shows and where it is scrolled to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PreviewView {
    content: String,
    line_count: usize,
    viewport_height: usize,
    scroll_offset: usize,
}

impl Default for PreviewView {
    fn default() -> Self {
        Self {
            content: NO_TASK_SELECTED.to_string(),
            line_count: NO_TASK_SELECTED.lines().count(),
            viewport_height: 0,
            scroll_offset: 0,
        }
    }
}

impl PreviewView {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn max_scroll(&self) -> usize {
        self.line_count.saturating_sub(self.viewport_height)
    }

    /// Replaces the content, keeping the offset inside the new bounds.
    pub fn set_content(&mut self, content: String) {
        self.line_count = content.lines().count();
        self.content = content;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll());
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub set_at: Instant,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            set_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.set_at.elapsed() >= timeout
    }
}
