pub mod actions;
pub mod dialogs;
pub mod messages;
pub mod navigation;
pub mod polling;
pub mod runtime;
pub mod state;
pub mod update;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

pub use self::messages::Message;
pub use self::runtime::{
    CreateSessionRequest, DisplayHandoff, SessionRuntime, TaskStore, TmuxSessionRuntime,
};
pub use self::state::{
    ActiveDialog, NO_ACTIVE_SESSION, NO_TASK_SELECTED, NewTaskDialogState, NewTaskField,
    PreviewState, PreviewView, StatusMessage,
};

use crate::keybindings::Keybindings;
use crate::settings::Settings;
use crate::store::JsonTaskStore;
use crate::types::{Task, TaskError};

const DEFAULT_VIEWPORT: (u16, u16) = (80, 24);
/// Rows taken by the preview borders, the status line and the shortcut bar.
const RESERVED_ROWS: u16 = 4;

pub struct App<R: SessionRuntime = TmuxSessionRuntime, S: TaskStore = JsonTaskStore> {
    tasks: Vec<Task>,
    selected: usize,
    previews: HashMap<String, PreviewState>,
    preview: PreviewView,
    status: Option<StatusMessage>,
    active_dialog: ActiveDialog,
    viewport: (u16, u16),
    settings: Settings,
    keybindings: Keybindings,
    workdir: PathBuf,
    should_quit: bool,
    runtime: R,
    store: S,
}

impl App {
    pub fn new(settings: Settings, workdir: PathBuf) -> Result<Self> {
        let runtime = TmuxSessionRuntime::from_settings(&settings);
        let store = JsonTaskStore::open_default()?;
        Self::with_runtime(runtime, store, settings, workdir)
    }
}

impl<R: SessionRuntime, S: TaskStore> App<R, S> {
    pub fn with_runtime(runtime: R, store: S, settings: Settings, workdir: PathBuf) -> Result<Self> {
        store.init().context("failed to initialize task store")?;
        let tasks = store.load_tasks().context("failed to load tasks")?;
        info!(count = tasks.len(), "loaded tasks");

        let keybindings = Keybindings::from_overrides(&settings.keybindings);
        let mut app = Self {
            tasks,
            selected: 0,
            previews: HashMap::new(),
            preview: PreviewView::default(),
            status: None,
            active_dialog: ActiveDialog::None,
            viewport: DEFAULT_VIEWPORT,
            settings,
            keybindings,
            workdir,
            should_quit: false,
            runtime,
            store,
        };
        app.resize(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1);
        Ok(app)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.tasks.is_empty()).then_some(self.selected)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    pub fn preview(&self) -> &PreviewView {
        &self.preview
    }

    pub fn preview_state(&self, task_id: &str) -> Option<&PreviewState> {
        self.previews.get(task_id)
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    pub fn active_dialog(&self) -> &ActiveDialog {
        &self.active_dialog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn keybindings(&self) -> &Keybindings {
        &self.keybindings
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tmux window size matching the preview pane's inner area.
    pub fn session_size(&self) -> (u16, u16) {
        let (width, height) = self.viewport;
        let preview_width = (u32::from(width) * 6 / 10) as u16;
        (
            preview_width.saturating_sub(2),
            height.saturating_sub(RESERVED_ROWS),
        )
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        self.preview
            .set_viewport_height(usize::from(height.saturating_sub(RESERVED_ROWS)));
        if !self.selected_override() {
            self.preview.scroll_to_bottom();
        }
    }

    fn selected_override(&self) -> bool {
        self.selected_task()
            .and_then(|task| self.previews.get(&task.id))
            .is_some_and(|state| state.manual_scroll_override)
    }

    fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!(status = %text, "status updated");
        self.status = Some(StatusMessage::new(text));
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save_tasks(&self.tasks) {
            warn!(error = %err, "failed to persist tasks");
            self.set_status(format!("✗ Error saving tasks: {err:#}"));
        }
    }

    fn validation_status(err: &TaskError) -> String {
        format!("✗ {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    use anyhow::bail;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[derive(Default)]
    pub(crate) struct FakeSessionRuntime {
        pub fail_create: RefCell<bool>,
        pub fail_attach: RefCell<bool>,
        pub sessions: RefCell<HashSet<String>>,
        pub outputs: RefCell<HashMap<String, String>>,
        pub created: RefCell<Vec<CreateSessionRequest>>,
        pub captured: RefCell<Vec<String>>,
        pub attached: RefCell<Vec<String>>,
        pub killed: RefCell<Vec<String>>,
        pub exists_checks: RefCell<Vec<String>>,
    }

    impl FakeSessionRuntime {
        fn set_output(&self, session_name: &str, output: &str) {
            self.outputs
                .borrow_mut()
                .insert(session_name.to_string(), output.to_string());
        }

        fn call_count(&self) -> usize {
            self.created.borrow().len()
                + self.captured.borrow().len()
                + self.attached.borrow().len()
                + self.killed.borrow().len()
                + self.exists_checks.borrow().len()
        }
    }

    impl SessionRuntime for FakeSessionRuntime {
        fn create_session(&self, request: &CreateSessionRequest) -> Result<()> {
            self.created.borrow_mut().push(request.clone());
            if *self.fail_create.borrow() {
                bail!("tmux new-session failed: duplicate session")
            }
            self.sessions
                .borrow_mut()
                .insert(request.session_name.clone());
            Ok(())
        }

        fn capture_output(&self, session_name: &str, _lines: usize) -> String {
            self.captured.borrow_mut().push(session_name.to_string());
            if !self.sessions.borrow().contains(session_name) {
                return String::new();
            }
            self.outputs
                .borrow()
                .get(session_name)
                .cloned()
                .unwrap_or_default()
        }

        fn attach(&self, session_name: &str) -> Result<Option<i32>> {
            self.attached.borrow_mut().push(session_name.to_string());
            if *self.fail_attach.borrow() {
                bail!("tmux attach failed")
            }
            Ok(Some(0))
        }

        fn kill_session(&self, session_name: &str) {
            self.killed.borrow_mut().push(session_name.to_string());
            self.sessions.borrow_mut().remove(session_name);
        }

        fn session_exists(&self, session_name: &str) -> bool {
            self.exists_checks
                .borrow_mut()
                .push(session_name.to_string());
            self.sessions.borrow().contains(session_name)
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeTaskStore {
        pub initial: Vec<Task>,
        pub saves: RefCell<Vec<Vec<Task>>>,
    }

    impl TaskStore for FakeTaskStore {
        fn init(&self) -> Result<()> {
            Ok(())
        }

        fn load_tasks(&self) -> Result<Vec<Task>> {
            Ok(self.initial.clone())
        }

        fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
            self.saves.borrow_mut().push(tasks.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeHandoff {
        pub events: Vec<&'static str>,
    }

    impl DisplayHandoff for FakeHandoff {
        fn release(&mut self) -> Result<()> {
            self.events.push("release");
            Ok(())
        }

        fn reacquire(&mut self) -> Result<()> {
            self.events.push("reacquire");
            Ok(())
        }
    }

    type TestApp = App<FakeSessionRuntime, FakeTaskStore>;

    fn test_app(initial: Vec<Task>) -> TestApp {
        let store = FakeTaskStore {
            initial,
            ..FakeTaskStore::default()
        };
        let mut app = App::with_runtime(
            FakeSessionRuntime::default(),
            store,
            Settings::default(),
            PathBuf::from("/work/project"),
        )
        .expect("app should build");
        app.resize(100, 40);
        app
    }

    fn app_with_tasks(count: usize) -> TestApp {
        let mut app = test_app(Vec::new());
        for index in 0..count {
            app.add_task(&format!("task {index}"), "", false)
                .expect("valid task");
        }
        app
    }

    fn numbered_output(lines: usize) -> String {
        (0..lines)
            .map(|i| format!("output line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn send(app: &mut TestApp, message: Message) {
        let mut handoff = FakeHandoff::default();
        app.update(message, &mut handoff)
            .expect("update should succeed");
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn add_task_fix_bug_scenario() {
        let mut app = app_with_tasks(1);
        let saves_before = app.store().saves.borrow().len();

        app.add_task("Fix bug", "in parser", false)
            .expect("valid task");

        assert_eq!(app.tasks().len(), 2);
        let task = &app.tasks()[1];
        assert_eq!(task.build_prompt(), "Fix bug. in parser");
        assert_eq!(app.selected_index(), Some(1));

        let created = app.runtime().created.borrow();
        let request = created.last().expect("session requested");
        assert_eq!(request.session_name, task.session_name);
        assert_eq!(request.prompt, "Fix bug. in parser");
        assert_eq!(request.working_dir, PathBuf::from("/work/project"));
        assert_eq!((request.width, request.height), (58, 36));
        assert!(!request.yolo);

        let saves = app.store().saves.borrow();
        assert_eq!(saves.len(), saves_before + 1);
        assert_eq!(saves.last().expect("saved"), &app.tasks().to_vec());
        assert_eq!(app.status_text(), Some("✓ Task created: Fix bug"));
    }

    #[test]
    fn add_task_validation_error_leaves_list_untouched() {
        let mut app = app_with_tasks(1);
        let saves_before = app.store().saves.borrow().len();

        let err = app
            .add_task("   ", "details", false)
            .expect_err("blank title must fail");
        assert!(matches!(err, TaskError::Validation(_)));
        assert!(
            app.add_task(&"t".repeat(201), "", false).is_err(),
            "overlong title must fail"
        );

        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.runtime().created.borrow().len(), 1);
        assert_eq!(app.store().saves.borrow().len(), saves_before);
    }

    #[test]
    fn add_task_keeps_task_when_session_creation_fails() {
        let mut app = test_app(Vec::new());
        *app.runtime().fail_create.borrow_mut() = true;

        app.add_task("Broken", "", true).expect("valid task");

        assert_eq!(app.tasks().len(), 1);
        assert!(app.runtime().created.borrow()[0].yolo);
        assert_eq!(app.store().saves.borrow().len(), 1);
        assert!(
            app.status_text()
                .is_some_and(|text| text.starts_with("✗ Error creating session"))
        );
    }

    #[test]
    fn session_size_saturates_on_tiny_terminals() {
        let mut app = test_app(Vec::new());
        app.resize(3, 2);
        assert_eq!(app.session_size(), (0, 0));
        app.resize(120, 50);
        assert_eq!(app.session_size(), (70, 46));
    }

    #[test]
    fn toggle_done_flips_and_persists() {
        let mut app = app_with_tasks(1);
        let saves_before = app.store().saves.borrow().len();

        send(&mut app, Message::ToggleDone);
        assert!(app.tasks()[0].done);
        send(&mut app, Message::ToggleDone);
        assert!(!app.tasks()[0].done);

        assert_eq!(app.store().saves.borrow().len(), saves_before + 2);
        assert!(app.runtime().killed.borrow().is_empty());
    }

    #[test]
    fn delete_clamps_selection_down_to_empty() {
        let mut app = app_with_tasks(3);
        assert_eq!(app.selected_index(), Some(2));
        let names: Vec<String> = app
            .tasks()
            .iter()
            .map(|task| task.session_name.clone())
            .collect();

        send(&mut app, Message::DeleteTask);
        assert_eq!(app.selected_index(), Some(1));
        send(&mut app, Message::DeleteTask);
        assert_eq!(app.selected_index(), Some(0));
        send(&mut app, Message::DeleteTask);
        assert_eq!(app.selected_index(), None);
        assert!(app.tasks().is_empty());
        assert_eq!(app.preview().content(), NO_TASK_SELECTED);

        let killed = app.runtime().killed.borrow().clone();
        assert_eq!(killed, vec![names[2].clone(), names[1].clone(), names[0].clone()]);
        assert!(app.store().saves.borrow().last().expect("saved").is_empty());

        let saves = app.store().saves.borrow().len();
        send(&mut app, Message::DeleteTask);
        assert_eq!(app.store().saves.borrow().len(), saves);
        assert_eq!(app.runtime().killed.borrow().len(), 3);
    }

    #[test]
    fn delete_middle_task_drops_its_display_state() {
        let mut app = app_with_tasks(3);
        let middle = app.tasks()[1].clone();
        app.runtime().set_output(&middle.session_name, "working");
        send(&mut app, Message::SelectUp);
        let removed_id = middle.id;
        assert!(app.preview_state(&removed_id).is_some());

        send(&mut app, Message::DeleteTask);

        assert_eq!(app.selected_index(), Some(1));
        assert!(app.preview_state(&removed_id).is_none());
        assert_eq!(app.tasks()[1].title, "task 2");
    }

    #[test]
    fn empty_collection_transitions_are_noops() {
        let mut app = test_app(Vec::new());
        let mut handoff = FakeHandoff::default();

        for message in [
            Message::SelectUp,
            Message::SelectDown,
            Message::ToggleDone,
            Message::DeleteTask,
            Message::AttachSelectedTask,
            Message::ScrollUp,
            Message::ScrollDown,
            Message::JumpToLatest,
            Message::Tick,
        ] {
            app.update(message, &mut handoff)
                .expect("update should succeed");
        }

        assert_eq!(app.runtime().call_count(), 0);
        assert!(app.store().saves.borrow().is_empty());
        assert!(handoff.events.is_empty());
        assert_eq!(app.selected_index(), None);
        assert_eq!(app.status_text(), None);
    }

    #[test]
    fn selection_moves_within_bounds_without_wrapping() {
        let mut app = app_with_tasks(2);
        send(&mut app, Message::SelectDown);
        assert_eq!(app.selected_index(), Some(1));
        send(&mut app, Message::SelectUp);
        send(&mut app, Message::SelectUp);
        assert_eq!(app.selected_index(), Some(0));
    }

    #[test]
    fn selecting_a_task_resets_its_scroll_override() {
        let mut app = app_with_tasks(2);
        let second = app.tasks()[1].clone();
        app.runtime().set_output(&second.session_name, &numbered_output(100));
        send(&mut app, Message::Tick);

        send(&mut app, Message::ScrollUp);
        assert!(app.preview_state(&second.id).expect("state").manual_scroll_override);

        send(&mut app, Message::SelectUp);
        send(&mut app, Message::SelectDown);

        assert!(!app.preview_state(&second.id).expect("state").manual_scroll_override);
        assert_eq!(app.preview().scroll_offset(), app.preview().max_scroll());
    }

    #[test]
    fn changed_output_moves_offset_to_new_maximum() {
        let mut app = app_with_tasks(1);
        let task = app.tasks()[0].clone();

        app.runtime().set_output(&task.session_name, &numbered_output(50));
        send(&mut app, Message::Tick);
        let first_max = app.preview().max_scroll();
        assert_eq!(app.preview().scroll_offset(), first_max);

        app.runtime().set_output(&task.session_name, &numbered_output(80));
        send(&mut app, Message::Tick);
        assert!(app.preview().max_scroll() > first_max);
        assert_eq!(app.preview().scroll_offset(), app.preview().max_scroll());
        assert!(app.preview().content().starts_with(&format!(
            " [Session: {}]\n [Started: ",
            task.session_name
        )));
        assert!(app.preview().content().ends_with("output line 79"));
    }

    #[test]
    fn manual_scroll_survives_unchanged_output() {
        let mut app = app_with_tasks(1);
        let task = app.tasks()[0].clone();
        app.runtime().set_output(&task.session_name, &numbered_output(100));
        send(&mut app, Message::Tick);

        send(&mut app, Message::ScrollUp);
        send(&mut app, Message::ScrollUp);
        let offset = app.preview().scroll_offset();
        assert_eq!(offset, app.preview().max_scroll() - 2);

        send(&mut app, Message::Tick);

        assert_eq!(app.preview().scroll_offset(), offset);
        assert!(app.preview_state(&task.id).expect("state").manual_scroll_override);
    }

    #[test]
    fn manual_scroll_yields_to_changed_output() {
        let mut app = app_with_tasks(1);
        let task = app.tasks()[0].clone();
        app.runtime().set_output(&task.session_name, &numbered_output(100));
        send(&mut app, Message::Tick);
        send(&mut app, Message::ScrollUp);

        app.runtime().set_output(&task.session_name, &numbered_output(101));
        send(&mut app, Message::Tick);

        let state = app.preview_state(&task.id).expect("state");
        assert!(!state.manual_scroll_override);
        assert_eq!(state.last_output, numbered_output(101));
        assert_eq!(app.preview().scroll_offset(), app.preview().max_scroll());
    }

    #[test]
    fn scroll_sets_override_even_at_edge() {
        let mut app = app_with_tasks(1);
        let task = app.tasks()[0].clone();
        app.runtime().set_output(&task.session_name, "short");
        send(&mut app, Message::Tick);
        assert_eq!(app.preview().max_scroll(), 0);

        send(&mut app, Message::ScrollDown);

        assert_eq!(app.preview().scroll_offset(), 0);
        assert!(app.preview_state(&task.id).expect("state").manual_scroll_override);
    }

    #[test]
    fn jump_to_latest_clears_override() {
        let mut app = app_with_tasks(1);
        let task = app.tasks()[0].clone();
        app.runtime().set_output(&task.session_name, &numbered_output(100));
        send(&mut app, Message::Tick);
        send(&mut app, Message::ScrollUp);

        send(&mut app, Message::JumpToLatest);

        assert!(!app.preview_state(&task.id).expect("state").manual_scroll_override);
        assert_eq!(app.preview().scroll_offset(), app.preview().max_scroll());
    }

    #[test]
    fn missing_session_shows_placeholder() {
        let mut app = app_with_tasks(1);
        let task = app.tasks()[0].clone();
        app.runtime().kill_session(&task.session_name);

        send(&mut app, Message::Tick);

        assert_eq!(app.preview().content(), NO_ACTIVE_SESSION);
        assert_eq!(app.preview().scroll_offset(), 0);
    }

    #[test]
    fn attach_reports_missing_session_without_handoff() {
        let mut app = app_with_tasks(1);
        let task = app.tasks()[0].clone();
        app.runtime().sessions.borrow_mut().clear();
        let saves = app.store().saves.borrow().len();
        let mut handoff = FakeHandoff::default();

        app.update(Message::AttachSelectedTask, &mut handoff)
            .expect("update should succeed");

        assert!(handoff.events.is_empty());
        assert!(app.runtime().attached.borrow().is_empty());
        assert_eq!(app.store().saves.borrow().len(), saves);
        assert_eq!(
            app.status_text(),
            Some(format!("✗ Error: Session {} not found", task.session_name).as_str())
        );
    }

    #[test]
    fn attach_hands_off_display_and_refreshes() {
        let mut app = app_with_tasks(1);
        let task = app.tasks()[0].clone();
        app.runtime().set_output(&task.session_name, "after detach");
        let captures_before = app.runtime().captured.borrow().len();
        let mut handoff = FakeHandoff::default();

        app.update(Message::AttachSelectedTask, &mut handoff)
            .expect("attach should succeed");

        assert_eq!(handoff.events, vec!["release", "reacquire"]);
        assert_eq!(
            app.runtime().attached.borrow().as_slice(),
            &[task.session_name.clone()]
        );
        assert_eq!(app.runtime().captured.borrow().len(), captures_before + 1);
        assert!(app.preview().content().ends_with("after detach"));
    }

    #[test]
    fn attach_failure_still_reacquires_display() {
        let mut app = app_with_tasks(1);
        *app.runtime().fail_attach.borrow_mut() = true;
        let mut handoff = FakeHandoff::default();

        app.update(Message::AttachSelectedTask, &mut handoff)
            .expect("attach failure is reported, not propagated");

        assert_eq!(handoff.events, vec!["release", "reacquire"]);
        assert!(
            app.status_text()
                .is_some_and(|text| text.contains("attach"))
        );
    }

    #[test]
    fn dialog_creates_task_from_typed_input() {
        let mut app = test_app(Vec::new());
        send(&mut app, Message::Key(key(KeyCode::Char('a'))));
        assert!(matches!(app.active_dialog(), ActiveDialog::NewTask(_)));

        for ch in "Fix bug".chars() {
            send(&mut app, Message::Key(key(KeyCode::Char(ch))));
        }
        send(&mut app, Message::Key(key(KeyCode::Tab)));
        for ch in "in parser".chars() {
            send(&mut app, Message::Key(key(KeyCode::Char(ch))));
        }
        send(&mut app, Message::Key(key(KeyCode::Tab)));
        send(&mut app, Message::Key(key(KeyCode::Char(' '))));
        send(&mut app, Message::Key(key(KeyCode::Enter)));

        assert_eq!(app.active_dialog(), &ActiveDialog::None);
        assert_eq!(app.tasks().len(), 1);
        assert_eq!(app.tasks()[0].build_prompt(), "Fix bug. in parser");
        assert!(app.runtime().created.borrow()[0].yolo);
    }

    #[test]
    fn dialog_with_blank_title_cancels() {
        let mut app = test_app(Vec::new());
        send(&mut app, Message::OpenNewTaskDialog);
        send(&mut app, Message::Key(key(KeyCode::Char(' '))));
        send(&mut app, Message::Key(key(KeyCode::Enter)));

        assert_eq!(app.active_dialog(), &ActiveDialog::None);
        assert!(app.tasks().is_empty());
        assert!(app.runtime().created.borrow().is_empty());
    }

    #[test]
    fn dialog_keeps_input_on_validation_error() {
        let mut app = test_app(Vec::new());
        send(&mut app, Message::OpenNewTaskDialog);
        if let ActiveDialog::NewTask(state) = &mut app.active_dialog {
            state.title_input = "t".repeat(201);
        }
        send(&mut app, Message::CreateTask);

        let ActiveDialog::NewTask(state) = app.active_dialog() else {
            panic!("dialog should stay open");
        };
        assert!(state.error.is_some());
        assert_eq!(state.title_input.len(), 201);
        assert!(app.tasks().is_empty());
    }

    #[test]
    fn board_keys_dispatch_through_keybindings() {
        let mut app = app_with_tasks(2);
        send(&mut app, Message::Key(key(KeyCode::Char('k'))));
        assert_eq!(app.selected_index(), Some(0));
        send(&mut app, Message::Key(key(KeyCode::Char('x'))));
        assert!(app.tasks()[0].done);
        send(&mut app, Message::Key(key(KeyCode::Char('z'))));
        assert_eq!(app.tasks().len(), 2);
    }

    #[test]
    fn quit_persists_and_stops() {
        let mut app = app_with_tasks(1);
        let saves = app.store().saves.borrow().len();

        send(&mut app, Message::Key(key(KeyCode::Char('q'))));

        assert!(app.should_quit());
        assert_eq!(app.store().saves.borrow().len(), saves + 1);
    }

    #[test]
    fn status_expires_on_tick() {
        let mut app = app_with_tasks(1);
        assert!(app.status_text().is_some());

        send(&mut app, Message::Tick);
        assert!(app.status_text().is_some());

        let stale = Instant::now()
            .checked_sub(Duration::from_secs(10))
            .expect("instant in the past");
        if let Some(status) = app.status.as_mut() {
            status.set_at = stale;
        }
        send(&mut app, Message::Tick);
        assert_eq!(app.status_text(), None);
    }

    #[test]
    fn loads_persisted_tasks_on_startup() {
        let task = Task::create("persisted", "").expect("valid");
        let app = test_app(vec![task.clone()]);
        assert_eq!(app.tasks(), &[task]);
        assert_eq!(app.selected_index(), Some(0));
    }
}
