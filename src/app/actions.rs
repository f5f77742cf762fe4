//! Task lifecycle actions: add, toggle, delete, attach, quit

use tracing::debug;

use super::*;

impl<R: SessionRuntime, S: TaskStore> App<R, S> {
    /// Adds a task and starts its session. The task is kept even when the
    /// session fails to start; only validation errors are returned.
    pub fn add_task(&mut self, title: &str, details: &str, yolo: bool) -> Result<(), TaskError> {
        let task = Task::create(title, details)?;
        let (width, height) = self.session_size();
        let request = CreateSessionRequest {
            session_name: task.session_name.clone(),
            prompt: task.build_prompt(),
            working_dir: self.workdir.clone(),
            width,
            height,
            yolo,
        };
        let title = task.title.clone();
        self.tasks.push(task);

        match self.runtime.create_session(&request) {
            Ok(()) => {
                info!(session = %request.session_name, width, height, "created session");
                self.set_status(format!("✓ Task created: {title}"));
            }
            Err(err) => {
                warn!(session = %request.session_name, error = %err, "failed to create session");
                self.set_status(format!("✗ Error creating session: {err:#}"));
            }
        }

        self.persist();
        self.selected = self.tasks.len() - 1;
        self.on_selection_changed();
        Ok(())
    }

    pub fn toggle_done(&mut self) {
        let Some(task) = self.tasks.get_mut(self.selected) else {
            return;
        };
        task.toggle_done();
        self.persist();
    }

    pub fn delete_task(&mut self) {
        let Some(task) = self.tasks.get(self.selected) else {
            return;
        };
        self.runtime.kill_session(&task.session_name);

        let task = self.tasks.remove(self.selected);
        self.previews.remove(&task.id);
        info!(session = %task.session_name, "deleted task");
        self.persist();

        self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
        if self.tasks.is_empty() {
            self.preview.set_content(NO_TASK_SELECTED.to_string());
        } else {
            self.poll();
        }
    }

    /// Hands the terminal to tmux until the user detaches. The display is
    /// reacquired whether or not the attach itself succeeded.
    pub fn attach_selected(&mut self, display: &mut impl DisplayHandoff) -> Result<()> {
        let Some(task) = self.tasks.get(self.selected) else {
            return Ok(());
        };
        let session_name = task.session_name.clone();

        if !self.runtime.session_exists(&session_name) {
            let err = TaskError::SessionNotFound(session_name);
            self.set_status(format!("✗ Error: {err}"));
            return Ok(());
        }

        if let Err(err) = display.release() {
            display.reacquire()?;
            return Err(err.context("failed to release terminal for tmux attach"));
        }
        let attached = self.runtime.attach(&session_name);
        display
            .reacquire()
            .context("failed to restore terminal after tmux detach")?;

        match attached {
            Ok(code) => debug!(session = %session_name, ?code, "tmux client detached"),
            Err(err) => {
                warn!(session = %session_name, error = %err, "tmux attach failed");
                self.set_status(format!("✗ Error attaching to session: {err:#}"));
            }
        }

        self.poll();
        Ok(())
    }

    pub fn quit(&mut self) {
        self.persist();
        self.should_quit = true;
    }
}
