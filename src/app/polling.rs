//! Reconciles captured session output with the preview pane

use std::time::Duration;

use super::*;

impl<R: SessionRuntime, S: TaskStore> App<R, S> {
    /// Captures the selected task's pane and refreshes the preview.
    pub fn poll(&mut self) {
        let Some(task) = self.tasks.get(self.selected) else {
            return;
        };

        let output = self
            .runtime
            .capture_output(&task.session_name, self.settings.capture_lines);
        if output.is_empty() {
            self.preview.set_content(NO_ACTIVE_SESSION.to_string());
            return;
        }

        self.preview.set_content(format!(
            " [Session: {}]\n [Started: {}]\n{}",
            task.session_name,
            task.started_label(),
            output
        ));

        let state = self.previews.entry(task.id.clone()).or_default();
        if output != state.last_output {
            state.last_output = output;
            state.manual_scroll_override = false;
        }
        if !state.manual_scroll_override {
            self.preview.scroll_to_bottom();
        }
    }

    pub(super) fn expire_status(&mut self) {
        let timeout = Duration::from_millis(self.settings.status_timeout_ms);
        if self
            .status
            .as_ref()
            .is_some_and(|status| status.is_expired(timeout))
        {
            self.status = None;
        }
    }
}
