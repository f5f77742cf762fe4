//! Selection and preview scrolling

use super::*;

impl<R: SessionRuntime, S: TaskStore> App<R, S> {
    pub fn select_up(&mut self) {
        if self.tasks.is_empty() || self.selected == 0 {
            return;
        }
        self.selected -= 1;
        self.on_selection_changed();
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 >= self.tasks.len() {
            return;
        }
        self.selected += 1;
        self.on_selection_changed();
    }

    /// A freshly selected task always follows its latest output.
    pub(super) fn on_selection_changed(&mut self) {
        if let Some(task) = self.tasks.get(self.selected)
            && let Some(state) = self.previews.get_mut(&task.id)
        {
            state.manual_scroll_override = false;
        }
        self.preview.scroll_to_bottom();
        self.poll();
    }

    pub fn scroll_preview_up(&mut self) {
        if self.mark_manual_scroll() {
            self.preview.scroll_up();
        }
    }

    pub fn scroll_preview_down(&mut self) {
        if self.mark_manual_scroll() {
            self.preview.scroll_down();
        }
    }

    pub fn jump_to_latest(&mut self) {
        let Some(task) = self.tasks.get(self.selected) else {
            return;
        };
        self.previews
            .entry(task.id.clone())
            .or_default()
            .manual_scroll_override = false;
        self.preview.scroll_to_bottom();
    }

    fn mark_manual_scroll(&mut self) -> bool {
        let Some(task) = self.tasks.get(self.selected) else {
            return false;
        };
        self.previews
            .entry(task.id.clone())
            .or_default()
            .manual_scroll_override = true;
        true
    }
}
