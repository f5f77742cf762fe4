use crossterm::event::KeyEvent;

use super::dialogs::handle_dialog_key;
use super::*;
use crate::keybindings::KeyAction;

impl<R: SessionRuntime, S: TaskStore> App<R, S> {
    pub fn update(&mut self, message: Message, display: &mut impl DisplayHandoff) -> Result<()> {
        match message {
            Message::Key(key) => self.handle_key(key, display)?,
            Message::Tick => {
                self.expire_status();
                self.poll();
            }
            Message::Resize(width, height) => self.resize(width, height),
            Message::SelectUp => self.select_up(),
            Message::SelectDown => self.select_down(),
            Message::OpenNewTaskDialog => self.open_new_task_dialog(),
            Message::CreateTask => self.submit_new_task_dialog(),
            Message::DismissDialog => self.dismiss_dialog(),
            Message::ToggleDone => self.toggle_done(),
            Message::DeleteTask => self.delete_task(),
            Message::AttachSelectedTask => self.attach_selected(display)?,
            Message::ScrollUp => self.scroll_preview_up(),
            Message::ScrollDown => self.scroll_preview_down(),
            Message::JumpToLatest => self.jump_to_latest(),
            Message::Quit => self.quit(),
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, display: &mut impl DisplayHandoff) -> Result<()> {
        if self.active_dialog != ActiveDialog::None {
            if let Some(follow_up) = handle_dialog_key(&mut self.active_dialog, key) {
                self.update(follow_up, display)?;
            }
            return Ok(());
        }

        let Some(action) = self.keybindings.action_for_key(key) else {
            return Ok(());
        };

        let message = match action {
            KeyAction::SelectUp => Message::SelectUp,
            KeyAction::SelectDown => Message::SelectDown,
            KeyAction::NewTask => Message::OpenNewTaskDialog,
            KeyAction::ToggleDone => Message::ToggleDone,
            KeyAction::DeleteTask => Message::DeleteTask,
            KeyAction::AttachTask => Message::AttachSelectedTask,
            KeyAction::ScrollUp => Message::ScrollUp,
            KeyAction::ScrollDown => Message::ScrollDown,
            KeyAction::JumpToLatest => Message::JumpToLatest,
            KeyAction::Quit => Message::Quit,
        };
        self.update(message, display)
    }
}
