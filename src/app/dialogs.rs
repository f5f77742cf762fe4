//! Dialog handling logic for key events and dialog operations

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::messages::Message;
use super::state::{ActiveDialog, NewTaskDialogState, NewTaskField};
use super::{App, SessionRuntime, TaskStore};

const NEW_TASK_FIELDS: [NewTaskField; 5] = [
    NewTaskField::Title,
    NewTaskField::Details,
    NewTaskField::Yolo,
    NewTaskField::Create,
    NewTaskField::Cancel,
];

/// Handle key events when a dialog is active
pub fn handle_dialog_key(dialog: &mut ActiveDialog, key: KeyEvent) -> Option<Message> {
    match dialog {
        ActiveDialog::NewTask(state) => handle_new_task_dialog_key(state, key),
        ActiveDialog::None => None,
    }
}

fn handle_new_task_dialog_key(state: &mut NewTaskDialogState, key: KeyEvent) -> Option<Message> {
    let focus_index = NEW_TASK_FIELDS
        .iter()
        .position(|field| *field == state.focused_field)
        .unwrap_or(0);

    let move_focus = |delta: isize| -> NewTaskField {
        let len = NEW_TASK_FIELDS.len() as isize;
        let next = (focus_index as isize + delta).rem_euclid(len);
        NEW_TASK_FIELDS[next as usize]
    };

    let control = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Message::Quit);
        }
        KeyCode::Esc => return Some(Message::DismissDialog),
        KeyCode::Tab | KeyCode::Down => state.focused_field = move_focus(1),
        KeyCode::BackTab | KeyCode::Up => state.focused_field = move_focus(-1),
        KeyCode::Left if state.focused_field == NewTaskField::Cancel => {
            state.focused_field = NewTaskField::Create;
        }
        KeyCode::Right if state.focused_field == NewTaskField::Create => {
            state.focused_field = NewTaskField::Cancel;
        }
        KeyCode::Char(' ') if state.focused_field == NewTaskField::Yolo => {
            state.yolo = !state.yolo;
        }
        KeyCode::Enter => {
            return Some(match state.focused_field {
                NewTaskField::Cancel => Message::DismissDialog,
                _ => Message::CreateTask,
            });
        }
        KeyCode::Backspace => match state.focused_field {
            NewTaskField::Title => {
                state.title_input.pop();
            }
            NewTaskField::Details => {
                state.details_input.pop();
            }
            _ => {}
        },
        KeyCode::Char(ch) if !control => match state.focused_field {
            NewTaskField::Title => {
                state.title_input.push(ch);
                state.error = None;
            }
            NewTaskField::Details => {
                state.details_input.push(ch);
                state.error = None;
            }
            _ => {}
        },
        _ => {}
    }

    None
}

impl<R: SessionRuntime, S: TaskStore> App<R, S> {
    pub fn open_new_task_dialog(&mut self) {
        self.active_dialog = ActiveDialog::NewTask(NewTaskDialogState::default());
    }

    pub fn dismiss_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    /// A blank title closes the dialog without creating anything.
    pub fn submit_new_task_dialog(&mut self) {
        let ActiveDialog::NewTask(state) = &self.active_dialog else {
            return;
        };
        if state.title_input.trim().is_empty() {
            self.dismiss_dialog();
            return;
        }

        let title = state.title_input.clone();
        let details = state.details_input.clone();
        let yolo = state.yolo;

        match self.add_task(&title, &details, yolo) {
            Ok(()) => self.dismiss_dialog(),
            Err(err) => {
                let status = Self::validation_status(&err);
                if let ActiveDialog::NewTask(state) = &mut self.active_dialog {
                    state.error = Some(err.to_string());
                }
                self.set_status(status);
            }
        }
    }
}
