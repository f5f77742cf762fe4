use tuirealm::ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState,
    },
};

use crate::ansi::parse_ansi_to_lines;
use crate::app::{
    ActiveDialog, App, NO_TASK_SELECTED, NewTaskDialogState, NewTaskField, SessionRuntime,
    TaskStore,
};

pub fn render<R: SessionRuntime, S: TaskStore>(frame: &mut Frame<'_>, app: &App<R, S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[0]);

    render_task_list(frame, panes[0], app);
    render_preview(frame, panes[1], app);
    render_status_line(frame, chunks[1], app);
    render_shortcut_bar(frame, chunks[2], app);

    if let ActiveDialog::NewTask(state) = app.active_dialog() {
        render_new_task_dialog(frame, state);
    }
}

fn render_task_list<R: SessionRuntime, S: TaskStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App<R, S>,
) {
    let tasks = app.tasks();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" TASKS ")
        .title_alignment(Alignment::Left)
        .title_bottom(Line::from(format!(" [{} tasks] ", tasks.len())).right_aligned());

    if tasks.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new("\nNo tasks yet\n\nPress [a] to add a task")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let selected = app.selected_index();
    let items: Vec<ListItem<'_>> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let marker = if Some(index) == selected { " > " } else { "   " };
            let checkbox = if task.done { "[x]" } else { "[ ]" };
            let title_style = if task.done {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{marker}{checkbox} ")),
                Span::styled(task.title.clone(), title_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_preview<R: SessionRuntime, S: TaskStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App<R, S>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" AGENT PREVIEW ")
        .title_alignment(Alignment::Left);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.selected_task().is_none() {
        frame.render_widget(Paragraph::new(NO_TASK_SELECTED), inner);
        return;
    }

    let preview = app.preview();
    let offset = u16::try_from(preview.scroll_offset()).unwrap_or(u16::MAX);
    frame.render_widget(
        Paragraph::new(parse_ansi_to_lines(preview.content())).scroll((offset, 0)),
        inner,
    );

    if preview.max_scroll() > 0 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_style(Style::default().fg(Color::Gray).bg(Color::DarkGray))
            .track_symbol(Some("│"))
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scroll_state =
            ScrollbarState::new(preview.max_scroll()).position(preview.scroll_offset());
        frame.render_stateful_widget(
            scrollbar,
            Rect {
                x: area.x + area.width.saturating_sub(1),
                y: inner.y,
                height: inner.height,
                width: 1,
            },
            &mut scroll_state,
        );
    }
}

fn render_status_line<R: SessionRuntime, S: TaskStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App<R, S>,
) {
    let text = app
        .status_text()
        .map(|status| format!(" {status}"))
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
        area,
    );
}

fn render_shortcut_bar<R: SessionRuntime, S: TaskStore>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App<R, S>,
) {
    let hint = app.keybindings().shortcut_hint(&app.settings().detach_key);
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::Cyan)),
        area,
    );
}

fn render_new_task_dialog(frame: &mut Frame<'_>, state: &NewTaskDialogState) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(" New Task ")
        .title_alignment(Alignment::Center);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner_area);

    render_input_field(
        frame,
        layout[0],
        " Title ",
        &state.title_input,
        state.focused_field == NewTaskField::Title,
    );
    render_input_field(
        frame,
        layout[1],
        " Details (optional) ",
        &state.details_input,
        state.focused_field == NewTaskField::Details,
    );
    render_checkbox(
        frame,
        layout[2],
        "YOLO mode (auto-approve actions)",
        state.yolo,
        state.focused_field == NewTaskField::Yolo,
    );

    if let Some(error) = &state.error {
        frame.render_widget(
            Paragraph::new(format!(" {error}")).style(Style::default().fg(Color::Red)),
            layout[3],
        );
    }

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[4]);
    render_button(
        frame,
        buttons[0],
        "Create",
        state.focused_field == NewTaskField::Create,
    );
    render_button(
        frame,
        buttons[1],
        "Cancel",
        state.focused_field == NewTaskField::Cancel,
    );

    frame.render_widget(
        Paragraph::new(" Tab: next field  Space: toggle  Enter: create  Esc: cancel")
            .style(Style::default().fg(Color::DarkGray)),
        layout[5],
    );
}

fn render_input_field(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    is_focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(label)
        .style(if is_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    frame.render_widget(Paragraph::new(value).block(block), area);
}

fn render_button(frame: &mut Frame<'_>, area: Rect, label: &str, is_focused: bool) {
    let (bg, fg) = if is_focused {
        (Color::Blue, Color::White)
    } else {
        (Color::Reset, Color::Reset)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            Style::default().fg(Color::Blue)
        } else {
            Style::default().fg(Color::Gray)
        })
        .style(Style::default().bg(bg).fg(fg));
    frame.render_widget(
        Paragraph::new(label)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn render_checkbox(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    checked: bool,
    is_focused: bool,
) {
    let check_mark = if checked { "[x]" } else { "[ ]" };
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(format!(" {check_mark} {label}")).style(style),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use anyhow::Result;
    use tuirealm::ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use crate::app::CreateSessionRequest;
    use crate::settings::Settings;
    use crate::types::Task;

    struct StaticRuntime;

    impl SessionRuntime for StaticRuntime {
        fn create_session(&self, _request: &CreateSessionRequest) -> Result<()> {
            Ok(())
        }

        fn capture_output(&self, _session_name: &str, _lines: usize) -> String {
            "\x1b[32mhello from the agent\x1b[0m".to_string()
        }

        fn attach(&self, _session_name: &str) -> Result<Option<i32>> {
            Ok(Some(0))
        }

        fn kill_session(&self, _session_name: &str) {}

        fn session_exists(&self, _session_name: &str) -> bool {
            true
        }
    }

    struct MemoryStore(Vec<Task>);

    impl TaskStore for MemoryStore {
        fn init(&self) -> Result<()> {
            Ok(())
        }

        fn load_tasks(&self) -> Result<Vec<Task>> {
            Ok(self.0.clone())
        }

        fn save_tasks(&self, _tasks: &[Task]) -> Result<()> {
            Ok(())
        }
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &App<StaticRuntime, MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");
        terminal
            .draw(|frame| render(frame, app))
            .expect("draw should succeed");
        buffer_text(terminal.backend().buffer())
    }

    fn test_app(tasks: Vec<Task>) -> App<StaticRuntime, MemoryStore> {
        let mut app = App::with_runtime(
            StaticRuntime,
            MemoryStore(tasks),
            Settings::default(),
            PathBuf::from("."),
        )
        .expect("app should build");
        app.resize(100, 30);
        app
    }

    #[test]
    fn empty_board_shows_hint() {
        let text = draw(&test_app(Vec::new()));
        assert!(text.contains("No tasks yet"));
        assert!(text.contains("Press [a] to add a task"));
        assert!(text.contains("[0 tasks]"));
        assert!(text.contains("[No task selected]"));
    }

    #[test]
    fn task_rows_and_preview_render() {
        let mut done = Task::create("Ship release", "").expect("valid");
        done.done = true;
        let open = Task::create("Fix bug", "in parser").expect("valid");
        let mut app = test_app(vec![open, done]);
        app.poll();

        let text = draw(&app);
        assert!(text.contains(" > [ ] Fix bug"));
        assert!(text.contains("   [x] Ship release"));
        assert!(text.contains("[2 tasks]"));
        assert!(text.contains("AGENT PREVIEW"));
        assert!(text.contains("hello from the agent"));
        assert!(text.contains("[a] Add"));
    }

    #[test]
    fn new_task_dialog_renders_fields() {
        let mut app = test_app(Vec::new());
        app.open_new_task_dialog();

        let text = draw(&app);
        assert!(text.contains("New Task"));
        assert!(text.contains("Title"));
        assert!(text.contains("YOLO mode"));
        assert!(text.contains("Create"));
        assert!(text.contains("Cancel"));
    }
}
