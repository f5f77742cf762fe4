use crossterm::event::KeyEvent;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Message {
    Key(KeyEvent),
    Tick,
    Resize(u16, u16),
    SelectUp,
    SelectDown,
    OpenNewTaskDialog,
    CreateTask,
    DismissDialog,
    ToggleDone,
    DeleteTask,
    AttachSelectedTask,
    ScrollUp,
    ScrollDown,
    JumpToLatest,
    Quit,
}
