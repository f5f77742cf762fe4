use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::event::{
    KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent,
    KeyModifiers as CrosstermKeyModifiers,
};
use tuirealm::{
    Application, AttrValue, Attribute, Component, Event, EventListenerCfg, Frame, MockComponent,
    NoUserEvent, Props, State,
    command::{Cmd, CmdResult},
    event::{Key as RealmKey, KeyEvent as RealmKeyEvent, KeyModifiers as RealmKeyModifiers},
    ratatui::layout::Rect,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use crate::{
    app::{App, DisplayHandoff, Message},
    ui,
};

pub type SharedApp = Arc<Mutex<App>>;
pub type RealmApplication = Application<RootId, Message, NoUserEvent>;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RootId {
    Root,
}

/// The tick event drives session polling, so its period is the poll interval.
pub fn init_application(app: SharedApp, poll_interval: Duration) -> Result<RealmApplication> {
    let mut application: RealmApplication = Application::init(
        EventListenerCfg::default()
            .crossterm_input_listener(Duration::from_millis(20), 3)
            .poll_timeout(Duration::from_millis(10))
            .tick_interval(poll_interval),
    );

    application
        .mount(RootId::Root, Box::new(RootComponent::new(app)), Vec::new())
        .context("failed to mount tui-realm root component")?;

    application
        .active(&RootId::Root)
        .context("failed to activate tui-realm root component")?;

    Ok(application)
}

pub fn apply_message(
    shared_app: &SharedApp,
    message: Message,
    display: &mut impl DisplayHandoff,
) -> Result<()> {
    let mut app = lock_app(shared_app)?;
    app.update(message, display)
}

pub fn should_quit(shared_app: &SharedApp) -> Result<bool> {
    let app = lock_app(shared_app)?;
    Ok(app.should_quit())
}

fn lock_app(shared_app: &SharedApp) -> Result<MutexGuard<'_, App>> {
    shared_app
        .lock()
        .map_err(|_| anyhow!("failed to lock app state"))
}

/// Gives the terminal to an attached tmux client and takes it back.
///
/// The input listener is paused while released so that keystrokes meant
/// for tmux are not also queued as dashboard events.
pub struct TerminalHandoff<'a> {
    terminal: &'a mut TerminalBridge<CrosstermTerminalAdapter>,
    application: &'a mut RealmApplication,
}

impl<'a> TerminalHandoff<'a> {
    pub fn new(
        terminal: &'a mut TerminalBridge<CrosstermTerminalAdapter>,
        application: &'a mut RealmApplication,
    ) -> Self {
        Self {
            terminal,
            application,
        }
    }
}

impl DisplayHandoff for TerminalHandoff<'_> {
    fn release(&mut self) -> Result<()> {
        self.application
            .lock_ports()
            .context("failed to pause terminal input listener")?;
        self.terminal
            .disable_raw_mode()
            .context("failed to disable raw mode")?;
        self.terminal
            .leave_alternate_screen()
            .context("failed to leave alternate screen")?;
        Ok(())
    }

    fn reacquire(&mut self) -> Result<()> {
        self.terminal
            .enter_alternate_screen()
            .context("failed to enter alternate screen")?;
        self.terminal
            .enable_raw_mode()
            .context("failed to enable raw mode")?;
        self.application
            .unlock_ports()
            .context("failed to resume terminal input listener")?;
        self.terminal
            .clear_screen()
            .context("failed to clear screen")?;
        Ok(())
    }
}

struct RootComponent {
    props: Props,
    app: SharedApp,
}

impl RootComponent {
    fn new(app: SharedApp) -> Self {
        Self {
            props: Props::default(),
            app,
        }
    }
}

impl MockComponent for RootComponent {
    fn view(&mut self, frame: &mut Frame, _area: Rect) {
        if let Ok(app) = self.app.lock() {
            ui::render(frame, &*app);
        }
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::None
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Message, NoUserEvent> for RootComponent {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Message> {
        match ev {
            Event::Keyboard(key) => Some(Message::Key(convert_key_event(key))),
            Event::WindowResize(width, height) => Some(Message::Resize(width, height)),
            Event::Tick => Some(Message::Tick),
            _ => None,
        }
    }
}

fn convert_key_event(key: RealmKeyEvent) -> CrosstermKeyEvent {
    CrosstermKeyEvent::new(
        convert_key_code(key.code),
        convert_key_modifiers(key.modifiers),
    )
}

fn convert_key_code(key: RealmKey) -> CrosstermKeyCode {
    match key {
        RealmKey::Backspace => CrosstermKeyCode::Backspace,
        RealmKey::Enter => CrosstermKeyCode::Enter,
        RealmKey::Left => CrosstermKeyCode::Left,
        RealmKey::Right => CrosstermKeyCode::Right,
        RealmKey::Up => CrosstermKeyCode::Up,
        RealmKey::Down => CrosstermKeyCode::Down,
        RealmKey::Home => CrosstermKeyCode::Home,
        RealmKey::End => CrosstermKeyCode::End,
        RealmKey::PageUp => CrosstermKeyCode::PageUp,
        RealmKey::PageDown => CrosstermKeyCode::PageDown,
        RealmKey::Tab => CrosstermKeyCode::Tab,
        RealmKey::BackTab => CrosstermKeyCode::BackTab,
        RealmKey::Delete => CrosstermKeyCode::Delete,
        RealmKey::Function(index) => CrosstermKeyCode::F(index),
        RealmKey::Char(ch) => CrosstermKeyCode::Char(ch),
        RealmKey::Esc => CrosstermKeyCode::Esc,
        _ => CrosstermKeyCode::Null,
    }
}

fn convert_key_modifiers(modifiers: RealmKeyModifiers) -> CrosstermKeyModifiers {
    let mut converted = CrosstermKeyModifiers::empty();
    if modifiers.contains(RealmKeyModifiers::SHIFT) {
        converted.insert(CrosstermKeyModifiers::SHIFT);
    }
    if modifiers.contains(RealmKeyModifiers::CONTROL) {
        converted.insert(CrosstermKeyModifiers::CONTROL);
    }
    if modifiers.contains(RealmKeyModifiers::ALT) {
        converted.insert(CrosstermKeyModifiers::ALT);
    }
    converted
}
