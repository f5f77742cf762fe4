use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum KeyAction {
    SelectUp,
    SelectDown,
    NewTask,
    ToggleDone,
    DeleteTask,
    AttachTask,
    ScrollUp,
    ScrollDown,
    JumpToLatest,
    Quit,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    fn matches(&self, key: KeyEvent) -> bool {
        match (&self.code, key.code) {
            (KeyCode::Char(left), KeyCode::Char(right)) => {
                let left = normalize_char(*left, self.modifiers);
                let right = normalize_char(right, key.modifiers);
                if left != right {
                    return false;
                }
                normalize_modifiers(self.modifiers) == normalize_modifiers(key.modifiers)
            }
            _ => self.code == key.code && self.modifiers == key.modifiers,
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }

        parts.push(match self.code {
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(ch) => ch.to_string(),
            _ => "Unknown".to_string(),
        });

        write!(f, "{}", parts.join("+"))
    }
}

#[derive(Debug, Clone)]
pub struct ActionBinding {
    pub id: &'static str,
    pub action: KeyAction,
    pub description: &'static str,
    pub bindings: Vec<KeyBinding>,
}

#[derive(Debug, Clone)]
pub struct Keybindings {
    board: Vec<ActionBinding>,
}

struct ActionDef {
    id: &'static str,
    action: KeyAction,
    description: &'static str,
    defaults: &'static [&'static str],
}

const BOARD_DEFS: &[ActionDef] = &[
    ActionDef {
        id: "select_up",
        action: KeyAction::SelectUp,
        description: "Up",
        defaults: &["k", "Up"],
    },
    ActionDef {
        id: "select_down",
        action: KeyAction::SelectDown,
        description: "Down",
        defaults: &["j", "Down"],
    },
    ActionDef {
        id: "new_task",
        action: KeyAction::NewTask,
        description: "Add",
        defaults: &["a"],
    },
    ActionDef {
        id: "attach",
        action: KeyAction::AttachTask,
        description: "Open",
        defaults: &["Enter"],
    },
    ActionDef {
        id: "toggle_done",
        action: KeyAction::ToggleDone,
        description: "Done",
        defaults: &["x"],
    },
    ActionDef {
        id: "delete_task",
        action: KeyAction::DeleteTask,
        description: "Delete",
        defaults: &["d"],
    },
    ActionDef {
        id: "scroll_up",
        action: KeyAction::ScrollUp,
        description: "Scroll ↑",
        defaults: &["["],
    },
    ActionDef {
        id: "scroll_down",
        action: KeyAction::ScrollDown,
        description: "Scroll ↓",
        defaults: &["]"],
    },
    ActionDef {
        id: "jump_to_latest",
        action: KeyAction::JumpToLatest,
        description: "Latest",
        defaults: &["g"],
    },
    ActionDef {
        id: "quit",
        action: KeyAction::Quit,
        description: "Quit",
        defaults: &["q", "Ctrl+C"],
    },
];

impl Default for Keybindings {
    fn default() -> Self {
        Self::from_overrides(&HashMap::new())
    }
}

impl Keybindings {
    pub fn from_overrides(overrides: &HashMap<String, Vec<String>>) -> Self {
        for id in overrides.keys() {
            if !BOARD_DEFS.iter().any(|def| def.id == id) {
                warn!("unknown keybinding action '{}' in settings; ignoring", id);
            }
        }

        let mut keybindings = Self {
            board: build_section(BOARD_DEFS, overrides),
        };
        keybindings.validate_conflicts();
        keybindings
    }

    pub fn action_for_key(&self, key: KeyEvent) -> Option<KeyAction> {
        self.board
            .iter()
            .find(|binding| {
                binding
                    .bindings
                    .iter()
                    .any(|candidate| candidate.matches(key))
            })
            .map(|binding| binding.action)
    }

    /// One-line cheat sheet shown at the bottom of the dashboard.
    pub fn shortcut_hint(&self, detach_key: &str) -> String {
        let entry = |action: KeyAction| {
            self.board
                .iter()
                .find(|binding| binding.action == action)
                .and_then(|binding| {
                    let key = binding.bindings.first()?;
                    Some(format!("[{key}] {}", binding.description))
                })
                .unwrap_or_default()
        };

        format!(
            " {} {} ({} to return)  {} {}  {} {} {}  {}",
            entry(KeyAction::NewTask),
            entry(KeyAction::AttachTask),
            detach_key,
            entry(KeyAction::ToggleDone),
            entry(KeyAction::DeleteTask),
            entry(KeyAction::ScrollUp),
            entry(KeyAction::ScrollDown),
            entry(KeyAction::JumpToLatest),
            entry(KeyAction::Quit),
        )
    }

    fn validate_conflicts(&mut self) {
        let mut seen: HashMap<String, &'static str> = HashMap::new();
        for binding in &self.board {
            for key in &binding.bindings {
                let key_name = key.to_string();
                if let Some(first_action) = seen.get(&key_name) {
                    warn!(
                        "keybinding conflict: '{}' used by '{}' and '{}' (first wins)",
                        key_name, first_action, binding.id
                    );
                } else {
                    seen.insert(key_name, binding.id);
                }
            }
        }
    }
}

fn build_section(
    defs: &[ActionDef],
    overrides: &HashMap<String, Vec<String>>,
) -> Vec<ActionBinding> {
    let mut output = Vec::new();
    for def in defs {
        let source = overrides.get(def.id).cloned().unwrap_or_else(|| {
            def.defaults
                .iter()
                .map(|binding| binding.to_string())
                .collect()
        });

        let mut parsed = Vec::new();
        for raw in source {
            match parse_binding(&raw) {
                Some(binding) => parsed.push(binding),
                None => warn!(
                    "invalid keybinding '{}' for action '{}'; ignoring",
                    raw, def.id
                ),
            }
        }

        if parsed.is_empty() {
            warn!(
                "no valid keybindings for action '{}'; falling back to defaults",
                def.id
            );
            parsed = def
                .defaults
                .iter()
                .filter_map(|raw| parse_binding(raw))
                .collect();
        }

        output.push(ActionBinding {
            id: def.id,
            action: def.action,
            description: def.description,
            bindings: parsed,
        });
    }
    output
}

fn normalize_modifiers(mut modifiers: KeyModifiers) -> KeyModifiers {
    modifiers.remove(KeyModifiers::SHIFT);
    modifiers
}

fn normalize_char(ch: char, modifiers: KeyModifiers) -> char {
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        ch.to_ascii_lowercase()
    } else {
        ch
    }
}

fn parse_binding(raw: &str) -> Option<KeyBinding> {
    // A lone "+" is a key, not a separator.
    if raw.trim() == "+" {
        return Some(KeyBinding {
            code: KeyCode::Char('+'),
            modifiers: KeyModifiers::empty(),
        });
    }

    let mut modifiers = KeyModifiers::empty();
    let mut key: Option<&str> = None;

    for part in raw.split('+').map(str::trim).filter(|s| !s.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.insert(KeyModifiers::CONTROL),
            "alt" => modifiers.insert(KeyModifiers::ALT),
            "shift" => modifiers.insert(KeyModifiers::SHIFT),
            _ => {
                if key.is_some() {
                    return None;
                }
                key = Some(part);
            }
        }
    }

    let key = key?;
    let lower = key.to_ascii_lowercase();
    let code = match lower.as_str() {
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "delete" => KeyCode::Delete,
        "space" => KeyCode::Char(' '),
        _ if lower.starts_with('f') && lower.len() >= 2 && lower.len() <= 3 => {
            let n = lower[1..].parse::<u8>().ok()?;
            KeyCode::F(n)
        }
        _ if key.chars().count() == 1 => {
            let ch = normalize_char(key.chars().next()?, modifiers);
            KeyCode::Char(ch)
        }
        _ => return None,
    };

    Some(KeyBinding { code, modifiers })
}
