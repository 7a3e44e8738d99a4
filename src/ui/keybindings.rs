use std::collections::HashMap;

use winit::keyboard::KeyCode;

/// Modifier flags for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierFlags {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl ModifierFlags {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
}

/// A key combination: modifier flags + a physical key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: ModifierFlags,
    pub key: KeyCode,
}

impl KeyCombo {
    /// Plain key, no modifiers.
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            modifiers: ModifierFlags::NONE,
            key,
        }
    }
}

/// Actions that can be triggered by keyboard shortcuts. Arrow actions are
/// contextual: dials inside the lock, pages inside the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Next dialogue line, or try the combination while the lock is open.
    Advance,
    /// Close topmost overlay (dialogue → book → lock), or skip the intro.
    CloseTopmost,
    ToggleSound,
    OpenLock,
    OpenBook,
    /// Pause or resume the scene loop.
    PauseLoop,
    ToggleStatus,
    Up,
    Down,
    Left,
    Right,
}

/// Configurable keyboard shortcut map.
pub struct KeyBindings {
    map: HashMap<KeyCombo, Action>,
    /// Reverse lookup: action → first combo that maps to it.
    reverse: HashMap<Action, KeyCombo>,
}

impl KeyBindings {
    pub fn defaults() -> Self {
        let bindings = [
            (KeyCode::Space, Action::Advance),
            (KeyCode::Enter, Action::Advance),
            (KeyCode::NumpadEnter, Action::Advance),
            (KeyCode::Escape, Action::CloseTopmost),
            (KeyCode::KeyM, Action::ToggleSound),
            (KeyCode::KeyL, Action::OpenLock),
            (KeyCode::KeyB, Action::OpenBook),
            (KeyCode::KeyP, Action::PauseLoop),
            (KeyCode::F3, Action::ToggleStatus),
            (KeyCode::ArrowUp, Action::Up),
            (KeyCode::ArrowDown, Action::Down),
            (KeyCode::ArrowLeft, Action::Left),
            (KeyCode::ArrowRight, Action::Right),
        ];

        let mut map = HashMap::new();
        let mut reverse = HashMap::new();
        // Insertion order decides which key the reverse lookup reports.
        for (key, action) in bindings {
            let combo = KeyCombo::plain(key);
            map.insert(combo, action);
            reverse.entry(action).or_insert(combo);
        }
        Self { map, reverse }
    }

    /// Look up the action for a key combination.
    pub fn lookup(&self, combo: KeyCombo) -> Option<Action> {
        self.map.get(&combo).copied()
    }

    /// Get the display label for an action's keybinding (e.g. "Space", "M").
    pub fn label_for(&self, action: Action) -> Option<String> {
        self.reverse.get(&action).map(|combo| {
            let mut parts = Vec::new();
            if combo.modifiers.ctrl {
                parts.push("Ctrl");
            }
            if combo.modifiers.alt {
                parts.push("Alt");
            }
            if combo.modifiers.shift {
                parts.push("Shift");
            }
            parts.push(key_name(combo.key));
            parts.join("+")
        })
    }
}

/// Human-readable name for a key code.
fn key_name(key: KeyCode) -> &'static str {
    match key {
        KeyCode::Space => "Space",
        KeyCode::Enter | KeyCode::NumpadEnter => "Enter",
        KeyCode::Escape => "Esc",
        KeyCode::KeyB => "B",
        KeyCode::KeyL => "L",
        KeyCode::KeyM => "M",
        KeyCode::KeyP => "P",
        KeyCode::F3 => "F3",
        KeyCode::ArrowUp => "Up",
        KeyCode::ArrowDown => "Down",
        KeyCode::ArrowLeft => "Left",
        KeyCode::ArrowRight => "Right",
        _ => "?",
    }
}
