use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

impl KeyState {
    /// evdev: 0 - отпускание, 1 - нажатие, 2 - автоповтор
    pub fn from_evdev_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            2 => Some(KeyState::Repeat),
            _ => None,
        }
    }

    pub fn is_down(&self) -> bool {
        matches!(self, KeyState::Pressed | KeyState::Repeat)
    }
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const LEFT_CTRL: KeyCode = KeyCode(29);
    pub const RIGHT_CTRL: KeyCode = KeyCode(97);
    pub const LEFT_SHIFT: KeyCode = KeyCode(42);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(54);
    pub const LEFT_ALT: KeyCode = KeyCode(56);
    pub const RIGHT_ALT: KeyCode = KeyCode(100);
    pub const LEFT_META: KeyCode = KeyCode(125);
    pub const RIGHT_META: KeyCode = KeyCode(126);

    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    /// Какой модификатор представляет клавиша (если представляет)
    pub fn modifier_kind(&self) -> Option<ModifierKind> {
        match *self {
            KeyCode::LEFT_CTRL | KeyCode::RIGHT_CTRL => Some(ModifierKind::Ctrl),
            KeyCode::LEFT_ALT | KeyCode::RIGHT_ALT => Some(ModifierKind::Alt),
            KeyCode::LEFT_SHIFT | KeyCode::RIGHT_SHIFT => Some(ModifierKind::Shift),
            KeyCode::LEFT_META | KeyCode::RIGHT_META => Some(ModifierKind::Win),
            _ => None,
        }
    }

    pub fn is_modifier(&self) -> bool {
        self.modifier_kind().is_some()
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Ctrl,
    Alt,
    Shift,
    Win,
}

/// Модификаторы клавиш
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_super(mut self, super_key: bool) -> Self {
        self.super_key = super_key;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    /// Префикс для отображения: "Ctrl + Alt + Shift + Win + " в фиксированном порядке
    pub fn display_prefix(&self) -> String {
        let mut prefix = String::new();
        if self.ctrl {
            prefix.push_str("Ctrl + ");
        }
        if self.alt {
            prefix.push_str("Alt + ");
        }
        if self.shift {
            prefix.push_str("Shift + ");
        }
        if self.super_key {
            prefix.push_str("Win + ");
        }
        prefix
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.display_prefix();
        if prefix.is_empty() {
            write!(f, "none")
        } else {
            f.write_str(prefix.trim_end_matches(" + "))
        }
    }
}

/// Событие клавиатуры
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
    pub modifiers: Modifiers,
    pub timestamp: Instant,
    pub device_name: String,
}

impl KeyEvent {
    pub fn new(
        key_code: KeyCode,
        state: KeyState,
        modifiers: Modifiers,
        device_name: String,
    ) -> Self {
        Self {
            key_code,
            state,
            modifiers,
            timestamp: Instant::now(),
            device_name,
        }
    }

    pub fn press(key_code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(key_code, KeyState::Pressed, modifiers, String::new())
    }

    pub fn release(key_code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(key_code, KeyState::Released, modifiers, String::new())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} mods={} [{}] ({}ms ago)",
            self.key_code,
            self.state,
            self.modifiers,
            self.device_name,
            self.timestamp.elapsed().as_millis()
        )
    }
}
