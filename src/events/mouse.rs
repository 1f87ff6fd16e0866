use super::keyboard::Modifiers;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Кнопка мыши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Боковые/дополнительные кнопки
    Other,
}

impl MouseButton {
    /// BTN_LEFT..BTN_TASK (0x110..=0x117)
    pub fn from_evdev_code(code: u16) -> Option<Self> {
        match code {
            0x110 => Some(MouseButton::Left),
            0x111 => Some(MouseButton::Right),
            0x112 => Some(MouseButton::Middle),
            0x113..=0x117 => Some(MouseButton::Other),
            _ => None,
        }
    }
}

/// Действие мыши, которое может попасть в историю
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Button(MouseButton),
    /// Смещение колеса: > 0 вверх, < 0 вниз
    Wheel(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub modifiers: Modifiers,
    pub timestamp: Instant,
    pub device_name: String,
}

impl MouseEvent {
    pub fn new(action: MouseAction, modifiers: Modifiers, device_name: String) -> Self {
        Self {
            action,
            modifiers,
            timestamp: Instant::now(),
            device_name,
        }
    }

    pub fn click(button: MouseButton, modifiers: Modifiers) -> Self {
        Self::new(MouseAction::Button(button), modifiers, String::new())
    }

    pub fn wheel(delta: i32, modifiers: Modifiers) -> Self {
        Self::new(MouseAction::Wheel(delta), modifiers, String::new())
    }
}

impl fmt::Display for MouseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}] mods={}", self.action, self.device_name, self.modifiers)
    }
}
