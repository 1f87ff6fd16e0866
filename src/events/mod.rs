pub mod keyboard;
pub mod mouse;
pub mod window;

pub use keyboard::{KeyCode, KeyEvent, KeyState, ModifierKind, Modifiers};
pub use mouse::{MouseAction, MouseButton, MouseEvent};
pub use window::{WindowEvent, WindowGeometry, WindowInfo};

/// Необработанное событие ввода, поступающее от слушателя устройств
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

impl RawEvent {
    pub fn modifiers(&self) -> Modifiers {
        match self {
            RawEvent::Key(event) => event.modifiers,
            RawEvent::Mouse(event) => event.modifiers,
        }
    }

    pub fn timestamp(&self) -> std::time::Instant {
        match self {
            RawEvent::Key(event) => event.timestamp,
            RawEvent::Mouse(event) => event.timestamp,
        }
    }
}

impl From<KeyEvent> for RawEvent {
    fn from(event: KeyEvent) -> Self {
        RawEvent::Key(event)
    }
}

impl From<MouseEvent> for RawEvent {
    fn from(event: MouseEvent) -> Self {
        RawEvent::Mouse(event)
    }
}
