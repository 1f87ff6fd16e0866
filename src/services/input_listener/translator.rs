use crate::events::{KeyCode, KeyEvent, KeyState, MouseAction, MouseButton, MouseEvent, RawEvent};
use crate::trace_if_enabled;
use evdev::EventType;
use parking_lot::RwLock;

/// REL_WHEEL
pub const REL_WHEEL: u16 = 0x08;

/// Перевести событие evdev в `RawEvent`.
///
/// Клавиши обновляют общее состояние модификаторов до снятия снимка, так что
/// нажатие Ctrl уже содержит Ctrl в своих модификаторах. Кнопки мыши дают событие
/// только на нажатие, колесо - только ненулевое смещение.
pub fn translate(
    event_type: EventType,
    code: u16,
    value: i32,
    modifier_state: &RwLock<super::ModifierState>,
    device_name: &str,
) -> Option<RawEvent> {
    if event_type == EventType::KEY {
        if let Some(button) = MouseButton::from_evdev_code(code) {
            if value != 1 {
                return None;
            }
            let modifiers = modifier_state.read().to_modifiers();
            return Some(
                MouseEvent::new(MouseAction::Button(button), modifiers, device_name.to_string()).into(),
            );
        }

        let Some(state) = KeyState::from_evdev_value(value) else {
            trace_if_enabled!("Неизвестное значение события клавиши: {}", value);
            return None;
        };

        let key_code = KeyCode::new(code);
        let modifiers = {
            let mut modifier_state = modifier_state.write();
            modifier_state.update_key(key_code, state.is_down());
            modifier_state.to_modifiers()
        };

        return Some(KeyEvent::new(key_code, state, modifiers, device_name.to_string()).into());
    }

    if event_type == EventType::RELATIVE && code == REL_WHEEL && value != 0 {
        let modifiers = modifier_state.read().to_modifiers();
        return Some(MouseEvent::new(MouseAction::Wheel(value), modifiers, device_name.to_string()).into());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::super::ModifierState;
    use super::*;

    fn state() -> RwLock<ModifierState> {
        RwLock::new(ModifierState::new())
    }

    #[test]
    fn test_key_press_carries_own_modifier() {
        let modifiers = state();
        let event = translate(EventType::KEY, 29, 1, &modifiers, "kbd").unwrap();

        match event {
            RawEvent::Key(key) => {
                assert_eq!(key.key_code, KeyCode::LEFT_CTRL);
                assert_eq!(key.state, KeyState::Pressed);
                assert!(key.modifiers.ctrl);
                assert_eq!(key.device_name, "kbd");
            }
            other => panic!("ожидалось событие клавиши: {:?}", other),
        }

        let release = translate(EventType::KEY, 29, 0, &modifiers, "kbd").unwrap();
        assert!(!release.modifiers().ctrl);
    }

    #[test]
    fn test_repeat_and_unknown_values() {
        let modifiers = state();
        let repeat = translate(EventType::KEY, 30, 2, &modifiers, "kbd");
        assert!(matches!(repeat, Some(RawEvent::Key(KeyEvent { state: KeyState::Repeat, .. }))));
        assert!(translate(EventType::KEY, 30, 7, &modifiers, "kbd").is_none());
    }

    #[test]
    fn test_mouse_buttons_only_on_press() {
        let modifiers = state();
        translate(EventType::KEY, 42, 1, &modifiers, "kbd");

        let click = translate(EventType::KEY, 0x111, 1, &modifiers, "mouse").unwrap();
        match click {
            RawEvent::Mouse(mouse) => {
                assert_eq!(mouse.action, MouseAction::Button(MouseButton::Right));
                assert!(mouse.modifiers.shift);
            }
            other => panic!("ожидалось событие мыши: {:?}", other),
        }

        assert!(translate(EventType::KEY, 0x111, 0, &modifiers, "mouse").is_none());
    }

    #[test]
    fn test_wheel_and_other_axes() {
        let modifiers = state();
        let wheel = translate(EventType::RELATIVE, REL_WHEEL, -1, &modifiers, "mouse");
        assert!(matches!(
            wheel,
            Some(RawEvent::Mouse(MouseEvent { action: MouseAction::Wheel(-1), .. }))
        ));

        assert!(translate(EventType::RELATIVE, REL_WHEEL, 0, &modifiers, "mouse").is_none());
        assert!(translate(EventType::RELATIVE, 0x00, 5, &modifiers, "mouse").is_none());
        assert!(translate(EventType::SYNCHRONIZATION, 0, 0, &modifiers, "mouse").is_none());
    }
}
