use crate::config::InputConfig;
use crate::events::{KeyCode, KeyEvent, MouseAction, MouseButton, MouseEvent, RawEvent};
use crate::mappings::KeyDisplayName;
use smallvec::SmallVec;
use std::fmt;

/// Нормализованное представление события: "Ctrl + A", "Left Click", "Scroll Up"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayToken(String);

impl DisplayToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisplayToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Клавиши, которые сейчас удерживаются (для подавления автоповтора)
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: SmallVec<[KeyCode; 8]>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn insert(&mut self, key: KeyCode) -> bool {
        if self.contains(key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn remove(&mut self, key: KeyCode) -> bool {
        match self.keys.iter().position(|k| *k == key) {
            Some(pos) => {
                self.keys.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerOptions {
    pub show_mouse_clicks: bool,
    pub suppress_modifier_alone: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self::from(&InputConfig::default())
    }
}

impl From<&InputConfig> for NormalizerOptions {
    fn from(config: &InputConfig) -> Self {
        Self {
            show_mouse_clicks: config.show_mouse_clicks,
            suppress_modifier_alone: config.suppress_modifier_alone,
        }
    }
}

/// Превратить сырое событие в токен или подавить его.
///
/// Единственное состояние - переданный `held`. `sensitive` - результат проверки
/// поля ввода пароля: нажатие помечается удерживаемым, но токен не создаётся,
/// так что парное отпускание остаётся сбалансированным.
pub fn normalize(
    event: &RawEvent,
    held: &mut HeldKeys,
    options: &NormalizerOptions,
    sensitive: bool,
) -> Option<DisplayToken> {
    match event {
        RawEvent::Key(key) => normalize_key(key, held, options, sensitive),
        RawEvent::Mouse(mouse) => normalize_mouse(mouse, options),
    }
}

fn normalize_key(
    event: &KeyEvent,
    held: &mut HeldKeys,
    options: &NormalizerOptions,
    sensitive: bool,
) -> Option<DisplayToken> {
    if !event.state.is_down() {
        held.remove(event.key_code);
        return None;
    }

    // Автоповтор ОС для уже удерживаемой клавиши
    if held.contains(event.key_code) {
        return None;
    }

    held.insert(event.key_code);

    if sensitive {
        return None;
    }

    if event.key_code.is_modifier() && options.suppress_modifier_alone {
        return None;
    }

    // У модификаторов нет отображаемого имени: отдельно они не попадают в историю
    let name = KeyDisplayName::resolve(event.key_code, event.modifiers.shift)?;
    Some(DisplayToken(format!("{}{}", event.modifiers.display_prefix(), name)))
}

fn normalize_mouse(event: &MouseEvent, options: &NormalizerOptions) -> Option<DisplayToken> {
    if !options.show_mouse_clicks {
        return None;
    }

    let action = match event.action {
        MouseAction::Button(MouseButton::Left) => "Left Click",
        MouseAction::Button(MouseButton::Right) => "Right Click",
        MouseAction::Button(MouseButton::Middle) => "Middle Click",
        MouseAction::Button(MouseButton::Other) => "Mouse Button",
        MouseAction::Wheel(delta) if delta > 0 => "Scroll Up",
        MouseAction::Wheel(delta) if delta < 0 => "Scroll Down",
        MouseAction::Wheel(_) => return None,
    };

    Some(DisplayToken(format!("{}{}", event.modifiers.display_prefix(), action)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{KeyState, Modifiers};

    const KEY_A: KeyCode = KeyCode(30);
    const KEY_1: KeyCode = KeyCode(2);
    const KEY_UNKNOWN: KeyCode = KeyCode(240);

    fn key(code: KeyCode, state: KeyState, modifiers: Modifiers) -> RawEvent {
        RawEvent::Key(KeyEvent::new(code, state, modifiers, "test".to_string()))
    }

    fn run(event: RawEvent, held: &mut HeldKeys) -> Option<String> {
        normalize(&event, held, &NormalizerOptions::default(), false).map(DisplayToken::into_string)
    }

    #[test]
    fn test_plain_key_and_shortcut() {
        let mut held = HeldKeys::new();
        assert_eq!(run(key(KEY_A, KeyState::Pressed, Modifiers::new()), &mut held).as_deref(), Some("A"));

        let mut held = HeldKeys::new();
        let mods = Modifiers::new().with_ctrl(true).with_shift(true);
        assert_eq!(
            run(key(KEY_A, KeyState::Pressed, mods), &mut held).as_deref(),
            Some("Ctrl + Shift + A")
        );
    }

    #[test]
    fn test_key_up_releases_without_token() {
        let mut held = HeldKeys::new();
        run(key(KEY_A, KeyState::Pressed, Modifiers::new()), &mut held);
        assert!(held.contains(KEY_A));

        assert_eq!(run(key(KEY_A, KeyState::Released, Modifiers::new()), &mut held), None);
        assert!(held.is_empty());
    }

    #[test]
    fn test_held_key_repeat_is_suppressed() {
        let mut held = HeldKeys::new();
        assert!(run(key(KEY_A, KeyState::Pressed, Modifiers::new()), &mut held).is_some());
        assert_eq!(run(key(KEY_A, KeyState::Repeat, Modifiers::new()), &mut held), None);
        assert_eq!(run(key(KEY_A, KeyState::Pressed, Modifiers::new()), &mut held), None);
        assert!(held.contains(KEY_A));

        run(key(KEY_A, KeyState::Released, Modifiers::new()), &mut held);
        assert!(run(key(KEY_A, KeyState::Pressed, Modifiers::new()), &mut held).is_some());
    }

    #[test]
    fn test_lone_modifier_is_suppressed() {
        let mut held = HeldKeys::new();
        let ctrl = Modifiers::new().with_ctrl(true);

        assert_eq!(run(key(KeyCode::LEFT_CTRL, KeyState::Pressed, ctrl), &mut held), None);
        assert!(held.contains(KeyCode::LEFT_CTRL));
        assert_eq!(run(key(KeyCode::LEFT_CTRL, KeyState::Released, Modifiers::new()), &mut held), None);
        assert!(held.is_empty());
    }

    #[test]
    fn test_lone_modifier_without_suppression_is_held_but_unnamed() {
        let mut held = HeldKeys::new();
        let options = NormalizerOptions {
            suppress_modifier_alone: false,
            ..NormalizerOptions::default()
        };
        let ctrl = Modifiers::new().with_ctrl(true);

        let event = key(KeyCode::LEFT_CTRL, KeyState::Pressed, ctrl);
        assert_eq!(normalize(&event, &mut held, &options, false), None);
        assert!(held.contains(KeyCode::LEFT_CTRL));

        // Ctrl+C даёт ровно одну запись "Ctrl + C"
        let event = key(KeyCode(46), KeyState::Pressed, ctrl);
        let token = normalize(&event, &mut held, &options, false);
        assert_eq!(token.as_ref().map(DisplayToken::as_str), Some("Ctrl + C"));
    }

    #[test]
    fn test_numpad_digits() {
        let mut held = HeldKeys::new();
        assert_eq!(run(key(KeyCode(79), KeyState::Pressed, Modifiers::new()), &mut held).as_deref(), Some("1"));
        assert_eq!(run(key(KeyCode(78), KeyState::Pressed, Modifiers::new()), &mut held).as_deref(), Some("+"));
    }

    #[test]
    fn test_shifted_digit_uses_symbol() {
        let mut held = HeldKeys::new();
        let token = run(key(KEY_1, KeyState::Pressed, Modifiers::new().with_shift(true)), &mut held);
        assert_eq!(token.as_deref(), Some("Shift + !"));
    }

    #[test]
    fn test_unnamed_key_produces_nothing_but_is_held() {
        let mut held = HeldKeys::new();
        assert_eq!(run(key(KEY_UNKNOWN, KeyState::Pressed, Modifiers::new()), &mut held), None);
        assert!(held.contains(KEY_UNKNOWN));
    }

    #[test]
    fn test_sensitive_field_marks_held_without_token() {
        let mut held = HeldKeys::new();
        let options = NormalizerOptions::default();

        let down = key(KEY_A, KeyState::Pressed, Modifiers::new());
        assert_eq!(normalize(&down, &mut held, &options, true), None);
        assert!(held.contains(KEY_A));

        let up = key(KEY_A, KeyState::Released, Modifiers::new());
        assert_eq!(normalize(&up, &mut held, &options, true), None);
        assert!(held.is_empty());
    }

    #[test]
    fn test_mouse_tokens() {
        let mut held = HeldKeys::new();
        let click = RawEvent::Mouse(MouseEvent::click(MouseButton::Right, Modifiers::new()));
        assert_eq!(run(click, &mut held).as_deref(), Some("Right Click"));

        let side = RawEvent::Mouse(MouseEvent::click(MouseButton::Other, Modifiers::new()));
        assert_eq!(run(side, &mut held).as_deref(), Some("Mouse Button"));

        let up = RawEvent::Mouse(MouseEvent::wheel(1, Modifiers::new().with_ctrl(true)));
        assert_eq!(run(up, &mut held).as_deref(), Some("Ctrl + Scroll Up"));

        let down = RawEvent::Mouse(MouseEvent::wheel(-120, Modifiers::new()));
        assert_eq!(run(down, &mut held).as_deref(), Some("Scroll Down"));

        let zero = RawEvent::Mouse(MouseEvent::wheel(0, Modifiers::new()));
        assert_eq!(run(zero, &mut held), None);
    }

    #[test]
    fn test_mouse_ignored_when_disabled() {
        let mut held = HeldKeys::new();
        let options = NormalizerOptions {
            show_mouse_clicks: false,
            ..NormalizerOptions::default()
        };
        let click = RawEvent::Mouse(MouseEvent::click(MouseButton::Left, Modifiers::new()));
        assert_eq!(normalize(&click, &mut held, &options, false), None);
    }

    #[test]
    fn test_held_keys_set_semantics() {
        let mut held = HeldKeys::new();
        assert!(held.insert(KEY_A));
        assert!(!held.insert(KEY_A));
        assert_eq!(held.len(), 1);
        assert!(held.remove(KEY_A));
        assert!(!held.remove(KEY_A));
    }
}
