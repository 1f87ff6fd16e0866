use crate::events::{KeyCode, ModifierKind, Modifiers};

/// Состояние модификаторов, восстановленное из потока событий клавиатуры.
/// evdev не даёт асинхронно спросить состояние клавиш, поэтому ведём его сами.
/// Левые и правые клавиши учитываются раздельно.
#[derive(Debug, Default)]
pub struct ModifierState {
    left: Modifiers,
    right: Modifiers,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_modifiers(&self) -> Modifiers {
        Modifiers::new()
            .with_ctrl(self.left.ctrl || self.right.ctrl)
            .with_alt(self.left.alt || self.right.alt)
            .with_shift(self.left.shift || self.right.shift)
            .with_super(self.left.super_key || self.right.super_key)
    }

    /// Возвращает true, если клавиша - модификатор
    pub fn update_key(&mut self, key: KeyCode, down: bool) -> bool {
        let Some(kind) = key.modifier_kind() else {
            return false;
        };

        let side = match key {
            KeyCode::RIGHT_CTRL | KeyCode::RIGHT_ALT | KeyCode::RIGHT_SHIFT | KeyCode::RIGHT_META => {
                &mut self.right
            }
            _ => &mut self.left,
        };

        match kind {
            ModifierKind::Ctrl => side.ctrl = down,
            ModifierKind::Alt => side.alt = down,
            ModifierKind::Shift => side.shift = down,
            ModifierKind::Win => side.super_key = down,
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
