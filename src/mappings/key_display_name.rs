use crate::events::KeyCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Отображаемые имена клавиш для оверлея.
/// Сначала таблица специальных клавиш, затем печатный символ в верхнем регистре.
pub struct KeyDisplayName;

// Специальные клавиши (evdev коды)
static SPECIAL_KEYS: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(14, "Backspace"); // KEY_BACKSPACE
    map.insert(15, "Tab");       // KEY_TAB
    map.insert(28, "Enter");     // KEY_ENTER
    map.insert(96, "Enter");     // KEY_KPENTER
    map.insert(57, "Space");     // KEY_SPACE
    map.insert(1, "Esc");        // KEY_ESC
    map.insert(104, "PgUp");     // KEY_PAGEUP
    map.insert(109, "PgDn");     // KEY_PAGEDOWN
    map.insert(107, "End");      // KEY_END
    map.insert(102, "Home");     // KEY_HOME
    map.insert(105, "←");        // KEY_LEFT
    map.insert(103, "↑");        // KEY_UP
    map.insert(106, "→");        // KEY_RIGHT
    map.insert(108, "↓");        // KEY_DOWN
    map.insert(110, "Ins");      // KEY_INSERT
    map.insert(111, "Del");      // KEY_DELETE
    map.insert(69, "NumLock");   // KEY_NUMLOCK
    map.insert(70, "ScrollLock"); // KEY_SCROLLLOCK
    map.insert(58, "CapsLock");  // KEY_CAPSLOCK

    // Функциональные клавиши
    map.insert(59, "F1");
    map.insert(60, "F2");
    map.insert(61, "F3");
    map.insert(62, "F4");
    map.insert(63, "F5");
    map.insert(64, "F6");
    map.insert(65, "F7");
    map.insert(66, "F8");
    map.insert(67, "F9");
    map.insert(68, "F10");
    map.insert(87, "F11");
    map.insert(88, "F12");

    map
});

// Печатные клавиши US-раскладки: (обычный символ, символ с Shift)
static PRINTABLE_KEYS: Lazy<HashMap<u16, (char, char)>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Буквенные клавиши
    for (code, c) in [
        (16, 'q'), (17, 'w'), (18, 'e'), (19, 'r'), (20, 't'),
        (21, 'y'), (22, 'u'), (23, 'i'), (24, 'o'), (25, 'p'),
        (30, 'a'), (31, 's'), (32, 'd'), (33, 'f'), (34, 'g'),
        (35, 'h'), (36, 'j'), (37, 'k'), (38, 'l'),
        (44, 'z'), (45, 'x'), (46, 'c'), (47, 'v'), (48, 'b'),
        (49, 'n'), (50, 'm'),
    ] {
        map.insert(code, (c, c.to_ascii_uppercase()));
    }

    // Цифровые клавиши (верхний ряд)
    map.insert(2, ('1', '!'));
    map.insert(3, ('2', '@'));
    map.insert(4, ('3', '#'));
    map.insert(5, ('4', '$'));
    map.insert(6, ('5', '%'));
    map.insert(7, ('6', '^'));
    map.insert(8, ('7', '&'));
    map.insert(9, ('8', '*'));
    map.insert(10, ('9', '('));
    map.insert(11, ('0', ')'));

    // Знаки препинания
    map.insert(12, ('-', '_'));
    map.insert(13, ('=', '+'));
    map.insert(26, ('[', '{'));
    map.insert(27, (']', '}'));
    map.insert(39, (';', ':'));
    map.insert(40, ('\'', '"'));
    map.insert(41, ('`', '~'));
    map.insert(43, ('\\', '|'));
    map.insert(51, (',', '<'));
    map.insert(52, ('.', '>'));
    map.insert(53, ('/', '?'));

    // Цифровой блок (NumLock включён)
    for (code, c) in [
        (82, '0'), (79, '1'), (80, '2'), (81, '3'), (75, '4'),
        (76, '5'), (77, '6'), (71, '7'), (72, '8'), (73, '9'),
        (55, '*'), (74, '-'), (78, '+'), (83, '.'), (98, '/'),
    ] {
        map.insert(code, (c, c));
    }

    map
});

impl KeyDisplayName {
    /// Имя клавиши для отображения или None, если клавиша не отображается
    pub fn resolve(key_code: KeyCode, shift_pressed: bool) -> Option<String> {
        if let Some(name) = SPECIAL_KEYS.get(&key_code.value()) {
            return Some((*name).to_string());
        }

        PRINTABLE_KEYS.get(&key_code.value()).map(|(plain, shifted)| {
            let c = if shift_pressed { *shifted } else { *plain };
            c.to_ascii_uppercase().to_string()
        })
    }
}
