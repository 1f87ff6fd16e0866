use crate::error::{KeystrokeError, Result};
use crate::ksh_error;
use evdev::{Device, KeyCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Какой тип устройства ввода ищем
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
}

impl DeviceKind {
    fn label(&self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "клавиатура",
            DeviceKind::Mouse => "мышь",
        }
    }

    /// Суффикс ссылки в /dev/input/by-id
    fn by_id_suffix(&self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "event-kbd",
            DeviceKind::Mouse => "event-mouse",
        }
    }

    /// Проверка по имени устройства (нижний регистр)
    fn name_allowed(&self, name: &str) -> bool {
        let pointer = ["mouse", "touchpad", "trackpoint", "deathadder"]
            .iter()
            .any(|n| name.contains(n));
        match self {
            DeviceKind::Keyboard => !pointer,
            DeviceKind::Mouse => !name.contains("keyboard") || pointer,
        }
    }
}

pub struct DeviceFinder;

impl DeviceFinder {
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        Self::find_device(device_path, DeviceKind::Keyboard)
    }

    pub fn find_mouse_device(device_path: &str) -> Result<PathBuf> {
        Self::find_device(device_path, DeviceKind::Mouse)
    }

    /// "auto" - автопоиск, иначе путь должен существовать
    pub fn find_device(device_path: &str, kind: DeviceKind) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство ({}): {:?}", kind.label(), path);
                Ok(path)
            } else {
                KeystrokeError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Автопоиск устройства: {}", kind.label());

        if let Ok(device) = Self::find_by_id(kind) {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices(kind) {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        KeystrokeError::device_not_found(format!(
            "Не удалось найти устройство ({}). Убедитесь, что пользователь добавлен в группу 'input'",
            kind.label()
        ))
    }

    fn find_by_id(kind: DeviceKind) -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return KeystrokeError::device_not_found("Директория by-id не найдена");
        }

        let entries = fs::read_dir(by_id_dir)
            .map_err(|e| ksh_error!(permission, "Нет доступа к /dev/input/by-id: {}", e))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if !name.ends_with(kind.by_id_suffix()) {
                continue;
            }

            if !Self::is_device_accessible(&path) {
                warn!("Устройство {:?} недоступно", path);
                continue;
            }

            if Self::matches_kind(&path, kind) {
                candidates.push(path);
            }
        }

        candidates.sort();
        candidates
            .into_iter()
            .next()
            .ok_or_else(|| ksh_error!(device_not_found, "{} не найдена в by-id", kind.label()))
    }

    fn find_by_event_devices(kind: DeviceKind) -> Result<PathBuf> {
        let entries = fs::read_dir("/dev/input")
            .map_err(|e| ksh_error!(permission, "Нет доступа к /dev/input: {}", e))?;

        let mut event_devices = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("event"))
            {
                event_devices.push(path);
            }
        }

        // event2 раньше event10
        event_devices.sort_by_key(|p| event_index(p));

        for path in event_devices {
            debug!("Проверяем устройство: {:?}", path);
            if Self::is_device_accessible(&path) && Self::matches_kind(&path, kind) {
                return Ok(path);
            }
        }

        KeystrokeError::device_not_found(format!(
            "Не найдено доступное устройство ({}) среди event устройств",
            kind.label()
        ))
    }

    fn matches_kind(path: &Path, kind: DeviceKind) -> bool {
        let device = match Device::open(path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", path, e);
                return false;
            }
        };

        let name = device.name().unwrap_or("Unknown").to_lowercase();
        if !kind.name_allowed(&name) {
            debug!("Устройство {:?} ({}) исключено по имени", path, name);
            return false;
        }

        let matches = device.supported_keys().is_some_and(|keys| match kind {
            DeviceKind::Keyboard => {
                keys.contains(KeyCode::KEY_A)
                    && keys.contains(KeyCode::KEY_SPACE)
                    && keys.contains(KeyCode::KEY_ENTER)
                    && keys.iter().count() > 20
            }
            DeviceKind::Mouse => keys.contains(KeyCode::BTN_LEFT),
        });

        if matches {
            info!("Устройство {:?} ({}) подходит: {}", path, name, kind.label());
        }
        matches
    }

    fn is_device_accessible(device_path: &Path) -> bool {
        match fs::File::open(device_path) {
            Ok(_) => true,
            Err(e) => {
                debug!("Устройство {:?} недоступно: {}", device_path, e);
                false
            }
        }
    }
}

/// Номер устройства из имени eventN; нечисловые - в конец
fn event_index(path: &Path) -> u32 {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix("event"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_missing_path_is_error() {
        let result = DeviceFinder::find_keyboard_device("/non/existent/path");
        assert!(matches!(result, Err(KeystrokeError::DeviceNotFound(_))));
        assert!(DeviceFinder::find_mouse_device("/non/existent/mouse").is_err());
    }

    #[test]
    fn test_name_filters() {
        assert!(DeviceKind::Keyboard.name_allowed("at translated set 2 keyboard"));
        assert!(!DeviceKind::Keyboard.name_allowed("razer deathadder"));
        assert!(DeviceKind::Mouse.name_allowed("logitech usb optical mouse"));
        assert!(!DeviceKind::Mouse.name_allowed("at translated set 2 keyboard"));
    }

    #[test]
    fn test_event_index_ordering() {
        let mut paths = vec![
            PathBuf::from("/dev/input/event10"),
            PathBuf::from("/dev/input/event2"),
            PathBuf::from("/dev/input/eventX"),
        ];
        paths.sort_by_key(|p| event_index(p));
        assert_eq!(paths[0], PathBuf::from("/dev/input/event2"));
        assert_eq!(paths[2], PathBuf::from("/dev/input/eventX"));
    }
}
