use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Информация об окне
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub title: String,
    pub class: String,
    pub pid: Option<u32>,
    /// Имя исполняемого файла процесса-владельца (без пути)
    pub executable: Option<String>,
    /// Индекс монитора, на котором находится окно
    pub monitor: Option<i32>,
    pub geometry: Option<WindowGeometry>,
}

impl WindowInfo {
    pub fn new(title: String) -> Self {
        Self {
            title,
            class: String::new(),
            pid: None,
            executable: None,
            monitor: None,
            geometry: None,
        }
    }

    pub fn with_class(mut self, class: String) -> Self {
        self.class = class;
        self
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_executable(mut self, executable: String) -> Self {
        self.executable = Some(executable);
        self
    }

    pub fn with_monitor(mut self, monitor: i32) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn with_geometry(mut self, geometry: WindowGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Заголовок содержит подстроку (регистронезависимо). Пустая подстрока совпадает всегда
    pub fn title_contains(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_empty() {
            write!(f, "\"{}\"", self.title)
        } else {
            write!(f, "\"{}\" ({})", self.title, self.class)
        }
    }
}

/// Геометрия окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }
}

/// Событие смены активного окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    pub window: Option<WindowInfo>,
    pub timestamp: Instant,
}

impl WindowEvent {
    pub fn focus_changed(window: Option<WindowInfo>) -> Self {
        Self {
            window,
            timestamp: Instant::now(),
        }
    }
}

impl fmt::Display for WindowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.window {
            Some(window) => write!(
                f,
                "FocusChanged: {} ({}ms ago)",
                window,
                self.timestamp.elapsed().as_millis()
            ),
            None => write!(f, "FocusChanged: <нет окна>"),
        }
    }
}
