use crate::events::{WindowEvent, WindowInfo};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Focused-window provider: the only thing the capture path asks about windows.
///
/// Implementations must be cheap to call on the input hot path; detection
/// itself happens elsewhere (see `window_detector`).
pub trait FocusedWindowProvider: Send + Sync {
    /// None - активного окна нет, захват (кроме режима AnyWindow) запрещается
    fn focused_window(&self) -> Option<WindowInfo>;
}

/// Кэш активного окна, который обновляет WindowDetector, а читает CaptureSession.
pub struct WindowContext {
    current: RwLock<Option<WindowInfo>>,
    generation: AtomicU64,
}

impl Default for WindowContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowContext {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Обновить активное окно; возвращает true, если окно действительно сменилось
    pub fn update(&self, window: Option<WindowInfo>) -> bool {
        let mut current = self.current.write();
        if *current == window {
            return false;
        }

        let event = WindowEvent::focus_changed(window.clone());
        info!("Активное окно изменено: {}", event);
        *current = window;
        self.generation.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Счётчик смен окна - для потребителей, которым нужна инвалидация
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    pub fn current_title(&self) -> Option<String> {
        self.current.read().as_ref().map(|w| w.title.clone())
    }
}

impl FocusedWindowProvider for WindowContext {
    fn focused_window(&self) -> Option<WindowInfo> {
        self.current.read().clone()
    }
}
