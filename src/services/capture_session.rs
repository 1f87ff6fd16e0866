//! Сессия захвата: единственный владелец удерживаемых клавиш и истории.
//!
//! Потоки ввода вызывают [`CaptureSession::handle_event`], тикер оверлея вызывает
//! [`CaptureSession::tick`]. Оба берут один мьютекс на одну операцию и не держат
//! его во время запросов окна и отрисовки.

use crate::config::Config;
use crate::debug_if_enabled;
use crate::events::RawEvent;
use crate::services::history::{AddOutcome, HistoryAggregator, HistoryEntry, HistorySettings};
use crate::services::normalizer::{normalize, HeldKeys, NormalizerOptions};
use crate::services::sensitive_field::{create_sensitive_field_detector, SensitiveFieldDetector};
use crate::services::source_registry::SourceResolver;
use crate::services::target_matcher::{TargetMatcher, TargetSpec};
use crate::services::window_context::FocusedWindowProvider;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub normalizer: NormalizerOptions,
    pub target: TargetSpec,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            normalizer: NormalizerOptions::from(&config.input),
            target: TargetSpec::from(&config.target),
        }
    }
}

struct SessionState {
    aggregator: HistoryAggregator,
    held: HeldKeys,
}

pub struct CaptureSession {
    state: Mutex<SessionState>,
    settings: RwLock<SessionSettings>,
    sensitive: RwLock<Arc<dyn SensitiveFieldDetector>>,
    capturing: AtomicBool,
    matcher: TargetMatcher,
    windows: Arc<dyn FocusedWindowProvider>,
}

impl CaptureSession {
    pub fn new(
        config: &Config,
        resolver: Arc<dyn SourceResolver>,
        windows: Arc<dyn FocusedWindowProvider>,
    ) -> Self {
        Self {
            state: Mutex::new(SessionState {
                aggregator: HistoryAggregator::new(HistorySettings::from(&config.history)),
                held: HeldKeys::new(),
            }),
            settings: RwLock::new(SessionSettings::from(config)),
            sensitive: RwLock::new(create_sensitive_field_detector(&config.input)),
            capturing: AtomicBool::new(false),
            matcher: TargetMatcher::new(resolver),
            windows,
        }
    }

    /// Заменить детектор полей ввода пароля
    pub fn with_sensitive_detector(self, detector: Arc<dyn SensitiveFieldDetector>) -> Self {
        *self.sensitive.write() = detector;
        self
    }

    pub fn start_capture(&self) {
        if !self.capturing.swap(true, Ordering::SeqCst) {
            info!("Захват ввода запущен");
        }
    }

    /// Остановить захват; удерживаемые клавиши сбрасываются, история остаётся
    pub fn stop_capture(&self) {
        if self.capturing.swap(false, Ordering::SeqCst) {
            self.state.lock().held.clear();
            info!("Захват ввода остановлен");
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings.read().clone()
    }

    /// Обработать сырое событие. Возвращает результат добавления, если появился токен.
    ///
    /// Отпускание клавиши обрабатывается всегда, даже когда фильтр окна запрещает захват.
    pub fn handle_event(&self, event: &RawEvent, now: Instant) -> Option<AddOutcome> {
        if !self.is_capturing() {
            return None;
        }

        if let RawEvent::Key(key) = event {
            if !key.state.is_down() {
                self.state.lock().held.remove(key.key_code);
                return None;
            }
        }

        let settings = self.settings.read().clone();
        let focused = self.windows.focused_window();

        if !self.matcher.should_capture(&settings.target, focused.as_ref()) {
            return None;
        }

        let sensitive = self.sensitive.read().is_sensitive(focused.as_ref());

        let mut state = self.state.lock();
        let SessionState { aggregator, held } = &mut *state;
        let token = normalize(event, held, &settings.normalizer, sensitive)?;
        Some(aggregator.add_token(token.as_str(), now))
    }

    /// Добавить готовый токен напрямую, минуя нормализацию и фильтр
    pub fn add_token(&self, token: &str, now: Instant) -> AddOutcome {
        self.state.lock().aggregator.add_token(token, now)
    }

    /// Периодический тик: удалить устаревшие записи и вернуть копию для отрисовки
    pub fn tick(&self, now: Instant) -> Vec<String> {
        let mut state = self.state.lock();
        let removed = state.aggregator.sweep(now);
        if removed > 0 {
            debug_if_enabled!("Удалено устаревших записей: {}", removed);
        }
        state.aggregator.snapshot()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.state.lock().aggregator.snapshot()
    }

    /// Восстановить запись ("Left Click x2") как самую новую
    pub fn seed(&self, text: &str, now: Instant) {
        self.state.lock().aggregator.seed(HistoryEntry::from_text(text, now));
    }

    pub fn clear_history(&self) {
        self.state.lock().aggregator.clear();
    }

    pub fn held_key_count(&self) -> usize {
        self.state.lock().held.len()
    }

    /// Применить новую конфигурацию во время работы
    pub fn apply_config(&self, config: &Config) {
        *self.settings.write() = SessionSettings::from(config);
        *self.sensitive.write() = create_sensitive_field_detector(&config.input);

        let removed = self
            .state
            .lock()
            .aggregator
            .apply_settings(HistorySettings::from(&config.history));

        info!(
            "Конфигурация применена: max_entries={}, newest_first={}, режим фильтра {:?}, удалено записей: {}",
            config.history.max_entries, config.history.newest_first, config.target.mode, removed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetMode;
    use crate::events::{KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, WindowInfo};
    use crate::services::source_registry::SourceRegistry;
    use crate::services::window_context::WindowContext;
    use std::time::Duration;

    const KEY_A: KeyCode = KeyCode(30);
    const KEY_X: KeyCode = KeyCode(45);

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn session(config: &Config) -> (CaptureSession, Arc<WindowContext>) {
        let windows = Arc::new(WindowContext::new());
        let session = CaptureSession::new(config, Arc::new(SourceRegistry::new()), windows.clone());
        session.start_capture();
        (session, windows)
    }

    fn press(code: KeyCode, modifiers: Modifiers) -> RawEvent {
        KeyEvent::press(code, modifiers).into()
    }

    fn release(code: KeyCode, modifiers: Modifiers) -> RawEvent {
        KeyEvent::release(code, modifiers).into()
    }

    fn tap(session: &CaptureSession, code: KeyCode, modifiers: Modifiers, now: Instant) {
        session.handle_event(&press(code, modifiers), now);
        session.handle_event(&release(code, modifiers), now);
    }

    #[test]
    fn test_lone_ctrl_produces_no_entries() {
        let (session, _) = session(&Config::default());
        let now = Instant::now();
        let ctrl = Modifiers::new().with_ctrl(true);

        assert_eq!(session.handle_event(&press(KeyCode::LEFT_CTRL, ctrl), now), None);
        assert_eq!(session.handle_event(&release(KeyCode::LEFT_CTRL, Modifiers::new()), now), None);

        assert!(session.snapshot().is_empty());
        assert_eq!(session.held_key_count(), 0);
    }

    #[test]
    fn test_repeated_taps_collapse() {
        let (session, _) = session(&Config::default());
        let start = Instant::now();

        for i in 0..3 {
            tap(&session, KEY_A, Modifiers::new(), start + ms(300 * i));
        }

        assert_eq!(session.snapshot(), vec!["A x3"]);
    }

    #[test]
    fn test_auto_repeat_of_held_key_ignored() {
        let (session, _) = session(&Config::default());
        let now = Instant::now();

        session.handle_event(&press(KEY_A, Modifiers::new()), now);
        session.handle_event(&press(KEY_A, Modifiers::new()), now + ms(30));

        assert_eq!(session.snapshot(), vec!["A"]);
    }

    #[test]
    fn test_target_gate_denies_but_releases_keys() {
        let mut config = Config::default();
        config.target.mode = TargetMode::TitleSubstring;
        config.target.title_substring = "notepad".to_string();
        let (session, windows) = session(&config);
        let now = Instant::now();

        windows.update(Some(WindowInfo::new("untitled - Notepad".to_string())));
        session.handle_event(&press(KEY_A, Modifiers::new()), now);
        assert_eq!(session.held_key_count(), 1);

        windows.update(Some(WindowInfo::new("Calculator".to_string())));
        session.handle_event(&release(KEY_A, Modifiers::new()), now);
        assert_eq!(session.held_key_count(), 0);

        tap(&session, KEY_X, Modifiers::new(), now + ms(2000));
        assert_eq!(session.snapshot(), vec!["A"]);
    }

    #[test]
    fn test_no_window_denies_title_mode() {
        let mut config = Config::default();
        config.target.mode = TargetMode::TitleSubstring;
        let (session, _) = session(&config);

        tap(&session, KEY_A, Modifiers::new(), Instant::now());
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn test_password_window_suppresses_tokens() {
        let (session, windows) = session(&Config::default());
        let now = Instant::now();

        windows.update(Some(WindowInfo::new("Sign in - Bank".to_string())));
        tap(&session, KEY_A, Modifiers::new(), now);
        assert!(session.snapshot().is_empty());
        assert_eq!(session.held_key_count(), 0);

        windows.update(Some(WindowInfo::new("Terminal".to_string())));
        tap(&session, KEY_A, Modifiers::new(), now + ms(100));
        assert_eq!(session.snapshot(), vec!["A"]);
    }

    #[test]
    fn test_mouse_click_recorded() {
        let (session, _) = session(&Config::default());
        let click: RawEvent = MouseEvent::click(MouseButton::Left, Modifiers::new()).into();

        session.handle_event(&click, Instant::now());
        assert_eq!(session.snapshot(), vec!["Left Click"]);
    }

    #[test]
    fn test_stopped_session_ignores_input() {
        let (session, _) = session(&Config::default());
        let now = Instant::now();

        session.handle_event(&press(KEY_A, Modifiers::new()), now);
        session.stop_capture();
        assert_eq!(session.held_key_count(), 0);

        tap(&session, KEY_X, Modifiers::new(), now + ms(2000));
        assert_eq!(session.snapshot(), vec!["A"]);
    }

    #[test]
    fn test_tick_sweeps_expired_entries() {
        let (session, _) = session(&Config::default());
        let start = Instant::now();

        tap(&session, KEY_A, Modifiers::new(), start);
        assert_eq!(session.tick(start + ms(2900)), vec!["A"]);
        assert!(session.tick(start + ms(3100)).is_empty());
    }

    #[test]
    fn test_apply_config_truncates_and_reorders() {
        let (session, _) = session(&Config::default());
        let start = Instant::now();

        for (i, code) in [KEY_A, KEY_X, KeyCode(48)].iter().enumerate() {
            tap(&session, *code, Modifiers::new(), start + ms(1500 * i as u64));
        }
        assert_eq!(session.snapshot(), vec!["A", "X", "B"]);

        let mut config = Config::default();
        config.history.max_entries = 2;
        config.history.newest_first = true;
        session.apply_config(&config);

        assert_eq!(session.snapshot(), vec!["B", "X"]);
    }

    #[test]
    fn test_seeded_entry_continues() {
        let (session, _) = session(&Config::default());
        let now = Instant::now();

        session.seed("Left Click x2", now);
        session.handle_event(
            &MouseEvent::click(MouseButton::Left, Modifiers::new()).into(),
            now + ms(100),
        );

        assert_eq!(session.snapshot(), vec!["Left Click x3"]);
    }
}
