use crate::config::{TargetConfig, TargetMode};
use crate::debug_if_enabled;
use crate::events::WindowInfo;
use crate::services::source_registry::{ResolvedSource, SourceResolver};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Какое окно/источник должно быть активно, чтобы ввод попадал в историю
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSpec {
    pub mode: TargetMode,
    pub title_substring: String,
    pub source_name: Option<String>,
}

impl TargetSpec {
    pub fn any_window() -> Self {
        Self::default()
    }

    pub fn title_substring(substring: impl Into<String>) -> Self {
        Self {
            mode: TargetMode::TitleSubstring,
            title_substring: substring.into(),
            source_name: None,
        }
    }

    pub fn source_bound(source_name: impl Into<String>) -> Self {
        Self {
            mode: TargetMode::SourceBound,
            title_substring: String::new(),
            source_name: Some(source_name.into()),
        }
    }
}

impl From<&TargetConfig> for TargetSpec {
    fn from(config: &TargetConfig) -> Self {
        Self {
            mode: config.mode,
            title_substring: config.title_substring.clone(),
            source_name: Some(config.source_name.clone()).filter(|name| !name.is_empty()),
        }
    }
}

/// Target matcher: решает, нужно ли сейчас захватывать ввод.
/// Пишет в лог только смену окна или результата, а не каждое нажатие.
pub struct TargetMatcher {
    resolver: Arc<dyn SourceResolver>,
    last_decision: Mutex<Option<(String, bool)>>,
}

impl TargetMatcher {
    pub fn new(resolver: Arc<dyn SourceResolver>) -> Self {
        Self {
            resolver,
            last_decision: Mutex::new(None),
        }
    }

    pub fn should_capture(&self, spec: &TargetSpec, focused: Option<&WindowInfo>) -> bool {
        let decision = evaluate(spec, focused, self.resolver.as_ref());
        self.report(spec, focused, decision);
        decision
    }

    fn report(&self, spec: &TargetSpec, focused: Option<&WindowInfo>, decision: bool) {
        if spec.mode == TargetMode::AnyWindow {
            return;
        }

        let title = focused.map(|w| w.title.clone()).unwrap_or_default();
        let mut last = self.last_decision.lock();
        let changed = match last.as_ref() {
            Some((last_title, last_decision)) => *last_title != title || *last_decision != decision,
            None => true,
        };

        if changed {
            info!(
                "[FILTER] Окно: '{}' | Режим: {:?} | Совпадение: {}",
                title,
                spec.mode,
                if decision { "ДА" } else { "НЕТ" }
            );
            *last = Some((title, decision));
        }
    }
}

/// Чистая функция решения без побочных эффектов, кроме диагностики
pub fn evaluate(spec: &TargetSpec, focused: Option<&WindowInfo>, resolver: &dyn SourceResolver) -> bool {
    if spec.mode == TargetMode::AnyWindow {
        return true;
    }

    let Some(window) = focused else {
        debug_if_enabled!("[FILTER] Нет активного окна, захват запрещён");
        return false;
    };

    match spec.mode {
        TargetMode::AnyWindow => true,
        TargetMode::TitleSubstring => window.title_contains(&spec.title_substring),
        TargetMode::SourceBound => {
            let Some(name) = spec.source_name.as_deref() else {
                warn!("[FILTER] Выбран захват по источнику, но источник не указан");
                return false;
            };

            match resolver.resolve(name) {
                Ok(resolved) => matches_resolved(&resolved, window),
                Err(e) => {
                    warn!("[SOURCE-FILTER] Источник '{}' не разрешён: {}", name, e);
                    false
                }
            }
        }
    }
}

/// Сравнить активное окно с разрешённым источником
pub fn matches_resolved(resolved: &ResolvedSource, window: &WindowInfo) -> bool {
    let matches = match resolved {
        ResolvedSource::Monitor { index } => window.monitor == Some(*index),
        ResolvedSource::Window { title, .. } => {
            let current = window.title.to_lowercase();
            let target = title.to_lowercase();
            // Пустой заголовок содержится в любой строке - не считаем совпадением
            !current.is_empty() && (current.contains(&target) || target.contains(&current))
        }
        ResolvedSource::Game { executable, .. } => match window.executable.as_deref() {
            Some(current) if !current.is_empty() && !executable.is_empty() => {
                current.to_lowercase().contains(&executable.to_lowercase())
            }
            _ => false,
        },
    };

    debug_if_enabled!(
        "[SOURCE-FILTER] {:?} против {} (монитор {:?}, exe {:?}): {}",
        resolved,
        window,
        window.monitor,
        window.executable,
        matches
    );
    matches
}
