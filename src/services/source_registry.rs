use crate::config::SourceConfig;
use crate::error::{KeystrokeError, Result};
use crate::ksh_error;
use dashmap::DashMap;
use tracing::{debug, info};

pub const MONITOR_CAPTURE: &str = "monitor_capture";
pub const WINDOW_CAPTURE: &str = "window_capture";
pub const GAME_CAPTURE: &str = "game_capture";

/// Разрешённый источник захвата: с чем сравнивать активное окно
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    Monitor {
        index: i32,
    },
    Window {
        title: String,
        class: String,
        executable: String,
    },
    Game {
        executable: String,
        capture_mode: Option<String>,
    },
}

/// Source resolver: имя источника -> тип и параметры
pub trait SourceResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<ResolvedSource>;
}

/// Реестр источников захвата, объявленных в конфигурации.
/// Может пополняться во время работы.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: DashMap<String, SourceConfig>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(sources: &[SourceConfig]) -> Self {
        let registry = Self::new();
        for source in sources {
            registry.register(source.clone());
        }
        info!("Зарегистрировано {} источников захвата", registry.len());
        registry
    }

    /// Зарегистрировать источник; возвращает предыдущее описание с тем же именем
    pub fn register(&self, source: SourceConfig) -> Option<SourceConfig> {
        debug!("Регистрация источника '{}' ({})", source.name, source.kind);
        self.sources.insert(source.name.clone(), source)
    }

    /// Привести реестр к списку из конфигурации: новые и изменённые записать,
    /// исчезнувшие удалить. Возвращает число удалённых источников
    pub fn sync(&self, sources: &[SourceConfig]) -> usize {
        let before = self.len();
        self.sources
            .retain(|name, _| sources.iter().any(|source| source.name == *name));
        let removed = before - self.len();

        for source in sources {
            self.register(source.clone());
        }

        info!(
            "Реестр источников обновлён: {} источников, удалено {}",
            self.len(),
            removed
        );
        removed
    }

    pub fn remove(&self, name: &str) -> Option<SourceConfig> {
        self.sources.remove(name).map(|(_, source)| source)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }
}

impl SourceResolver for SourceRegistry {
    fn resolve(&self, name: &str) -> Result<ResolvedSource> {
        let source = self
            .sources
            .get(name)
            .ok_or_else(|| ksh_error!(source_not_found, "'{}'", name))?;

        resolve_descriptor(source.value())
    }
}

/// Разобрать описание источника в форму для сравнения
pub fn resolve_descriptor(source: &SourceConfig) -> Result<ResolvedSource> {
    match source.kind.as_str() {
        MONITOR_CAPTURE => {
            let index = source.monitor.ok_or_else(|| {
                ksh_error!(invalid_source, "'{}': не указан индекс монитора", source.name)
            })?;
            Ok(ResolvedSource::Monitor { index })
        }
        WINDOW_CAPTURE => {
            let window = window_descriptor(source)?;
            let (title, class, executable) = split_window_triple(window);
            Ok(ResolvedSource::Window {
                title: title.to_string(),
                class: class.to_string(),
                executable: executable.to_string(),
            })
        }
        GAME_CAPTURE => {
            let window = window_descriptor(source)?;
            let executable = match window.rfind(':') {
                Some(pos) => &window[pos + 1..],
                None => "",
            };
            if executable.is_empty() {
                return Err(ksh_error!(
                    invalid_source,
                    "'{}': в '{}' нет имени исполняемого файла",
                    source.name,
                    window
                ));
            }
            Ok(ResolvedSource::Game {
                executable: executable.to_string(),
                capture_mode: source.capture_mode.clone(),
            })
        }
        other => Err(KeystrokeError::UnsupportedSource {
            name: source.name.clone(),
            kind: other.to_string(),
        }),
    }
}

fn window_descriptor(source: &SourceConfig) -> Result<&str> {
    source
        .window
        .as_deref()
        .filter(|w| !w.is_empty())
        .ok_or_else(|| ksh_error!(invalid_source, "'{}': не указано окно", source.name))
}

/// "title:class:exe" -> (title, class, exe). Заголовок - до первого ':', exe - после последнего
fn split_window_triple(window: &str) -> (&str, &str, &str) {
    match (window.find(':'), window.rfind(':')) {
        (Some(first), Some(last)) if first < last => {
            (&window[..first], &window[first + 1..last], &window[last + 1..])
        }
        (Some(first), Some(_)) => (&window[..first], "", &window[first + 1..]),
        _ => (window, "", ""),
    }
}
