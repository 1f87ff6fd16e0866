use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub device_path: String,
    pub mouse_device_path: String,
    pub show_mouse_clicks: bool,
    pub suppress_modifier_alone: bool,
    pub password_guard: bool,
    pub sensitive_title_keywords: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "auto".to_string(),
            mouse_device_path: "auto".to_string(),
            show_mouse_clicks: true,
            suppress_modifier_alone: true,
            password_guard: true,
            sensitive_title_keywords: vec![
                "password".to_string(),
                "login".to_string(),
                "sign in".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_entries: usize,
    pub fade_duration_secs: f64,
    pub grouping_enabled: bool,
    pub group_duration_secs: f64,
    pub newest_first: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: 5,
            fade_duration_secs: 3.0,
            grouping_enabled: false,
            group_duration_secs: 0.5,
            newest_first: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    #[default]
    AnyWindow,
    TitleSubstring,
    SourceBound,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    pub mode: TargetMode,
    pub title_substring: String,
    pub source_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub polling_interval_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            polling_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub tick_interval_ms: u64,
    pub font_name: String,
    pub font_size: u32,
    pub font_color: u32,
    pub background_color: u32,
    pub show_background: bool,
    pub background_opacity: f32,
    pub alignment: TextAlignment,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 33,
            font_name: "Arial".to_string(),
            font_size: 24,
            font_color: 0xFFFF_FFFF,
            background_color: 0x0000_0000,
            show_background: true,
            background_opacity: 0.5,
            alignment: TextAlignment::Left,
        }
    }
}

/// Описание источника захвата (монитор, окно или игра)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    pub name: String,
    /// "monitor_capture" | "window_capture" | "game_capture"
    pub kind: String,
    #[serde(default)]
    pub monitor: Option<i32>,
    /// Формат "title:class:exe"
    #[serde(default)]
    pub window: Option<String>,
    #[serde(default)]
    pub capture_mode: Option<String>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("KSH_").split("__"));

        let config = Self::from_figment(figment)
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .context("Не удалось разобрать конфигурацию")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация истории
        if !(1..=20).contains(&self.history.max_entries) {
            anyhow::bail!(
                "max_entries должно быть в диапазоне 1..=20, получено {}",
                self.history.max_entries
            );
        }

        if !(0.0..=10.0).contains(&self.history.fade_duration_secs) {
            anyhow::bail!(
                "fade_duration_secs должно быть в диапазоне 0..=10, получено {}",
                self.history.fade_duration_secs
            );
        }

        if !(0.1..=2.0).contains(&self.history.group_duration_secs) {
            anyhow::bail!(
                "group_duration_secs должно быть в диапазоне 0.1..=2.0, получено {}",
                self.history.group_duration_secs
            );
        }

        // Валидация фильтра окон
        if self.target.mode == TargetMode::SourceBound && self.target.source_name.is_empty() {
            anyhow::bail!("Режим source_bound требует указать target.source_name");
        }

        if self.window.polling_interval_ms < 100 {
            anyhow::bail!("polling_interval_ms должно быть минимум 100");
        }

        // Валидация отрисовки
        if self.render.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms должно быть больше 0");
        }

        if !(8..=72).contains(&self.render.font_size) {
            anyhow::bail!("font_size должно быть в диапазоне 8..=72");
        }

        if !(0.0..=1.0).contains(&self.render.background_opacity) {
            anyhow::bail!("background_opacity должно быть в диапазоне 0..=1");
        }

        // Валидация источников
        let mut names = HashSet::new();
        for (i, source) in self.sources.iter().enumerate() {
            if source.name.is_empty() {
                anyhow::bail!("Пустое имя источника #{}", i + 1);
            }
            if !names.insert(source.name.as_str()) {
                anyhow::bail!("Повторяющееся имя источника: '{}'", source.name);
            }
        }

        Ok(())
    }
}
