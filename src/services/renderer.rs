use crate::config::{RenderConfig, TextAlignment};
use crate::error::Result;
use parking_lot::Mutex;
use tracing::info;

/// Стиль оверлея: рендерер получает его вместе со снимком истории
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub font_name: String,
    pub font_size: u32,
    pub font_color: u32,
    pub background_color: u32,
    pub show_background: bool,
    pub background_opacity: f32,
    pub alignment: TextAlignment,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

impl From<&RenderConfig> for RenderStyle {
    fn from(config: &RenderConfig) -> Self {
        Self {
            font_name: config.font_name.clone(),
            font_size: config.font_size,
            font_color: config.font_color,
            background_color: config.background_color,
            show_background: config.show_background,
            background_opacity: config.background_opacity.clamp(0.0, 1.0),
            alignment: config.alignment,
        }
    }
}

/// Кадр для отрисовки: упорядоченные строки истории (только чтение) и стиль
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub lines: Vec<String>,
    pub style: RenderStyle,
}

impl OverlayFrame {
    pub fn new(lines: Vec<String>, style: RenderStyle) -> Self {
        Self { lines, style }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Строки, выровненные до общей ширины (в символах) согласно alignment
    pub fn layout(&self) -> Vec<String> {
        let width = self
            .lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        self.lines
            .iter()
            .map(|line| {
                let pad = width - line.chars().count();
                match self.style.alignment {
                    TextAlignment::Left => format!("{}{}", line, " ".repeat(pad)),
                    TextAlignment::Right => format!("{}{}", " ".repeat(pad), line),
                    TextAlignment::Center => {
                        let left = pad / 2;
                        format!("{}{}{}", " ".repeat(left), line, " ".repeat(pad - left))
                    }
                }
            })
            .collect()
    }
}

pub trait Renderer: Send + Sync {
    fn render(&self, frame: &OverlayFrame) -> Result<()>;
}

/// Рендерер для демона без графики: пишет кадр в лог, только если он изменился
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_lines: Mutex<Option<Vec<String>>>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// true, если кадр отличается от предыдущего отрисованного
    fn remember(&self, frame: &OverlayFrame) -> bool {
        let mut last = self.last_lines.lock();
        if last.as_ref() == Some(&frame.lines) {
            return false;
        }
        *last = Some(frame.lines.clone());
        true
    }
}

impl Renderer for LogRenderer {
    fn render(&self, frame: &OverlayFrame) -> Result<()> {
        if !self.remember(frame) {
            return Ok(());
        }

        if frame.is_empty() {
            info!("[OVERLAY] (пусто)");
            return Ok(());
        }

        let rows = frame.layout();
        info!("[OVERLAY] {}", rows.iter().map(|r| format!("|{}|", r)).collect::<Vec<_>>().join(" "));
        Ok(())
    }
}
