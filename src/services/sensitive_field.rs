use crate::config::InputConfig;
use crate::events::WindowInfo;
use std::sync::Arc;

/// Sensitive-field detector: без состояния, опрашивается на каждое нажатие
pub trait SensitiveFieldDetector: Send + Sync {
    fn is_sensitive(&self, focused: Option<&WindowInfo>) -> bool;
}

/// Эвристика по заголовку активного окна ("password", "login", "sign in")
#[derive(Debug, Clone)]
pub struct TitleKeywordDetector {
    keywords_lower: Vec<String>,
}

impl TitleKeywordDetector {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords_lower: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }
}

impl SensitiveFieldDetector for TitleKeywordDetector {
    fn is_sensitive(&self, focused: Option<&WindowInfo>) -> bool {
        let Some(window) = focused else {
            return false;
        };
        let title = window.title.to_lowercase();
        self.keywords_lower.iter().any(|k| title.contains(k))
    }
}

/// Защита отключена
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSensitive;

impl SensitiveFieldDetector for NeverSensitive {
    fn is_sensitive(&self, _focused: Option<&WindowInfo>) -> bool {
        false
    }
}

pub fn create_sensitive_field_detector(config: &InputConfig) -> Arc<dyn SensitiveFieldDetector> {
    if config.password_guard {
        Arc::new(TitleKeywordDetector::new(&config.sensitive_title_keywords))
    } else {
        Arc::new(NeverSensitive)
    }
}
