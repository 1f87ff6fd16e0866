use crate::error::Result;
use crate::events::WindowInfo;
use crate::services::window_context::WindowContext;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use super::r#trait::WindowDetectorTrait;

/// Окна, которые по кругу "получают фокус" в dry-run режиме
fn fake_windows() -> Vec<WindowInfo> {
    vec![
        WindowInfo::new("Terminal - dry_run".to_string())
            .with_class("DryRun".to_string())
            .with_monitor(0),
        WindowInfo::new("untitled - Notepad - dry_run".to_string())
            .with_class("DryRun".to_string())
            .with_executable("notepad".to_string())
            .with_monitor(0),
        WindowInfo::new("Sign in - dry_run".to_string())
            .with_class("DryRun".to_string())
            .with_monitor(1),
        WindowInfo::new("Game - dry_run".to_string())
            .with_class("DryRun".to_string())
            .with_executable("game.x86_64".to_string())
            .with_monitor(1),
    ]
}

pub struct DryRunWindowDetector {
    context: Arc<WindowContext>,
    windows: Vec<WindowInfo>,
}

impl DryRunWindowDetector {
    pub fn new(context: Arc<WindowContext>) -> Self {
        Self {
            context,
            windows: fake_windows(),
        }
    }

    pub async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - WindowDetector работает в режиме эмуляции");

        let mut ticker = interval(Duration::from_secs(10));
        for window in self.windows.iter().cycle() {
            ticker.tick().await;
            info!("Dry-run: эмулируем смену окна на: {}", window.title);
            self.context.update(Some(window.clone()));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl WindowDetectorTrait for DryRunWindowDetector {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
