use crate::config::Config;
use crate::services::capture_session::CaptureSession;
use crate::services::renderer::RenderStyle;
use crate::services::source_registry::SourceRegistry;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Применение перечитанной конфигурации ко всем компонентам, которые её держат
pub struct ConfigReloader {
    session: Arc<CaptureSession>,
    registry: Arc<SourceRegistry>,
    style: Arc<RwLock<RenderStyle>>,
}

impl ConfigReloader {
    pub fn new(
        session: Arc<CaptureSession>,
        registry: Arc<SourceRegistry>,
        style: Arc<RwLock<RenderStyle>>,
    ) -> Self {
        Self {
            session,
            registry,
            style,
        }
    }

    /// Сначала реестр источников, затем сессия: фильтр сразу видит новые источники
    pub fn apply(&self, config: &Config) {
        self.registry.sync(&config.sources);
        *self.style.write() = RenderStyle::from(&config.render);
        self.session.apply_config(config);
    }

    /// Перечитывать конфигурацию по SIGHUP. Отклонённая конфигурация не применяется
    pub async fn run_on_sighup(self, config_path: PathBuf) {
        use tokio::signal::unix::{signal, SignalKind};

        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(hangup) => hangup,
            Err(e) => {
                warn!("Перезагрузка конфигурации по SIGHUP недоступна: {}", e);
                return;
            }
        };

        while hangup.recv().await.is_some() {
            info!("SIGHUP: перечитываем {}", config_path.display());
            match Config::load(&config_path) {
                Ok(config) => self.apply(&config),
                Err(e) => error!("Новая конфигурация отклонена: {:#}", e),
            }
        }
    }
}
