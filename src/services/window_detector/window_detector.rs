use crate::config::Config;
use crate::error::Result;
use crate::events::WindowInfo;
use crate::ksh_error;
use crate::services::window_context::WindowContext;
use std::process::Command;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

use super::kdotool::KdotoolDetector;
use super::r#trait::WindowDetectorTrait;
use super::sway::SwayDetector;
use super::wmctrl::WmctrlDetector;
use super::xdotool::XdotoolDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DesktopEnvironment {
    Kde,
    Gnome,
    Sway,
    X11Generic,
    WaylandGeneric,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkingMethod {
    Kdotool,
    Xdotool,
    Wmctrl,
    Sway,
}

/// Порядок проверки утилит для среды
fn method_order(desktop_env: DesktopEnvironment) -> [WorkingMethod; 4] {
    use WorkingMethod::*;
    match desktop_env {
        DesktopEnvironment::Sway | DesktopEnvironment::WaylandGeneric => [Sway, Kdotool, Xdotool, Wmctrl],
        DesktopEnvironment::X11Generic | DesktopEnvironment::Gnome => [Xdotool, Wmctrl, Kdotool, Sway],
        DesktopEnvironment::Kde | DesktopEnvironment::Unknown => [Kdotool, Xdotool, Wmctrl, Sway],
    }
}

pub struct RealWindowDetector {
    context: Arc<WindowContext>,
    polling_interval: Duration,
    desktop_env: DesktopEnvironment,
    working_method: Option<WorkingMethod>,

    // Детекторы утилит
    kdotool: KdotoolDetector,
    xdotool: XdotoolDetector,
    wmctrl: WmctrlDetector,
    sway: SwayDetector,
}

impl RealWindowDetector {
    pub fn new(config: Arc<Config>, context: Arc<WindowContext>) -> Result<Self> {
        info!("Инициализация RealWindowDetector");

        let desktop_env = Self::detect_desktop_environment();
        info!("Обнаружена среда рабочего стола: {:?}", desktop_env);

        Ok(Self {
            context,
            polling_interval: Duration::from_millis(config.window.polling_interval_ms),
            desktop_env,
            working_method: None,
            kdotool: KdotoolDetector::new(),
            xdotool: XdotoolDetector::new(),
            wmctrl: WmctrlDetector::new(),
            sway: SwayDetector::new(),
        })
    }

    fn detect_desktop_environment() -> DesktopEnvironment {
        if std::env::var_os("SWAYSOCK").is_some() {
            return DesktopEnvironment::Sway;
        }

        if let Ok(desktop) = std::env::var("XDG_CURRENT_DESKTOP") {
            let desktop = desktop.to_lowercase();
            if desktop.contains("kde") {
                return DesktopEnvironment::Kde;
            }
            if desktop.contains("gnome") {
                return DesktopEnvironment::Gnome;
            }
        }

        if let Ok(session) = std::env::var("XDG_SESSION_TYPE") {
            match session.as_str() {
                "wayland" => return DesktopEnvironment::WaylandGeneric,
                "x11" => return DesktopEnvironment::X11Generic,
                _ => {}
            }
        }

        if let Ok(output) = Command::new("pgrep").arg("-f").arg("kwin").output() {
            if !output.stdout.is_empty() {
                return DesktopEnvironment::Kde;
            }
        }

        DesktopEnvironment::Unknown
    }

    async fn detect_working_method(&self) -> Result<WorkingMethod> {
        info!("Определяем рабочий метод детекции окон...");

        for method in method_order(self.desktop_env) {
            let works = match method {
                WorkingMethod::Kdotool => self.kdotool.test().await,
                WorkingMethod::Xdotool => self.xdotool.test().await,
                WorkingMethod::Wmctrl => self.wmctrl.test().await,
                WorkingMethod::Sway => self.sway.test().await,
            };

            if works.is_ok() {
                info!("Используем {:?}", method);
                return Ok(method);
            }
        }

        Err(ksh_error!(service_unavailable, "Ни один метод детекции окон не работает"))
    }

    async fn get_window_by_method(&self, method: WorkingMethod) -> Result<WindowInfo> {
        match method {
            WorkingMethod::Kdotool => self.kdotool.get_active_window().await,
            WorkingMethod::Xdotool => self.xdotool.get_active_window().await,
            WorkingMethod::Wmctrl => self.wmctrl.get_active_window().await,
            WorkingMethod::Sway => self.sway.get_active_window().await,
        }
    }

    async fn run_impl(mut self) -> Result<()> {
        info!("RealWindowDetector запущен для среды: {:?}", self.desktop_env);

        let mut ticker = interval(self.polling_interval);

        loop {
            ticker.tick().await;

            let method = match self.working_method {
                Some(method) => method,
                None => match self.detect_working_method().await {
                    Ok(method) => {
                        self.working_method = Some(method);
                        method
                    }
                    Err(e) => {
                        error!("{}. Приостанавливаем детекцию на 10 секунд", e);
                        self.context.update(None);
                        tokio::time::sleep(Duration::from_secs(10)).await;
                        continue;
                    }
                },
            };

            match self.get_window_by_method(method).await {
                Ok(window) => {
                    self.context.update(Some(window));
                }
                Err(e) => {
                    warn!("Рабочий метод {:?} перестал работать: {}. Переопределяем...", method, e);
                    self.working_method = None;
                }
            }
        }
    }
}

impl Drop for RealWindowDetector {
    fn drop(&mut self) {
        info!("RealWindowDetector завершает работу");
    }
}

#[async_trait::async_trait]
impl WindowDetectorTrait for RealWindowDetector {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
