use crate::error::Result;
use crate::events::WindowInfo;
use crate::ksh_error;
use tracing::debug;

use super::command::run_for_stdout;
use super::monitors::executable_for_pid;

/// KDE Wayland (KWin scripting через kdotool)
pub struct KdotoolDetector;

impl KdotoolDetector {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        debug!("=== Тестируем kdotool ===");
        let window_id = run_for_stdout("kdotool", &["getactivewindow"])?;
        run_for_stdout("kdotool", &["getwindowname", window_id.trim()])?;
        debug!("=== kdotool работает ===");
        Ok(())
    }

    pub async fn get_active_window(&self) -> Result<WindowInfo> {
        let window_id = run_for_stdout("kdotool", &["getactivewindow"])?;
        let window_id = window_id.trim();

        let title = run_for_stdout("kdotool", &["getwindowname", window_id])?;
        if title.trim().is_empty() {
            return Err(ksh_error!(window_unavailable, "kdotool вернул пустое название"));
        }

        let class = run_for_stdout("kdotool", &["getwindowclassname", window_id])
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|_| "KDE".to_string());
        let mut window = WindowInfo::new(title).with_class(class);

        if let Some(pid) = run_for_stdout("kdotool", &["getwindowpid", window_id])
            .ok()
            .and_then(|pid| pid.trim().parse::<u32>().ok())
        {
            window = window.with_pid(pid);
            if let Some(exe) = executable_for_pid(pid) {
                window = window.with_executable(exe);
            }
        }

        Ok(window)
    }
}
