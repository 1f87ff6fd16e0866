use crate::error::Result;
use crate::events::WindowInfo;
use crate::ksh_error;
use tracing::debug;

use super::command::run_for_stdout;
use super::monitors::{executable_for_pid, monitor_for, parse_geometry_shell, parse_xrandr_monitors};

/// X11: заголовок, класс, pid, исполняемый файл и монитор активного окна
pub struct XdotoolDetector;

impl XdotoolDetector {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        run_for_stdout("xdotool", &["getactivewindow", "getwindowname"]).map(|_| ())
    }

    pub async fn get_active_window(&self) -> Result<WindowInfo> {
        let window_id = run_for_stdout("xdotool", &["getactivewindow"])?;
        let window_id = window_id.trim();
        if window_id.is_empty() {
            return Err(ksh_error!(window_unavailable, "xdotool не вернул id окна"));
        }

        let title = run_for_stdout("xdotool", &["getwindowname", window_id])?;
        debug!("xdotool получил заголовок окна: '{}'", title);

        let mut window = WindowInfo::new(title);

        match run_for_stdout("xdotool", &["getwindowclassname", window_id]) {
            Ok(class) => window = window.with_class(class.trim().to_string()),
            Err(e) => debug!("Не удалось получить класс окна: {}", e),
        }

        if let Some(pid) = run_for_stdout("xdotool", &["getwindowpid", window_id])
            .ok()
            .and_then(|pid| pid.trim().parse::<u32>().ok())
        {
            window = window.with_pid(pid);
            if let Some(exe) = executable_for_pid(pid) {
                window = window.with_executable(exe);
            }
        }

        if let Some(geometry) = run_for_stdout("xdotool", &["getwindowgeometry", "--shell", window_id])
            .ok()
            .and_then(|output| parse_geometry_shell(&output))
        {
            window = window.with_geometry(geometry);

            let monitors = run_for_stdout("xrandr", &["--listmonitors"])
                .map(|output| parse_xrandr_monitors(&output))
                .unwrap_or_default();
            if let Some(index) = monitor_for(&geometry, &monitors) {
                window = window.with_monitor(index);
            }
        }

        Ok(window)
    }
}
