use crate::error::Result;
use crate::events::WindowInfo;
use crate::ksh_error;

use super::command::run_for_stdout;
use super::monitors::executable_for_pid;

/// EWMH: id активного окна из xprop, описание из `wmctrl -lpx`
pub struct WmctrlDetector;

impl WmctrlDetector {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        run_for_stdout("wmctrl", &["-l"]).map(|_| ())
    }

    pub async fn get_active_window(&self) -> Result<WindowInfo> {
        let active = run_for_stdout("xprop", &["-root", "_NET_ACTIVE_WINDOW"])?;
        let active_id = parse_active_window_id(&active)
            .ok_or_else(|| ksh_error!(window_unavailable, "xprop не вернул активное окно"))?;

        let listing = run_for_stdout("wmctrl", &["-lpx"])?;
        listing
            .lines()
            .filter_map(parse_wmctrl_line)
            .find(|(id, _)| *id == active_id)
            .map(|(_, window)| match window.pid {
                Some(pid) => match executable_for_pid(pid) {
                    Some(exe) => window.with_executable(exe),
                    None => window,
                },
                None => window,
            })
            .ok_or_else(|| ksh_error!(window_unavailable, "Активное окно не найдено в списке wmctrl"))
    }
}

/// "_NET_ACTIVE_WINDOW(WINDOW): window id # 0x3a00007"
fn parse_active_window_id(output: &str) -> Option<u64> {
    let hex = output.rsplit('#').next()?.trim();
    parse_hex_id(hex).filter(|id| *id != 0)
}

fn parse_hex_id(text: &str) -> Option<u64> {
    u64::from_str_radix(text.trim_start_matches("0x"), 16).ok()
}

/// "0x03a00007  0 4321 host.Firefox  host Title words" -> (id, окно)
fn parse_wmctrl_line(line: &str) -> Option<(u64, WindowInfo)> {
    let mut parts = line.split_whitespace();
    let id = parse_hex_id(parts.next()?)?;
    let _desktop = parts.next()?;
    let pid = parts.next()?.parse::<u32>().ok().filter(|pid| *pid != 0);
    let wm_class = parts.next()?;
    let _host = parts.next()?;
    let title = parts.collect::<Vec<_>>().join(" ");

    let class = wm_class.rsplit('.').next().unwrap_or(wm_class).to_string();
    let mut window = WindowInfo::new(title).with_class(class);
    if let Some(pid) = pid {
        window = window.with_pid(pid);
    }
    Some((id, window))
}
