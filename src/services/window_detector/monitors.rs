//! Pure parsers for window geometry and monitor layout.
//!
//! The backends shell out to `xdotool getwindowgeometry --shell` and
//! `xrandr --listmonitors`; everything that interprets their output lives here
//! so it can be tested without an X server.

use crate::events::WindowGeometry;
use std::path::Path;

/// Прямоугольник монитора из `xrandr --listmonitors`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorRect {
    pub index: i32,
    pub geometry: WindowGeometry,
}

/// X=..\nY=..\nWIDTH=..\nHEIGHT=..
pub fn parse_geometry_shell(output: &str) -> Option<WindowGeometry> {
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;

    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key {
            "X" => x = value.parse().ok(),
            "Y" => y = value.parse().ok(),
            "WIDTH" => width = value.parse().ok(),
            "HEIGHT" => height = value.parse().ok(),
            _ => {}
        }
    }

    Some(WindowGeometry {
        x: x?,
        y: y?,
        width: width?,
        height: height?,
    })
}

/// " 0: +*eDP-1 1920/344x1080/194+0+0  eDP-1"
pub fn parse_xrandr_monitors(output: &str) -> Vec<MonitorRect> {
    output.lines().filter_map(parse_monitor_line).collect()
}

fn parse_monitor_line(line: &str) -> Option<MonitorRect> {
    let mut parts = line.split_whitespace();
    let index = parts.next()?.strip_suffix(':')?.parse().ok()?;
    let _name = parts.next()?;
    let geometry = parse_monitor_geometry(parts.next()?)?;
    Some(MonitorRect { index, geometry })
}

/// "1920/344x1080/194+0+0" -> 1920x1080 в точке (0, 0)
fn parse_monitor_geometry(spec: &str) -> Option<WindowGeometry> {
    let (width_part, rest) = spec.split_once('x')?;
    let width = width_part.split('/').next()?.parse().ok()?;

    let offset_start = rest.find(['+', '-'])?;
    let (height_part, offsets) = rest.split_at(offset_start);
    let height = height_part.split('/').next()?.parse().ok()?;

    let (x, y) = parse_offsets(offsets)?;
    Some(WindowGeometry { x, y, width, height })
}

/// "+1920+0" / "-1280+0"
fn parse_offsets(offsets: &str) -> Option<(i32, i32)> {
    let second = offsets[1..].find(['+', '-'])? + 1;
    let x = offsets[..second].trim_start_matches('+').parse().ok()?;
    let y = offsets[second..].trim_start_matches('+').parse().ok()?;
    Some((x, y))
}

/// Монитор, на котором находится центр окна
pub fn monitor_for(window: &WindowGeometry, monitors: &[MonitorRect]) -> Option<i32> {
    let (cx, cy) = window.center();
    monitors
        .iter()
        .find(|m| m.geometry.contains_point(cx, cy))
        .map(|m| m.index)
}

/// Имя исполняемого файла процесса по /proc/<pid>/exe
pub fn executable_for_pid(pid: u32) -> Option<String> {
    let exe = std::fs::read_link(format!("/proc/{}/exe", pid)).ok()?;
    executable_name(&exe)
}

fn executable_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.trim_end_matches(" (deleted)").to_string())
}
