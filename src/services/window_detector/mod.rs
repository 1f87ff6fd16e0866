//! WindowDetector service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for finding the focused
//! window (title/class/pid/executable/monitor depending on the backend) and
//! publishing it into the shared `WindowContext`. Capture decisions are made by
//! the target matcher inside `CaptureSession`, never here.

mod command;
mod dry_window_detector;
mod kdotool;
mod monitors;
mod sway;
mod r#trait;
mod window_detector;
mod wmctrl;
mod xdotool;

pub use self::monitors::{monitor_for, parse_geometry_shell, parse_xrandr_monitors, MonitorRect};
pub use self::r#trait::{create_window_detector, WindowDetectorTrait};
