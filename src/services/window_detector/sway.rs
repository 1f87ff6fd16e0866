use crate::error::Result;
use crate::events::{WindowGeometry, WindowInfo};
use crate::ksh_error;
use serde::Deserialize;
use tracing::debug;

use super::command::run_for_stdout;
use super::monitors::executable_for_pid;

/// wlroots/Sway: дерево окон из `swaymsg -r -t get_tree`
pub struct SwayDetector;

impl SwayDetector {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        run_for_stdout("swaymsg", &["-t", "get_version"]).map(|_| ())
    }

    pub async fn get_active_window(&self) -> Result<WindowInfo> {
        let tree = run_for_stdout("swaymsg", &["-r", "-t", "get_tree"])?;
        let window = parse_focused_window(&tree)
            .ok_or_else(|| ksh_error!(window_unavailable, "Активное окно в Sway не найдено"))?;

        Ok(match window.pid.and_then(executable_for_pid) {
            Some(exe) => window.with_executable(exe),
            None => window,
        })
    }
}

/// Узел дерева `swaymsg -t get_tree`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SwayNode {
    focused: bool,
    name: Option<String>,
    app_id: Option<String>,
    pid: Option<u32>,
    rect: Option<WindowGeometry>,
    window_properties: Option<WindowProperties>,
    nodes: Vec<SwayNode>,
    floating_nodes: Vec<SwayNode>,
}

/// Свойства X11-окна под Xwayland
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindowProperties {
    class: Option<String>,
}

impl SwayNode {
    fn find_focused(&self) -> Option<&SwayNode> {
        if self.focused {
            return Some(self);
        }
        self.nodes
            .iter()
            .chain(&self.floating_nodes)
            .find_map(SwayNode::find_focused)
    }
}

/// Найти узел с "focused": true и собрать из него WindowInfo
pub fn parse_focused_window(tree: &str) -> Option<WindowInfo> {
    let root: SwayNode = match serde_json::from_str(tree) {
        Ok(root) => root,
        Err(e) => {
            debug!("Не удалось разобрать дерево Sway: {}", e);
            return None;
        }
    };
    let node = root.find_focused()?;

    let title = node.name.clone()?;
    let class = node
        .app_id
        .clone()
        .or_else(|| node.window_properties.as_ref().and_then(|p| p.class.clone()))
        .unwrap_or_default();

    let mut window = WindowInfo::new(title).with_class(class);
    if let Some(pid) = node.pid {
        window = window.with_pid(pid);
    }
    if let Some(rect) = node.rect {
        window = window.with_geometry(rect);
    }
    Some(window)
}
