pub mod capture_session;
pub mod config_reload;
pub mod history;
pub mod input_listener;
pub mod normalizer;
pub mod overlay_ticker;
pub mod renderer;
pub mod sensitive_field;
pub mod source_registry;
pub mod target_matcher;
pub mod window_context;
pub mod window_detector;

pub use capture_session::CaptureSession;
pub use config_reload::ConfigReloader;
pub use input_listener::create_input_listener;
pub use overlay_ticker::OverlayTicker;
pub use renderer::{LogRenderer, OverlayFrame, RenderStyle, Renderer};
pub use source_registry::SourceRegistry;
pub use target_matcher::{TargetMatcher, TargetSpec};
pub use window_context::{FocusedWindowProvider, WindowContext};
pub use window_detector::create_window_detector;
