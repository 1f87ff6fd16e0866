use crate::config::Config;
use crate::error::Result;
use crate::services::window_context::WindowContext;
use std::sync::Arc;

/// Trait for window detectors that can run in different modes
#[async_trait::async_trait]
pub trait WindowDetectorTrait {
    /// Run the window detector
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate window detector based on the dry_run flag
pub fn create_window_detector(
    config: Arc<Config>,
    context: Arc<WindowContext>,
    dry_run: bool,
) -> Result<Box<dyn WindowDetectorTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_window_detector::DryRunWindowDetector::new(context)))
    } else {
        Ok(Box::new(super::window_detector::RealWindowDetector::new(config, context)?))
    }
}
