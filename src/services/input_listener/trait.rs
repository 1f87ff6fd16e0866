use crate::config::Config;
use crate::error::Result;
use crate::services::capture_session::CaptureSession;
use std::sync::Arc;

/// Trait for input listeners that can run in different modes
#[async_trait::async_trait]
pub trait InputListenerTrait {
    /// Run the listener until its devices go away
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate input listener based on the dry_run flag
pub fn create_input_listener(
    config: Arc<Config>,
    session: Arc<CaptureSession>,
    dry_run: bool,
) -> Result<Box<dyn InputListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_input_listener::DryRunInputListener::new(session)))
    } else {
        Ok(Box::new(super::evdev_listener::EvdevInputListener::new(config, session)?))
    }
}
