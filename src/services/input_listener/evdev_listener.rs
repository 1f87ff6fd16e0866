use crate::config::Config;
use crate::error::Result;
use crate::ksh_error;
use crate::services::capture_session::CaptureSession;
use crate::utils::DeviceFinder;
use crate::debug_if_enabled;
use evdev::Device;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::modifier_state::ModifierState;
use super::r#trait::InputListenerTrait;
use super::translator::translate;

/// Подряд идущие ошибки чтения, после которых устройство считается потерянным
const MAX_READ_ERRORS: u32 = 50;

pub struct EvdevInputListener {
    session: Arc<CaptureSession>,
    keyboard: Device,
    mouse: Option<Device>,
    modifier_state: Arc<RwLock<ModifierState>>,
}

impl EvdevInputListener {
    pub fn new(config: Arc<Config>, session: Arc<CaptureSession>) -> Result<Self> {
        info!("Инициализация EvdevInputListener");

        let keyboard_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;
        let keyboard = Self::open(&keyboard_path)?;

        let mouse = if config.input.show_mouse_clicks {
            match DeviceFinder::find_mouse_device(&config.input.mouse_device_path)
                .and_then(|path| Self::open(&path))
            {
                Ok(device) => Some(device),
                Err(e) => {
                    warn!("Мышь недоступна, клики не будут отображаться: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            session,
            keyboard,
            mouse,
            modifier_state: Arc::new(RwLock::new(ModifierState::new())),
        })
    }

    fn open(path: &Path) -> Result<Device> {
        let device = Device::open(path)
            .map_err(|e| ksh_error!(device_not_found, "Не удалось открыть устройство {:?}: {}", path, e))?;

        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());
        Ok(device)
    }

    async fn run_impl(self) -> Result<()> {
        info!("EvdevInputListener запущен, начинаем чтение событий");

        let mut handles = Vec::new();
        for device in std::iter::once(self.keyboard).chain(self.mouse) {
            let session = self.session.clone();
            let modifier_state = self.modifier_state.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                read_loop(device, &session, &modifier_state)
            }));
        }

        for handle in handles {
            handle
                .await
                .map_err(|e| ksh_error!(internal, "Поток чтения устройства завершился аварийно: {}", e))??;
        }

        Ok(())
    }
}

/// Блокирующее чтение одного устройства; вызывается в spawn_blocking
fn read_loop(
    mut device: Device,
    session: &CaptureSession,
    modifier_state: &RwLock<ModifierState>,
) -> Result<()> {
    let name = device.name().unwrap_or("Unknown").to_string();
    let mut consecutive_errors = 0u32;

    loop {
        let events = match device.fetch_events() {
            Ok(events) => events.collect::<Vec<_>>(),
            Err(e) => {
                consecutive_errors += 1;
                error!("Ошибка чтения событий ({}): {}", name, e);
                if consecutive_errors >= MAX_READ_ERRORS {
                    return Err(ksh_error!(
                        service_unavailable,
                        "Устройство '{}' перестало отвечать: {}",
                        name,
                        e
                    ));
                }
                std::thread::sleep(Duration::from_millis(100));
                continue;
            }
        };
        consecutive_errors = 0;

        for event in events {
            let Some(raw) = translate(event.event_type(), event.code(), event.value(), modifier_state, &name)
            else {
                continue;
            };

            if let Some(outcome) = session.handle_event(&raw, raw.timestamp()) {
                debug_if_enabled!("Событие {:?} -> {:?}", raw, outcome);
            }
        }
    }
}

#[async_trait::async_trait]
impl InputListenerTrait for EvdevInputListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
