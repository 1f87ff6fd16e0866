use crate::error::Result;
use crate::services::capture_session::CaptureSession;
use evdev::EventType;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::modifier_state::ModifierState;
use super::r#trait::InputListenerTrait;
use super::translator::{translate, REL_WHEEL};

const DEVICE_NAME: &str = "dry-run";

/// Один шаг демо-сценария: пауза перед событием и само событие evdev
#[derive(Debug, Clone, Copy)]
struct ScriptStep {
    delay_ms: u64,
    event_type: EventType,
    code: u16,
    value: i32,
}

const fn key(delay_ms: u64, code: u16, value: i32) -> ScriptStep {
    ScriptStep {
        delay_ms,
        event_type: EventType::KEY,
        code,
        value,
    }
}

/// Набор "hi", тройное "a", Ctrl+C, клики и прокрутка
fn demo_script() -> Vec<ScriptStep> {
    vec![
        key(0, 35, 1),
        key(80, 35, 0),
        key(120, 23, 1),
        key(80, 23, 0),
        key(400, 30, 1),
        key(60, 30, 0),
        key(200, 30, 1),
        key(60, 30, 0),
        key(200, 30, 1),
        key(60, 30, 0),
        key(1500, 29, 1),
        key(150, 46, 1),
        key(80, 46, 0),
        key(60, 29, 0),
        key(800, 0x110, 1),
        key(60, 0x110, 0),
        key(600, 0x111, 1),
        key(60, 0x111, 0),
        ScriptStep {
            delay_ms: 600,
            event_type: EventType::RELATIVE,
            code: REL_WHEEL,
            value: 1,
        },
    ]
}

pub struct DryRunInputListener {
    session: Arc<CaptureSession>,
    modifier_state: RwLock<ModifierState>,
    script: Vec<ScriptStep>,
}

impl DryRunInputListener {
    pub fn new(session: Arc<CaptureSession>) -> Self {
        info!("Инициализация DryRunInputListener");
        Self {
            session,
            modifier_state: RwLock::new(ModifierState::new()),
            script: demo_script(),
        }
    }

    /// Воспроизвести один шаг; возвращает true, если история изменилась
    fn play(&self, step: &ScriptStep, now: Instant) -> bool {
        let Some(raw) = translate(step.event_type, step.code, step.value, &self.modifier_state, DEVICE_NAME)
        else {
            return false;
        };

        match self.session.handle_event(&raw, now) {
            Some(outcome) => {
                debug!("[DRY-RUN] {:?} -> {:?}", raw, outcome);
                true
            }
            None => false,
        }
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - события ввода эмулируются по сценарию");

        loop {
            for step in &self.script {
                tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
                self.play(step, Instant::now());
            }

            // Пауза, чтобы записи успели устареть
            tokio::time::sleep(Duration::from_secs(5)).await;
            self.modifier_state.write().reset();
        }
    }
}

#[async_trait::async_trait]
impl InputListenerTrait for DryRunInputListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
