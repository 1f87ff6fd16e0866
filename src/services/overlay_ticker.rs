use crate::error::Result;
use crate::services::capture_session::CaptureSession;
use crate::services::renderer::{OverlayFrame, RenderStyle, Renderer};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

/// Периодический тик оверлея: старение записей и передача снимка рендереру
pub struct OverlayTicker {
    session: Arc<CaptureSession>,
    renderer: Arc<dyn Renderer>,
    style: Arc<RwLock<RenderStyle>>,
    tick_interval: Duration,
}

impl OverlayTicker {
    pub fn new(
        session: Arc<CaptureSession>,
        renderer: Arc<dyn Renderer>,
        style: RenderStyle,
        tick_interval: Duration,
    ) -> Self {
        Self {
            session,
            renderer,
            style: Arc::new(RwLock::new(style)),
            tick_interval,
        }
    }

    /// Общий стиль: перезагрузка конфигурации меняет его на лету
    pub fn style_handle(&self) -> Arc<RwLock<RenderStyle>> {
        self.style.clone()
    }

    /// Один тик. Блокировка сессии снимается до вызова рендерера
    pub fn tick(&self, now: Instant) -> Result<OverlayFrame> {
        let lines = self.session.tick(now);
        let frame = OverlayFrame::new(lines, self.style.read().clone());
        self.renderer.render(&frame)?;
        Ok(frame)
    }

    pub async fn run(self) -> Result<()> {
        info!("OverlayTicker запущен, интервал {:?}", self.tick_interval);

        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if let Err(e) = self.tick(Instant::now()) {
                warn!("Ошибка отрисовки оверлея: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::source_registry::SourceRegistry;
    use crate::services::window_context::WindowContext;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Mutex<Vec<Vec<String>>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&self, frame: &OverlayFrame) -> Result<()> {
            self.frames.lock().push(frame.lines.clone());
            Ok(())
        }
    }

    #[test]
    fn test_tick_renders_swept_snapshot() {
        let session = Arc::new(CaptureSession::new(
            &Config::default(),
            Arc::new(SourceRegistry::new()),
            Arc::new(WindowContext::new()),
        ));
        let renderer = Arc::new(RecordingRenderer::default());
        let ticker = OverlayTicker::new(
            session.clone(),
            renderer.clone(),
            RenderStyle::default(),
            Duration::from_millis(33),
        );

        let start = Instant::now();
        session.add_token("Ctrl + S", start);

        let frame = ticker.tick(start + Duration::from_secs(1)).unwrap();
        assert_eq!(frame.lines, vec!["Ctrl + S"]);

        ticker.tick(start + Duration::from_secs(4)).unwrap();
        assert_eq!(*renderer.frames.lock(), vec![vec!["Ctrl + S".to_string()], vec![]]);
    }

    #[test]
    fn test_style_change_reaches_next_frame() {
        let session = Arc::new(CaptureSession::new(
            &Config::default(),
            Arc::new(SourceRegistry::new()),
            Arc::new(WindowContext::new()),
        ));
        let ticker = OverlayTicker::new(
            session,
            Arc::new(RecordingRenderer::default()),
            RenderStyle::default(),
            Duration::from_millis(33),
        );

        ticker.style_handle().write().font_size = 48;

        let frame = ticker.tick(Instant::now()).unwrap();
        assert_eq!(frame.style.font_size, 48);
    }
}
