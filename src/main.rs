use anyhow::Result;
use clap::Parser;
use keystroke_history::config::Config;
use keystroke_history::services::{
    create_input_listener, create_window_detector, CaptureSession, ConfigReloader, LogRenderer,
    OverlayTicker, RenderStyle, SourceRegistry, WindowContext,
};
use keystroke_history::utils;
use std::sync::Arc;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "keystroke-history")]
#[command(about = "Оверлей истории нажатий клавиш и кликов мыши")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "keystroke.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция ввода и окон, без доступа к устройствам)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск keystroke-history v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - ввод и окна эмулируются");
    } else {
        // Проверка прав доступа
        utils::permissions::check_permissions()?;
    }

    // Инициализация компонентов
    let registry = Arc::new(SourceRegistry::from_config(&config.sources));
    let window_context = Arc::new(WindowContext::new());
    let session = Arc::new(CaptureSession::new(&config, registry.clone(), window_context.clone()));

    let input_listener = create_input_listener(config.clone(), session.clone(), args.dry_run)?;
    let window_detector = create_window_detector(config.clone(), window_context, args.dry_run)?;
    let overlay_ticker = OverlayTicker::new(
        session.clone(),
        Arc::new(LogRenderer::new()),
        RenderStyle::from(&config.render),
        tokio::time::Duration::from_millis(config.render.tick_interval_ms),
    );

    let reloader = ConfigReloader::new(session.clone(), registry, overlay_ticker.style_handle());

    info!("Все компоненты инициализированы");

    session.start_capture();

    // Запуск всех сервисов параллельно
    let input_handle = tokio::spawn(async move {
        if let Err(e) = input_listener.run().await {
            error!("Ошибка в InputListener: {}", e);
        }
    });
    let window_handle = tokio::spawn(async move {
        if let Err(e) = window_detector.run().await {
            error!("Ошибка в WindowDetector: {}", e);
        }
    });
    let ticker_handle = tokio::spawn(async move {
        if let Err(e) = overlay_ticker.run().await {
            error!("Ошибка в OverlayTicker: {}", e);
        }
    });
    let reload_handle = tokio::spawn(reloader.run_on_sighup(PathBuf::from(&args.config)));

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
        Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
    }

    info!("Завершение работы...");
    session.stop_capture();

    let handles = [input_handle, window_handle, ticker_handle, reload_handle];
    for handle in &handles {
        handle.abort();
    }

    // Ожидаем завершения задач (с таймаутом)
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        for handle in handles {
            let _ = handle.await;
        }
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("keystroke-history завершил работу");
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let compact = (format == "compact").then(|| fmt::layer().compact());
    let full = (format != "compact").then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(full)
        .init();

    Ok(())
}
