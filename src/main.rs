use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use services::{create_dispatcher, create_gaze_source, CursorBroadcaster, RequestBoard};

#[derive(Parser, Debug)]
#[command(name = "vistra")]
#[command(about = "Ассистивная панель запросов с выбором целей взглядом")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "vistra.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция взгляда, без реальных уведомлений)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск Vistra v{}", env!("CARGO_PKG_VERSION"));

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    // Инициализация компонентов: broadcaster создаётся явно и передаётся
    // каждому потребителю, никакого неявного глобального состояния
    let broadcaster = Arc::new(CursorBroadcaster::new());
    let dispatcher = create_dispatcher(args.dry_run)?;
    let board = Arc::new(RequestBoard::new(&config, broadcaster.clone(), dispatcher)?);
    let gaze_source = create_gaze_source(config.clone(), broadcaster.clone(), args.dry_run)?;

    info!(
        "Все компоненты инициализированы: {} целей, {} подписчиков курсора",
        board.target_count(),
        broadcaster.subscriber_count()
    );

    // Запуск источника взгляда
    let source_handle = tokio::spawn(async move {
        if let Err(e) = gaze_source.run().await {
            error!("Ошибка в GazeSource: {}", e);
        }
    });

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }

    info!("Завершение работы...");

    // Сначала гасим панель: отмена взведённых dwell-таймеров строго
    // до разрушения целей, чтобы не выстрелила устаревшая активация
    board.teardown();

    // Прерываем источник взгляда
    source_handle.abort();

    // Ожидаем завершения задач (с таймаутом)
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = source_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("Vistra завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
