//! AuthWatch 모니터 데몬 CLI.

use authwatch_core::{init_logging, LogConfig, MonitorError};
use authwatch_monitor::{AlertDispatcher, AlertEngine, LogTailer, Monitor, MonitorConfig};
use authwatch_notification::{EnrichmentConfig, SystemEnrichment, TelegramSender};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "authwatch")]
#[command(about = "AuthWatch 인증 로그 모니터", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 데몬 모드: 로그 파일을 주기적으로 폴링하며 감시
    Run,

    /// 현재 로그 내용을 한 번 처리하고 종료
    Scan,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    init_logging(LogConfig::new(cli.log_level.as_str()))?;

    tracing::info!("AuthWatch 인증 로그 모니터 시작");

    // 설정 로드
    let config = MonitorConfig::from_env()?;
    tracing::debug!(log_path = %config.log_path.display(), "설정 로드 완료");

    // 필수 자격증명 확인 - 없으면 시작 자체가 실패
    let notifier = TelegramSender::from_env().ok_or_else(|| {
        MonitorError::Config(
            "TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID 환경변수가 설정되지 않았습니다".to_string(),
        )
    })?;

    let enrichment = Arc::new(SystemEnrichment::new(EnrichmentConfig::from_env()));

    // 경고 발송은 제한된 크기의 채널 뒤 워커에서 수행
    let (alert_tx, alert_rx) = mpsc::channel(config.alert_queue_capacity);
    let dispatcher = AlertDispatcher::new(alert_rx, enrichment, Arc::new(notifier));
    let dispatcher_handle = tokio::spawn(dispatcher.run());

    let engine = AlertEngine::new(
        config.failure_threshold,
        config.suppression_policy,
        alert_tx,
    );
    let tailer = LogTailer::open(&config.log_path).await?;
    let monitor = Monitor::new(config, tailer, engine);

    match cli.command {
        Commands::Run => {
            // 종료 신호까지 감시, 이후 워커가 남은 경고를 처리하도록 대기
            monitor.run().await;
            let dispatched = dispatcher_handle.await?;
            tracing::info!(alerts_dispatched = dispatched, "AuthWatch 모니터 종료");
        }
        Commands::Scan => {
            let started = Instant::now();
            let mut monitor = monitor;
            monitor.poll_once().await?;

            let mut stats = monitor.stats().clone();
            stats.elapsed = started.elapsed();

            // 엔진(채널 송신측)을 닫아 워커가 남은 경고 처리 후 종료하게 함
            drop(monitor);
            let dispatched = dispatcher_handle.await?;

            stats.log_summary("단발 스캔");
            tracing::info!(alerts_dispatched = dispatched, "스캔 완료");
        }
    }

    Ok(())
}
