//! 폴링 루프.
//!
//! 상태 흐름: 폴링 → 읽기 → 파싱 → 판정 → (경고 enqueue) → 대기 → 폴링.
//! 읽기/파싱 중 I/O 에러가 나면 에러 백오프 시간만큼 대기한 뒤 폴링으로
//! 복귀합니다. 모든 가변 상태(오프셋, 윈도우, 억제 집합)는 이 루프가
//! 단독 소유하므로 잠금이 필요 없습니다.

use crate::config::MonitorConfig;
use crate::engine::{AlertEngine, ObserveOutcome};
use crate::parser;
use crate::stats::MonitorStats;
use crate::tailer::LogTailer;
use authwatch_core::MonitorResult;
use std::time::Instant;
use tracing::{error, info, warn};

/// 인증 로그 감시 루프.
///
/// 명시적인 상태 객체로서 tailer(오프셋), 판정 엔진(윈도우 + 억제 집합),
/// 통계를 단독 소유합니다.
pub struct Monitor {
    config: MonitorConfig,
    tailer: LogTailer,
    engine: AlertEngine,
    stats: MonitorStats,
}

impl Monitor {
    /// 새 모니터를 생성합니다.
    pub fn new(config: MonitorConfig, tailer: LogTailer, engine: AlertEngine) -> Self {
        Self {
            config,
            tailer,
            engine,
            stats: MonitorStats::new(),
        }
    }

    /// 한 번의 폴링 패스: 새 라인을 읽어 파싱하고 판정 엔진에 전달합니다.
    pub async fn poll_once(&mut self) -> MonitorResult<()> {
        let lines = self.tailer.read_new_lines().await?;

        for line in lines {
            self.stats.lines_seen += 1;

            let Some(entry) = parser::parse_line(&line) else {
                self.stats.parse_anomalies += 1;
                warn!(line = %line, "문법에 맞지 않는 라인 건너뜀");
                continue;
            };

            if !entry.is_failure() {
                continue;
            }

            self.stats.failures_recorded += 1;
            match self.engine.observe(entry) {
                ObserveOutcome::AlertEnqueued => self.stats.alerts_enqueued += 1,
                ObserveOutcome::Suppressed => self.stats.alerts_suppressed += 1,
                ObserveOutcome::AlertDropped => self.stats.alerts_dropped += 1,
                ObserveOutcome::Recorded | ObserveOutcome::Ignored => {}
            }
        }

        Ok(())
    }

    /// 종료 신호(Ctrl-C)가 올 때까지 폴링 루프를 실행합니다.
    ///
    /// 소비한 뒤 세션 통계를 반환합니다. 루프를 반환시키는 에러는
    /// 없습니다 - I/O 에러는 백오프 후 재시도됩니다.
    pub async fn run(mut self) -> MonitorStats {
        let started = Instant::now();
        info!(
            path = %self.config.log_path.display(),
            poll_interval_seconds = self.config.poll_interval_seconds,
            failure_threshold = self.config.failure_threshold,
            "로그 파일 감시 시작"
        );

        loop {
            let sleep_duration = match self.poll_once().await {
                Ok(()) => self.config.poll_interval(),
                Err(e) => {
                    self.stats.backoffs += 1;
                    error!(error = %e, "로그 읽기 실패, 백오프 후 재시도");
                    self.config.error_backoff()
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("종료 신호 수신, 모니터 종료 중...");
                    break;
                }
                _ = tokio::time::sleep(sleep_duration) => {}
            }
        }

        self.stats.elapsed = started.elapsed();
        self.stats.log_summary("인증 로그 감시");
        self.stats
    }

    /// 현재까지의 세션 통계.
    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }
}
