//! 모니터링 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 모니터링 세션 통계.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorStats {
    /// 읽어들인 총 라인 수
    pub lines_seen: usize,
    /// 파싱에 실패해 건너뛴 라인 수
    pub parse_anomalies: usize,
    /// 기록된 실패 엔트리 수
    pub failures_recorded: usize,
    /// 발송 대기열에 등록된 경고 수
    pub alerts_enqueued: usize,
    /// 억제 정책에 의해 차단된 경고 수
    pub alerts_suppressed: usize,
    /// 대기열 포화로 유실된 경고 수
    pub alerts_dropped: usize,
    /// I/O 에러 후 백오프한 횟수
    pub backoffs: usize,
    /// 총 동작 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl MonitorStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            lines_seen = self.lines_seen,
            parse_anomalies = self.parse_anomalies,
            failures_recorded = self.failures_recorded,
            alerts_enqueued = self.alerts_enqueued,
            alerts_suppressed = self.alerts_suppressed,
            alerts_dropped = self.alerts_dropped,
            backoffs = self.backoffs,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "모니터링 요약"
        );
    }
}
