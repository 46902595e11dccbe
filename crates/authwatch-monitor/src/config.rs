//! 환경변수 기반 설정 모듈.

use authwatch_core::{MonitorError, MonitorResult};
use std::path::PathBuf;
use std::time::Duration;

/// 경고 억제 정책.
///
/// 과거 구현에서는 "ID당 프로세스 수명 동안 한 번만 경고"가 suppression
/// set을 비우지 않는 데서 오는 암묵적 결과였습니다. 여기서는 명시적인
/// 설정 값으로 노출합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionPolicy {
    /// ID당 프로세스 실행 동안 최대 한 번만 경고 (기존 동작)
    #[default]
    OncePerRun,
    /// 윈도우 초기화와 함께 억제도 해제 - 두 번째 burst에서 재경고 가능
    ResetWithWindow,
}

impl std::str::FromStr for SuppressionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "once_per_run" => Ok(Self::OncePerRun),
            "reset_with_window" => Ok(Self::ResetWithWindow),
            _ => Err(format!("Unknown suppression policy: {}", s)),
        }
    }
}

/// Monitor 전체 설정.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// 감시 대상 인증 로그 파일 경로
    pub log_path: PathBuf,
    /// 정상 상태 폴링 주기 (초)
    pub poll_interval_seconds: u64,
    /// I/O 에러 후 재시도 대기 시간 (초, 폴링 주기보다 김)
    pub error_backoff_seconds: u64,
    /// 경고를 발생시키는 연속 실패 횟수
    pub failure_threshold: usize,
    /// 경고 발송 대기열 크기 (가득 차면 경고 유실)
    pub alert_queue_capacity: usize,
    /// 경고 억제 정책
    pub suppression_policy: SuppressionPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("user_logs.txt"),
            poll_interval_seconds: 5,
            error_backoff_seconds: 10,
            failure_threshold: 3,
            alert_queue_capacity: 16,
            suppression_policy: SuppressionPolicy::OncePerRun,
        }
    }
}

impl MonitorConfig {
    /// 환경변수에서 설정 로드.
    pub fn from_env() -> MonitorResult<Self> {
        dotenvy::dotenv().ok();

        let suppression_policy = match std::env::var("SUPPRESSION_POLICY") {
            Ok(raw) => raw
                .parse()
                .map_err(|e: String| MonitorError::Config(e))?,
            Err(_) => SuppressionPolicy::default(),
        };

        Ok(Self {
            log_path: std::env::var("AUTH_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("user_logs.txt")),
            poll_interval_seconds: env_var_parse("POLL_INTERVAL_SECONDS", 5),
            error_backoff_seconds: env_var_parse("ERROR_BACKOFF_SECONDS", 10),
            failure_threshold: env_var_parse("FAILURE_THRESHOLD", 3),
            alert_queue_capacity: env_var_parse("ALERT_QUEUE_CAPACITY", 16),
            suppression_policy,
        })
    }

    /// 정상 상태 폴링 주기를 Duration으로 반환
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// 에러 백오프 대기 시간을 Duration으로 반환
    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_seconds)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
