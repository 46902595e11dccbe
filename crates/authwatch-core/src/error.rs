//! 모니터링 시스템의 에러 타입.
//!
//! 이 모듈은 모니터링 시스템 전반에서 사용되는 에러 타입을 정의합니다.
//! 시작 시점의 설정 에러만 프로세스를 종료시키며, 그 외 모든 에러는
//! 로그를 남긴 뒤 루프가 계속 동작합니다.

use thiserror::Error;

/// 핵심 모니터링 에러.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// 설정 에러 (필수 자격증명/설정 누락) - 시작 시점에 치명적
    #[error("설정 에러: {0}")]
    Config(String),

    /// 로그 파일 I/O 에러 - 백오프 후 재시도
    #[error("로그 파일 I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 로그 라인 파싱 에러 - 해당 라인만 건너뜀
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 알림 전송 에러 - 기록 후 해당 알림은 유실 처리
    #[error("알림 전송 에러: {0}")]
    Transport(String),
}

/// 모니터링 작업을 위한 Result 타입.
pub type MonitorResult<T> = Result<T, MonitorError>;

impl MonitorError {
    /// 백오프 후 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MonitorError::Io(_) | MonitorError::Transport(_))
    }

    /// 프로세스를 종료시켜야 하는 치명적인 에러인지 확인합니다.
    pub fn is_critical(&self) -> bool {
        matches!(self, MonitorError::Config(_))
    }
}
