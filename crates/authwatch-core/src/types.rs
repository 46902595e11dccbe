//! 인증 로그 도메인 타입.

use serde::{Deserialize, Serialize};

/// 로그 엔트리의 로그인 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginOutcome {
    /// 로그인 실패 (`Status: Failed`)
    Failure,
    /// 그 외 모든 결과 (성공 포함)
    Other,
}

/// 파싱된 인증 로그 엔트리.
///
/// 파싱 이후에는 불변이며, 실패 윈도우에 채워진 뒤에는 보관되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 로그 라인의 타임스탬프 (원본 문자열 그대로)
    pub timestamp: String,
    /// 검증 대상 사용자의 Unique ID (불투명 토큰)
    pub identity: String,
    /// 로그인 결과
    pub outcome: LoginOutcome,
    /// 원본 로그 라인
    pub raw: String,
}

impl LogEntry {
    /// 실패 엔트리인지 확인합니다.
    pub fn is_failure(&self) -> bool {
        self.outcome == LoginOutcome::Failure
    }
}
