//! 인증 로그 라인 파서.
//!
//! 인식하는 문법:
//!
//! ```text
//! <timestamp> - <descriptor>: <value>, Unique ID: <id>, ..., Status: <outcome>
//! ```
//!
//! 문법에 맞지 않는 라인은 건너뛰며 (호출 측에서 파싱 이상으로 기록),
//! 파싱은 절대 panic하거나 에러를 반환하지 않습니다.

use authwatch_core::{LogEntry, LoginOutcome};

/// 실패 판정에 사용하는 리터럴 마커.
const FAILED_MARKER: &str = "Status: Failed";

/// 로그 라인 하나를 구조화된 엔트리로 변환합니다.
///
/// 세 가지 리터럴 마커(`" - "`, `"Unique ID: "`, `"Status: "`)를 모두
/// 포함하는 라인만 인식합니다. 그 외 라인은 `None`을 반환합니다.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let (timestamp, _) = line.split_once(" - ")?;
    let (_, after_id_marker) = line.split_once("Unique ID: ")?;
    let (identity, _) = after_id_marker.split_once(", ")?;

    if timestamp.is_empty() || identity.is_empty() || !line.contains("Status: ") {
        return None;
    }

    let outcome = if line.contains(FAILED_MARKER) {
        LoginOutcome::Failure
    } else {
        LoginOutcome::Other
    };

    Some(LogEntry {
        timestamp: timestamp.to_string(),
        identity: identity.to_string(),
        outcome,
        raw: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAILED_LINE: &str =
        "2025-03-01 10:00:03 - Login attempt: OTP, Unique ID: UID-AAAA1111, Channel: console, Status: Failed";

    #[test]
    fn test_parse_failed_line() {
        let entry = parse_line(FAILED_LINE).unwrap();
        assert_eq!(entry.timestamp, "2025-03-01 10:00:03");
        assert_eq!(entry.identity, "UID-AAAA1111");
        assert_eq!(entry.outcome, LoginOutcome::Failure);
        assert_eq!(entry.raw, FAILED_LINE);
    }

    #[test]
    fn test_parse_success_line_is_other() {
        let line =
            "2025-03-01 10:05:00 - Login attempt: OTP, Unique ID: UID-BBBB2222, Status: Success";
        let entry = parse_line(line).unwrap();
        assert_eq!(entry.identity, "UID-BBBB2222");
        assert_eq!(entry.outcome, LoginOutcome::Other);
    }

    #[test]
    fn test_line_missing_unique_id_is_skipped() {
        let line = "2025-03-01 10:00:00 - Service restarted, Status: OK";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_line_missing_status_is_skipped() {
        let line = "2025-03-01 10:00:00 - Login attempt: OTP, Unique ID: UID-CCCC3333, Channel: console";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_line_missing_timestamp_separator_is_skipped() {
        let line = "Unique ID: UID-DDDD4444, Status: Failed";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_garbage_line_does_not_panic() {
        assert!(parse_line("").is_none());
        assert!(parse_line("완전히 다른 형식의 라인").is_none());
        assert!(parse_line(" - , Unique ID: , Status: ").is_none());
    }
}
