//! # AuthWatch Notification
//!
//! 보안 경고 알림 서비스.
//!
//! 지원 채널:
//! - Telegram
//!
//! 경고 발송 시 호스트/네트워크/위치 정보를 수집하는 enrichment
//! provider를 함께 제공합니다. 모든 수집 항목은 best-effort이며,
//! 개별 조회 실패는 placeholder 값으로 대체됩니다.

pub mod enrichment;
pub mod telegram;
pub mod types;

pub use enrichment::*;
pub use telegram::*;
pub use types::*;
