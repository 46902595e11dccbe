//! Incremental auth-log monitor for AuthWatch.
//!
//! 이 crate는 append-only 인증 로그를 감시하는 데몬 바이너리를 제공합니다:
//! - 바이트 오프셋 기반 증분 로그 읽기 (tailer)
//! - 로그 라인 파싱 및 ID별 실패 윈도우 추적
//! - 임계값 도달 시 중복 제거된 경고 발송

pub mod config;
pub mod engine;
pub mod monitor;
pub mod parser;
pub mod stats;
pub mod tailer;
pub mod tracker;

pub use config::{MonitorConfig, SuppressionPolicy};
pub use engine::{AlertDispatcher, AlertEngine, AlertJob, ObserveOutcome};
pub use monitor::Monitor;
pub use stats::MonitorStats;
pub use tailer::LogTailer;
pub use tracker::FailureWindowTracker;
