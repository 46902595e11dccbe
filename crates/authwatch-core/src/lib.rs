//! # AuthWatch Core
//!
//! 인증 로그 모니터의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 모니터링 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 로그 엔트리 및 로그인 결과 타입
//! - 에러 분류 체계
//! - 로깅 인프라

pub mod error;
pub mod logging;
pub mod types;

pub use error::*;
pub use logging::*;
pub use types::*;
