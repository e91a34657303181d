//! # Funder Core
//!
//! 펀드 순자산가치(NAV) 수집 시스템의 핵심 도메인 모델을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 펀드 식별 정보 (`Fund`, `FundRef`)
//! - 일별 기준가 관측값 (`NetValue`, `NetValueDraft`)
//! - 원본 응답 아카이브 메타데이터 (`ArchiveFile`)
//! - NAV 정밀도 유틸리티
//! - 로깅 인프라

pub mod domain;
pub mod logging;
pub mod types;

pub use domain::*;
pub use logging::*;
pub use types::*;
