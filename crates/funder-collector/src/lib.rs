//! Daily fund net value collector.
//!
//! 이 crate는 일별 펀드 기준가 수집 실행을 제공합니다:
//! - 환경변수 기반 설정
//! - 기본 수집 기준일 정책 (오전 8시 이전이면 전일)
//! - 수집 → 원본 아카이브 → 장부 반영 파이프라인
//! - 아카이브 원본 재처리(replay)

pub mod config;
pub mod error;
pub mod pipeline;
pub mod schedule;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use pipeline::{Pipeline, RunOutcome, RunStatus};
pub use schedule::{default_date, SchedulePolicy};
pub use stats::RunStats;
