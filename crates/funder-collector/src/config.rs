//! 환경변수 기반 설정 모듈.

use crate::error::CollectorError;
use crate::schedule::{SchedulePolicy, DEFAULT_CUTOVER_HOUR};
use crate::Result;
use chrono_tz::Tz;
use funder_data::provider::WMCLOUD_PROVIDER_ID;
use funder_data::{DatabaseConfig, ProviderSettings};
use std::path::PathBuf;
use std::time::Duration;

/// 기본 아카이브 디렉터리
pub const DEFAULT_ARCHIVE_ROOT: &str = "media/fund-file";

/// Collector 전체 설정
#[derive(Debug)]
pub struct CollectorConfig {
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 사용할 제공자 ID
    pub provider_id: String,
    /// 제공자 생성 설정 (토큰, URL, 타임아웃)
    pub provider: ProviderSettings,
    /// 원본 응답 아카이브 디렉터리
    pub archive_root: PathBuf,
    /// 기본 기준일 정책
    pub schedule: SchedulePolicy,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정을 구성합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            CollectorError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
        })?;

        let token = lookup("PROVIDER_TOKEN")
            .or_else(|| lookup("WMCLOUD_TOKEN"))
            .ok_or_else(|| {
                CollectorError::Config(
                    "PROVIDER_TOKEN (또는 WMCLOUD_TOKEN) 환경변수가 설정되지 않았습니다"
                        .to_string(),
                )
            })?;

        let mut provider = ProviderSettings::new(token).with_timeout(Duration::from_secs(
            parse_or(&lookup, "PROVIDER_TIMEOUT_SECS", 30),
        ));
        if let Some(base_url) = lookup("PROVIDER_BASE_URL") {
            provider = provider.with_base_url(base_url);
        }

        let timezone = match lookup("FUNDER_TIMEZONE") {
            Some(name) => Some(name.parse::<Tz>().map_err(|e| {
                CollectorError::Config(format!("FUNDER_TIMEZONE 값이 올바르지 않습니다: {}", e))
            })?),
            None => None,
        };

        let cutover_hour = parse_or(&lookup, "SCHEDULE_CUTOVER_HOUR", DEFAULT_CUTOVER_HOUR);
        if cutover_hour > 23 {
            return Err(CollectorError::Config(format!(
                "SCHEDULE_CUTOVER_HOUR는 0~23이어야 합니다: {}",
                cutover_hour
            )));
        }

        let mut database = DatabaseConfig::new(database_url);
        database.max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5);

        Ok(Self {
            database,
            provider_id: lookup("FETCHER_PROVIDER")
                .unwrap_or_else(|| WMCLOUD_PROVIDER_ID.to_string()),
            provider,
            archive_root: lookup("ARCHIVE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_ROOT)),
            schedule: SchedulePolicy::new(cutover_hour, timezone),
        })
    }
}

/// 값을 파싱 (없거나 실패 시 기본값 사용)
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
