//! 제공자 원본 응답 아카이브 메타데이터.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 아카이브 키에 사용하는 날짜 형식.
pub const ARCHIVE_DATE_FORMAT: &str = "%Y%m%d";

/// 아카이브 파일 메타데이터.
///
/// (date, provider)마다 최대 하나만 존재합니다. 같은 키로 다시 기록하면
/// 메타데이터와 원본 바이트가 모두 덮어써집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveFile {
    /// 기준일
    pub date: NaiveDate,
    /// 제공자 ID
    pub provider: String,
    /// 마지막으로 성공한 수집 시각
    pub fetch_time: DateTime<Utc>,
    /// 저장소 키
    pub key: String,
}

impl ArchiveFile {
    /// 현재 시각으로 메타데이터를 생성합니다.
    pub fn new(date: NaiveDate, provider: impl Into<String>) -> Self {
        let provider = provider.into();
        Self {
            key: archive_key(date, &provider),
            date,
            provider,
            fetch_time: Utc::now(),
        }
    }
}

/// (date, provider)로부터 결정적인 저장소 키를 만듭니다.
///
/// 형식: `YYYYMMDD-<provider>.js`
pub fn archive_key(date: NaiveDate, provider: &str) -> String {
    format!("{}-{}.js", date.format(ARCHIVE_DATE_FORMAT), provider)
}
