//! 에러 타입 정의.

use funder_data::{DataError, FetchError};
use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(String),
    /// 제공자 수집 에러 (전송, 프로토콜, 응답 코드, 레코드)
    Fetch(FetchError),
    /// 저장소/아카이브 에러
    Data(DataError),
    /// 재처리할 아카이브 없음
    ArchiveMissing(String),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Fetch(e) => write!(f, "Fetch failed: {}", e),
            Self::Data(e) => write!(f, "Storage error: {}", e),
            Self::ArchiveMissing(key) => write!(f, "Archive not found: {}", key),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Data(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FetchError> for CollectorError {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
