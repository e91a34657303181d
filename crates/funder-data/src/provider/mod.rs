//! 기준가 제공자 모듈.
//!
//! 외부 데이터 소스에서 일별 펀드 기준가를 가져오는 Provider들을 정의합니다.
//!
//! ## 구성
//! - `NavProvider`: 제공자 공통 trait (날짜 하나에 대해 네트워크 호출 1회)
//! - `envelope`: 응답 봉투(envelope)와 응답 코드 체계
//! - `normalize`: 제공자 레코드를 도메인 레코드로 변환
//! - `registry`: 제공자 ID 문자열 → 팩토리 매핑
//!
//! ## WMCloud
//! - `WmcloudClient`: `getFundNav.json` 일별 기준가 API 클라이언트 (Bearer 토큰 필요)

pub mod envelope;
pub mod normalize;
pub mod registry;
pub mod wmcloud;

pub use envelope::{parse_envelope, Envelope, ResponseCode};
pub use normalize::{normalize, FieldMap};
pub use registry::{ProviderFactory, ProviderRegistry};
pub use wmcloud::{WmcloudClient, WMCLOUD_PROVIDER_ID};

use async_trait::async_trait;
use chrono::NaiveDate;
use funder_core::NormalizedRecord;
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// 에러 타입
// =============================================================================

/// 제공자 수집 에러.
///
/// 모든 변형은 현재 실행에서 종료 조건이며, 내부 재시도는 없습니다.
#[derive(Debug, Error)]
pub enum FetchError {
    /// 네트워크 연결 실패 또는 2xx 이외의 HTTP 상태
    #[error("Transport error: {0}")]
    Transport(String),

    /// 응답 봉투에 인식 가능한 코드/메시지 키가 없거나 JSON이 아님
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// 제공자가 성공 이외의 응답 코드를 반환
    #[error("Provider error [{code}]: {message}")]
    Provider { code: ResponseCode, message: String },

    /// 레코드 정규화 실패 (필수 필드 누락, 파싱 실패)
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

// =============================================================================
// NavProvider Trait
// =============================================================================

/// 한 번의 수집 결과.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// 제공자 원본 응답 바이트 (아카이브 대상)
    pub raw: Vec<u8>,
    /// 정규화된 레코드
    pub records: Vec<NormalizedRecord>,
}

/// 기준가 제공자 trait.
///
/// 각 데이터 소스별로 이 trait를 구현하고 `ProviderRegistry`에 팩토리를 등록합니다.
#[async_trait]
pub trait NavProvider: Send + Sync {
    /// 제공자 ID (아카이브 키, 로그에 사용).
    fn id(&self) -> &str;

    /// 기준일의 기준가를 수집합니다.
    ///
    /// 네트워크 호출은 정확히 한 번이며 재시도하지 않습니다. 레코드 하나라도
    /// 정규화에 실패하면 전체 수집이 실패합니다 (부분 결과 없음).
    ///
    /// # Errors
    ///
    /// - `FetchError::Transport`: 연결 실패, 2xx 이외의 상태
    /// - `FetchError::Protocol`: 응답 봉투 형식 오류
    /// - `FetchError::Provider`: 성공 이외의 응답 코드
    /// - `FetchError::MalformedRecord`: 레코드 정규화 실패
    async fn fetch(&self, date: NaiveDate) -> Result<FetchOutcome, FetchError>;

    /// 원본 응답 바이트를 해석합니다.
    ///
    /// `fetch`와 같은 규칙을 적용하며, 아카이브 재처리(replay)에 사용됩니다.
    fn parse(&self, raw: &[u8]) -> Result<Vec<NormalizedRecord>, FetchError>;
}

/// 제공자 생성 설정.
///
/// 프로세스 시작 시 한 번 구성되어 팩토리에 전달됩니다.
#[derive(Debug)]
pub struct ProviderSettings {
    /// Bearer 인증 토큰
    pub token: SecretString,
    /// 기본 URL 재정의 (미러, 테스트 서버)
    pub base_url: Option<String>,
    /// 전송 계층 타임아웃
    pub timeout: Duration,
}

impl ProviderSettings {
    /// 기본 타임아웃(30초)으로 설정을 생성합니다.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// 기본 URL을 재정의합니다.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
