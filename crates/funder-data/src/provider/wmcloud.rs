//! WMCloud 펀드 기준가 API 클라이언트.
//!
//! 일별 전체 펀드 기준가를 한 번의 GET 요청으로 가져옵니다.
//!
//! # 요청
//!
//! ```text
//! GET {base_url}/data/v1/api/fund/getFundNav.json?dataDate=YYYYMMDD
//! Authorization: Bearer <token>
//! ```
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use funder_data::provider::{ProviderSettings, WmcloudClient, NavProvider};
//!
//! let client = WmcloudClient::new(&ProviderSettings::new("YOUR_TOKEN"))?;
//! let outcome = client.fetch(NaiveDate::from_ymd_opt(2015, 6, 30).unwrap()).await?;
//! ```

use super::{
    normalize, parse_envelope, FetchError, FetchOutcome, FieldMap, NavProvider, ProviderSettings,
};
use crate::error::{DataError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use funder_core::NormalizedRecord;
use secrecy::{ExposeSecret, SecretString};

/// 레지스트리에 등록되는 제공자 ID.
pub const WMCLOUD_PROVIDER_ID: &str = "wmcloud";

/// 기본 API 주소.
pub const WMCLOUD_BASE_URL: &str = "https://api.wmcloud.com";

const NAV_PATH: &str = "/data/v1/api/fund/getFundNav.json";

/// URL에 사용하는 날짜 형식.
const DATE_FORMAT: &str = "%Y%m%d";

/// WMCloud 레코드 필드 이름.
pub const WMCLOUD_FIELDS: FieldMap = FieldMap {
    code: "ticker",
    name: "secShortName",
    date: "endDate",
    nav: "NAV",
    acc_nav: "ACCUM_NAV",
    adjust_nav: "ADJUST_NAV",
};

/// WMCloud API 클라이언트.
pub struct WmcloudClient {
    id: String,
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl WmcloudClient {
    /// 새로운 클라이언트 생성.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DataError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            id: WMCLOUD_PROVIDER_ID.to_string(),
            client,
            token: SecretString::from(settings.token.expose_secret().to_string()),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| WMCLOUD_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// 제공자 ID를 바꿉니다 (미러 등 다른 ID로 등록할 때).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// 레지스트리 팩토리.
    pub fn factory(id: &str, settings: &ProviderSettings) -> Result<Box<dyn NavProvider>> {
        Ok(Box::new(Self::new(settings)?.with_id(id)))
    }

    /// 기준일의 요청 URL.
    pub fn request_url(&self, date: NaiveDate) -> String {
        format!(
            "{}{}?dataDate={}",
            self.base_url,
            NAV_PATH,
            date.format(DATE_FORMAT)
        )
    }
}

#[async_trait]
impl NavProvider for WmcloudClient {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self, date: NaiveDate) -> std::result::Result<FetchOutcome, FetchError> {
        let url = self.request_url(date);
        tracing::info!(url = %url, "WMCloud 기준가 요청");

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Transport(format!(
                "WMCloud API 오류 [{}]: {}",
                status, body
            )));
        }

        let raw = response.bytes().await?.to_vec();
        let records = self.parse(&raw)?;

        Ok(FetchOutcome { raw, records })
    }

    fn parse(&self, raw: &[u8]) -> std::result::Result<Vec<NormalizedRecord>, FetchError> {
        let envelope = parse_envelope(raw)?;

        tracing::info!(
            code = %envelope.code,
            message = %envelope.message,
            count = envelope.data.len(),
            "WMCloud 응답 수신"
        );

        if !envelope.code.is_success() {
            return Err(FetchError::Provider {
                code: envelope.code,
                message: envelope.message,
            });
        }

        envelope
            .data
            .iter()
            .map(|record| normalize(record, &WMCLOUD_FIELDS))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ResponseCode;
    use rust_decimal_macros::dec;

    const NAV_BODY: &str = r#"{
        "retCode": 1,
        "retMsg": "Success",
        "data": [
            {"ticker": "000001", "secShortName": "华夏成长", "endDate": "2015-06-30",
             "NAV": 1.234, "ACCUM_NAV": 3.456, "ADJUST_NAV": 4.5678},
            {"ticker": "000003", "secShortName": "中海可转债A", "endDate": "2015-06-30",
             "NAV": 0.912, "ACCUM_NAV": 1.102}
        ]
    }"#;

    fn client_for(server: &mockito::ServerGuard) -> WmcloudClient {
        let settings = ProviderSettings::new("test-token").with_base_url(server.url());
        WmcloudClient::new(&settings).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 6, 30).unwrap()
    }

    #[test]
    fn test_request_url() {
        let settings = ProviderSettings::new("t").with_base_url("http://localhost:8080/");
        let client = WmcloudClient::new(&settings).unwrap();

        assert_eq!(
            client.request_url(date()),
            "http://localhost:8080/data/v1/api/fund/getFundNav.json?dataDate=20150630"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data/v1/api/fund/getFundNav.json")
            .match_query(mockito::Matcher::UrlEncoded(
                "dataDate".into(),
                "20150630".into(),
            ))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(NAV_BODY)
            .expect(1)
            .create_async()
            .await;

        let outcome = client_for(&server).fetch(date()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(outcome.raw, NAV_BODY.as_bytes());
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].fund.code, "000001");
        assert_eq!(outcome.records[1].net_value.nav, dec!(0.912));
        assert_eq!(outcome.records[1].net_value.adjust_nav, None);
    }

    #[tokio::test]
    async fn test_fetch_non_success_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code": -5, "message": "Server Busy", "data": null}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch(date()).await;

        match result {
            Err(FetchError::Provider { code, message }) => {
                assert_eq!(code, ResponseCode::ServerBusy);
                assert_eq!(message, "Server Busy");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_transport() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .expect(1)
            .create_async()
            .await;

        let result = client_for(&server).fetch(date()).await;

        // 재시도 없이 한 번만 호출
        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport() {
        let settings = ProviderSettings::new("t").with_base_url("http://127.0.0.1:9");
        let client = WmcloudClient::new(&settings).unwrap();

        let result = client.fetch(date()).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_fetch_malformed_record_aborts() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"retCode": 1, "retMsg": "Success", "data": [
                    {"ticker": "000001", "secShortName": "A", "endDate": "2015-06-30",
                     "NAV": 1.0, "ACCUM_NAV": 1.0},
                    {"ticker": "000002", "secShortName": "B", "endDate": "2015-06-30",
                     "ACCUM_NAV": 1.0}
                ]}"#,
            )
            .create_async()
            .await;

        let result = client_for(&server).fetch(date()).await;
        assert!(matches!(result, Err(FetchError::MalformedRecord(_))));
    }

    #[test]
    fn test_parse_empty_success() {
        let settings = ProviderSettings::new("t");
        let client = WmcloudClient::new(&settings).unwrap();

        let records = client
            .parse(br#"{"retCode": 1, "retMsg": "Success"}"#)
            .unwrap();
        assert!(records.is_empty());
    }
}
