//! 제공자 응답 봉투(envelope)와 응답 코드 체계.
//!
//! 응답 본문 형식:
//!
//! ```json
//! { "retCode": 1, "retMsg": "Success", "data": [ ... ] }
//! ```
//!
//! API 버전에 따라 코드 키는 `retCode` 또는 `code`, 메시지 키는 `retMsg` 또는
//! `message`로 옵니다. 둘 다 있으면 앞의 키를 사용합니다.

use super::FetchError;
use serde_json::Value;
use std::fmt;

/// 응답 코드 키 (우선순위 순).
pub const CODE_KEYS: [&str; 2] = ["retCode", "code"];

/// 응답 메시지 키 (우선순위 순).
pub const MESSAGE_KEYS: [&str; 2] = ["retMsg", "message"];

/// 제공자 응답 코드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// 성공 (1)
    Success,
    /// 반환 데이터 없음 (-1)
    NoDataReturned,
    /// 잘못된 요청 파라미터 (-2)
    IllegalRequestParameter,
    /// 서비스 일시 중단 (-3)
    ServiceSuspend,
    /// 서버 에러 (-4)
    ServerError,
    /// 서버 과부하 (-5)
    ServerBusy,
    /// 체계에 없는 코드
    Unknown(i64),
}

impl ResponseCode {
    /// 숫자 코드를 변환합니다.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Success,
            -1 => Self::NoDataReturned,
            -2 => Self::IllegalRequestParameter,
            -3 => Self::ServiceSuspend,
            -4 => Self::ServerError,
            -5 => Self::ServerBusy,
            other => Self::Unknown(other),
        }
    }

    /// 숫자 코드를 반환합니다.
    pub fn code(&self) -> i64 {
        match self {
            Self::Success => 1,
            Self::NoDataReturned => -1,
            Self::IllegalRequestParameter => -2,
            Self::ServiceSuspend => -3,
            Self::ServerError => -4,
            Self::ServerBusy => -5,
            Self::Unknown(code) => *code,
        }
    }

    /// 문자열로 변환
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NoDataReturned => "no_data_returned",
            Self::IllegalRequestParameter => "illegal_request_parameter",
            Self::ServiceSuspend => "service_suspend",
            Self::ServerError => "server_error",
            Self::ServerBusy => "server_busy",
            Self::Unknown(_) => "unknown",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.as_str(), self.code())
    }
}

/// 해석된 응답 봉투.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// 응답 코드
    pub code: ResponseCode,
    /// 응답 메시지
    pub message: String,
    /// 레코드 목록 (`data`가 없거나 null이면 빈 목록)
    pub data: Vec<Value>,
}

/// 응답 본문을 봉투로 해석합니다.
///
/// 응답 코드가 성공이 아니어도 봉투 자체는 반환합니다.
/// 코드 판정은 호출하는 쪽의 책임입니다.
pub fn parse_envelope(body: &[u8]) -> Result<Envelope, FetchError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| FetchError::Protocol(format!("응답 본문이 UTF-8이 아닙니다: {}", e)))?;
    let root: Value = serde_json::from_str(text)
        .map_err(|e| FetchError::Protocol(format!("응답 본문이 JSON이 아닙니다: {}", e)))?;
    let object = root
        .as_object()
        .ok_or_else(|| FetchError::Protocol("응답 본문이 JSON 객체가 아닙니다".to_string()))?;

    let code_value = first_present(object, &CODE_KEYS).ok_or_else(|| {
        FetchError::Protocol(format!("응답 코드 키가 없습니다 ({})", CODE_KEYS.join("/")))
    })?;
    let code = code_value
        .as_i64()
        .map(ResponseCode::from_code)
        .ok_or_else(|| FetchError::Protocol(format!("응답 코드가 정수가 아닙니다: {}", code_value)))?;

    let message = match first_present(object, &MESSAGE_KEYS) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(FetchError::Protocol(format!(
                "응답 메시지 키가 없습니다 ({})",
                MESSAGE_KEYS.join("/")
            )))
        }
    };

    let data = match object.get("data") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            return Err(FetchError::Protocol(format!(
                "data 필드가 배열이 아닙니다: {}",
                other
            )))
        }
    };

    Ok(Envelope {
        code,
        message,
        data,
    })
}

fn first_present<'a>(object: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_roundtrip() {
        for code in [1, -1, -2, -3, -4, -5, 42] {
            assert_eq!(ResponseCode::from_code(code).code(), code);
        }
        assert_eq!(ResponseCode::from_code(-5), ResponseCode::ServerBusy);
        assert_eq!(ResponseCode::from_code(7), ResponseCode::Unknown(7));
        assert_eq!(ResponseCode::ServerBusy.to_string(), "server_busy(-5)");
    }

    #[test]
    fn test_alternative_keys_parse_identically() {
        let legacy = br#"{"retCode": -1, "retMsg": "No Data Returned", "data": null}"#;
        let current = br#"{"code": -1, "message": "No Data Returned", "data": null}"#;

        let a = parse_envelope(legacy).unwrap();
        let b = parse_envelope(current).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.code, ResponseCode::NoDataReturned);
        assert_eq!(a.message, "No Data Returned");
    }

    #[test]
    fn test_first_key_takes_precedence() {
        let body = br#"{"retCode": 1, "code": -4, "retMsg": "Success", "message": "Server Error"}"#;
        let envelope = parse_envelope(body).unwrap();

        assert_eq!(envelope.code, ResponseCode::Success);
        assert_eq!(envelope.message, "Success");
    }

    #[test]
    fn test_missing_or_null_data_is_empty() {
        let absent = parse_envelope(br#"{"code": 1, "message": "Success"}"#).unwrap();
        let null = parse_envelope(br#"{"code": 1, "message": "Success", "data": null}"#).unwrap();

        assert!(absent.data.is_empty());
        assert!(null.data.is_empty());
    }

    #[test]
    fn test_missing_code_key_is_protocol_error() {
        let result = parse_envelope(br#"{"status": 1, "message": "Success", "data": []}"#);
        assert!(matches!(result, Err(FetchError::Protocol(_))));
    }

    #[test]
    fn test_missing_message_key_is_protocol_error() {
        let result = parse_envelope(br#"{"retCode": 1, "data": []}"#);
        assert!(matches!(result, Err(FetchError::Protocol(_))));
    }

    #[test]
    fn test_invalid_body_is_protocol_error() {
        assert!(matches!(
            parse_envelope(b"<html>busy</html>"),
            Err(FetchError::Protocol(_))
        ));
        assert!(matches!(
            parse_envelope(&[0xff, 0xfe, 0x00]),
            Err(FetchError::Protocol(_))
        ));
        assert!(matches!(parse_envelope(b"[1, 2]"), Err(FetchError::Protocol(_))));
        assert!(matches!(
            parse_envelope(br#"{"code": "1", "message": "Success"}"#),
            Err(FetchError::Protocol(_))
        ));
    }
}
