//! 제공자 레코드 정규화.
//!
//! 제공자별 필드 이름을 `FieldMap`으로 기술하고, JSON 레코드를
//! 도메인 레코드(`FundRef` + `NetValueDraft`)로 변환합니다.
//! 값의 크기는 검사하지 않으며, 저장 정밀도 초과는 저장소에서 거부됩니다.

use super::FetchError;
use chrono::NaiveDate;
use funder_core::{FundRef, NetValueDraft, NormalizedRecord};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// 제공자 레코드의 필드 이름.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    /// 펀드 코드 (티커)
    pub code: &'static str,
    /// 펀드 약칭
    pub name: &'static str,
    /// 기준일 (기간 종료일)
    pub date: &'static str,
    /// 단위 기준가
    pub nav: &'static str,
    /// 누적 기준가
    pub acc_nav: &'static str,
    /// 수정 기준가 (선택)
    pub adjust_nav: &'static str,
}

/// 기준일 형식 (우선순위 순).
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// 레코드 하나를 정규화합니다.
///
/// # Errors
///
/// 필수 필드가 없거나 날짜/숫자를 파싱할 수 없으면 `FetchError::MalformedRecord`.
pub fn normalize(raw: &Value, fields: &FieldMap) -> Result<NormalizedRecord, FetchError> {
    let object = raw
        .as_object()
        .ok_or_else(|| FetchError::MalformedRecord(format!("레코드가 객체가 아닙니다: {}", raw)))?;

    let code = required_text(object, fields.code)?;
    let name = required_text(object, fields.name)?;

    let date_text = required_text(object, fields.date)?;
    let date = parse_date(&date_text).ok_or_else(|| {
        FetchError::MalformedRecord(format!(
            "{} 날짜 형식 오류 (code={}): {}",
            fields.date, code, date_text
        ))
    })?;

    let nav = required_decimal(object, fields.nav, &code)?;
    let acc_nav = required_decimal(object, fields.acc_nav, &code)?;
    let adjust_nav = match object.get(fields.adjust_nav) {
        None | Some(Value::Null) => None,
        Some(value) => Some(to_decimal(value).ok_or_else(|| {
            FetchError::MalformedRecord(format!(
                "{} 숫자 형식 오류 (code={}): {}",
                fields.adjust_nav, code, value
            ))
        })?),
    };

    Ok(NormalizedRecord::new(
        FundRef::new(code, name),
        NetValueDraft::new(date, nav, acc_nav, adjust_nav),
    ))
}

fn required<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Value, FetchError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(FetchError::MalformedRecord(format!(
            "필수 필드 누락: {}",
            field
        ))),
        Some(value) => Ok(value),
    }
}

fn required_text(object: &Map<String, Value>, field: &str) -> Result<String, FetchError> {
    match required(object, field)? {
        Value::String(s) => Ok(s.trim().to_string()),
        // 숫자로 온 코드는 그대로 문자열화 (0 채우기 없음: 1 → "1")
        Value::Number(n) => Ok(n.to_string()),
        other => Err(FetchError::MalformedRecord(format!(
            "{} 필드가 문자열이 아닙니다: {}",
            field, other
        ))),
    }
}

fn required_decimal(
    object: &Map<String, Value>,
    field: &str,
    code: &str,
) -> Result<Decimal, FetchError> {
    let value = required(object, field)?;
    to_decimal(value).ok_or_else(|| {
        FetchError::MalformedRecord(format!(
            "{} 숫자 형식 오류 (code={}): {}",
            field, code, value
        ))
    })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// JSON 숫자 또는 숫자 문자열("1,234.5678")을 Decimal로 변환합니다.
fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', ""),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
