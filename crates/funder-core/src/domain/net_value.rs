//! 일별 기준가 관측값.

use crate::domain::FundRef;
use crate::types::{quantize_nav, Nav};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 저장소에 기록된 기준가.
///
/// (date, fund) 쌍마다 최대 하나만 존재하며, 한 번 기록되면 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetValue {
    /// 내부 ID
    pub id: i64,
    /// 기준일
    pub date: NaiveDate,
    /// 펀드 ID
    pub fund_id: i64,
    /// 단위 기준가
    pub nav: Nav,
    /// 누적 기준가
    pub acc_nav: Nav,
    /// 수정 기준가 (제공자에 따라 없음)
    pub adjust_nav: Option<Nav>,
}

/// 아직 펀드에 연결되지 않은 기준가 초안.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetValueDraft {
    /// 기준일
    pub date: NaiveDate,
    /// 단위 기준가
    pub nav: Nav,
    /// 누적 기준가
    pub acc_nav: Nav,
    /// 수정 기준가
    pub adjust_nav: Option<Nav>,
}

impl NetValueDraft {
    /// 새 초안을 생성합니다. 값은 저장 정밀도로 반올림됩니다.
    pub fn new(date: NaiveDate, nav: Nav, acc_nav: Nav, adjust_nav: Option<Nav>) -> Self {
        Self {
            date,
            nav: quantize_nav(nav),
            acc_nav: quantize_nav(acc_nav),
            adjust_nav: adjust_nav.map(quantize_nav),
        }
    }

    /// 펀드에 연결된 기준가로 변환합니다.
    pub fn bind(&self, id: i64, fund_id: i64) -> NetValue {
        NetValue {
            id,
            date: self.date,
            fund_id,
            nav: self.nav,
            acc_nav: self.acc_nav,
            adjust_nav: self.adjust_nav,
        }
    }
}

/// 정규화된 제공자 레코드 (펀드 식별 정보 + 기준가 초안).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub fund: FundRef,
    pub net_value: NetValueDraft,
}

impl NormalizedRecord {
    pub fn new(fund: FundRef, net_value: NetValueDraft) -> Self {
        Self { fund, net_value }
    }
}
