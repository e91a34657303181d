//! 펀드 식별 정보.

use serde::{Deserialize, Serialize};

/// 저장소에 기록된 펀드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fund {
    /// 내부 ID
    pub id: i64,
    /// 펀드 코드 (시스템 내 고유)
    pub code: String,
    /// 표시 이름
    pub name: String,
    /// 관심 펀드 여부 (사용자 지정, 수집 과정에서 변경하지 않음)
    pub is_focus: bool,
}

/// 제공자 레코드에서 읽은 펀드 식별 정보.
///
/// 저장소 ID가 없는 상태이며, reconcile 단계에서 `Fund`로 upsert 됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FundRef {
    /// 펀드 코드
    pub code: String,
    /// 표시 이름
    pub name: String,
}

impl FundRef {
    /// 새 펀드 참조를 생성합니다.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// 펀드 upsert 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundUpsert {
    /// upsert 후의 펀드
    pub fund: Fund,
    /// 새로 생성되었는지 여부
    pub created: bool,
}
