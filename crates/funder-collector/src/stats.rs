//! 실행 통계 구조체.

use funder_data::ReconcileStats;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 수집 실행 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// 받은 레코드 수
    pub received: usize,
    /// 새로 삽입한 기준가 수
    pub inserted: usize,
    /// 이미 있어서 건너뛴 기준가 수
    pub skipped: usize,
    /// 새로 생성한 펀드 수
    pub funds_created: usize,
    /// 이름을 갱신한 기존 펀드 수
    pub funds_updated: usize,
    /// 원본 응답 아카이브 여부
    pub archived: bool,
    /// 아카이브한 원본 크기 (bytes)
    pub archive_bytes: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 장부 반영 결과를 합칩니다.
    pub fn absorb(&mut self, reconcile: ReconcileStats) {
        self.received = reconcile.received;
        self.inserted = reconcile.inserted;
        self.skipped = reconcile.skipped;
        self.funds_created = reconcile.funds_created;
        self.funds_updated = reconcile.funds_updated;
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            received = self.received,
            inserted = self.inserted,
            skipped = self.skipped,
            funds_created = self.funds_created,
            funds_updated = self.funds_updated,
            archived = self.archived,
            archive_bytes = self.archive_bytes,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
