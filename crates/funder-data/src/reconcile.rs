//! 기준가 조정(reconcile).
//!
//! 정규화된 레코드를 장부에 반영합니다.
//!
//! # 동작 방식
//!
//! 실행당 하나의 트랜잭션 안에서 레코드마다:
//! 1. 펀드를 코드 기준으로 upsert (신규: `is_focus = false`, 기존: 이름만 갱신)
//! 2. (date, fund) 기준가가 이미 있으면 건너뜀, 없으면 삽입
//!
//! 중복 확인은 매 레코드마다 트랜잭션 안에서 조회하므로, 같은 배치에 같은
//! (date, fund)가 두 번 있어도 한 건만 삽입됩니다. 하나라도 실패하면 펀드
//! upsert를 포함한 전체 배치가 롤백됩니다.

use crate::error::Result;
use crate::storage::{LedgerTx, NavLedger};
use funder_core::NormalizedRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 조정 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileStats {
    /// 받은 레코드 수
    pub received: usize,
    /// 새로 삽입한 기준가 수
    pub inserted: usize,
    /// 이미 있어서 건너뛴 기준가 수
    pub skipped: usize,
    /// 새로 생성한 펀드 수
    pub funds_created: usize,
    /// 이름을 갱신한 기존 펀드 수 (중복 포함)
    pub funds_updated: usize,
}

/// 기준가 조정기.
pub struct Reconciler<'a> {
    ledger: &'a dyn NavLedger,
}

impl<'a> Reconciler<'a> {
    pub fn new(ledger: &'a dyn NavLedger) -> Self {
        Self { ledger }
    }

    /// 레코드를 원자적으로 반영합니다.
    ///
    /// # Errors
    ///
    /// 저장소 오류가 나면 트랜잭션을 롤백하고 오류를 반환합니다.
    /// 이 경우 이번 실행의 어떤 변경도 남지 않습니다.
    pub async fn reconcile(&self, records: &[NormalizedRecord]) -> Result<ReconcileStats> {
        info!(count = records.len(), "기준가 장부 갱신 시작");

        let mut tx = self.ledger.begin().await?;

        match apply(tx.as_mut(), records).await {
            Ok(stats) => {
                tx.commit().await?;
                info!(
                    received = stats.received,
                    inserted = stats.inserted,
                    skipped = stats.skipped,
                    funds_created = stats.funds_created,
                    "기준가 장부 갱신 완료"
                );
                Ok(stats)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "롤백 실패");
                }
                Err(e)
            }
        }
    }
}

async fn apply(tx: &mut dyn LedgerTx, records: &[NormalizedRecord]) -> Result<ReconcileStats> {
    let mut stats = ReconcileStats {
        received: records.len(),
        ..Default::default()
    };

    for record in records {
        let upsert = tx.upsert_fund(&record.fund).await?;
        if upsert.created {
            stats.funds_created += 1;
        } else {
            stats.funds_updated += 1;
        }

        let fund_id = upsert.fund.id;
        let date = record.net_value.date;

        if tx.net_value_exists(date, fund_id).await? {
            stats.skipped += 1;
            debug!(code = %record.fund.code, date = %date, "기준가 이미 존재, 건너뜀");
            continue;
        }

        tx.insert_net_value(fund_id, &record.net_value).await?;
        stats.inserted += 1;
    }

    Ok(stats)
}
