//! 메모리 장부 구현.
//!
//! PostgreSQL 구현과 같은 규칙을 따릅니다:
//! - 펀드 코드 고유, (date, fund) 기준가 고유
//! - `NUMERIC(8, 4)` 범위를 넘는 기준가는 거부
//! - 트랜잭션은 커밋 시점에 한 번에 반영, drop/rollback 시 전부 폐기

use super::{LedgerTx, NavLedger};
use crate::error::{DataError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use funder_core::{
    fits_nav_precision, ArchiveFile, Fund, FundRef, FundUpsert, NetValue, NetValueDraft,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
struct LedgerState {
    /// code → 펀드
    funds: BTreeMap<String, Fund>,
    /// (date, fund_id) → 기준가
    net_values: BTreeMap<(NaiveDate, i64), NetValue>,
    /// (date, provider) → 아카이브 메타데이터
    archives: BTreeMap<(NaiveDate, String), ArchiveFile>,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<LedgerState>,
    next_id: AtomicI64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// 프로세스 메모리 기준가 장부.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    shared: Arc<Shared>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 전체 펀드 (코드 순).
    pub fn funds(&self) -> Vec<Fund> {
        self.shared.lock().funds.values().cloned().collect()
    }

    pub fn fund(&self, code: &str) -> Option<Fund> {
        self.shared.lock().funds.get(code).cloned()
    }

    /// 전체 기준가 ((date, fund_id) 순).
    pub fn net_values(&self) -> Vec<NetValue> {
        self.shared.lock().net_values.values().cloned().collect()
    }

    pub fn archives(&self) -> Vec<ArchiveFile> {
        self.shared.lock().archives.values().cloned().collect()
    }

    /// 관심 펀드 플래그를 설정합니다 (외부 UI의 큐레이션 동작).
    pub fn set_focus(&self, code: &str, is_focus: bool) -> Result<()> {
        let mut state = self.shared.lock();
        let fund = state
            .funds
            .get_mut(code)
            .ok_or_else(|| DataError::NotFound(format!("fund {}", code)))?;
        fund.is_focus = is_focus;
        Ok(())
    }
}

#[async_trait]
impl NavLedger for MemoryLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>> {
        let snapshot = self.shared.lock().clone();
        Ok(Box::new(MemoryLedgerTx {
            shared: Arc::clone(&self.shared),
            view: snapshot,
            fund_writes: BTreeMap::new(),
            inserted: Vec::new(),
        }))
    }

    async fn record_archive(&self, file: &ArchiveFile) -> Result<ArchiveFile> {
        let mut state = self.shared.lock();
        state
            .archives
            .insert((file.date, file.provider.clone()), file.clone());
        Ok(file.clone())
    }

    async fn find_archive(&self, date: NaiveDate, provider: &str) -> Result<Option<ArchiveFile>> {
        Ok(self
            .shared
            .lock()
            .archives
            .get(&(date, provider.to_string()))
            .cloned())
    }
}

/// 메모리 장부 트랜잭션.
///
/// 시작 시점의 스냅샷 위에서 변경을 쌓고, 커밋 시 공유 상태에 반영합니다.
pub struct MemoryLedgerTx {
    shared: Arc<Shared>,
    view: LedgerState,
    /// 이번 트랜잭션에서 upsert한 펀드 (code → name)
    fund_writes: BTreeMap<String, String>,
    inserted: Vec<NetValue>,
}

#[async_trait]
impl LedgerTx for MemoryLedgerTx {
    async fn upsert_fund(&mut self, fund: &FundRef) -> Result<FundUpsert> {
        let result = match self.view.funds.get_mut(&fund.code) {
            Some(existing) => {
                existing.name = fund.name.clone();
                FundUpsert {
                    fund: existing.clone(),
                    created: false,
                }
            }
            None => {
                let created = Fund {
                    id: self.shared.next_id(),
                    code: fund.code.clone(),
                    name: fund.name.clone(),
                    is_focus: false,
                };
                self.view.funds.insert(fund.code.clone(), created.clone());
                FundUpsert {
                    fund: created,
                    created: true,
                }
            }
        };

        self.fund_writes
            .insert(fund.code.clone(), fund.name.clone());
        Ok(result)
    }

    async fn net_value_exists(&mut self, date: NaiveDate, fund_id: i64) -> Result<bool> {
        Ok(self.view.net_values.contains_key(&(date, fund_id)))
    }

    async fn insert_net_value(&mut self, fund_id: i64, draft: &NetValueDraft) -> Result<NetValue> {
        let in_range = fits_nav_precision(draft.nav)
            && fits_nav_precision(draft.acc_nav)
            && draft.adjust_nav.map_or(true, fits_nav_precision);
        if !in_range {
            return Err(DataError::QueryError(format!(
                "numeric field overflow: {} / {} / {:?}",
                draft.nav, draft.acc_nav, draft.adjust_nav
            )));
        }

        let key = (draft.date, fund_id);
        if self.view.net_values.contains_key(&key) {
            return Err(DataError::DuplicateError(format!(
                "net_value ({}, {})",
                draft.date, fund_id
            )));
        }

        let value = draft.bind(self.shared.next_id(), fund_id);
        self.view.net_values.insert(key, value.clone());
        self.inserted.push(value.clone());
        Ok(value)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut state = self.shared.lock();

        // 다른 트랜잭션이 먼저 커밋한 기준가와 겹치면 전체 실패
        if let Some(dup) = self
            .inserted
            .iter()
            .find(|v| state.net_values.contains_key(&(v.date, v.fund_id)))
        {
            return Err(DataError::DuplicateError(format!(
                "net_value ({}, {})",
                dup.date, dup.fund_id
            )));
        }

        // 같은 코드의 펀드를 다른 트랜잭션이 먼저 만든 경우
        for code in self.fund_writes.keys() {
            let ours = self.view.funds.get(code).map(|f| f.id);
            let theirs = state.funds.get(code).map(|f| f.id);
            if let (Some(ours), Some(theirs)) = (ours, theirs) {
                if ours != theirs {
                    return Err(DataError::DuplicateError(format!("fund {}", code)));
                }
            }
        }

        for (code, name) in &self.fund_writes {
            match state.funds.get_mut(code) {
                // is_focus는 공유 상태의 값을 유지
                Some(existing) => existing.name = name.clone(),
                None => {
                    if let Some(created) = self.view.funds.get(code) {
                        state.funds.insert(code.clone(), created.clone());
                    }
                }
            }
        }

        for value in &self.inserted {
            state
                .net_values
                .insert((value.date, value.fund_id), value.clone());
        }

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 6, 30).unwrap()
    }

    #[tokio::test]
    async fn test_uncommitted_changes_are_discarded() {
        let ledger = MemoryLedger::new();

        let mut tx = ledger.begin().await.unwrap();
        let upsert = tx.upsert_fund(&FundRef::new("000001", "A")).await.unwrap();
        tx.insert_net_value(upsert.fund.id, &NetValueDraft::new(date(), dec!(1), dec!(1), None))
            .await
            .unwrap();
        drop(tx);

        assert!(ledger.funds().is_empty());
        assert!(ledger.net_values().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_preserves_focus() {
        let ledger = MemoryLedger::new();

        let mut tx = ledger.begin().await.unwrap();
        let first = tx.upsert_fund(&FundRef::new("000001", "A")).await.unwrap();
        tx.commit().await.unwrap();
        assert!(first.created);
        assert!(!first.fund.is_focus);

        ledger.set_focus("000001", true).unwrap();

        let mut tx = ledger.begin().await.unwrap();
        let second = tx.upsert_fund(&FundRef::new("000001", "A2")).await.unwrap();
        tx.commit().await.unwrap();

        assert!(!second.created);
        assert_eq!(second.fund.id, first.fund.id);
        let fund = ledger.fund("000001").unwrap();
        assert_eq!(fund.name, "A2");
        assert!(fund.is_focus);
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let ledger = MemoryLedger::new();
        let draft = NetValueDraft::new(date(), dec!(1), dec!(1), None);

        let mut tx = ledger.begin().await.unwrap();
        let fund = tx.upsert_fund(&FundRef::new("000001", "A")).await.unwrap().fund;
        tx.insert_net_value(fund.id, &draft).await.unwrap();
        assert!(tx.net_value_exists(date(), fund.id).await.unwrap());

        let result = tx.insert_net_value(fund.id, &draft).await;
        assert!(matches!(result, Err(DataError::DuplicateError(_))));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_commit_fails() {
        let ledger = MemoryLedger::new();

        let mut setup = ledger.begin().await.unwrap();
        let fund = setup.upsert_fund(&FundRef::new("000001", "A")).await.unwrap().fund;
        setup.commit().await.unwrap();

        let draft = NetValueDraft::new(date(), dec!(1), dec!(1), None);
        let mut a = ledger.begin().await.unwrap();
        let mut b = ledger.begin().await.unwrap();
        assert!(!a.net_value_exists(date(), fund.id).await.unwrap());
        assert!(!b.net_value_exists(date(), fund.id).await.unwrap());
        a.insert_net_value(fund.id, &draft).await.unwrap();
        b.insert_net_value(fund.id, &draft).await.unwrap();

        a.commit().await.unwrap();
        let result = b.commit().await;

        assert!(matches!(result, Err(DataError::DuplicateError(_))));
        assert_eq!(ledger.net_values().len(), 1);
    }

    #[tokio::test]
    async fn test_precision_overflow_rejected() {
        let ledger = MemoryLedger::new();

        let mut tx = ledger.begin().await.unwrap();
        let fund = tx.upsert_fund(&FundRef::new("000001", "A")).await.unwrap().fund;
        let draft = NetValueDraft::new(date(), dec!(12345.1), dec!(1), None);

        let result = tx.insert_net_value(fund.id, &draft).await;
        assert!(matches!(result, Err(DataError::QueryError(_))));
    }
}
