//! 기준가 장부(ledger) 저장소.
//!
//! 펀드, 기준가, 아카이브 메타데이터를 보관합니다.
//!
//! - `postgres`: PostgreSQL 구현 (운영)
//! - `memory`: 프로세스 메모리 구현 (테스트)
//!
//! 펀드/기준가 변경은 `LedgerTx` 트랜잭션 안에서만 일어나며, 아카이브
//! 메타데이터는 트랜잭션 밖에서 즉시 기록됩니다.

pub mod memory;
pub mod postgres;

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use funder_core::{ArchiveFile, FundRef, FundUpsert, NetValue, NetValueDraft};

/// 기준가 장부.
#[async_trait]
pub trait NavLedger: Send + Sync {
    /// 새 트랜잭션을 시작합니다.
    async fn begin(&self) -> Result<Box<dyn LedgerTx>>;

    /// 아카이브 메타데이터를 upsert 합니다 ((date, provider)당 한 행).
    async fn record_archive(&self, file: &ArchiveFile) -> Result<ArchiveFile>;

    /// 아카이브 메타데이터 조회.
    async fn find_archive(&self, date: NaiveDate, provider: &str) -> Result<Option<ArchiveFile>>;
}

/// 장부 트랜잭션.
///
/// `commit` 없이 drop 되면 모든 변경이 버려집니다.
#[async_trait]
pub trait LedgerTx: Send {
    /// 코드 기준으로 펀드를 upsert 합니다.
    ///
    /// 없으면 `is_focus = false`로 생성하고, 있으면 `name`만 갱신합니다.
    async fn upsert_fund(&mut self, fund: &FundRef) -> Result<FundUpsert>;

    /// (date, fund)에 기준가가 이미 있는지 확인합니다.
    async fn net_value_exists(&mut self, date: NaiveDate, fund_id: i64) -> Result<bool>;

    /// 기준가를 삽입합니다.
    ///
    /// (date, fund)가 이미 있으면 `DataError::DuplicateError`.
    async fn insert_net_value(&mut self, fund_id: i64, draft: &NetValueDraft) -> Result<NetValue>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn rollback(self: Box<Self>) -> Result<()>;
}
