//! 기준가 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 제공자(Provider) 추상화와 레지스트리, WMCloud 클라이언트
//! - 응답 코드 체계와 레코드 정규화
//! - 원본 응답 아카이브 저장소 (덮어쓰기 방식)
//! - PostgreSQL / 메모리 기준가 장부(ledger)
//! - 펀드 upsert 및 기준가 insert-if-absent 조정(reconcile)

pub mod archive;
pub mod error;
pub mod provider;
pub mod reconcile;
pub mod storage;

pub use error::{DataError, Result};

pub use archive::{ArchiveStore, ArchiveWriter, LocalArchiveStore, MemoryArchiveStore};
pub use provider::{
    FetchError, FetchOutcome, NavProvider, ProviderRegistry, ProviderSettings, ResponseCode,
    WmcloudClient,
};
pub use reconcile::{ReconcileStats, Reconciler};
pub use storage::memory::MemoryLedger;
pub use storage::postgres::{Database, DatabaseConfig, PgLedger};
pub use storage::{LedgerTx, NavLedger};
