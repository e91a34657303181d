//! 수집 파이프라인.
//!
//! 기준일 D, 제공자 P에 대해:
//! 1. `fetch(D)` (실패 시 아카이브 기록/장부 반영 없이 실패로 보고)
//! 2. 원본 응답을 아카이브 (레코드가 0건이어도 기록)
//! 3. 정규화된 레코드를 장부에 반영
//! 4. 성공/실패와 건수를 보고
//!
//! 파이프라인은 오류를 잡아 `RunOutcome`으로 바꾸는 유일한 경계입니다.
//! 실행 실패가 프로세스 밖으로 전파되지 않습니다.

use crate::config::CollectorConfig;
use crate::error::{CollectorError, Result};
use crate::stats::RunStats;
use chrono::NaiveDate;
use funder_core::archive_key;
use funder_data::{
    ArchiveStore, ArchiveWriter, LocalArchiveStore, NavLedger, NavProvider, ProviderRegistry,
    Reconciler,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, Instrument};

/// 실행 결과 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// 한 번의 실행 결과.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// 기준일
    pub date: NaiveDate,
    /// 제공자 ID
    pub provider: String,
    pub status: RunStatus,
    /// 사람이 읽는 결과 메시지
    pub message: String,
    pub stats: RunStats,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }
}

/// 제공자, 장부, 아카이브 저장소를 묶은 수집 파이프라인.
#[derive(Clone)]
pub struct Pipeline {
    provider: Arc<dyn NavProvider>,
    ledger: Arc<dyn NavLedger>,
    archive: Arc<dyn ArchiveStore>,
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn NavProvider>,
        ledger: Arc<dyn NavLedger>,
        archive: Arc<dyn ArchiveStore>,
    ) -> Self {
        Self {
            provider,
            ledger,
            archive,
        }
    }

    /// 설정으로부터 파이프라인을 구성합니다.
    ///
    /// 제공자는 레지스트리에서 한 번 생성되며, 아카이브는 `archive_root`
    /// 디렉터리에 기록됩니다.
    pub fn from_config(
        config: &CollectorConfig,
        registry: &ProviderRegistry,
        ledger: Arc<dyn NavLedger>,
    ) -> Result<Self> {
        let provider = registry.create(&config.provider_id, &config.provider)?;
        let archive = Arc::new(LocalArchiveStore::new(config.archive_root.clone()));

        Ok(Self::new(provider, ledger, archive))
    }

    pub fn provider_id(&self) -> &str {
        self.provider.id()
    }

    /// 기준일의 기준가를 수집합니다.
    pub async fn run(&self, date: NaiveDate) -> RunOutcome {
        let span = funder_core::ingest_span!("update", date, self.provider.id());
        let started = Instant::now();
        let mut stats = RunStats::new();

        let result = self.update(date, &mut stats).instrument(span).await;
        stats.elapsed = started.elapsed();

        self.finish("기준가 수집", date, result, stats)
    }

    /// 아카이브된 원본 응답을 다시 해석해 장부에 반영합니다.
    ///
    /// 네트워크 호출과 아카이브 재기록은 없습니다.
    pub async fn replay(&self, date: NaiveDate) -> RunOutcome {
        let span = funder_core::ingest_span!("replay", date, self.provider.id());
        let started = Instant::now();
        let mut stats = RunStats::new();

        let result = self.reprocess(date, &mut stats).instrument(span).await;
        stats.elapsed = started.elapsed();

        self.finish("아카이브 재처리", date, result, stats)
    }

    async fn update(&self, date: NaiveDate, stats: &mut RunStats) -> Result<()> {
        let fetched = self.provider.fetch(date).await?;
        stats.received = fetched.records.len();

        let writer = ArchiveWriter::new(self.archive.as_ref(), self.ledger.as_ref());
        writer.write(date, self.provider.id(), &fetched.raw).await?;
        stats.archived = true;
        stats.archive_bytes = fetched.raw.len();

        let reconciled = Reconciler::new(self.ledger.as_ref())
            .reconcile(&fetched.records)
            .await?;
        stats.absorb(reconciled);

        Ok(())
    }

    async fn reprocess(&self, date: NaiveDate, stats: &mut RunStats) -> Result<()> {
        let writer = ArchiveWriter::new(self.archive.as_ref(), self.ledger.as_ref());
        let (file, raw) = writer
            .read(date, self.provider.id())
            .await?
            .ok_or_else(|| CollectorError::ArchiveMissing(archive_key(date, self.provider.id())))?;
        debug!(key = %file.key, bytes = raw.len(), fetch_time = %file.fetch_time, "아카이브 로드");

        let records = self.provider.parse(&raw)?;
        stats.received = records.len();

        let reconciled = Reconciler::new(self.ledger.as_ref())
            .reconcile(&records)
            .await?;
        stats.absorb(reconciled);

        Ok(())
    }

    fn finish(
        &self,
        operation: &str,
        date: NaiveDate,
        result: Result<()>,
        stats: RunStats,
    ) -> RunOutcome {
        let (status, message) = match result {
            Ok(()) => {
                stats.log_summary(operation);
                (
                    RunStatus::Succeeded,
                    format!(
                        "{} records received, {} inserted, {} skipped",
                        stats.received, stats.inserted, stats.skipped
                    ),
                )
            }
            Err(e) => {
                error!(
                    operation = operation,
                    date = %date,
                    provider = %self.provider.id(),
                    archived = stats.archived,
                    error = %e,
                    "실행 실패"
                );
                (RunStatus::Failed, e.to_string())
            }
        };

        RunOutcome {
            date,
            provider: self.provider.id().to_string(),
            status,
            message,
            stats,
        }
    }
}
