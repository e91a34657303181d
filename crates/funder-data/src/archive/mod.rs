//! 원본 응답 아카이브.
//!
//! 제공자 원본 응답을 (date, provider) 키로 보관합니다.
//!
//! # 동작 방식
//!
//! 1. (date, provider)로부터 결정적인 키를 계산 (`YYYYMMDD-<provider>.js`)
//! 2. 같은 키의 기존 바이트를 교체 (추가/버전 관리 없음)
//! 3. 메타데이터 행을 upsert 하고 `fetch_time`을 현재 시각으로 갱신
//!
//! 아카이브는 기준가 reconcile 트랜잭션과 독립적입니다. 이후 단계가 실패해도
//! 원본 응답은 재처리/디버깅을 위해 남습니다.

mod local;
mod memory;

pub use local::LocalArchiveStore;
pub use memory::MemoryArchiveStore;

use crate::error::Result;
use crate::storage::NavLedger;
use async_trait::async_trait;
use chrono::NaiveDate;
use funder_core::ArchiveFile;

/// 키-값 바이트 저장소.
///
/// `put`은 같은 키의 기존 내용을 교체합니다.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// 키에 바이트를 기록합니다 (기존 내용 교체).
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// 키의 바이트를 읽습니다.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// 아카이브 기록기.
///
/// 바이트를 먼저 기록한 뒤 메타데이터를 upsert 합니다.
/// 메타데이터가 존재하지 않는 바이트를 가리키는 일은 없습니다.
pub struct ArchiveWriter<'a> {
    store: &'a dyn ArchiveStore,
    ledger: &'a dyn NavLedger,
}

impl<'a> ArchiveWriter<'a> {
    pub fn new(store: &'a dyn ArchiveStore, ledger: &'a dyn NavLedger) -> Self {
        Self { store, ledger }
    }

    /// 원본 응답을 기록합니다.
    ///
    /// 내용이 비어 있거나 이전과 같아도 항상 덮어쓰고 `fetch_time`을 갱신합니다.
    pub async fn write(&self, date: NaiveDate, provider: &str, bytes: &[u8]) -> Result<ArchiveFile> {
        let file = ArchiveFile::new(date, provider);

        self.store.put(&file.key, bytes).await?;
        let file = self.ledger.record_archive(&file).await?;

        tracing::info!(
            key = %file.key,
            bytes = bytes.len(),
            fetch_time = %file.fetch_time,
            "원본 응답 아카이브 완료"
        );

        Ok(file)
    }

    /// 아카이브된 원본 응답을 읽습니다.
    ///
    /// 메타데이터가 없거나 바이트가 없으면 `None`.
    pub async fn read(&self, date: NaiveDate, provider: &str) -> Result<Option<(ArchiveFile, Vec<u8>)>> {
        let Some(file) = self.ledger.find_archive(date, provider).await? else {
            return Ok(None);
        };

        match self.store.get(&file.key).await? {
            Some(bytes) => Ok(Some((file, bytes))),
            None => {
                tracing::warn!(key = %file.key, "아카이브 메타데이터는 있으나 파일이 없습니다");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryLedger;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 6, 30).unwrap()
    }

    #[tokio::test]
    async fn test_write_twice_overwrites() {
        let store = MemoryArchiveStore::new();
        let ledger = MemoryLedger::new();
        let writer = ArchiveWriter::new(&store, &ledger);

        let first = writer.write(date(), "wmcloud", b"first").await.unwrap();
        let second = writer.write(date(), "wmcloud", b"second").await.unwrap();

        assert_eq!(first.key, second.key);
        assert!(second.fetch_time >= first.fetch_time);
        assert_eq!(store.keys(), vec!["20150630-wmcloud.js".to_string()]);
        assert_eq!(store.get(&first.key).await.unwrap(), Some(b"second".to_vec()));

        let archives = ledger.archives();
        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0].fetch_time, second.fetch_time);
    }

    #[tokio::test]
    async fn test_write_empty_content_still_overwrites() {
        let store = MemoryArchiveStore::new();
        let ledger = MemoryLedger::new();
        let writer = ArchiveWriter::new(&store, &ledger);

        writer.write(date(), "wmcloud", b"payload").await.unwrap();
        writer.write(date(), "wmcloud", b"").await.unwrap();

        assert_eq!(
            store.get("20150630-wmcloud.js").await.unwrap(),
            Some(Vec::new())
        );
    }

    #[tokio::test]
    async fn test_keys_are_per_provider_and_date() {
        let store = MemoryArchiveStore::new();
        let ledger = MemoryLedger::new();
        let writer = ArchiveWriter::new(&store, &ledger);

        writer.write(date(), "wmcloud", b"a").await.unwrap();
        writer.write(date(), "other", b"b").await.unwrap();
        writer
            .write(date().succ_opt().unwrap(), "wmcloud", b"c")
            .await
            .unwrap();

        assert_eq!(store.keys().len(), 3);
        assert_eq!(ledger.archives().len(), 3);
    }

    #[tokio::test]
    async fn test_read_back() {
        let store = MemoryArchiveStore::new();
        let ledger = MemoryLedger::new();
        let writer = ArchiveWriter::new(&store, &ledger);

        assert!(writer.read(date(), "wmcloud").await.unwrap().is_none());

        writer.write(date(), "wmcloud", b"raw").await.unwrap();
        let (file, bytes) = writer.read(date(), "wmcloud").await.unwrap().unwrap();

        assert_eq!(file.provider, "wmcloud");
        assert_eq!(bytes, b"raw");
    }
}
