//! 로컬 파일시스템 아카이브 저장소.

use super::ArchiveStore;
use crate::error::{DataError, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// 임시 파일 접두사. 키는 `.`으로 시작할 수 없으므로 키와 겹치지 않습니다.
const TMP_PREFIX: &str = ".archive-";

/// 루트 디렉터리 아래에 키 이름으로 파일을 저장합니다.
///
/// 임시 파일에 쓴 뒤 rename으로 교체하므로 읽는 쪽은 항상 이전 내용 또는
/// 새 내용 전체만 보게 됩니다.
#[derive(Debug, Clone)]
pub struct LocalArchiveStore {
    root: PathBuf,
}

impl LocalArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\'])
            && key != "..";
        if !valid {
            return Err(DataError::InvalidData(format!(
                "아카이브 키로 사용할 수 없습니다: {:?}",
                key
            )));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ArchiveStore for LocalArchiveStore {
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let root = self.root.clone();
        let bytes = bytes.to_vec();

        // 쓰기마다 별도의 임시 파일 (동시 기록 시 마지막 rename이 남음)
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            std::fs::create_dir_all(&root)?;
            let mut tmp = tempfile::Builder::new()
                .prefix(TMP_PREFIX)
                .suffix(".tmp")
                .tempfile_in(&root)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| DataError::from(e.error))?;
            Ok(())
        })
        .await
        .map_err(|e| DataError::IoError(format!("아카이브 기록 작업 실패: {}", e)))??;

        debug!(path = %path.display(), "아카이브 파일 기록");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
