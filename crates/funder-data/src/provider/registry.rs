//! 제공자 레지스트리.
//!
//! 제공자 ID 문자열을 팩토리에 매핑합니다. 프로세스 시작 시 한 번 조회하여
//! `NavProvider` 구현체를 만듭니다.

use super::{NavProvider, ProviderSettings, WmcloudClient, WMCLOUD_PROVIDER_ID};
use crate::error::{DataError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 제공자 팩토리 함수.
///
/// 첫 인자는 등록된 제공자 ID이며, 생성된 제공자의 `id()`는 이 값이어야 합니다.
pub type ProviderFactory = fn(&str, &ProviderSettings) -> Result<Box<dyn NavProvider>>;

/// 제공자 ID → 팩토리 매핑.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// 빈 레지스트리 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 내장 제공자가 등록된 레지스트리 생성.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(WMCLOUD_PROVIDER_ID, WmcloudClient::factory);
        registry
    }

    /// 팩토리를 등록합니다. 같은 ID가 있으면 교체됩니다.
    pub fn register(&mut self, id: impl Into<String>, factory: ProviderFactory) -> &mut Self {
        self.factories.insert(id.into(), factory);
        self
    }

    /// 등록된 제공자 ID 목록 (정렬됨).
    pub fn ids(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// 제공자를 생성합니다.
    ///
    /// # Errors
    ///
    /// 등록되지 않은 ID이면 `DataError::UnknownProvider`, 팩토리가 다른 ID의
    /// 제공자를 만들면 `DataError::ConfigError`.
    pub fn create(&self, id: &str, settings: &ProviderSettings) -> Result<Arc<dyn NavProvider>> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| DataError::UnknownProvider(id.to_string()))?;

        let provider = factory(id, settings)?;
        // 아카이브 키와 실행 결과는 provider.id()를 사용
        if provider.id() != id {
            return Err(DataError::ConfigError(format!(
                "제공자 ID 불일치: 등록 {} / 생성 {}",
                id,
                provider.id()
            )));
        }
        tracing::debug!(provider = id, "제공자 생성 완료");
        Ok(Arc::from(provider))
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}
