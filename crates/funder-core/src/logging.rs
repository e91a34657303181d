//! 수집기 로깅 초기화.
//!
//! 레벨은 CLI `--log-level`로 workspace crate에만 적용하고, 출력 형식은
//! `LOG_FORMAT`(pretty, json, compact)으로 고릅니다. `RUST_LOG`가 있으면
//! 레벨 지정보다 우선합니다.

use std::error::Error;
use tracing_subscriber::EnvFilter;

/// 레벨을 적용할 workspace crate 대상.
pub const LOG_TARGETS: [&str; 3] = ["funder_collector", "funder_data", "funder_core"];

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 여러 줄, 개발용
    Pretty,
    /// 한 줄 JSON, 로그 수집기용
    Json,
    /// 한 줄 텍스트 (cron 실행 기본값)
    #[default]
    Compact,
}

impl LogFormat {
    /// `LOG_FORMAT` 값. 없거나 알 수 없는 값이면 compact.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` 지시문 (예: "funder_collector=info,funder_data=info")
    pub filter: String,
    pub format: LogFormat,
}

impl LogConfig {
    /// 모든 workspace crate에 같은 레벨을 적용하는 설정.
    /// 형식은 `LOG_FORMAT`에서 읽습니다.
    pub fn for_level(level: &str) -> Self {
        let filter = LOG_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect::<Vec<_>>()
            .join(",");

        Self {
            filter,
            format: LogFormat::from_env(),
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// 전역 subscriber를 설치합니다. 프로세스당 한 번만 성공합니다.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.format {
        LogFormat::Pretty => builder.pretty().try_init()?,
        LogFormat::Json => builder
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .try_init()?,
        LogFormat::Compact => builder.compact().try_init()?,
    }

    tracing::debug!(format = ?config.format, filter = %config.filter, "로깅 초기화");
    Ok(())
}

/// 수집 실행 컨텍스트(기준일, 제공자)가 포함된 span을 생성하는 매크로.
#[macro_export]
macro_rules! ingest_span {
    ($name:expr, $date:expr, $provider:expr) => {
        tracing::info_span!($name, date = %$date, provider = %$provider)
    };
}
