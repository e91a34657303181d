//! Daily fund net value collector CLI.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use funder_collector::schedule::parse_date_arg;
use funder_collector::{CollectorConfig, Pipeline, RunOutcome};
use funder_core::{init_logging, LogConfig};
use funder_data::{Database, ProviderRegistry};
use std::process::ExitCode;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "funder-collector")]
#[command(about = "Daily fund net value collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 기준일의 기준가 수집 (수집 → 아카이브 → 장부 반영)
    Update {
        /// 기준일 (YYYYMMDD). 생략 시 오전 8시 이전이면 전일, 이후면 당일
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// 제공자 ID (생략 시 FETCHER_PROVIDER)
        #[arg(long)]
        provider: Option<String>,
    },

    /// 아카이브된 원본 응답을 다시 장부에 반영
    Replay {
        /// 기준일 (YYYYMMDD)
        #[arg(long, value_parser = parse_date_arg)]
        date: NaiveDate,

        /// 제공자 ID (생략 시 FETCHER_PROVIDER)
        #[arg(long)]
        provider: Option<String>,
    },

    /// 데이터베이스 스키마 마이그레이션
    Migrate,

    /// 등록된 제공자 목록
    Providers,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, BoxError> {
    let cli = Cli::parse();

    // 로깅 초기화 (RUST_LOG가 있으면 우선)
    init_logging(&LogConfig::for_level(&cli.log_level))?;

    let registry = ProviderRegistry::with_builtin();

    match cli.command {
        Commands::Providers => {
            for id in registry.ids() {
                println!("{}", id);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Migrate => {
            let (_, db) = connect().await?;
            db.migrate().await?;
            db.close().await;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Update { date, provider } => {
            let (mut config, db) = connect().await?;
            if let Some(provider) = provider {
                config.provider_id = provider;
            }
            let date = config.schedule.target_date(date);

            let pipeline = Pipeline::from_config(&config, &registry, Arc::new(db.ledger()))?;
            let outcome = pipeline.run(date).await;

            db.close().await;
            Ok(report(&outcome))
        }
        Commands::Replay { date, provider } => {
            let (mut config, db) = connect().await?;
            if let Some(provider) = provider {
                config.provider_id = provider;
            }

            let pipeline = Pipeline::from_config(&config, &registry, Arc::new(db.ledger()))?;
            let outcome = pipeline.replay(date).await;

            db.close().await;
            Ok(report(&outcome))
        }
    }
}

/// 설정 로드 후 DB 연결
async fn connect() -> Result<(CollectorConfig, Database), BoxError> {
    let config = CollectorConfig::from_env()?;
    tracing::debug!(
        provider = %config.provider_id,
        archive_root = %config.archive_root.display(),
        "설정 로드 완료"
    );

    let db = Database::connect(&config.database).await?;
    Ok((config, db))
}

fn report(outcome: &RunOutcome) -> ExitCode {
    if outcome.is_success() {
        tracing::info!(
            date = %outcome.date,
            provider = %outcome.provider,
            "{}",
            outcome.message
        );
        ExitCode::SUCCESS
    } else {
        tracing::error!(
            date = %outcome.date,
            provider = %outcome.provider,
            "{}",
            outcome.message
        );
        ExitCode::FAILURE
    }
}
