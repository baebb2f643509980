//! Market sheet collector CLI.

use clap::{Parser, Subcommand};
use marketsheet_collector::logging::{init_logging, LogConfig, LogFormat};
use marketsheet_collector::{
    build_connector, build_sources, CollectorConfig, SyncOrchestrator, WriteOutcome,
};
use marketsheet_core::{SyncResult, ROW_WIDTH};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "marketsheet-collector")]
#[command(about = "Market price collector for Google Sheets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// 자산 목록 TOML 파일 (기본: 내장 목록)
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 시세 조회 후 시트 갱신 (기본 명령)
    Sync,

    /// 시세 조회만 수행하고 결과 출력 (시트 기록 없음)
    Fetch {
        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 자산 목록과 기록 범위 출력
    Assets,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(LogConfig::new(&cli.log_level).with_format(cli.log_format))?;

    tracing::info!("Market Sheet Collector 시작");

    // 설정 로드
    let mut config = CollectorConfig::from_env()?;
    if let Some(path) = &cli.assets {
        config = config.with_assets_file(path)?;
        tracing::info!(path = %path.display(), assets = config.registry.len(), "자산 목록 로드");
    }
    tracing::debug!(
        spreadsheet_id = %config.sheet.spreadsheet_id,
        assets = config.registry.len(),
        "설정 로드 완료"
    );

    let exit = match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let sources = build_sources(&config.sources, config.http_timeout())?;
            let connector = build_connector(&config)?;
            let orchestrator = SyncOrchestrator::new(&config, sources);

            let report = orchestrator.run(&connector).await;
            report.stats.log_summary("시세 동기화");

            match &report.outcome {
                WriteOutcome::Written | WriteOutcome::DryRun => ExitCode::SUCCESS,
                WriteOutcome::CredentialMissing => {
                    eprintln!(
                        "{} 환경변수가 설정되지 않아 시트를 갱신하지 않았습니다",
                        config.sheet.credential_var
                    );
                    ExitCode::FAILURE
                }
                WriteOutcome::WriteFailed(reason) => {
                    eprintln!("시트 갱신 실패: {}", reason);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Fetch { json } => {
            let sources = build_sources(&config.sources, config.http_timeout())?;
            let orchestrator = SyncOrchestrator::new(&config, sources);

            let report = orchestrator.dry_run().await;
            report.stats.log_summary("시세 조회");

            if json {
                println!("{}", serde_json::to_string_pretty(&report.result)?);
            } else {
                print_table(&report.result);
            }
            ExitCode::SUCCESS
        }
        Commands::Assets => {
            let layout = &config.sheet.layout;
            println!(
                "range: {}",
                layout.data_range(config.registry.len(), ROW_WIDTH)
            );
            for (i, asset) in config.registry.iter().enumerate() {
                println!(
                    "A{:<4} {:<16} {:<14} {}",
                    layout.first_data_row as usize + i,
                    asset.name,
                    asset.source_type.to_string(),
                    asset.identifier
                );
            }
            for target in &config.sheet.timestamps {
                println!("{:<5} {}", layout.qualify(&target.cell), target.zone.name());
            }
            ExitCode::SUCCESS
        }
    };

    tracing::info!("Market Sheet Collector 종료");

    Ok(exit)
}

fn print_table(result: &SyncResult) {
    let mut widths = [0usize; ROW_WIDTH];
    for row in &result.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    for row in &result.rows {
        let line = row
            .cells()
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }

    for stamp in &result.timestamps {
        println!("{}: {}", stamp.zone, stamp.text);
    }
}
