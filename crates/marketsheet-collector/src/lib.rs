//! 시세 수집 및 Google Sheets 동기화 collector.
//!
//! 한 번 실행되면 끝까지 진행하는 배치 도구입니다:
//! - 자산 레지스트리 순서대로 시세 조회 (Yahoo Finance, CoinGecko)
//! - 표시용 행 테이블과 시간대별 실행 시각 생성
//! - 서비스 계정으로 스프레드시트 데이터 범위와 시각 셀 갱신

pub mod config;
pub mod error;
pub mod logging;
pub mod stats;
pub mod sync;

pub use config::{CollectorConfig, SheetConfig, SourceConfig, TimestampTarget};
pub use error::{CollectorError, Result};
pub use stats::SyncStats;
pub use sync::{build_connector, build_sources, SyncOrchestrator, SyncReport, WriteOutcome};
