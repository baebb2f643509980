//! 시세 수집 및 시트 동기화.
//!
//! 1. 레지스트리 순서대로 자산별 시세 조회 (순차, 실패 시 ERROR 행)
//! 2. 실행 종료 시각을 시간대별로 형식화
//! 3. 완성된 테이블을 데이터 범위에, 시각을 지정 셀에 기록

use crate::config::{CollectorConfig, SourceConfig};
use crate::stats::SyncStats;
use crate::Result;
use chrono::{DateTime, Utc};
use marketsheet_core::{LocalTimestamp, ResultRow, SyncResult, ROW_WIDTH};
use marketsheet_data::{build_http_client, CoinGeckoSource, QuoteSources, YahooChartSource};
use marketsheet_sheets::{ServiceAccountConnector, SheetConnector, SheetError};
use secrecy::{ExposeSecret, SecretString};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// 시트 기록 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 데이터와 시각 모두 기록됨
    Written,
    /// 자격증명 환경변수가 없어 기록하지 않음
    CredentialMissing,
    /// 인증 또는 기록 실패
    WriteFailed(String),
    /// 기록을 요청하지 않음 (`fetch` 명령)
    DryRun,
}

impl WriteOutcome {
    /// 프로세스 성공 여부.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Written | Self::DryRun)
    }
}

/// 한 번의 실행 보고서.
#[derive(Debug)]
pub struct SyncReport {
    pub result: SyncResult,
    pub stats: SyncStats,
    pub outcome: WriteOutcome,
}

/// 설정의 소스 주소로 시세 어댑터를 생성합니다.
pub fn build_sources(sources: &SourceConfig, timeout: Duration) -> Result<QuoteSources> {
    let client = build_http_client(timeout)?;

    let yahoo = YahooChartSource::with_base_url(client.clone(), sources.yahoo_base_url.clone());
    let coingecko = CoinGeckoSource::with_base_url(client, sources.coingecko_base_url.clone())
        .with_api_key(sources.coingecko_api_key.clone());

    Ok(QuoteSources::new(Box::new(yahoo), Box::new(coingecko)))
}

/// 설정의 자격증명으로 서비스 계정 커넥터를 생성합니다.
pub fn build_connector(config: &CollectorConfig) -> Result<ServiceAccountConnector> {
    let sheet = &config.sheet;
    let client = build_http_client(config.http_timeout())?;
    let credential = sheet
        .credential
        .as_ref()
        .map(|secret| SecretString::from(secret.expose_secret().to_owned()));

    Ok(ServiceAccountConnector::new(
        credential,
        sheet.credential_var.clone(),
        sheet.spreadsheet_id.clone(),
        client,
    )
    .with_base_url(sheet.base_url.clone()))
}

/// 동기화 실행기.
pub struct SyncOrchestrator<'a> {
    config: &'a CollectorConfig,
    sources: QuoteSources,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(config: &'a CollectorConfig, sources: QuoteSources) -> Self {
        Self { config, sources }
    }

    /// 모든 자산을 순서대로 조회해 행을 만듭니다.
    ///
    /// 자산별 실패는 ERROR 행으로 대체되고 다음 자산으로 진행합니다.
    pub async fn collect_rows(&self) -> (Vec<ResultRow>, SyncStats) {
        let started = Instant::now();
        let mut stats = SyncStats::new();
        let mut rows = Vec::with_capacity(self.config.registry.len());

        for asset in &self.config.registry {
            let source = self.sources.for_type(asset.source_type);
            debug!(
                asset = %asset.name,
                source = source.name(),
                identifier = %asset.identifier,
                "시세 조회"
            );

            let outcome = source.fetch_quote(&asset.identifier).await;
            if let Err(e) = &outcome {
                warn!(
                    asset = %asset.name,
                    identifier = %asset.identifier,
                    error = %e,
                    "시세 조회 실패, ERROR 행으로 대체"
                );
            }

            stats.record(outcome.is_ok());
            rows.push(ResultRow::from_outcome(&asset.name, &outcome));
        }

        stats.elapsed = started.elapsed();
        (rows, stats)
    }

    /// 행 목록에 실행 시각을 붙여 결과를 완성합니다.
    pub fn finish(&self, rows: Vec<ResultRow>, now: DateTime<Utc>) -> SyncResult {
        let timestamps = self
            .config
            .sheet
            .timestamps
            .iter()
            .map(|target| LocalTimestamp::at(now, target.zone))
            .collect();

        SyncResult { rows, timestamps }
    }

    /// 조회만 수행합니다 (시트 기록 없음).
    pub async fn collect(&self) -> (SyncResult, SyncStats) {
        let (rows, stats) = self.collect_rows().await;
        let result = self.finish(rows, Utc::now());
        (result, stats)
    }

    /// 완성된 결과를 시트에 기록합니다.
    ///
    /// 데이터 범위 → 첫 번째 시각 셀 → 두 번째 시각 셀 순서로 기록하며,
    /// 하나라도 실패하면 즉시 중단합니다. 시각 셀이 데이터 범위와 겹치면
    /// 아무것도 기록하지 않습니다.
    pub async fn publish(&self, result: &SyncResult, connector: &dyn SheetConnector) -> WriteOutcome {
        if let Err(e) = self.config.check_layout() {
            error!(error = %e, "시트 배치 오류로 기록을 건너뜁니다");
            return WriteOutcome::WriteFailed(e.to_string());
        }

        let writer = match connector.connect().await {
            Ok(writer) => writer,
            Err(e) if e.is_missing_credential() => {
                error!(
                    var = %self.config.sheet.credential_var,
                    "서비스 계정 자격증명이 없어 시트 기록을 건너뜁니다"
                );
                return WriteOutcome::CredentialMissing;
            }
            Err(e) => return write_failed("시트 연결 실패", e),
        };

        let layout = &self.config.sheet.layout;
        let range = layout.data_range(result.rows.len(), ROW_WIDTH);
        if let Err(e) = writer.update_range(&range, &result.table()).await {
            return write_failed("데이터 범위 기록 실패", e);
        }

        for (target, stamp) in self.config.sheet.timestamps.iter().zip(&result.timestamps) {
            let cell = layout.qualify(&target.cell);
            if let Err(e) = writer.update_cell(&cell, &stamp.text).await {
                return write_failed("시각 기록 실패", e);
            }
        }

        info!(
            range = %range,
            rows = result.rows.len(),
            "시트 동기화 완료"
        );
        WriteOutcome::Written
    }

    /// 조회 후 시트에 기록합니다.
    pub async fn run(&self, connector: &dyn SheetConnector) -> SyncReport {
        let (result, stats) = self.collect().await;
        let outcome = self.publish(&result, connector).await;
        SyncReport {
            result,
            stats,
            outcome,
        }
    }

    /// 조회만 수행하고 보고서를 반환합니다.
    pub async fn dry_run(&self) -> SyncReport {
        let (result, stats) = self.collect().await;
        SyncReport {
            result,
            stats,
            outcome: WriteOutcome::DryRun,
        }
    }
}

fn write_failed(stage: &str, err: SheetError) -> WriteOutcome {
    error!(error = %err, "{}", stage);
    WriteOutcome::WriteFailed(format!("{}: {}", stage, err))
}
