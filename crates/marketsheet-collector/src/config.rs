//! 환경변수 기반 설정 모듈.

use crate::error::CollectorError;
use crate::Result;
use chrono_tz::Tz;
use marketsheet_core::{AssetRegistry, ROW_WIDTH};
use marketsheet_data::DEFAULT_TIMEOUT_SECS;
use marketsheet_sheets::{SheetLayout, DEFAULT_SHEETS_BASE_URL};
use secrecy::SecretString;
use std::path::Path;
use std::time::Duration;

/// 기본 대상 스프레드시트
pub const DEFAULT_SPREADSHEET_ID: &str = "1HPEkoD_CGxQeNqLt_Xn98TasvV2_lrxGn7yYipRx9No";

/// 서비스 계정 JSON을 담는 기본 환경변수 이름
pub const DEFAULT_CREDENTIAL_VAR: &str = "GCP_SA_KEY";

/// Collector 전체 설정
#[derive(Debug)]
pub struct CollectorConfig {
    /// 자산 레지스트리 (출력 행 순서)
    pub registry: AssetRegistry,
    /// 시세 소스 설정
    pub sources: SourceConfig,
    /// 시트 기록 설정
    pub sheet: SheetConfig,
    /// HTTP 요청 타임아웃 (초)
    pub http_timeout_secs: u64,
}

/// 시세 소스 설정
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Yahoo Finance API 주소
    pub yahoo_base_url: String,
    /// CoinGecko API 주소
    pub coingecko_base_url: String,
    /// CoinGecko demo API 키
    pub coingecko_api_key: Option<String>,
}

/// 시트 기록 설정
#[derive(Debug)]
pub struct SheetConfig {
    /// 대상 스프레드시트 ID
    pub spreadsheet_id: String,
    /// Sheets API 주소
    pub base_url: String,
    /// 데이터 범위 배치
    pub layout: SheetLayout,
    /// 자격증명 환경변수 이름 (진단 메시지용)
    pub credential_var: String,
    /// 서비스 계정 JSON (환경변수가 없으면 `None`)
    pub credential: Option<SecretString>,
    /// 실행 시각을 기록할 셀과 시간대
    pub timestamps: Vec<TimestampTarget>,
}

/// 실행 시각 기록 위치
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampTarget {
    /// 대상 셀 (A1 표기)
    pub cell: String,
    /// 시간대
    pub zone: Tz,
}

impl TimestampTarget {
    pub fn new(cell: impl Into<String>, zone: Tz) -> Self {
        Self {
            cell: cell.into(),
            zone,
        }
    }
}

/// 인도 시각(A14), 우간다 시각(A15)
pub fn default_timestamp_targets() -> Vec<TimestampTarget> {
    vec![
        TimestampTarget::new("A14", chrono_tz::Asia::Kolkata),
        TimestampTarget::new("A15", chrono_tz::Africa::Kampala),
    ]
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드 (`.env` 파일 포함)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 조회 함수로 설정을 구성합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credential_var =
            var("GCP_SA_KEY_VAR").unwrap_or_else(|| DEFAULT_CREDENTIAL_VAR.to_string());
        let credential = var(credential_var.as_str()).map(SecretString::from);

        let http_timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                CollectorError::Config(format!(
                    "HTTP_TIMEOUT_SECS 값이 올바르지 않습니다: {}",
                    raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            registry: AssetRegistry::builtin(),
            sources: SourceConfig {
                yahoo_base_url: var("YAHOO_BASE_URL")
                    .unwrap_or_else(|| marketsheet_data::yahoo::DEFAULT_BASE_URL.to_string()),
                coingecko_base_url: var("COINGECKO_BASE_URL")
                    .unwrap_or_else(|| marketsheet_data::coingecko::DEFAULT_BASE_URL.to_string()),
                coingecko_api_key: var("COINGECKO_API_KEY"),
            },
            sheet: SheetConfig {
                spreadsheet_id: var("SPREADSHEET_ID")
                    .unwrap_or_else(|| DEFAULT_SPREADSHEET_ID.to_string()),
                base_url: var("SHEETS_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SHEETS_BASE_URL.to_string()),
                layout: SheetLayout {
                    sheet_name: var("SHEET_NAME"),
                    ..Default::default()
                },
                credential_var,
                credential,
                timestamps: default_timestamp_targets(),
            },
            http_timeout_secs,
        })
    }

    /// 자산 레지스트리를 교체합니다.
    pub fn with_registry(mut self, registry: AssetRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// TOML 파일의 자산 목록으로 교체합니다.
    ///
    /// 데이터 범위가 시각 셀까지 늘어나는 목록은 거부합니다.
    pub fn with_assets_file(self, path: &Path) -> Result<Self> {
        let registry = AssetRegistry::from_file(path)?;
        let config = self.with_registry(registry);
        config.check_layout()?;
        Ok(config)
    }

    /// 시각 셀이 데이터 범위와 겹치지 않는지 확인합니다.
    pub fn check_layout(&self) -> Result<()> {
        let layout = &self.sheet.layout;
        let rows = self.registry.len();

        match self
            .sheet
            .timestamps
            .iter()
            .find(|target| layout.data_contains(rows, ROW_WIDTH, &target.cell))
        {
            Some(target) => Err(CollectorError::Config(format!(
                "시각 셀 {}이(가) 데이터 범위 {} 안에 있습니다 (자산 {}개)",
                target.cell,
                layout.data_range(rows, ROW_WIDTH),
                rows
            ))),
            None => Ok(()),
        }
    }

    /// HTTP 타임아웃을 Duration으로 반환
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketsheet_core::AssetDescriptor;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CollectorConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CollectorConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.registry.len(), 11);
        assert_eq!(config.sheet.spreadsheet_id, DEFAULT_SPREADSHEET_ID);
        assert_eq!(config.sheet.credential_var, "GCP_SA_KEY");
        assert!(config.sheet.credential.is_none());
        assert_eq!(config.sheet.layout, SheetLayout::default());
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.sheet.timestamps,
            vec![
                TimestampTarget::new("A14", chrono_tz::Asia::Kolkata),
                TimestampTarget::new("A15", chrono_tz::Africa::Kampala),
            ]
        );
    }

    #[test]
    fn test_credential_read_from_named_variable() {
        let config = config_from(&[
            ("GCP_SA_KEY_VAR", "SHEETS_CREDENTIAL"),
            ("SHEETS_CREDENTIAL", "{\"client_email\":\"a@b\"}"),
        ])
        .unwrap();

        assert_eq!(config.sheet.credential_var, "SHEETS_CREDENTIAL");
        let credential = config.sheet.credential.as_ref().unwrap();
        assert_eq!(credential.expose_secret(), "{\"client_email\":\"a@b\"}");
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let config = config_from(&[("GCP_SA_KEY", "   ")]).unwrap();
        assert!(config.sheet.credential.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SPREADSHEET_ID", "abc"),
            ("SHEET_NAME", "Prices"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("COINGECKO_API_KEY", "demo-key"),
            ("YAHOO_BASE_URL", "http://localhost:9000"),
        ])
        .unwrap();

        assert_eq!(config.sheet.spreadsheet_id, "abc");
        assert_eq!(config.sheet.layout.sheet_name.as_deref(), Some("Prices"));
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.sources.coingecko_api_key.as_deref(), Some("demo-key"));
        assert_eq!(config.sources.yahoo_base_url, "http://localhost:9000");
    }

    fn numbered_registry(count: usize) -> AssetRegistry {
        let assets = (1..=count)
            .map(|i| AssetDescriptor::price_series(format!("INDEX {}", i), format!("^I{}", i)))
            .collect();
        AssetRegistry::new(assets).unwrap()
    }

    #[test]
    fn test_layout_accepts_twelve_assets() {
        let config = config_from(&[]).unwrap().with_registry(numbered_registry(12));
        assert!(config.check_layout().is_ok());
    }

    #[test]
    fn test_layout_rejects_range_reaching_timestamp_cell() {
        let config = config_from(&[]).unwrap().with_registry(numbered_registry(13));

        let err = config.check_layout().unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
        assert!(err.to_string().contains("A14"));
    }

    #[test]
    fn test_assets_file_with_thirteen_entries_rejected() {
        let content: String = (1..=13)
            .map(|i| {
                format!(
                    "[[assets]]\nname = \"INDEX {i}\"\nsource = \"price_series\"\nid = \"^I{i}\"\n\n"
                )
            })
            .collect();
        let path = std::env::temp_dir().join(format!(
            "marketsheet-assets-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();

        let result = config_from(&[]).unwrap().with_assets_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(CollectorError::Config(_))));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let err = config_from(&[("HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));

        let err = config_from(&[("HTTP_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
    }
}
