//! 자산 레지스트리.
//!
//! 동기화 대상 자산의 고정된 순서 목록을 정의합니다.
//! 레지스트리 순서가 곧 시트의 행 순서이므로 실행 간에 순서가 바뀌면 안 됩니다.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 데이터 소스 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// 가격 시계열 (Yahoo Finance chart API)
    #[serde(alias = "yahoo")]
    PriceSeries,
    /// 암호화폐 시계열 (CoinGecko market_chart API)
    #[serde(alias = "crypto")]
    CryptoSeries,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::PriceSeries => write!(f, "price_series"),
            SourceType::CryptoSeries => write!(f, "crypto_series"),
        }
    }
}

/// 동기화 대상 자산 하나.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// 시트에 표시되는 이름
    pub name: String,
    /// 데이터 소스 유형
    #[serde(rename = "source")]
    pub source_type: SourceType,
    /// 소스별 식별자 (티커 또는 코인 ID)
    #[serde(rename = "id")]
    pub identifier: String,
}

impl AssetDescriptor {
    /// 가격 시계열 자산을 생성합니다.
    pub fn price_series(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: SourceType::PriceSeries,
            identifier: ticker.into(),
        }
    }

    /// 암호화폐 자산을 생성합니다.
    pub fn crypto_series(name: impl Into<String>, coin_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: SourceType::CryptoSeries,
            identifier: coin_id.into(),
        }
    }
}

/// 자산 레지스트리 (불변, 순서 보장).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistry {
    assets: Vec<AssetDescriptor>,
}

impl AssetRegistry {
    /// 자산 목록으로 레지스트리를 생성합니다.
    ///
    /// 빈 목록과 이름/식별자가 빈 항목은 거부합니다.
    pub fn new(assets: Vec<AssetDescriptor>) -> CoreResult<Self> {
        if assets.is_empty() {
            return Err(CoreError::InvalidRegistry(
                "자산이 하나 이상 필요합니다".to_string(),
            ));
        }

        if let Some(pos) = assets
            .iter()
            .position(|a| a.name.trim().is_empty() || a.identifier.trim().is_empty())
        {
            return Err(CoreError::InvalidRegistry(format!(
                "{}번째 자산의 이름 또는 식별자가 비어 있습니다",
                pos + 1
            )));
        }

        Ok(Self { assets })
    }

    /// 기본 자산 목록 (지수 6종, 원자재 3종, 암호화폐 2종).
    pub fn builtin() -> Self {
        Self {
            assets: vec![
                AssetDescriptor::price_series("NASDAQ", "^IXIC"),
                AssetDescriptor::price_series("S&P 500", "^GSPC"),
                AssetDescriptor::price_series("DOW JONES", "^DJI"),
                AssetDescriptor::price_series("SENSEX", "^BSESN"),
                AssetDescriptor::price_series("NIFTY 50", "^NSEI"),
                AssetDescriptor::price_series("NIKKEI 225", "^N225"),
                AssetDescriptor::price_series("GOLD 24 CARAT", "GC=F"),
                AssetDescriptor::price_series("SILVER", "SI=F"),
                AssetDescriptor::price_series("OIL (BRENT)", "BZ=F"),
                // 시트가 이 표기로 참조하므로 대소문자를 그대로 유지
                AssetDescriptor::crypto_series("BITCOin", "bitcoin"),
                AssetDescriptor::crypto_series("ETHEREUM", "ethereum"),
            ],
        }
    }

    /// TOML 파일에서 레지스트리를 로드합니다.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// TOML 문자열을 파싱합니다.
    ///
    /// ```toml
    /// [[assets]]
    /// name = "NASDAQ"
    /// source = "price_series"
    /// id = "^IXIC"
    /// ```
    pub fn from_toml(content: &str) -> CoreResult<Self> {
        #[derive(Deserialize)]
        struct RegistryFile {
            #[serde(default)]
            assets: Vec<AssetDescriptor>,
        }

        let file: RegistryFile = toml::from_str(content)?;
        Self::new(file.assets)
    }

    /// 등록된 자산 수.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// 레지스트리가 비어 있는지 확인합니다 (`new`를 통과한 레지스트리는 항상 false).
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// 등록 순서대로 자산을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &AssetDescriptor> {
        self.assets.iter()
    }

    /// 자산 슬라이스.
    pub fn as_slice(&self) -> &[AssetDescriptor] {
        &self.assets
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a AssetRegistry {
    type Item = &'a AssetDescriptor;
    type IntoIter = std::slice::Iter<'a, AssetDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
