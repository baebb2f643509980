//! CoinGecko 암호화폐 어댑터.
//!
//! `/coins/{id}/market_chart`에서 최근 365일 일별 USD 가격을 받아
//! 마지막 샘플을 현재가로, 전체 구간의 최솟값/최댓값을 52주 범위로 사용합니다.
//! 이 소스는 5년 이력을 제공하지 않으므로 5년 필드는 항상 `NotApplicable`입니다.

use crate::error::{DataError, Result};
use crate::source::QuoteSource;
use async_trait::async_trait;
use marketsheet_core::QuoteRecord;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

/// 기본 API 주소
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// 데모 API 키 헤더
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// market_chart 응답 (`prices`는 `[timestamp_ms, price]` 쌍 배열).
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

/// CoinGecko market_chart 어댑터.
pub struct CoinGeckoSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    vs_currency: String,
    days: u32,
}

impl CoinGeckoSource {
    /// 기본 API 주소로 생성합니다 (USD, 365일).
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// API 주소를 지정해 생성합니다.
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            vs_currency: "usd".to_string(),
            days: 365,
        }
    }

    /// 데모 API 키 설정.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// `{base}/coins/{id}/market_chart` (코인 ID는 경로 세그먼트로 인코딩).
    fn market_chart_url(&self, coin_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DataError::Config(format!("CoinGecko 주소 오류: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DataError::Config(format!("CoinGecko 주소 오류: {}", self.base_url)))?
            .pop_if_empty()
            .extend(&["coins", coin_id, "market_chart"]);
        Ok(url)
    }
}

#[async_trait]
impl QuoteSource for CoinGeckoSource {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_quote(&self, coin_id: &str) -> Result<QuoteRecord> {
        info!(coin_id, "CoinGecko 시세 조회");

        let days = self.days.to_string();
        let mut request = self.client.get(self.market_chart_url(coin_id)?).query(&[
            ("vs_currency", self.vs_currency.as_str()),
            ("days", days.as_str()),
            ("interval", "daily"),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                identifier: coin_id.to_string(),
            });
        }

        let chart: MarketChart = resp.json().await?;
        let record = summarize(coin_id, &chart)?;

        debug!(coin_id, samples = chart.prices.len(), "CoinGecko 응답 정규화 완료");

        Ok(record)
    }
}

/// 가격 샘플로 시세 레코드를 만듭니다.
fn summarize(coin_id: &str, chart: &MarketChart) -> Result<QuoteRecord> {
    let prices: Vec<f64> = chart.prices.iter().map(|&(_, price)| price).collect();

    let last = *prices
        .last()
        .ok_or_else(|| DataError::EmptySeries(format!("{} prices", coin_id)))?;
    if prices.iter().any(|p| !p.is_finite()) {
        return Err(DataError::Parse(format!("{}: non-finite price sample", coin_id)));
    }

    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(QuoteRecord::without_multi_year(last, low, high))
}
