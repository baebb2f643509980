//! Yahoo Finance 가격 시계열 어댑터.
//!
//! v8 chart API를 두 번 호출합니다:
//!
//! 1. 현재 시세 메타데이터 (`regularMarketPrice`, `fiftyTwoWeekLow`, `fiftyTwoWeekHigh`)
//! 2. 최근 5년 일봉 시계열 (고가/저가 배열, null 포함 가능)
//!
//! 메타데이터의 개별 필드가 없으면 해당 필드만 `Unavailable`로 두지만,
//! 네트워크 오류나 응답 구조 누락은 자산 전체의 실패로 처리합니다.

use crate::error::{DataError, Result};
use crate::source::QuoteSource;
use async_trait::async_trait;
use marketsheet_core::{FieldValue, QuoteRecord};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

/// 기본 API 주소
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// chart API 응답.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    fifty_two_week_low: Option<f64>,
    #[serde(default)]
    fifty_two_week_high: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
}

/// 5년 시계열에서 계산한 고가/저가 극값.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HistoryExtremes {
    low: Option<f64>,
    high: Option<f64>,
}

/// Yahoo Finance chart API 어댑터.
pub struct YahooChartSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartSource {
    /// 기본 API 주소로 생성합니다.
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// API 주소를 지정해 생성합니다 (테스트/프록시용).
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/v8/finance/chart/{ticker}` (티커는 경로 세그먼트로 인코딩).
    fn chart_url(&self, ticker: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DataError::Config(format!("Yahoo 주소 오류: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DataError::Config(format!("Yahoo 주소 오류: {}", self.base_url)))?
            .pop_if_empty()
            .extend(&["v8", "finance", "chart", ticker]);
        Ok(url)
    }

    /// chart API를 호출해 첫 번째 결과를 반환합니다.
    async fn fetch_chart(&self, ticker: &str, range: &str) -> Result<ChartData> {
        let resp = self
            .client
            .get(self.chart_url(ticker)?)
            .query(&[("range", range), ("interval", "1d")])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        let parsed = serde_json::from_str::<ChartResponse>(&body);

        if !status.is_success() {
            // 오류 응답이라도 chart.error가 있으면 그 내용을 우선 보고
            return Err(match parsed.ok().and_then(|chart| chart.chart.error) {
                Some(err) => DataError::Api {
                    code: err.code,
                    description: err.description.unwrap_or_default(),
                },
                None => DataError::HttpStatus {
                    status: status.as_u16(),
                    identifier: ticker.to_string(),
                },
            });
        }

        match parsed {
            Ok(chart) => first_result(chart),
            Err(e) => Err(DataError::Parse(format!("{}: {}", ticker, e))),
        }
    }
}

#[async_trait]
impl QuoteSource for YahooChartSource {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    async fn fetch_quote(&self, ticker: &str) -> Result<QuoteRecord> {
        info!(ticker, "Yahoo 시세 조회");

        let quote = self.fetch_chart(ticker, "1d").await?;
        let meta = quote
            .meta
            .ok_or_else(|| DataError::MissingField("chart.result[0].meta".to_string()))?;

        let history = self.fetch_chart(ticker, "5y").await?;
        let extremes = history_extremes(history)?;

        debug!(
            ticker,
            price = ?meta.regular_market_price,
            low_5y = ?extremes.low,
            high_5y = ?extremes.high,
            "Yahoo 응답 정규화 완료"
        );

        Ok(QuoteRecord {
            price: FieldValue::from(meta.regular_market_price),
            low_52w: FieldValue::from(meta.fifty_two_week_low),
            high_52w: FieldValue::from(meta.fifty_two_week_high),
            low_5y: FieldValue::from(extremes.low),
            high_5y: FieldValue::from(extremes.high),
        })
    }
}

/// 응답에서 `chart.result[0]`을 꺼냅니다.
fn first_result(resp: ChartResponse) -> Result<ChartData> {
    match resp.chart.result {
        Some(results) => results
            .into_iter()
            .next()
            .ok_or_else(|| DataError::MissingField("chart.result[0]".to_string())),
        None => Err(match resp.chart.error {
            Some(err) => DataError::Api {
                code: err.code,
                description: err.description.unwrap_or_default(),
            },
            None => DataError::MissingField("chart.result".to_string()),
        }),
    }
}

/// 시계열에서 null을 제외한 저가 최솟값과 고가 최댓값을 계산합니다.
///
/// 배열 자체가 없으면 응답 구조 오류, 유효 값이 없으면 해당 극값만 `None`.
fn history_extremes(data: ChartData) -> Result<HistoryExtremes> {
    let series = data
        .indicators
        .ok_or_else(|| DataError::MissingField("indicators".to_string()))?
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::MissingField("indicators.quote[0]".to_string()))?;

    let highs = series
        .high
        .ok_or_else(|| DataError::MissingField("indicators.quote[0].high".to_string()))?;
    let lows = series
        .low
        .ok_or_else(|| DataError::MissingField("indicators.quote[0].low".to_string()))?;

    Ok(HistoryExtremes {
        low: lows.into_iter().flatten().reduce(f64::min),
        high: highs.into_iter().flatten().reduce(f64::max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn parse(body: &str) -> ChartResponse {
        serde_json::from_str(body).unwrap()
    }

    fn quote_body(price: &str, low: &str, high: &str) -> String {
        format!(
            r#"{{"chart":{{"result":[{{"meta":{{"symbol":"^IXIC","regularMarketPrice":{price},"fiftyTwoWeekLow":{low},"fiftyTwoWeekHigh":{high}}},"indicators":{{"quote":[{{}}]}}}}],"error":null}}}}"#
        )
    }

    fn history_body(lows: &str, highs: &str) -> String {
        format!(
            r#"{{"chart":{{"result":[{{"meta":{{}},"timestamp":[1,2,3],"indicators":{{"quote":[{{"low":{lows},"high":{highs}}}]}}}}],"error":null}}}}"#
        )
    }

    async fn mock_chart(
        server: &mut mockito::ServerGuard,
        ticker_pattern: &str,
        range: &str,
        status: usize,
        body: String,
    ) -> mockito::Mock {
        server
            .mock(
                "GET",
                Matcher::Regex(format!(r"^/v8/finance/chart/.*{}", ticker_pattern)),
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("range".into(), range.into()),
                Matcher::UrlEncoded("interval".into(), "1d".into()),
            ]))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    fn source(server: &mockito::ServerGuard) -> YahooChartSource {
        YahooChartSource::with_base_url(reqwest::Client::new(), server.url())
    }

    #[test]
    fn test_history_extremes_skip_nulls() {
        let resp = parse(&history_body("[null, 12.5, 10.25, null]", "[30.0, null, 41.5]"));
        let extremes = history_extremes(first_result(resp).unwrap()).unwrap();
        assert_eq!(extremes.low, Some(10.25));
        assert_eq!(extremes.high, Some(41.5));
    }

    #[test]
    fn test_history_all_null_is_unavailable_not_failure() {
        let resp = parse(&history_body("[null, null]", "[null]"));
        let extremes = history_extremes(first_result(resp).unwrap()).unwrap();
        assert_eq!(extremes, HistoryExtremes { low: None, high: None });
    }

    #[test]
    fn test_history_missing_arrays_is_failure() {
        let resp = parse(r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#);
        assert!(matches!(
            history_extremes(first_result(resp).unwrap()),
            Err(DataError::MissingField(_))
        ));

        let resp = parse(r#"{"chart":{"result":[{"indicators":{"quote":[]}}],"error":null}}"#);
        assert!(history_extremes(first_result(resp).unwrap()).is_err());
    }

    #[test]
    fn test_api_error_surfaces() {
        let resp = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
        match first_result(resp) {
            Err(DataError::Api { code, description }) => {
                assert_eq!(code, "Not Found");
                assert!(description.contains("delisted"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_result_array_is_failure() {
        let resp = parse(r#"{"chart":{"result":[],"error":null}}"#);
        assert!(matches!(first_result(resp), Err(DataError::MissingField(_))));
    }

    #[tokio::test]
    async fn test_fetch_quote_nasdaq() {
        let mut server = mockito::Server::new_async().await;
        let quote = mock_chart(
            &mut server,
            "IXIC",
            "1d",
            200,
            quote_body("18000.1234", "15000", "19000"),
        )
        .await;
        let history = mock_chart(
            &mut server,
            "IXIC",
            "5y",
            200,
            history_body("[null, 7000.5, 6631.42]", "[18671.07, null, 12000]"),
        )
        .await;

        let record = source(&server).fetch_quote("^IXIC").await.unwrap();

        assert_eq!(record.price, FieldValue::Value(18000.1234));
        assert_eq!(record.low_52w, FieldValue::Value(15000.0));
        assert_eq!(record.high_52w, FieldValue::Value(19000.0));
        assert_eq!(record.low_5y, FieldValue::Value(6631.42));
        assert_eq!(record.high_5y, FieldValue::Value(18671.07));

        quote.assert_async().await;
        history.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_quote_missing_meta_fields() {
        let mut server = mockito::Server::new_async().await;
        let _quote = mock_chart(
            &mut server,
            "GSPC",
            "1d",
            200,
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":5000.5}}],"error":null}}"#
                .to_string(),
        )
        .await;
        let _history = mock_chart(
            &mut server,
            "GSPC",
            "5y",
            200,
            history_body("[null]", "[null]"),
        )
        .await;

        let record = source(&server).fetch_quote("^GSPC").await.unwrap();

        assert_eq!(record.price, FieldValue::Value(5000.5));
        assert_eq!(record.low_52w, FieldValue::Unavailable);
        assert_eq!(record.high_52w, FieldValue::Unavailable);
        assert_eq!(record.low_5y, FieldValue::Unavailable);
        assert_eq!(record.high_5y, FieldValue::Unavailable);
    }

    #[tokio::test]
    async fn test_fetch_quote_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _quote = mock_chart(
            &mut server,
            "NOPE",
            "1d",
            404,
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#
                .to_string(),
        )
        .await;

        let err = source(&server).fetch_quote("NOPE").await.unwrap_err();
        assert!(matches!(err, DataError::Api { .. }));
    }

    #[tokio::test]
    async fn test_fetch_quote_non_json_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _quote = mock_chart(&mut server, "DJI", "1d", 503, "unavailable".to_string()).await;

        let err = source(&server).fetch_quote("^DJI").await.unwrap_err();
        assert!(matches!(err, DataError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_error_status_with_chart_body_is_failure() {
        let mut server = mockito::Server::new_async().await;
        let _quote = mock_chart(
            &mut server,
            "IXIC",
            "1d",
            500,
            quote_body("1.0", "1.0", "2.0"),
        )
        .await;
        let _history = mock_chart(
            &mut server,
            "IXIC",
            "5y",
            500,
            history_body("[1.0]", "[2.0]"),
        )
        .await;

        let err = source(&server).fetch_quote("^IXIC").await.unwrap_err();
        assert!(matches!(err, DataError::HttpStatus { status: 500, .. }));
    }

    #[test]
    fn test_chart_url_encodes_ticker_segment() {
        let source = YahooChartSource::with_base_url(reqwest::Client::new(), "https://example.com/");

        let url = source.chart_url("^IXIC").unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/^IXIC");

        let url = source.chart_url("A/B?c#d").unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/A%2FB%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[tokio::test]
    async fn test_fetch_quote_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _quote = mock_chart(&mut server, "N225", "1d", 200, "<html>".to_string()).await;

        let err = source(&server).fetch_quote("^N225").await.unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_quote_network_error() {
        // 열려 있지 않은 포트
        let source = YahooChartSource::with_base_url(reqwest::Client::new(), "http://127.0.0.1:1");
        let err = source.fetch_quote("^IXIC").await.unwrap_err();
        assert!(matches!(err, DataError::Network(_)));
    }
}
