//! 외부 시세 소스.
//!
//! 이 crate는 다음을 제공합니다:
//! - 소스 공통 trait (`QuoteSource`) 및 소스 유형별 디스패치 (`QuoteSources`)
//! - Yahoo Finance chart API 기반 가격 시계열 어댑터
//! - CoinGecko market_chart API 기반 암호화폐 어댑터

pub mod client;
pub mod coingecko;
pub mod error;
pub mod source;
pub mod yahoo;

pub use client::{build_http_client, DEFAULT_TIMEOUT_SECS};
pub use coingecko::CoinGeckoSource;
pub use error::{DataError, Result};
pub use source::{QuoteSource, QuoteSources};
pub use yahoo::YahooChartSource;
