//! 시세 소스 trait 및 소스 유형별 디스패치.

use crate::error::Result;
use async_trait::async_trait;
use marketsheet_core::{QuoteRecord, SourceType};

/// 시세 소스 trait.
///
/// 구현체는 식별자 하나에 대해 정규화된 `QuoteRecord`를 반환하거나,
/// 부분 결과 없이 전체 실패를 반환합니다.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 소스 이름 (로그용).
    fn name(&self) -> &str;

    /// 식별자에 대한 시세를 조회합니다.
    async fn fetch_quote(&self, identifier: &str) -> Result<QuoteRecord>;
}

/// 소스 유형별 어댑터 묶음.
pub struct QuoteSources {
    price_series: Box<dyn QuoteSource>,
    crypto_series: Box<dyn QuoteSource>,
}

impl QuoteSources {
    pub fn new(price_series: Box<dyn QuoteSource>, crypto_series: Box<dyn QuoteSource>) -> Self {
        Self {
            price_series,
            crypto_series,
        }
    }

    /// 소스 유형에 맞는 어댑터를 반환합니다.
    pub fn for_type(&self, source_type: SourceType) -> &dyn QuoteSource {
        match source_type {
            SourceType::PriceSeries => self.price_series.as_ref(),
            SourceType::CryptoSeries => self.crypto_series.as_ref(),
        }
    }
}
