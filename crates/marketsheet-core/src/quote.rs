//! 정규화된 시세 레코드.

use serde::{Deserialize, Serialize};

/// 시세 필드 하나의 값.
///
/// 값이 없을 때 기본값으로 채우지 않고 "조회 불가"와 "해당 없음"을 구분해서 보존합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// 수치 값
    Value(f64),
    /// 소스가 값을 제공하지 않음 (응답 누락, 유효 데이터 없음)
    Unavailable,
    /// 이 소스에는 해당 항목이 존재하지 않음 (예: 암호화폐의 5년 범위)
    NotApplicable,
}

impl FieldValue {
    /// 선택적 수치를 필드 값으로 변환합니다 (`None` → `Unavailable`).
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::Value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        Self::from_option(value)
    }
}

/// 자산 하나에 대한 정규화된 시세.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// 현재가
    pub price: FieldValue,
    /// 52주 최저가
    pub low_52w: FieldValue,
    /// 52주 최고가
    pub high_52w: FieldValue,
    /// 5년 최저가
    pub low_5y: FieldValue,
    /// 5년 최고가
    pub high_5y: FieldValue,
}

impl QuoteRecord {
    /// 5년 범위가 없는 소스용 레코드 (5년 필드는 `NotApplicable`).
    pub fn without_multi_year(price: f64, low_52w: f64, high_52w: f64) -> Self {
        Self {
            price: FieldValue::Value(price),
            low_52w: FieldValue::Value(low_52w),
            high_52w: FieldValue::Value(high_52w),
            low_5y: FieldValue::NotApplicable,
            high_5y: FieldValue::NotApplicable,
        }
    }

    /// 표시 순서대로 필드를 반환합니다.
    pub fn fields(&self) -> [FieldValue; 5] {
        [
            self.price,
            self.low_52w,
            self.high_52w,
            self.low_5y,
            self.high_5y,
        ]
    }
}
