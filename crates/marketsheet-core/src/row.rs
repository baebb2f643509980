//! 시트 출력용 행 포맷터.

use crate::quote::{FieldValue, QuoteRecord};
use crate::timestamp::LocalTimestamp;
use serde::{Deserialize, Serialize};

/// 조회 불가 / 조회 실패 표시 문자열
pub const ERROR_CELL: &str = "ERROR";

/// 해당 없음 표시 문자열
pub const NOT_APPLICABLE_CELL: &str = "N/A";

/// 한 행의 열 수 (이름 + 필드 5개)
pub const ROW_WIDTH: usize = 6;

/// 필드 값을 셀 문자열로 변환합니다.
pub fn render_field(value: FieldValue) -> String {
    match value {
        FieldValue::Value(v) => format!("{:.2}", v),
        FieldValue::Unavailable => ERROR_CELL.to_string(),
        FieldValue::NotApplicable => NOT_APPLICABLE_CELL.to_string(),
    }
}

/// 자산 하나에 대한 표시용 행.
///
/// `[이름, 현재가, 52주 최저, 52주 최고, 5년 최저, 5년 최고]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    cells: [String; ROW_WIDTH],
}

impl ResultRow {
    /// 시세 레코드로 행을 만듭니다.
    pub fn from_quote(name: &str, quote: &QuoteRecord) -> Self {
        let [price, low_52w, high_52w, low_5y, high_5y] = quote.fields().map(render_field);
        Self {
            cells: [name.to_string(), price, low_52w, high_52w, low_5y, high_5y],
        }
    }

    /// 조회 실패 시 대체 행 (이름 뒤 모든 셀이 ERROR).
    pub fn sentinel(name: &str) -> Self {
        Self {
            cells: [
                name.to_string(),
                ERROR_CELL.to_string(),
                ERROR_CELL.to_string(),
                ERROR_CELL.to_string(),
                ERROR_CELL.to_string(),
                ERROR_CELL.to_string(),
            ],
        }
    }

    /// 조회 결과로 행을 만듭니다. 실패 원인은 행에 남지 않습니다.
    pub fn from_outcome<E>(name: &str, outcome: &Result<QuoteRecord, E>) -> Self {
        match outcome {
            Ok(quote) => Self::from_quote(name, quote),
            Err(_) => Self::sentinel(name),
        }
    }

    /// 자산 이름 (첫 번째 셀).
    pub fn name(&self) -> &str {
        &self.cells[0]
    }

    pub fn cells(&self) -> &[String; ROW_WIDTH] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<String> {
        self.cells.into()
    }
}

/// 한 번의 동기화 실행 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// 레지스트리 순서의 행 목록
    pub rows: Vec<ResultRow>,
    /// 실행 종료 시점의 현지 시각 (시간대별)
    pub timestamps: Vec<LocalTimestamp>,
}

impl SyncResult {
    /// 시트에 쓸 2차원 문자열 테이블.
    pub fn table(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|r| r.cells().to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quote(price: f64, low: f64, high: f64, low_5y: FieldValue, high_5y: FieldValue) -> QuoteRecord {
        QuoteRecord {
            price: FieldValue::Value(price),
            low_52w: FieldValue::Value(low),
            high_52w: FieldValue::Value(high),
            low_5y,
            high_5y,
        }
    }

    #[test]
    fn test_two_decimal_formatting() {
        assert_eq!(render_field(FieldValue::Value(1234.5)), "1234.50");
        assert_eq!(render_field(FieldValue::Value(100.0)), "100.00");
        assert_eq!(render_field(FieldValue::Value(18000.1234)), "18000.12");
    }

    #[test]
    fn test_markers_keep_their_distinction() {
        assert_eq!(render_field(FieldValue::Unavailable), "ERROR");
        assert_eq!(render_field(FieldValue::NotApplicable), "N/A");
    }

    #[test]
    fn test_price_series_row() {
        let record = quote(
            18000.1234,
            15000.0,
            19000.0,
            FieldValue::Value(10000.0),
            FieldValue::Value(20000.0),
        );
        let row = ResultRow::from_quote("NASDAQ", &record);

        assert_eq!(
            row.cells(),
            &[
                "NASDAQ", "18000.12", "15000.00", "19000.00", "10000.00", "20000.00"
            ]
            .map(String::from)
        );
        assert_ne!(row, ResultRow::sentinel("NASDAQ"));
    }

    #[test]
    fn test_empty_history_renders_error_not_na() {
        let record = quote(
            1.0,
            1.0,
            1.0,
            FieldValue::Unavailable,
            FieldValue::Unavailable,
        );
        let row = ResultRow::from_quote("SILVER", &record);
        assert_eq!(row.cells()[4], "ERROR");
        assert_eq!(row.cells()[5], "ERROR");
    }

    #[test]
    fn test_crypto_row_uses_na() {
        let record = QuoteRecord::without_multi_year(65000.0, 40000.0, 70000.0);
        let row = ResultRow::from_quote("BITCOin", &record);
        assert_eq!(row.cells()[4], "N/A");
        assert_eq!(row.cells()[5], "N/A");
    }

    #[test]
    fn test_sentinel_row() {
        let row = ResultRow::sentinel("ETHEREUM");
        assert_eq!(
            row.into_cells(),
            vec!["ETHEREUM", "ERROR", "ERROR", "ERROR", "ERROR", "ERROR"]
        );
    }

    #[test]
    fn test_from_outcome_failure() {
        let outcome: Result<QuoteRecord, String> = Err("timeout".to_string());
        assert_eq!(
            ResultRow::from_outcome("DOW JONES", &outcome),
            ResultRow::sentinel("DOW JONES")
        );
    }

    #[test]
    fn test_table_shape() {
        let result = SyncResult {
            rows: vec![ResultRow::sentinel("A"), ResultRow::sentinel("B")],
            timestamps: vec![],
        };
        let table = result.table();
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|r| r.len() == ROW_WIDTH));
    }

    proptest! {
        #[test]
        fn prop_value_cells_have_two_decimals(v in -1.0e9f64..1.0e9f64) {
            let cell = render_field(FieldValue::Value(v));
            let (_, frac) = cell.split_once('.').unwrap();
            prop_assert_eq!(frac.len(), 2);
        }

        #[test]
        fn prop_row_always_six_cells(price in proptest::option::of(0.0f64..1.0e6)) {
            let record = QuoteRecord {
                price: FieldValue::from(price),
                low_52w: FieldValue::Unavailable,
                high_52w: FieldValue::NotApplicable,
                low_5y: FieldValue::from(price),
                high_5y: FieldValue::NotApplicable,
            };
            let row = ResultRow::from_quote("X", &record);
            prop_assert_eq!(row.cells().len(), ROW_WIDTH);
            prop_assert_eq!(row.name(), "X");
        }
    }
}
