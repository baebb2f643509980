//! Google Sheets 기록 모듈.
//!
//! 서비스 계정 자격증명으로 OAuth 2.0 접근 토큰을 발급받아
//! Sheets API v4 values 엔드포인트에 범위/단일 셀 값을 기록합니다.
//!
//! ## 사용 예시
//! ```rust,ignore
//! let connector = ServiceAccountConnector::new(credential, "GCP_SA_KEY", spreadsheet_id, client);
//! let writer = connector.connect().await?;
//! writer.update_range("A2:F12", &table).await?;
//! writer.update_cell("A14", "16-10-2026 09:00:00").await?;
//! ```

pub mod a1;
pub mod auth;
pub mod client;
pub mod credential;
pub mod error;
pub mod writer;

pub use a1::{parse_cell, SheetLayout};
pub use auth::{AccessToken, TokenProvider, SPREADSHEET_SCOPES};
pub use client::{GoogleSheetsClient, ValueInputOption, DEFAULT_SHEETS_BASE_URL};
pub use credential::ServiceAccountKey;
pub use error::{SheetError, SheetResult};
pub use writer::{ServiceAccountConnector, SheetConnector, SheetWriter};
