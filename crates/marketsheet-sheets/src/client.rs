//! Sheets API v4 values 클라이언트.

use crate::auth::AccessToken;
use crate::error::{SheetError, SheetResult};
use crate::writer::SheetWriter;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 기본 API 주소
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// 입력값 해석 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInputOption {
    /// 문자열 그대로 저장
    Raw,
    /// 시트 UI에 입력한 것처럼 해석 (숫자/날짜 변환)
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

/// values.update 요청 본문.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: &'a [Vec<String>],
}

/// values.update 응답.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    #[serde(default)]
    updated_range: Option<String>,
    #[serde(default)]
    updated_cells: Option<u64>,
}

/// Google API 오류 응답.
#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// 인증된 Sheets 클라이언트 (스프레드시트 하나에 고정).
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    token: AccessToken,
    base_url: String,
    spreadsheet_id: String,
}

impl GoogleSheetsClient {
    pub fn new(
        client: reqwest::Client,
        token: AccessToken,
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}` (범위는 경로 세그먼트로 인코딩).
    fn values_url(&self, range: &str) -> SheetResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SheetError::InvalidConfig(format!("Sheets 주소 오류: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::InvalidConfig(format!("Sheets 주소 오류: {}", self.base_url)))?
            .pop_if_empty()
            .extend(&["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }

    /// 범위에 2차원 값을 기록합니다.
    pub async fn update_values(
        &self,
        range: &str,
        values: &[Vec<String>],
        input: ValueInputOption,
    ) -> SheetResult<()> {
        let url = self.values_url(range)?;
        let body = ValueRange {
            range,
            major_dimension: "ROWS",
            values,
        };

        debug!(range, rows = values.len(), input = input.as_str(), "values.update 요청");

        let resp = self
            .client
            .put(url)
            .query(&[("valueInputOption", input.as_str())])
            .bearer_auth(self.token.secret())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<GoogleErrorResponse>(&text) {
                Ok(err) => match err.error.status {
                    Some(code) => format!("{} ({})", err.error.message, code),
                    None => err.error.message,
                },
                Err(_) => text,
            };
            return Err(SheetError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let updated: UpdateValuesResponse = resp.json().await?;
        info!(
            range = updated.updated_range.as_deref().unwrap_or(range),
            cells = updated.updated_cells.unwrap_or(0),
            "시트 갱신 완료"
        );

        Ok(())
    }
}

#[async_trait]
impl SheetWriter for GoogleSheetsClient {
    async fn update_range(&self, range: &str, values: &[Vec<String>]) -> SheetResult<()> {
        self.update_values(range, values, ValueInputOption::Raw).await
    }

    async fn update_cell(&self, cell: &str, value: &str) -> SheetResult<()> {
        let values = [vec![value.to_string()]];
        self.update_values(cell, &values, ValueInputOption::UserEntered)
            .await
    }
}
