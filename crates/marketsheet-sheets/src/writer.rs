//! 시트 기록 추상화.
//!
//! 수집기는 [`SheetConnector`]로 연결을 얻고 [`SheetWriter`]로 기록합니다.
//! 테스트에서는 메모리 기반 구현으로 대체할 수 있습니다.

use crate::auth::TokenProvider;
use crate::client::{GoogleSheetsClient, DEFAULT_SHEETS_BASE_URL};
use crate::credential::ServiceAccountKey;
use crate::error::{SheetError, SheetResult};
use async_trait::async_trait;
use secrecy::SecretString;
use tracing::info;

/// 인증된 스프레드시트 기록기.
#[async_trait]
pub trait SheetWriter: Send + Sync {
    /// 범위에 행 목록을 원문 그대로(RAW) 기록합니다.
    async fn update_range(&self, range: &str, values: &[Vec<String>]) -> SheetResult<()>;

    /// 단일 셀에 값을 기록합니다 (USER_ENTERED, 날짜로 해석될 수 있음).
    async fn update_cell(&self, cell: &str, value: &str) -> SheetResult<()>;
}

/// 기록기 생성 (자격증명 로드 + 인증).
#[async_trait]
pub trait SheetConnector: Send + Sync {
    async fn connect(&self) -> SheetResult<Box<dyn SheetWriter>>;
}

/// 서비스 계정 JSON으로 Google Sheets에 연결합니다.
pub struct ServiceAccountConnector {
    credential: Option<SecretString>,
    credential_var: String,
    spreadsheet_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl ServiceAccountConnector {
    /// `credential`은 환경변수 `credential_var`에서 읽은 JSON (없으면 `None`).
    pub fn new(
        credential: Option<SecretString>,
        credential_var: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            credential,
            credential_var: credential_var.into(),
            spreadsheet_id: spreadsheet_id.into(),
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            client,
        }
    }

    /// Sheets API 주소를 변경합니다 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SheetConnector for ServiceAccountConnector {
    async fn connect(&self) -> SheetResult<Box<dyn SheetWriter>> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| SheetError::MissingCredential {
                var: self.credential_var.clone(),
            })?;

        let key = ServiceAccountKey::from_json(credential)?;
        info!(client_email = %key.client_email, "서비스 계정으로 인증 중");

        let token = TokenProvider::new(self.client.clone(), key)
            .fetch_token()
            .await?;

        Ok(Box::new(GoogleSheetsClient::new(
            self.client.clone(),
            token,
            self.base_url.clone(),
            self.spreadsheet_id.clone(),
        )))
    }
}
