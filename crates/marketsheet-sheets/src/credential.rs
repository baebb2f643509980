//! 서비스 계정 자격증명.

use crate::error::{SheetError, SheetResult};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;

/// 기본 토큰 발급 주소
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Deserialize)]
struct RawServiceAccountKey {
    #[serde(rename = "type", default)]
    key_type: Option<String>,
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

/// Google 서비스 계정 키 (JSON 키 파일 내용).
pub struct ServiceAccountKey {
    /// 서비스 계정 이메일 (JWT `iss`)
    pub client_email: String,
    /// 키 ID (JWT 헤더 `kid`)
    pub private_key_id: Option<String>,
    /// 토큰 발급 주소 (JWT `aud`)
    pub token_uri: String,
    private_key: SecretString,
}

impl ServiceAccountKey {
    /// JSON 문자열을 파싱합니다.
    pub fn from_json(json: &SecretString) -> SheetResult<Self> {
        let raw: RawServiceAccountKey = serde_json::from_str(json.expose_secret())
            .map_err(|e| SheetError::InvalidCredential(format!("JSON 파싱 실패: {}", e)))?;

        if let Some(kind) = raw.key_type.as_deref() {
            if kind != "service_account" {
                return Err(SheetError::InvalidCredential(format!(
                    "서비스 계정 키가 아닙니다 (type = {})",
                    kind
                )));
            }
        }

        if !raw.private_key.contains("PRIVATE KEY") {
            return Err(SheetError::InvalidCredential(
                "private_key가 PEM 형식이 아닙니다".to_string(),
            ));
        }

        Ok(Self {
            client_email: raw.client_email,
            private_key_id: raw.private_key_id,
            token_uri: raw
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            private_key: SecretString::from(raw.private_key),
        })
    }

    pub(crate) fn private_key_pem(&self) -> &str {
        self.private_key.expose_secret()
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
