//! 서비스 계정 OAuth 2.0 인증 (JWT bearer grant).
//!
//! 1. 서비스 계정 키로 RS256 JWT를 서명
//! 2. `token_uri`에 `grant_type=urn:ietf:params:oauth:grant-type:jwt-bearer`로 교환
//! 3. 응답의 접근 토큰을 Sheets API 호출에 사용

use crate::credential::ServiceAccountKey;
use crate::error::{SheetError, SheetResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 스프레드시트 읽기/쓰기 및 앱이 만든 파일 접근 범위
pub const SPREADSHEET_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.file",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Google이 허용하는 assertion 최대 수명
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// JWT assertion 클레임.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// 토큰 응답.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// OAuth 오류 응답.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// 발급된 접근 토큰.
#[derive(Debug)]
pub struct AccessToken {
    pub token: SecretString,
    pub token_type: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn secret(&self) -> &str {
        self.token.expose_secret()
    }
}

/// 서비스 계정 토큰 발급기.
pub struct TokenProvider {
    client: reqwest::Client,
    key: ServiceAccountKey,
    scopes: Vec<String>,
}

impl TokenProvider {
    pub fn new(client: reqwest::Client, key: ServiceAccountKey) -> Self {
        Self {
            client,
            key,
            scopes: SPREADSHEET_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 서명된 JWT assertion을 생성합니다.
    pub fn build_assertion(&self, now: DateTime<Utc>) -> SheetResult<String> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: self.scopes.join(" "),
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key_pem().as_bytes())
            .map_err(|e| SheetError::InvalidCredential(format!("RSA 키 로드 실패: {}", e)))?;

        Ok(encode(&header, &claims, &encoding_key)?)
    }

    /// 접근 토큰을 발급받습니다.
    pub async fn fetch_token(&self) -> SheetResult<AccessToken> {
        let now = Utc::now();
        let assertion = self.build_assertion(now)?;

        debug!(
            client_email = %self.key.client_email,
            token_uri = %self.key.token_uri,
            "접근 토큰 요청"
        );

        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<OAuthErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{} ({})", err.error, desc),
                    None => err.error,
                },
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            return Err(SheetError::Auth(message));
        }

        let token: TokenResponse = resp.json().await?;
        info!(expires_in = ?token.expires_in, "접근 토큰 발급 완료");

        Ok(AccessToken {
            token: SecretString::from(token.access_token),
            token_type: token.token_type,
            expires_at: token.expires_in.map(|secs| now + Duration::seconds(secs)),
        })
    }
}
