//! 시트 기록 에러.

use thiserror::Error;

/// 시트 인증/기록 에러.
#[derive(Debug, Error)]
pub enum SheetError {
    /// 자격증명 환경변수가 설정되지 않음
    #[error("자격증명이 설정되지 않았습니다: {var}")]
    MissingCredential { var: String },

    /// 자격증명 JSON/키 형식 오류
    #[error("잘못된 자격증명: {0}")]
    InvalidCredential(String),

    /// JWT 서명 실패
    #[error("JWT 서명 실패: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// 토큰 발급 거부
    #[error("토큰 발급 실패: {0}")]
    Auth(String),

    /// Sheets API 오류 응답
    #[error("Sheets API 오류 {status}: {message}")]
    Api { status: u16, message: String },

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(#[from] reqwest::Error),

    /// 잘못된 설정 (URL 등)
    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),
}

impl SheetError {
    /// 자격증명 누락 여부 (쓰기 단계만 건너뛰는 경우).
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential { .. })
    }
}

pub type SheetResult<T> = Result<T, SheetError>;
