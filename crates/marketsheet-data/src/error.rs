//! 데이터 소스 오류 타입.

use thiserror::Error;

/// 시세 조회 오류.
///
/// 어떤 변형이든 해당 자산의 조회는 전체 실패로 처리됩니다.
#[derive(Debug, Error)]
pub enum DataError {
    /// 네트워크/전송 오류 (연결 실패, 타임아웃 등)
    #[error("Network error: {0}")]
    Network(String),

    /// 성공이 아닌 HTTP 상태
    #[error("HTTP {status} for {identifier}")]
    HttpStatus { status: u16, identifier: String },

    /// 소스가 반환한 API 오류
    #[error("API error {code}: {description}")]
    Api { code: String, description: String },

    /// 응답 본문 파싱 실패
    #[error("Parse error: {0}")]
    Parse(String),

    /// 응답에 필수 구조가 없음
    #[error("Missing field: {0}")]
    MissingField(String),

    /// 시계열이 비어 있음
    #[error("Empty series: {0}")]
    EmptySeries(String),

    /// HTTP 클라이언트 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::Parse(err.to_string())
        } else {
            DataError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
