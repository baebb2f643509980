//! 공용 HTTP 클라이언트.

use crate::error::{DataError, Result};
use std::time::Duration;

/// 기본 요청 타임아웃 (초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Yahoo는 브라우저가 아닌 User-Agent를 차단하므로 브라우저 형식을 사용
const USER_AGENT: &str = "Mozilla/5.0";

/// 타임아웃이 설정된 HTTP 클라이언트를 생성합니다.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| DataError::Config(format!("HTTP client 생성 실패: {}", e)))
}
