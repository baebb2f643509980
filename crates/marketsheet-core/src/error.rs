//! 핵심 도메인 에러 타입.

use thiserror::Error;

/// 레지스트리 로드/검증 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 레지스트리 파일 읽기 실패
    #[error("레지스트리 파일 읽기 실패: {0}")]
    Io(#[from] std::io::Error),

    /// TOML 파싱 실패
    #[error("레지스트리 파싱 실패: {0}")]
    Parse(#[from] toml::de::Error),

    /// 잘못된 레지스트리 구성
    #[error("잘못된 레지스트리: {0}")]
    InvalidRegistry(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
