//! 에러 타입 정의.

use marketsheet_core::CoreError;
use marketsheet_data::DataError;
use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(String),
    /// 자산 레지스트리 에러
    Registry(CoreError),
    /// 데이터 소스 에러 (HTTP 클라이언트 생성 등)
    DataSource(DataError),
    /// 일반 에러
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Registry(e) => write!(f, "Asset registry error: {}", e),
            Self::DataSource(e) => write!(f, "Data source error: {}", e),
            Self::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {}

impl From<CoreError> for CollectorError {
    fn from(err: CoreError) -> Self {
        Self::Registry(err)
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::DataSource(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CollectorError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Other(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
