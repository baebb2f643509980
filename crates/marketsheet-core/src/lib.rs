//! # Marketsheet Core
//!
//! 시세 동기화 도구의 핵심 도메인 모델을 제공합니다.
//!
//! - 자산 레지스트리 (`AssetRegistry`, `AssetDescriptor`)
//! - 정규화된 시세 레코드 (`QuoteRecord`, `FieldValue`)
//! - 시트 출력용 행 포맷터 (`ResultRow`)
//! - 동기화 결과 및 현지 시각 타임스탬프 (`SyncResult`, `LocalTimestamp`)

pub mod asset;
pub mod error;
pub mod quote;
pub mod row;
pub mod timestamp;

pub use asset::*;
pub use error::*;
pub use quote::*;
pub use row::*;
pub use timestamp::*;
