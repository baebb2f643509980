//! 현지 시각 타임스탬프.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// 시트에 기록하는 시각 형식 (`DD-MM-YYYY HH:MM:SS`)
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// 특정 시간대로 변환된 실행 시각.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTimestamp {
    /// IANA 시간대 이름 (예: "Asia/Kolkata")
    pub zone: String,
    /// 형식화된 현지 시각
    pub text: String,
}

impl LocalTimestamp {
    /// UTC 시각을 주어진 시간대로 변환해 형식화합니다.
    pub fn at(now: DateTime<Utc>, zone: Tz) -> Self {
        Self {
            zone: zone.name().to_string(),
            text: format_local(now, zone),
        }
    }
}

/// UTC 시각을 시간대 현지 시각 문자열로 변환합니다.
pub fn format_local(now: DateTime<Utc>, zone: Tz) -> String {
    now.with_timezone(&zone).format(TIMESTAMP_FORMAT).to_string()
}
