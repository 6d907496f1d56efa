//! DreamLog 핵심 에러 타입.
//!
//! 호스트 연동 에러는 [`ActivityError`], 설정 관련 에러는 [`CoreError`]로 구분한다.
//! 코디네이터는 `ActivityError`를 호출자에게 전파하지 않고 로그/이벤트로만 남긴다.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::activity::ActivityId;

/// 라이브 액티비티 호스트 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    /// 플랫폼/사용자가 액티비티 표시를 허용하지 않음
    #[error("액티비티 권한 없음")]
    NotAuthorized,

    /// 호스트가 요청을 거부함 (동시 표시 한도 초과 등)
    #[error("호스트 요청 거부: {0}")]
    HostRejected(String),

    /// 대상 액티비티가 이미 종료됨
    #[error("만료된 핸들: {id}")]
    StaleHandle {
        /// 대상 액티비티 ID
        id: ActivityId,
    },

    /// 리마인더 시각이 센티널 경계를 넘음
    #[error("리마인더 시각이 허용 범위를 넘음: {target}")]
    TargetBeyondHorizon {
        /// 요청된 리마인더 시각
        target: DateTime<Utc>,
    },

    /// 분류되지 않은 호스트 에러
    #[error("알 수 없는 호스트 에러: {0}")]
    Unknown(String),
}

/// 코어 레이어 에러.
/// 설정 로드/검증 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_message_contains_id() {
        let err = ActivityError::StaleHandle {
            id: ActivityId::new("act-9"),
        };
        assert!(err.to_string().contains("act-9"));
    }

    #[test]
    fn validation_message_contains_field() {
        let err = CoreError::Validation {
            field: "companion_refresh_interval_secs".to_string(),
            message: "0보다 커야 함".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("companion_refresh_interval_secs"));
        assert!(msg.contains("0보다 커야 함"));
    }
}
