//! 딥링크 파싱.
//!
//! 외부 환경(알림 탭, 잠금 화면 액티비티 탭)이 앱을 깨울 때 전달하는 URL을
//! 코디네이터 동작으로 변환한다.
//!
//! - `dreamlog://record` → 리마인더 문구를 기록 중 문구로 교체
//! - `dreamlog://companion/refresh` → 컴패니언 문구 즉시 교체

use thiserror::Error;
use url::Url;

/// 앱 URL 스킴
pub const SCHEME: &str = "dreamlog";

/// 딥링크 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLink {
    /// 사용자가 리마인더를 열었음
    OpenReminder,
    /// 컴패니언 문구 갱신 요청
    RefreshCompanion,
}

/// 딥링크 파싱 에러
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeepLinkError {
    #[error("잘못된 URL: {0}")]
    InvalidUrl(String),

    #[error("지원하지 않는 스킴: {0}")]
    UnsupportedScheme(String),

    #[error("알 수 없는 경로: {0}")]
    UnknownRoute(String),
}

impl DeepLink {
    /// URL 문자열 파싱
    pub fn parse(raw: &str) -> Result<Self, DeepLinkError> {
        let url = Url::parse(raw.trim()).map_err(|e| DeepLinkError::InvalidUrl(e.to_string()))?;
        if url.scheme() != SCHEME {
            return Err(DeepLinkError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = url.host_str().unwrap_or_default();
        let path = url.path().trim_end_matches('/');
        match (host, path) {
            ("record", "") => Ok(DeepLink::OpenReminder),
            ("companion", "/refresh") => Ok(DeepLink::RefreshCompanion),
            _ => Err(DeepLinkError::UnknownRoute(format!("{host}{path}"))),
        }
    }
}
