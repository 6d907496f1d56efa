//! 라이브 액티비티 호스트 포트.
//!
//! OS 수준 표시 서비스(잠금 화면/다이나믹 아일랜드)를 추상화한다.
//! 구현: `dreamlog-activity` crate (`InMemoryActivityHost`)

use async_trait::async_trait;

use crate::error::ActivityError;
use crate::models::activity::{ActiveActivity, ActivityHandle, ActivityState, Dismissal};

/// 라이브 액티비티 호스트 인터페이스
///
/// 호스트 목록은 프로세스 전역 자원이며, 이전 실행에서 남은 액티비티도 포함한다.
#[async_trait]
pub trait ActivityHost: Send + Sync {
    /// 액티비티 표시 허용 여부 (권한/플랫폼 설정)
    fn activities_enabled(&self) -> bool {
        true
    }

    /// 새 액티비티 생성 요청
    async fn request(&self, initial: ActivityState) -> Result<ActivityHandle, ActivityError>;

    /// 활성 액티비티의 콘텐츠 교체
    async fn update(&self, handle: &ActivityHandle, state: ActivityState)
        -> Result<(), ActivityError>;

    /// 액티비티 종료
    async fn end(&self, handle: &ActivityHandle, dismissal: Dismissal)
        -> Result<(), ActivityError>;

    /// 현재 보이는 모든 액티비티 (다른 프로세스 실행이 만든 것 포함)
    async fn list_active(&self) -> Vec<ActiveActivity>;
}
