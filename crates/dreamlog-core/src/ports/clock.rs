//! 시계 포트.
//!
//! 현재 시각과 지연 대기를 제공한다. 코디네이터의 one-shot/주기 타이머는
//! 이 포트의 `sleep` 위에서 동작하므로 테스트에서 시간을 제어할 수 있다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// 시계 인터페이스
#[async_trait]
pub trait Clock: Send + Sync {
    /// 현재 시각
    fn now(&self) -> DateTime<Utc>;

    /// `duration`만큼 대기
    async fn sleep(&self, duration: Duration);
}
