//! 시스템 시계 어댑터.
//!
//! `Clock` 포트 구현. `chrono::Utc`와 `tokio::time` 기반.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dreamlog_core::ports::clock::Clock;
use std::time::Duration;

/// 실제 시각을 사용하는 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleep_follows_tokio_time() {
        let start = tokio::time::Instant::now();
        SystemClock.sleep(Duration::from_secs(90)).await;
        assert!(start.elapsed() >= Duration::from_secs(90));
    }

    #[test]
    fn now_is_current() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }
}
