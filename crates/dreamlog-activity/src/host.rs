//! 인메모리 액티비티 호스트 어댑터.
//!
//! `ActivityHost` 포트 구현. 실제 OS 표시 서비스 대신 프로세스 메모리에
//! 액티비티 목록을 유지하고, 렌더링은 로그로 남긴다.
//! 동시 표시 한도와 권한 설정을 흉내 낸다.

use async_trait::async_trait;
use dreamlog_core::config::HostConfig;
use dreamlog_core::error::ActivityError;
use dreamlog_core::models::activity::{
    ActiveActivity, ActivityHandle, ActivityId, ActivityState, Dismissal,
};
use dreamlog_core::ports::activity_host::ActivityHost;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct HostedActivity {
    handle: ActivityHandle,
    state: ActivityState,
    /// 종료됨 (지연 제거 대기 중)
    ended: bool,
}

/// 인메모리 액티비티 호스트
pub struct InMemoryActivityHost {
    config: HostConfig,
    activities: Arc<Mutex<Vec<HostedActivity>>>,
}

impl InMemoryActivityHost {
    /// 새 호스트 생성
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            activities: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 이전 프로세스 실행에서 남은 액티비티 추가
    pub fn seed(&self, state: ActivityState) -> ActivityHandle {
        let handle = Self::new_handle();
        debug!(activity_id = %handle.id(), "기존 액티비티 복원");
        self.activities.lock().push(HostedActivity {
            handle: handle.clone(),
            state,
            ended: false,
        });
        handle
    }

    /// 화면에 보이는 액티비티 수
    pub fn live_count(&self) -> usize {
        self.activities.lock().iter().filter(|a| !a.ended).count()
    }

    fn new_handle() -> ActivityHandle {
        ActivityHandle::new(ActivityId::new(Uuid::new_v4().to_string()))
    }

    fn stale(handle: &ActivityHandle) -> ActivityError {
        ActivityError::StaleHandle {
            id: handle.id().clone(),
        }
    }
}

impl Default for InMemoryActivityHost {
    fn default() -> Self {
        Self::new(HostConfig::default())
    }
}

#[async_trait]
impl ActivityHost for InMemoryActivityHost {
    fn activities_enabled(&self) -> bool {
        self.config.authorized
    }

    async fn request(&self, initial: ActivityState) -> Result<ActivityHandle, ActivityError> {
        if !self.config.authorized {
            return Err(ActivityError::NotAuthorized);
        }

        let mut activities = self.activities.lock();
        let live = activities.iter().filter(|a| !a.ended).count();
        if live >= self.config.max_concurrent_activities {
            return Err(ActivityError::HostRejected(format!(
                "동시 표시 한도 초과: {}/{}",
                live, self.config.max_concurrent_activities
            )));
        }

        let handle = Self::new_handle();
        info!(
            activity_id = %handle.id(),
            target_time = %initial.target_time,
            message = %initial.message,
            "액티비티 표시"
        );
        activities.push(HostedActivity {
            handle: handle.clone(),
            state: initial,
            ended: false,
        });
        Ok(handle)
    }

    async fn update(
        &self,
        handle: &ActivityHandle,
        state: ActivityState,
    ) -> Result<(), ActivityError> {
        let mut activities = self.activities.lock();
        let entry = activities
            .iter_mut()
            .find(|a| !a.ended && &a.handle == handle)
            .ok_or_else(|| Self::stale(handle))?;

        info!(activity_id = %handle.id(), message = %state.message, "액티비티 갱신");
        entry.state = state;
        Ok(())
    }

    async fn end(&self, handle: &ActivityHandle, dismissal: Dismissal) -> Result<(), ActivityError> {
        match dismissal {
            Dismissal::Immediate => {
                let mut activities = self.activities.lock();
                let before = activities.len();
                activities.retain(|a| a.ended || &a.handle != handle);
                if activities.len() == before {
                    return Err(Self::stale(handle));
                }
                info!(activity_id = %handle.id(), "액티비티 즉시 종료");
            }
            Dismissal::After(delay) => {
                {
                    let mut activities = self.activities.lock();
                    let entry = activities
                        .iter_mut()
                        .find(|a| !a.ended && &a.handle == handle)
                        .ok_or_else(|| Self::stale(handle))?;
                    entry.ended = true;
                }
                info!(
                    activity_id = %handle.id(),
                    "액티비티 종료: {}초 후 제거",
                    delay.as_secs()
                );

                let activities = self.activities.clone();
                let handle = handle.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    activities.lock().retain(|a| a.handle != handle);
                    debug!(activity_id = %handle.id(), "종료된 액티비티 제거");
                });
            }
        }
        Ok(())
    }

    async fn list_active(&self) -> Vec<ActiveActivity> {
        self.activities
            .lock()
            .iter()
            .filter(|a| !a.ended)
            .map(|a| ActiveActivity {
                handle: a.handle.clone(),
                state: a.state.clone(),
            })
            .collect()
    }
}
