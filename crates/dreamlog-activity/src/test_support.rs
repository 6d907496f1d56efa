//! 테스트용 목 호스트와 헬퍼.

use async_trait::async_trait;
use dreamlog_core::error::ActivityError;
use dreamlog_core::models::activity::{
    ActiveActivity, ActivityHandle, ActivityId, ActivityState, Dismissal,
};
use dreamlog_core::ports::activity_host::ActivityHost;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// 스폰된 태스크가 진행할 수 있도록 양보
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// 호출 기록
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostCall {
    Request(ActivityState),
    Update(ActivityId, ActivityState),
    End(ActivityId, Dismissal),
}

/// 호출을 기록하는 목 호스트
pub(crate) struct RecordingHost {
    authorized: AtomicBool,
    reject_requests: AtomicBool,
    next_id: AtomicU32,
    active: Mutex<Vec<ActiveActivity>>,
    /// update/end가 StaleHandle로 실패하는 핸들 (목록에는 계속 남음)
    failing: Mutex<Vec<ActivityId>>,
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub(crate) fn new() -> Self {
        Self {
            authorized: AtomicBool::new(true),
            reject_requests: AtomicBool::new(false),
            next_id: AtomicU32::new(1),
            active: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn unauthorized() -> Self {
        let host = Self::new();
        host.authorized.store(false, Ordering::SeqCst);
        host
    }

    pub(crate) fn rejecting() -> Self {
        let host = Self::new();
        host.reject_requests.store(true, Ordering::SeqCst);
        host
    }

    /// 이전 실행에서 남은 액티비티 추가 (호출 기록 없음)
    pub(crate) fn seed(&self, state: ActivityState) -> ActivityHandle {
        let handle = self.next_handle();
        self.active.lock().push(ActiveActivity {
            handle: handle.clone(),
            state,
        });
        handle
    }

    /// 목록에 보이지만 update/end는 거부되는 핸들로 표시
    pub(crate) fn fail_for(&self, handle: &ActivityHandle) {
        self.failing.lock().push(handle.id().clone());
    }

    pub(crate) fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn requests(&self) -> Vec<ActivityState> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Request(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests().len()
    }

    pub(crate) fn updates(&self) -> Vec<(ActivityId, ActivityState)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Update(id, state) => Some((id, state)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn ends(&self) -> Vec<(ActivityId, Dismissal)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::End(id, dismissal) => Some((id, dismissal)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    fn check_failing(&self, handle: &ActivityHandle) -> Result<(), ActivityError> {
        if self.failing.lock().contains(handle.id()) {
            return Err(ActivityError::StaleHandle {
                id: handle.id().clone(),
            });
        }
        Ok(())
    }

    fn next_handle(&self) -> ActivityHandle {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        ActivityHandle::new(ActivityId::new(format!("h{n}")))
    }
}

#[async_trait]
impl ActivityHost for RecordingHost {
    fn activities_enabled(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }

    async fn request(&self, initial: ActivityState) -> Result<ActivityHandle, ActivityError> {
        self.calls.lock().push(HostCall::Request(initial.clone()));
        if !self.authorized.load(Ordering::SeqCst) {
            return Err(ActivityError::NotAuthorized);
        }
        if self.reject_requests.load(Ordering::SeqCst) {
            return Err(ActivityError::HostRejected("테스트 거부".to_string()));
        }
        Ok(self.seed(initial))
    }

    async fn update(
        &self,
        handle: &ActivityHandle,
        state: ActivityState,
    ) -> Result<(), ActivityError> {
        self.calls
            .lock()
            .push(HostCall::Update(handle.id().clone(), state.clone()));
        self.check_failing(handle)?;
        let mut active = self.active.lock();
        match active.iter_mut().find(|a| &a.handle == handle) {
            Some(entry) => {
                entry.state = state;
                Ok(())
            }
            None => Err(ActivityError::StaleHandle {
                id: handle.id().clone(),
            }),
        }
    }

    async fn end(&self, handle: &ActivityHandle, dismissal: Dismissal) -> Result<(), ActivityError> {
        self.calls
            .lock()
            .push(HostCall::End(handle.id().clone(), dismissal));
        self.check_failing(handle)?;
        let mut active = self.active.lock();
        let before = active.len();
        active.retain(|a| &a.handle != handle);
        if active.len() == before {
            return Err(ActivityError::StaleHandle {
                id: handle.id().clone(),
            });
        }
        Ok(())
    }

    async fn list_active(&self) -> Vec<ActiveActivity> {
        self.active.lock().clone()
    }
}
