//! 꿈 기록 리마인더 코디네이터.
//!
//! 예약된 리마인더 액티비티 하나를 시작/갱신/종료한다.
//! 호스트 에러는 로그와 이벤트로만 남기고 호출자에게 전파하지 않는다.

use chrono::{DateTime, Utc};
use dreamlog_core::config::LiveActivityConfig;
use dreamlog_core::error::ActivityError;
use dreamlog_core::models::activity::{
    sentinel_horizon, ActivityHandle, ActivityKind, ActivityState, Dismissal,
};
use dreamlog_core::ports::activity_host::ActivityHost;
use dreamlog_core::ports::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::events::{emit, ActivityEvent};
use crate::timer::TimerHandle;

const KIND: ActivityKind = ActivityKind::Reminder;

/// 코디네이터 내부 상태 (start/stop 사이의 read-modify-write를 보호)
#[derive(Default)]
struct ReminderState {
    /// 현재 소유 중인 액티비티
    current: Option<ActivityHandle>,
    /// 시작 직후 재전송 타이머
    initial_refresh: Option<TimerHandle>,
}

/// 리마인더 코디네이터
pub struct ReminderCoordinator {
    host: Arc<dyn ActivityHost>,
    clock: Arc<dyn Clock>,
    config: LiveActivityConfig,
    event_tx: Option<broadcast::Sender<ActivityEvent>>,
    state: Mutex<ReminderState>,
}

impl ReminderCoordinator {
    /// 새 리마인더 코디네이터 생성
    pub fn new(
        host: Arc<dyn ActivityHost>,
        clock: Arc<dyn Clock>,
        config: LiveActivityConfig,
    ) -> Self {
        Self {
            host,
            clock,
            config,
            event_tx: None,
            state: Mutex::new(ReminderState::default()),
        }
    }

    /// 이벤트 송신자 설정
    pub fn with_event_tx(mut self, event_tx: broadcast::Sender<ActivityEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// 리마인더 시작
    ///
    /// 기존 리마인더를 먼저 종료한다. 권한이 없거나 호스트가 거부하면
    /// 로그만 남기고 반환한다.
    pub async fn start(&self, reminder_time: DateTime<Utc>, message: impl Into<String>) {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;

        if let Err(e) = self.check_start(reminder_time) {
            info!(error = %e, "리마인더 시작 건너뜀");
            emit(
                &self.event_tx,
                ActivityEvent::StartSkipped {
                    kind: KIND,
                    reason: e.to_string(),
                },
            );
            return;
        }

        let initial = ActivityState::reminder(reminder_time, message);
        match self.host.request(initial.clone()).await {
            Ok(handle) => {
                info!(activity_id = %handle.id(), %reminder_time, "리마인더 액티비티 시작");
                emit(
                    &self.event_tx,
                    ActivityEvent::Started {
                        kind: KIND,
                        id: handle.id().clone(),
                    },
                );
                if let Some(delay) = self.config.reminder_initial_refresh() {
                    state.initial_refresh =
                        Some(self.schedule_initial_refresh(handle.clone(), initial, delay));
                }
                state.current = Some(handle);
            }
            Err(e) => {
                warn!(error = %e, "리마인더 액티비티 요청 실패");
                emit(
                    &self.event_tx,
                    ActivityEvent::StartSkipped {
                        kind: KIND,
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    /// 보이는 모든 리마인더 타입 액티비티의 문구 교체
    ///
    /// 센티널 필터 없이 같은 타입의 액티비티를 모두 갱신한다.
    pub async fn update(&self, message: impl Into<String>) {
        let message = message.into();
        let activities = self.host.list_active().await;
        if activities.is_empty() {
            debug!("갱신할 리마인더 액티비티 없음");
            emit(&self.event_tx, ActivityEvent::NothingToUpdate { kind: KIND });
            return;
        }

        let now = self.clock.now();
        for activity in activities {
            let result = self
                .host
                .update(&activity.handle, ActivityState::reminder(now, message.clone()))
                .await;
            report_update(&self.event_tx, &activity.handle, result);
        }
    }

    /// 보이는 모든 리마인더 타입 액티비티 즉시 종료 (멱등)
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;
    }

    /// 현재 소유 중인 핸들
    pub async fn current_activity(&self) -> Option<ActivityHandle> {
        self.state.lock().await.current.clone()
    }

    async fn stop_locked(&self, state: &mut ReminderState) {
        if let Some(timer) = state.initial_refresh.take() {
            timer.cancel();
        }

        // 같은 타입이면 컴패니언도 함께 종료되므로 이벤트는 실제 종류로 표시
        let now = self.clock.now();
        for activity in self.host.list_active().await {
            let kind = activity.state.kind(now);
            let handle = activity.handle;
            match self.host.end(&handle, Dismissal::Immediate).await {
                Ok(()) => {
                    info!(activity_id = %handle.id(), %kind, "액티비티 종료");
                    emit(
                        &self.event_tx,
                        ActivityEvent::Ended {
                            kind,
                            id: handle.id().clone(),
                        },
                    );
                }
                Err(e) => {
                    warn!(activity_id = %handle.id(), %kind, error = %e, "액티비티 종료 실패");
                    emit(
                        &self.event_tx,
                        ActivityEvent::EndFailed {
                            kind,
                            id: handle.id().clone(),
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        state.current = None;
    }

    fn check_start(&self, reminder_time: DateTime<Utc>) -> Result<(), ActivityError> {
        if !self.config.enabled || !self.host.activities_enabled() {
            return Err(ActivityError::NotAuthorized);
        }
        if reminder_time > sentinel_horizon(self.clock.now()) {
            return Err(ActivityError::TargetBeyondHorizon {
                target: reminder_time,
            });
        }
        Ok(())
    }

    /// 호스트의 초기 렌더링이 늦게 반영되는 경우를 위해 같은 상태를 한 번 더 전송
    fn schedule_initial_refresh(
        &self,
        handle: ActivityHandle,
        initial: ActivityState,
        delay: Duration,
    ) -> TimerHandle {
        let host = self.host.clone();
        let event_tx = self.event_tx.clone();
        TimerHandle::once(self.clock.clone(), delay, move || async move {
            let result = host.update(&handle, initial).await;
            report_update(&event_tx, &handle, result);
        })
    }
}

fn report_update(
    event_tx: &Option<broadcast::Sender<ActivityEvent>>,
    handle: &ActivityHandle,
    result: Result<(), ActivityError>,
) {
    match result {
        Ok(()) => {
            debug!(activity_id = %handle.id(), "리마인더 액티비티 갱신");
            emit(
                event_tx,
                ActivityEvent::Updated {
                    kind: KIND,
                    id: handle.id().clone(),
                },
            );
        }
        Err(e) => {
            warn!(activity_id = %handle.id(), error = %e, "리마인더 액티비티 갱신 실패");
            emit(
                event_tx,
                ActivityEvent::UpdateFailed {
                    kind: KIND,
                    id: handle.id().clone(),
                    reason: e.to_string(),
                },
            );
        }
    }
}
