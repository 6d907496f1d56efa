//! 컴패니언 코디네이터.
//!
//! 회전 문구를 보여주는 상시 액티비티 하나를 관리한다.
//! 리마인더와 같은 호스트 목록을 공유하므로, 컴패니언 액티비티는
//! 센티널 시각(`now + 365일` 초과)으로만 구분한다.

use dreamlog_core::config::LiveActivityConfig;
use dreamlog_core::error::ActivityError;
use dreamlog_core::models::activity::{
    ActiveActivity, ActivityHandle, ActivityKind, ActivityState, Dismissal,
};
use dreamlog_core::ports::activity_host::ActivityHost;
use dreamlog_core::ports::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::events::{emit, ActivityEvent};
use crate::signature::SignatureSource;
use crate::timer::TimerHandle;

const KIND: ActivityKind = ActivityKind::Companion;

/// 문구 갱신에 필요한 의존성 묶음 (타이머 태스크로 복제됨)
#[derive(Clone)]
struct SignatureRefresher {
    host: Arc<dyn ActivityHost>,
    clock: Arc<dyn Clock>,
    signatures: Arc<SignatureSource>,
    event_tx: Option<broadcast::Sender<ActivityEvent>>,
}

impl SignatureRefresher {
    /// 호스트 목록 중 센티널 시각을 가진 액티비티만
    async fn companions(&self) -> Vec<ActiveActivity> {
        let now = self.clock.now();
        self.host
            .list_active()
            .await
            .into_iter()
            .filter(|a| a.state.is_companion(now))
            .collect()
    }

    async fn refresh(&self) {
        let companions = self.companions().await;
        if companions.is_empty() {
            debug!("갱신할 컴패니언 액티비티 없음");
            emit(&self.event_tx, ActivityEvent::NothingToUpdate { kind: KIND });
            return;
        }

        for activity in companions {
            let handle = activity.handle;
            let state = ActivityState::companion(self.signatures.pick());
            match self.host.update(&handle, state).await {
                Ok(()) => {
                    debug!(activity_id = %handle.id(), "컴패니언 문구 갱신");
                    emit(
                        &self.event_tx,
                        ActivityEvent::Updated {
                            kind: KIND,
                            id: handle.id().clone(),
                        },
                    );
                }
                Err(e) => {
                    warn!(activity_id = %handle.id(), error = %e, "컴패니언 문구 갱신 실패");
                    emit(
                        &self.event_tx,
                        ActivityEvent::UpdateFailed {
                            kind: KIND,
                            id: handle.id().clone(),
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }
    }
}

#[derive(Default)]
struct CompanionState {
    /// 현재 소유 중인 액티비티
    current: Option<ActivityHandle>,
    /// 주기 문구 갱신 타이머
    refresh_timer: Option<TimerHandle>,
}

/// 컴패니언 코디네이터
pub struct CompanionCoordinator {
    refresher: SignatureRefresher,
    enabled: bool,
    refresh_interval: Duration,
    state: Mutex<CompanionState>,
}

impl CompanionCoordinator {
    /// 새 컴패니언 코디네이터 생성
    pub fn new(
        host: Arc<dyn ActivityHost>,
        clock: Arc<dyn Clock>,
        config: LiveActivityConfig,
    ) -> Self {
        let signatures = SignatureSource::default().with_fallback(config.fallback_signature.clone());
        Self {
            refresher: SignatureRefresher {
                host,
                clock,
                signatures: Arc::new(signatures),
                event_tx: None,
            },
            enabled: config.enabled,
            refresh_interval: config.companion_refresh_interval(),
            state: Mutex::new(CompanionState::default()),
        }
    }

    /// 문구 목록 교체 (설정의 대체 문구는 유지)
    pub fn with_signatures(mut self, signatures: SignatureSource) -> Self {
        let fallback = self.refresher.signatures.fallback().to_string();
        self.refresher.signatures = Arc::new(signatures.with_fallback(fallback));
        self
    }

    /// 이벤트 송신자 설정
    pub fn with_event_tx(mut self, event_tx: broadcast::Sender<ActivityEvent>) -> Self {
        self.refresher.event_tx = Some(event_tx);
        self
    }

    /// 무작위 문구 하나
    pub fn get_random_signature(&self) -> String {
        self.refresher.signatures.pick()
    }

    /// 컴패니언 시작
    ///
    /// 기존 컴패니언을 먼저 종료하고, 성공하면 주기 갱신 타이머를 건다.
    pub async fn start(&self) {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;

        if !self.enabled || !self.refresher.host.activities_enabled() {
            self.skip_start(ActivityError::NotAuthorized);
            return;
        }

        let signature = self.get_random_signature();
        match self
            .refresher
            .host
            .request(ActivityState::companion(signature))
            .await
        {
            Ok(handle) => {
                info!(activity_id = %handle.id(), "컴패니언 액티비티 시작");
                emit(
                    &self.refresher.event_tx,
                    ActivityEvent::Started {
                        kind: KIND,
                        id: handle.id().clone(),
                    },
                );
                state.current = Some(handle);
                state.refresh_timer = Some(self.arm_refresh());
            }
            Err(e) => self.skip_start(e),
        }
    }

    /// 컴패니언 문구 즉시 교체 (타이머 콜백과 동일)
    pub async fn refresh_signature(&self) {
        self.refresher.refresh().await;
    }

    /// "지금 갱신" 요청
    pub async fn update_now(&self) {
        self.refresh_signature().await;
    }

    /// 컴패니언 종료 및 갱신 타이머 취소 (멱등)
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;
    }

    /// 보이는 컴패니언 액티비티가 하나라도 있는지
    pub async fn is_active(&self) -> bool {
        !self.refresher.companions().await.is_empty()
    }

    /// 현재 소유 중인 핸들
    pub async fn current_activity(&self) -> Option<ActivityHandle> {
        self.state.lock().await.current.clone()
    }

    /// 주기 갱신 타이머가 걸려 있는지
    pub async fn is_refresh_armed(&self) -> bool {
        self.state
            .lock()
            .await
            .refresh_timer
            .as_ref()
            .is_some_and(TimerHandle::is_armed)
    }

    fn arm_refresh(&self) -> TimerHandle {
        debug!(
            "컴패니언 갱신 타이머 시작: {}초",
            self.refresh_interval.as_secs()
        );
        let refresher = self.refresher.clone();
        TimerHandle::every(
            self.refresher.clock.clone(),
            self.refresh_interval,
            move || {
                let refresher = refresher.clone();
                async move { refresher.refresh().await }
            },
        )
    }

    async fn stop_locked(&self, state: &mut CompanionState) {
        if let Some(timer) = state.refresh_timer.take() {
            timer.cancel();
            debug!("컴패니언 갱신 타이머 취소");
        }

        for activity in self.refresher.companions().await {
            let handle = activity.handle;
            match self.refresher.host.end(&handle, Dismissal::Immediate).await {
                Ok(()) => {
                    info!(activity_id = %handle.id(), "컴패니언 액티비티 종료");
                    emit(
                        &self.refresher.event_tx,
                        ActivityEvent::Ended {
                            kind: KIND,
                            id: handle.id().clone(),
                        },
                    );
                }
                Err(e) => {
                    warn!(activity_id = %handle.id(), error = %e, "컴패니언 액티비티 종료 실패");
                    emit(
                        &self.refresher.event_tx,
                        ActivityEvent::EndFailed {
                            kind: KIND,
                            id: handle.id().clone(),
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        state.current = None;
    }

    fn skip_start(&self, error: ActivityError) {
        info!(error = %error, "컴패니언 시작 건너뜀");
        emit(
            &self.refresher.event_tx,
            ActivityEvent::StartSkipped {
                kind: KIND,
                reason: error.to_string(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::test_support::{settle, RecordingHost};
    use chrono::{Duration as ChronoDuration, Utc};
    use dreamlog_core::models::activity::{companion_sentinel, ActivityId};

    const HALF_HOUR: Duration = Duration::from_secs(30 * 60);

    fn coordinator(host: Arc<RecordingHost>) -> CompanionCoordinator {
        CompanionCoordinator::new(host, Arc::new(SystemClock), LiveActivityConfig::default())
            .with_signatures(SignatureSource::new(["A", "B"]))
    }

    #[tokio::test]
    async fn start_requests_sentinel_state() {
        let host = Arc::new(RecordingHost::new());
        let companion = coordinator(host.clone());

        companion.start().await;

        let active = host.list_active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].state.target_time, companion_sentinel());
        assert!(["A", "B"].contains(&active[0].state.message.as_str()));
        assert!(companion.is_active().await);
        assert!(companion.is_refresh_armed().await);
        assert_eq!(
            companion.current_activity().await.map(|h| h.id().clone()),
            Some(ActivityId::new("h1"))
        );
    }

    #[tokio::test]
    async fn restart_keeps_single_handle() {
        let host = Arc::new(RecordingHost::new());
        let companion = coordinator(host.clone());

        companion.start().await;
        companion.start().await;

        assert_eq!(host.active_count(), 1);
        assert_eq!(host.ends(), vec![(ActivityId::new("h1"), Dismissal::Immediate)]);
        assert_eq!(
            companion.current_activity().await.map(|h| h.id().clone()),
            Some(ActivityId::new("h2"))
        );
    }

    #[tokio::test]
    async fn unauthorized_start_arms_nothing() {
        let host = Arc::new(RecordingHost::unauthorized());
        let companion = coordinator(host.clone());

        companion.start().await;

        assert_eq!(host.request_count(), 0);
        assert!(companion.current_activity().await.is_none());
        assert!(!companion.is_refresh_armed().await);
        assert!(!companion.is_active().await);
    }

    #[tokio::test]
    async fn rejected_start_arms_nothing() {
        let host = Arc::new(RecordingHost::rejecting());
        let bus = crate::events::ActivityEventBus::new(8);
        let mut rx = bus.subscribe();
        let companion = coordinator(host.clone()).with_event_tx(bus.sender());

        companion.start().await;

        assert_eq!(host.request_count(), 1);
        assert!(!companion.is_refresh_armed().await);
        assert!(matches!(
            rx.try_recv().unwrap(),
            ActivityEvent::StartSkipped {
                kind: ActivityKind::Companion,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn refresh_only_touches_sentinel_activities() {
        let host = Arc::new(RecordingHost::new());
        let soon = Utc::now() + ChronoDuration::hours(6);
        for _ in 0..3 {
            host.seed(ActivityState::reminder(soon, "리마인더"));
        }
        for _ in 0..2 {
            host.seed(ActivityState::companion("이전 문구"));
        }
        let companion = coordinator(host.clone());

        companion.refresh_signature().await;

        let updates = host.updates();
        assert_eq!(updates.len(), 2);
        for (id, state) in updates {
            assert!(["h4", "h5"].contains(&id.as_str()));
            assert_eq!(state.target_time, companion_sentinel());
            assert!(["A", "B"].contains(&state.message.as_str()));
        }
    }

    #[tokio::test]
    async fn update_now_without_companion_is_noop() {
        let host = Arc::new(RecordingHost::new());
        host.seed(ActivityState::reminder(
            Utc::now() + ChronoDuration::hours(1),
            "리마인더",
        ));
        let companion = coordinator(host.clone());

        companion.update_now().await;

        assert!(host.updates().is_empty());
        assert!(!companion.is_active().await);
    }

    #[tokio::test]
    async fn stop_leaves_reminders_alone() {
        let host = Arc::new(RecordingHost::new());
        host.seed(ActivityState::reminder(
            Utc::now() + ChronoDuration::hours(1),
            "리마인더",
        ));
        let companion = coordinator(host.clone());

        companion.start().await;
        companion.stop().await;
        companion.stop().await;

        assert_eq!(host.ends(), vec![(ActivityId::new("h2"), Dismissal::Immediate)]);
        assert_eq!(host.active_count(), 1);
        assert!(!companion.is_active().await);
        assert!(!companion.is_refresh_armed().await);
        assert!(companion.current_activity().await.is_none());
    }

    #[tokio::test]
    async fn refresh_continues_past_failing_handle() {
        let host = Arc::new(RecordingHost::new());
        let broken = host.seed(ActivityState::companion("이전 문구"));
        host.seed(ActivityState::companion("이전 문구"));
        host.fail_for(&broken);
        let bus = crate::events::ActivityEventBus::new(8);
        let mut rx = bus.subscribe();
        let companion = coordinator(host.clone()).with_event_tx(bus.sender());

        companion.refresh_signature().await;

        assert_eq!(host.updates().len(), 2);
        assert!(matches!(
            rx.try_recv().unwrap(),
            ActivityEvent::UpdateFailed { kind: ActivityKind::Companion, id, .. }
                if id == ActivityId::new("h1")
        ));
        assert_eq!(
            rx.try_recv().unwrap(),
            ActivityEvent::Updated {
                kind: ActivityKind::Companion,
                id: ActivityId::new("h2")
            }
        );
        assert!(["A", "B"].contains(&host.list_active().await[1].state.message.as_str()));
    }

    #[tokio::test]
    async fn stop_reports_failed_end_and_disarms() {
        let host = Arc::new(RecordingHost::new());
        let bus = crate::events::ActivityEventBus::new(8);
        let mut rx = bus.subscribe();
        let companion = coordinator(host.clone()).with_event_tx(bus.sender());
        companion.start().await;
        assert!(matches!(rx.try_recv().unwrap(), ActivityEvent::Started { .. }));

        let owned = companion.current_activity().await.unwrap();
        host.fail_for(&owned);
        host.seed(ActivityState::companion("이전 문구"));

        companion.stop().await;

        assert!(matches!(
            rx.try_recv().unwrap(),
            ActivityEvent::EndFailed { kind: ActivityKind::Companion, id, .. }
                if id == ActivityId::new("h1")
        ));
        assert_eq!(
            rx.try_recv().unwrap(),
            ActivityEvent::Ended {
                kind: ActivityKind::Companion,
                id: ActivityId::new("h2")
            }
        );
        assert!(companion.current_activity().await.is_none());
        assert!(!companion.is_refresh_armed().await);
        // 종료에 실패한 액티비티는 호스트 목록에 남는다
        assert!(companion.is_active().await);
    }

    #[tokio::test]
    async fn random_signature_from_corpus() {
        let host = Arc::new(RecordingHost::new());
        let companion = CompanionCoordinator::new(
            host,
            Arc::new(SystemClock),
            LiveActivityConfig::default(),
        );
        for _ in 0..50 {
            let signature = companion.get_random_signature();
            assert!(crate::signature::SIGNATURES.contains(&signature.as_str()));
        }
    }

    #[tokio::test]
    async fn empty_corpus_uses_configured_fallback() {
        let host = Arc::new(RecordingHost::new());
        let config = LiveActivityConfig {
            fallback_signature: "좋은 꿈".to_string(),
            ..Default::default()
        };
        let companion = CompanionCoordinator::new(host, Arc::new(SystemClock), config)
            .with_signatures(SignatureSource::new(Vec::<String>::new()));
        assert_eq!(companion.get_random_signature(), "좋은 꿈");
    }

    #[tokio::test(start_paused = true)]
    async fn timer_refreshes_then_stops() {
        let host = Arc::new(RecordingHost::new());
        let companion = coordinator(host.clone());

        companion.start().await;
        settle().await;
        assert!(host.updates().is_empty());

        tokio::time::advance(HALF_HOUR).await;
        settle().await;

        let updates = host.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, ActivityId::new("h1"));
        assert!(["A", "B"].contains(&updates[0].1.message.as_str()));
        assert_eq!(updates[0].1.target_time, companion_sentinel());

        companion.stop().await;
        assert_eq!(host.ends(), vec![(ActivityId::new("h1"), Dismissal::Immediate)]);

        tokio::time::advance(HALF_HOUR).await;
        settle().await;
        assert_eq!(host.updates().len(), 1);
        assert_eq!(host.ends().len(), 1);
    }
}
