//! 액티비티 이벤트 버스.
//!
//! `tokio::broadcast` 기반. 코디네이터 연산의 결과(성공/실패/무시)를 발행하며,
//! 공개 연산이 에러를 반환하지 않는 대신 관측/테스트 채널 역할을 한다.

use dreamlog_core::models::activity::{ActivityId, ActivityKind};
use tokio::sync::broadcast;
use tracing::debug;

/// 코디네이터가 발행하는 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    /// 액티비티 생성됨
    Started { kind: ActivityKind, id: ActivityId },
    /// 시작 요청이 조용히 무시됨 (권한 없음, 호스트 거부 등)
    StartSkipped { kind: ActivityKind, reason: String },
    /// 콘텐츠 갱신됨
    Updated { kind: ActivityKind, id: ActivityId },
    /// 콘텐츠 갱신 실패
    UpdateFailed {
        kind: ActivityKind,
        id: ActivityId,
        reason: String,
    },
    /// 액티비티 종료됨
    Ended { kind: ActivityKind, id: ActivityId },
    /// 액티비티 종료 실패
    EndFailed {
        kind: ActivityKind,
        id: ActivityId,
        reason: String,
    },
    /// 갱신할 액티비티 없음
    NothingToUpdate { kind: ActivityKind },
}

/// 액티비티 이벤트 버스
pub struct ActivityEventBus {
    tx: broadcast::Sender<ActivityEvent>,
}

impl ActivityEventBus {
    /// 새 이벤트 버스 생성
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.tx.subscribe()
    }

    /// 코디네이터 주입용 송신자
    pub fn sender(&self) -> broadcast::Sender<ActivityEvent> {
        self.tx.clone()
    }
}

impl Default for ActivityEventBus {
    fn default() -> Self {
        Self::new(128)
    }
}

/// 송신자가 있으면 이벤트 발행 (구독자 없음은 무시)
pub(crate) fn emit(tx: &Option<broadcast::Sender<ActivityEvent>>, event: ActivityEvent) {
    if let Some(tx) = tx {
        debug!("액티비티 이벤트 발행: {:?}", event);
        let _ = tx.send(event);
    }
}
