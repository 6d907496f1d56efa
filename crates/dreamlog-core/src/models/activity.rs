//! 라이브 액티비티 모델.
//!
//! 잠금 화면/다이나믹 아일랜드에 표시되는 콘텐츠 상태와
//! 호스트가 발급하는 액티비티 핸들을 정의한다.
//!
//! 리마인더와 컴패니언은 같은 액티비티 타입(같은 호스트 목록)을 공유하므로
//! 종류는 `target_time`으로 구분한다. 컴패니언 상태는 항상 먼 미래의 센티널
//! 시각을 가지며, 실제 리마인더 시각은 [`SENTINEL_HORIZON_DAYS`]를 넘을 수 없다.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 센티널 판별 기준 (현재 시각 기준 일 수)
pub const SENTINEL_HORIZON_DAYS: i64 = 365;

/// 컴패니언 상태에 사용하는 먼 미래 시각 (4001-01-01T00:00:00Z)
pub fn companion_sentinel() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(4001, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// `now` 기준 센티널 경계 시각
pub fn sentinel_horizon(now: DateTime<Utc>) -> DateTime<Utc> {
    now + ChronoDuration::days(SENTINEL_HORIZON_DAYS)
}

/// 액티비티 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    /// 꿈 기록 예약 리마인더
    Reminder,
    /// 회전 문구를 표시하는 컴패니언
    Companion,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Reminder => write!(f, "reminder"),
            ActivityKind::Companion => write!(f, "companion"),
        }
    }
}

/// 액티비티 콘텐츠 상태 (불변 값 타입)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityState {
    /// 리마인더 시각, 또는 컴패니언 센티널 시각
    pub target_time: DateTime<Utc>,
    /// 사용자에게 표시할 문구
    pub message: String,
}

impl ActivityState {
    /// 리마인더 상태 생성
    pub fn reminder(target_time: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            target_time,
            message: message.into(),
        }
    }

    /// 센티널 시각을 가진 컴패니언 상태 생성
    pub fn companion(message: impl Into<String>) -> Self {
        Self {
            target_time: companion_sentinel(),
            message: message.into(),
        }
    }

    /// `now` 기준으로 상태 종류 판별
    ///
    /// `target_time`이 `now + 365일`을 초과하면 컴패니언으로 본다.
    pub fn kind(&self, now: DateTime<Utc>) -> ActivityKind {
        if self.target_time > sentinel_horizon(now) {
            ActivityKind::Companion
        } else {
            ActivityKind::Reminder
        }
    }

    /// 컴패니언 상태 여부
    pub fn is_companion(&self, now: DateTime<Utc>) -> bool {
        self.kind(now) == ActivityKind::Companion
    }
}

/// 호스트가 발급한 액티비티 식별자
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 호스트 액티비티 인스턴스에 대한 불투명 참조
///
/// 액티비티가 종료될 때까지 식별자가 유지된다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityHandle {
    id: ActivityId,
}

impl ActivityHandle {
    pub fn new(id: ActivityId) -> Self {
        Self { id }
    }

    /// 액티비티 식별자
    pub fn id(&self) -> &ActivityId {
        &self.id
    }
}

/// 호스트 목록에 보이는 활성 액티비티 (핸들 + 현재 상태)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveActivity {
    pub handle: ActivityHandle,
    pub state: ActivityState,
}

/// 액티비티 종료 시 화면에서 내리는 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dismissal {
    /// 즉시 제거
    Immediate,
    /// 지정 시간 후 제거
    After(Duration),
}
