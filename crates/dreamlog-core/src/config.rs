//! 애플리케이션 설정 구조체.
//!
//! 라이브 액티비티 갱신 주기, 기본 문구, 인메모리 호스트 한도 등
//! 런타임 설정을 정의한다. JSON 파일에서 읽기만 하며 다시 저장하지 않는다.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 라이브 액티비티 설정
    #[serde(default)]
    pub live_activity: LiveActivityConfig,
    /// 액티비티 호스트 설정
    #[serde(default)]
    pub host: HostConfig,
}

// ============================================================
// 라이브 액티비티 설정
// ============================================================

/// 라이브 액티비티 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveActivityConfig {
    /// 라이브 액티비티 전체 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 컴패니언 문구 갱신 주기 (초)
    #[serde(default = "default_companion_refresh_interval_secs")]
    pub companion_refresh_interval_secs: u64,
    /// 리마인더 시작 직후 재전송 지연 (밀리초, None이면 비활성)
    #[serde(default = "default_reminder_initial_refresh_ms")]
    pub reminder_initial_refresh_ms: Option<u64>,
    /// 딥링크로 리마인더를 열었을 때 표시할 문구
    #[serde(default = "default_recording_message")]
    pub recording_message: String,
    /// 문구 목록이 비었을 때 사용할 문구
    #[serde(default = "default_fallback_signature")]
    pub fallback_signature: String,
    /// 앱 종료 시 액티비티도 함께 종료
    #[serde(default)]
    pub end_activities_on_exit: bool,
}

impl Default for LiveActivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            companion_refresh_interval_secs: default_companion_refresh_interval_secs(),
            reminder_initial_refresh_ms: default_reminder_initial_refresh_ms(),
            recording_message: default_recording_message(),
            fallback_signature: default_fallback_signature(),
            end_activities_on_exit: false,
        }
    }
}

impl LiveActivityConfig {
    /// 컴패니언 갱신 주기를 Duration으로 반환
    pub fn companion_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.companion_refresh_interval_secs)
    }

    /// 리마인더 재전송 지연을 Duration으로 반환
    pub fn reminder_initial_refresh(&self) -> Option<Duration> {
        self.reminder_initial_refresh_ms.map(Duration::from_millis)
    }
}

// ============================================================
// 호스트 설정
// ============================================================

/// 인메모리 액티비티 호스트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// 동시에 표시 가능한 액티비티 수
    #[serde(default = "default_max_concurrent_activities")]
    pub max_concurrent_activities: usize,
    /// 액티비티 표시 권한
    #[serde(default = "default_true")]
    pub authorized: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_concurrent_activities: default_max_concurrent_activities(),
            authorized: true,
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            live_activity: LiveActivityConfig::default(),
            host: HostConfig::default(),
        }
    }

    /// JSON 설정 파일 로드 및 검증
    pub fn load_from_file(path: &Path) -> Result<Self, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("설정 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.live_activity.companion_refresh_interval_secs == 0 {
            return Err(CoreError::Validation {
                field: "live_activity.companion_refresh_interval_secs".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        if self.host.max_concurrent_activities == 0 {
            return Err(CoreError::Validation {
                field: "host.max_concurrent_activities".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}
fn default_companion_refresh_interval_secs() -> u64 {
    30 * 60
}
fn default_reminder_initial_refresh_ms() -> Option<u64> {
    Some(1_000)
}
fn default_recording_message() -> String {
    "꿈을 기록하는 중...".to_string()
}
fn default_fallback_signature() -> String {
    "오늘 밤도 좋은 꿈 꾸세요".to_string()
}
fn default_max_concurrent_activities() -> usize {
    2
}
