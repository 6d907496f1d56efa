//! 액티비티 컨트롤러.
//!
//! UI 레이어를 대신해 명령/딥링크를 두 코디네이터 호출로 연결한다.

use chrono::{Duration as ChronoDuration, Utc};
use dreamlog_activity::{CompanionCoordinator, ReminderCoordinator};
use dreamlog_core::config::LiveActivityConfig;
use std::sync::Arc;
use tracing::{info, warn};

use crate::commands::{Command, CompanionAction, HELP};
use crate::deep_link::DeepLink;

/// 명령 실행 후 루프 진행 여부
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 액티비티 컨트롤러
pub struct ActivityController {
    reminders: Arc<ReminderCoordinator>,
    companion: Arc<CompanionCoordinator>,
    config: LiveActivityConfig,
}

impl ActivityController {
    /// 새 컨트롤러 생성
    pub fn new(
        reminders: Arc<ReminderCoordinator>,
        companion: Arc<CompanionCoordinator>,
        config: LiveActivityConfig,
    ) -> Self {
        Self {
            reminders,
            companion,
            config,
        }
    }

    /// 지금부터 `in_minutes`분 뒤 리마인더 시작
    ///
    /// 표현할 수 없는 시각이면 로그만 남기고 무시한다.
    pub async fn start_reminder_in(&self, in_minutes: i64, message: String) {
        let Some(at) = ChronoDuration::try_minutes(in_minutes)
            .and_then(|offset| Utc::now().checked_add_signed(offset))
        else {
            warn!("리마인더 예약 무시: {}분 후는 표현할 수 없는 시각", in_minutes);
            return;
        };
        info!("리마인더 예약: {} ({}분 후)", at, in_minutes);
        self.reminders.start(at, message).await;
    }

    /// 딥링크 처리 (알 수 없는 링크는 무시)
    pub async fn open_link(&self, raw: &str) {
        match DeepLink::parse(raw) {
            Ok(DeepLink::OpenReminder) => {
                info!("딥링크: 리마인더 열림");
                self.reminders
                    .update(self.config.recording_message.clone())
                    .await;
            }
            Ok(DeepLink::RefreshCompanion) => {
                info!("딥링크: 컴패니언 갱신");
                self.companion.update_now().await;
            }
            Err(e) => warn!("딥링크 무시: {raw}: {e}"),
        }
    }

    /// 명령 실행
    pub async fn execute(&self, command: Command) -> Flow {
        match command {
            Command::StartReminder {
                in_minutes,
                message,
            } => self.start_reminder_in(in_minutes, message).await,
            Command::UpdateReminder { message } => self.reminders.update(message).await,
            Command::StopReminder => self.reminders.stop().await,
            Command::Companion(CompanionAction::Start) => self.companion.start().await,
            Command::Companion(CompanionAction::Stop) => self.companion.stop().await,
            Command::Companion(CompanionAction::Refresh) => self.companion.update_now().await,
            Command::Companion(CompanionAction::Status) => {
                let active = self.companion.is_active().await;
                println!("컴패니언: {}", if active { "활성" } else { "비활성" });
            }
            Command::Signature => println!("{}", self.companion.get_random_signature()),
            Command::OpenLink(url) => self.open_link(&url).await,
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }
}
