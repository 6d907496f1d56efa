//! 라이프사이클 관리.
//!
//! 종료 신호 전파, 시그널 핸들링, 종료 시 액티비티 정리.
//! 액티비티는 기본적으로 프로세스 종료 후에도 화면에 남는다.

use dreamlog_activity::{CompanionCoordinator, ReminderCoordinator};
use dreamlog_core::config::LiveActivityConfig;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// 라이프사이클 관리자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
    reminders: Arc<ReminderCoordinator>,
    companion: Arc<CompanionCoordinator>,
    end_activities_on_exit: bool,
}

impl LifecycleManager {
    /// 새 라이프사이클 관리자 생성
    pub fn new(
        reminders: Arc<ReminderCoordinator>,
        companion: Arc<CompanionCoordinator>,
        config: &LiveActivityConfig,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            reminders,
            companion,
            end_activities_on_exit: config.end_activities_on_exit,
        }
    }

    /// 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// 종료 신호 발송 (여러 번 호출해도 한 번만 기록)
    pub fn shutdown(&self) {
        if !self.shutdown_tx.send_replace(true) {
            info!("종료 신호 발송");
        }
    }

    /// OS 시그널 대기 (SIGINT, SIGTERM)
    pub async fn wait_for_signal(&self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match (
                signal(SignalKind::interrupt()),
                signal(SignalKind::terminate()),
            ) {
                (Ok(mut sigint), Ok(mut sigterm)) => {
                    tokio::select! {
                        _ = sigint.recv() => info!("SIGINT 수신"),
                        _ = sigterm.recv() => info!("SIGTERM 수신"),
                    }
                }
                _ => {
                    warn!("시그널 핸들러 등록 실패, Ctrl+C만 대기");
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl+C 핸들러 등록 실패: {e}");
                return;
            }
            info!("Ctrl+C 수신");
        }

        self.shutdown();
    }

    /// 종료 마무리
    ///
    /// `end_activities_on_exit`이 켜져 있을 때만 액티비티를 정리한다.
    /// 정리했으면 `true`.
    pub async fn finish(&self) -> bool {
        self.shutdown();
        if !self.end_activities_on_exit {
            info!("액티비티 유지한 채 종료");
            return false;
        }

        info!("종료 시 액티비티 정리");
        // 갱신 타이머를 먼저 끊고, 리마인더 종료가 남은 액티비티를 모두 내린다
        self.companion.stop().await;
        self.reminders.stop().await;
        true
    }
}
