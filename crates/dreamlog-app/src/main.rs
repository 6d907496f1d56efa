//! # dreamlog-app
//!
//! DreamLog 라이브 액티비티 데몬 진입점.
//! DI 컨테이너 역할, 라이프사이클 관리, 명령/딥링크 라우팅.

mod commands;
mod controller;
mod deep_link;
mod lifecycle;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::ProjectDirs;
use dreamlog_activity::{
    ActivityEventBus, CompanionCoordinator, InMemoryActivityHost, ReminderCoordinator,
    SystemClock,
};
use dreamlog_core::config::AppConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, HELP};
use crate::controller::{ActivityController, Flow};
use crate::lifecycle::LifecycleManager;

/// DreamLog 라이브 액티비티 데몬
///
/// 꿈 기록 리마인더와 컴패니언 액티비티를 관리한다.
#[derive(Parser, Debug)]
#[command(name = "dreamlog")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (JSON, 기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 시작 시 컴패니언 액티비티 표시
    #[arg(long)]
    companion: bool,

    /// 시작 시 N분 뒤 리마인더 예약
    #[arg(long, requires = "message")]
    reminder_in_mins: Option<i64>,

    /// 리마인더 문구
    #[arg(long, short = 'm')]
    message: Option<String>,

    /// 시작 직후 처리할 딥링크 (예: dreamlog://record)
    #[arg(long)]
    open: Option<String>,

    /// 컴패니언 문구 갱신 주기 (초)
    #[arg(long)]
    refresh_interval_secs: Option<u64>,
}

/// 설정 파일 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.dreamlog.client/config.json`
/// - Windows: `%APPDATA%\dreamlog\client\config\config.json`
/// - Linux: `~/.config/client/config.json`
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        ProjectDirs::from("com", "dreamlog", "client").map(|p| p.config_dir().join("config.json"))
    })
}

/// 설정 로드 (파일이 없으면 기본값)
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match resolve_config_path(args.config.as_deref()) {
        Some(path) if path.exists() => AppConfig::load_from_file(&path)
            .map_err(|e| anyhow!("설정 로드 실패: {}: {}", path.display(), e))?,
        Some(path) if args.config.is_some() => {
            return Err(anyhow!("설정 파일 없음: {}", path.display()));
        }
        _ => {
            debug!("설정 파일 없음, 기본 설정 사용");
            AppConfig::default_config()
        }
    };

    // CLI 인자로 설정 오버라이드
    if let Some(secs) = args.refresh_interval_secs {
        config.live_activity.companion_refresh_interval_secs = secs;
    }
    config
        .validate()
        .map_err(|e| anyhow!("설정 검증 실패: {}", e))?;
    Ok(config)
}

/// 표준 입력 명령 루프 (종료 신호 또는 quit까지)
async fn run_command_loop(
    controller: &ActivityController,
    lifecycle: &LifecycleManager,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Ok(command) => {
                            if controller.execute(command).await == Flow::Quit {
                                lifecycle.shutdown();
                                break;
                            }
                        }
                        Err(e) => println!("{e}\n{HELP}"),
                    }
                }
                Ok(None) => {
                    debug!("표준 입력 종료, 시그널 대기");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!("표준 입력 읽기 실패: {e}");
                    stdin_open = false;
                }
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "dreamlog={},dreamlog_app={},dreamlog_core={},dreamlog_activity={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("DreamLog 라이브 액티비티 데몬 시작");

    let config = load_config(&args)?;
    info!(
        "설정: 활성={}, 컴패니언 갱신={}초, 호스트 한도={}",
        config.live_activity.enabled,
        config.live_activity.companion_refresh_interval_secs,
        config.host.max_concurrent_activities
    );

    // ── 어댑터 생성 (DI 와이어링) ──
    let host = Arc::new(InMemoryActivityHost::new(config.host.clone()));
    let clock = Arc::new(SystemClock);
    let event_bus = ActivityEventBus::default();

    let reminders = Arc::new(
        ReminderCoordinator::new(host.clone(), clock.clone(), config.live_activity.clone())
            .with_event_tx(event_bus.sender()),
    );
    let companion = Arc::new(
        CompanionCoordinator::new(host.clone(), clock, config.live_activity.clone())
            .with_event_tx(event_bus.sender()),
    );
    let lifecycle = Arc::new(LifecycleManager::new(
        reminders.clone(),
        companion.clone(),
        &config.live_activity,
    ));
    let controller = ActivityController::new(reminders, companion, config.live_activity.clone());

    // 이벤트 로깅
    let mut event_rx = event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            debug!("액티비티 이벤트: {:?}", event);
        }
    });

    // 시작 동작
    if args.companion {
        controller.execute(Command::Companion(commands::CompanionAction::Start)).await;
    }
    if let (Some(mins), Some(message)) = (args.reminder_in_mins, args.message.clone()) {
        controller.start_reminder_in(mins, message).await;
    }
    if let Some(ref link) = args.open {
        controller.open_link(link).await;
    }

    // 시그널 대기
    let signal_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        signal_lifecycle.wait_for_signal().await;
    });

    println!("{HELP}");
    run_command_loop(&controller, &lifecycle, lifecycle.subscribe()).await;

    let cleaned = lifecycle.finish().await;
    info!(activities_ended = cleaned, "DreamLog 종료");
    Ok(())
}
