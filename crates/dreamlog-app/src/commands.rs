//! 표준 입력 명령 파싱.
//!
//! UI 레이어 대신 한 줄 단위 명령으로 코디네이터를 조작한다.

use thiserror::Error;

/// 사용법 안내
pub const HELP: &str = "\
명령:
  reminder <분> <문구>     N분 뒤 리마인더 시작
  update <문구>            리마인더 문구 교체
  stop                     리마인더 종료
  companion start|stop|refresh|status
  signature                무작위 컴패니언 문구 출력
  open <url>               딥링크 처리 (예: dreamlog://record)
  help                     도움말
  quit                     종료";

/// 컴패니언 하위 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanionAction {
    Start,
    Stop,
    Refresh,
    Status,
}

/// 사용자 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartReminder { in_minutes: i64, message: String },
    UpdateReminder { message: String },
    StopReminder,
    Companion(CompanionAction),
    Signature,
    OpenLink(String),
    Help,
    Quit,
}

/// 명령 파싱 에러
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("빈 명령")]
    Empty,

    #[error("알 수 없는 명령: {0}")]
    Unknown(String),

    #[error("인자 누락: {0}")]
    MissingArgument(&'static str),

    #[error("잘못된 인자: {0}")]
    InvalidArgument(String),
}

impl Command {
    /// 한 줄 파싱
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "" => Err(CommandError::Empty),
            "reminder" => {
                let (minutes, message) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("문구"))?;
                let in_minutes = minutes
                    .parse::<i64>()
                    .map_err(|_| CommandError::InvalidArgument(minutes.to_string()))?;
                if in_minutes < 0 {
                    return Err(CommandError::InvalidArgument(minutes.to_string()));
                }
                Ok(Command::StartReminder {
                    in_minutes,
                    message: message.trim().to_string(),
                })
            }
            "update" => non_empty(rest, "문구").map(|message| Command::UpdateReminder { message }),
            "stop" => Ok(Command::StopReminder),
            "companion" => match rest {
                "start" => Ok(Command::Companion(CompanionAction::Start)),
                "stop" => Ok(Command::Companion(CompanionAction::Stop)),
                "refresh" => Ok(Command::Companion(CompanionAction::Refresh)),
                "status" => Ok(Command::Companion(CompanionAction::Status)),
                "" => Err(CommandError::MissingArgument("start|stop|refresh|status")),
                other => Err(CommandError::InvalidArgument(other.to_string())),
            },
            "signature" => Ok(Command::Signature),
            "open" => non_empty(rest, "url").map(Command::OpenLink),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn non_empty(rest: &str, what: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(what))
    } else {
        Ok(rest.to_string())
    }
}
