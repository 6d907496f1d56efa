//! # dreamlog-activity
//!
//! 라이브 액티비티 라이프사이클 코디네이터.
//! 꿈 기록 리마인더와 컴패니언 액티비티를 생성/갱신/종료하고,
//! 컴패니언 문구를 주기적으로 교체한다.
//!
//! 모든 공개 연산은 실패를 호출자에게 전파하지 않는다. 호스트 에러는
//! `tracing` 로그와 [`events::ActivityEvent`] 채널로만 보고된다.

pub mod clock;
pub mod companion;
pub mod events;
pub mod host;
pub mod reminder;
pub mod signature;

mod timer;

#[cfg(test)]
mod test_support;

pub use clock::SystemClock;
pub use companion::CompanionCoordinator;
pub use events::{ActivityEvent, ActivityEventBus};
pub use host::InMemoryActivityHost;
pub use reminder::ReminderCoordinator;
pub use signature::SignatureSource;
