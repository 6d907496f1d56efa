//! 취소 가능한 one-shot/주기 타이머.
//!
//! `Clock::sleep` 위에서 동작하는 tokio 태스크. 취소는 `watch` 채널로 전달하며,
//! 이미 실행 중인 콜백은 끝까지 진행되고 이후 콜백만 막는다.

use dreamlog_core::ports::clock::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 타이머 핸들. 드롭 시 타이머도 취소된다.
pub(crate) struct TimerHandle {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// `delay` 후 한 번 실행
    pub(crate) fn once<F, Fut>(clock: Arc<dyn Clock>, delay: Duration, callback: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_rx.changed() => {}
                _ = clock.sleep(delay) => callback().await,
            }
        });
        Self { cancel_tx, task }
    }

    /// `period`마다 반복 실행 (첫 실행은 `period` 후)
    pub(crate) fn every<F, Fut>(clock: Arc<dyn Clock>, period: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancel_rx.changed() => break,
                    _ = clock.sleep(period) => {}
                }
                if *cancel_rx.borrow() {
                    break;
                }
                callback().await;
            }
        });
        Self { cancel_tx, task }
    }

    /// 이후 콜백 실행 중단
    pub(crate) fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// 취소되지 않았고 태스크가 살아 있는지
    pub(crate) fn is_armed(&self) -> bool {
        !*self.cancel_tx.borrow() && !self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
