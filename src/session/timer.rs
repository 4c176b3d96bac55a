//! 倒计时
//!
//! `tick` 是纯函数，只负责"剩余秒数 -> 下一状态"；
//! `CountdownTimer` 负责按固定间隔驱动它，并在句柄释放时停止。

use std::fmt;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::session::SessionStore;

/// 剩余时间低于此值（秒）视为时间紧张
pub const LOW_TIME_THRESHOLD_SECS: u32 = 300;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// 一次倒计时的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 走完这一格后的剩余秒数
    pub remaining: u32,
    /// 这一格是否刚好走到 0
    pub expired: bool,
}

/// 倒计时走一格
///
/// 已经为 0 时不再变化，也不会再次报告到期。
pub fn tick(remaining: u32) -> Tick {
    match remaining {
        0 => Tick {
            remaining: 0,
            expired: false,
        },
        1 => Tick {
            remaining: 0,
            expired: true,
        },
        n => Tick {
            remaining: n - 1,
            expired: false,
        },
    }
}

/// 倒计时显示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDisplay {
    pub minutes: u32,
    pub seconds: u32,
    pub low_time: bool,
}

impl ClockDisplay {
    pub fn new(time_left: u32, low_time_threshold: u32) -> Self {
        Self {
            minutes: time_left / 60,
            seconds: time_left % 60,
            low_time: time_left < low_time_threshold,
        }
    }
}

impl fmt::Display for ClockDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// 倒计时任务句柄
///
/// 句柄被释放（或调用 [`stop`](Self::stop)）时后台任务随之取消。
/// 计时开关或到期回调变化时，丢弃旧句柄再重新 `start` 即可。
pub struct CountdownTimer {
    handle: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// 为当前会话启动倒计时
    ///
    /// 会话未开启计时时不启动任何任务；剩余时间已为 0 时立即调用 `on_expire`。
    /// `on_expire` 最多调用一次；会话被重置或替换后任务自行结束。
    pub fn start<F>(store: SessionStore, period: Duration, on_expire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (timer_enabled, time_left) =
            store.read(|state| (state.timer_enabled(), state.time_left()));
        if !timer_enabled {
            debug!("未开启计时，倒计时不启动");
            return Self { handle: None };
        }
        if time_left == 0 {
            info!("⏰ 开始时已无剩余时间");
            on_expire();
            return Self { handle: None };
        }
        // interval 不接受 0 间隔
        let period = period.max(MIN_PERIOD);

        let generation = store.generation();
        info!("⏱️ 倒计时开始: {} 秒", time_left);

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            let mut on_expire = Some(on_expire);

            loop {
                interval.tick().await;

                match store.tick(generation) {
                    Some(t) if t.expired => {
                        info!("⏰ 时间到");
                        if let Some(callback) = on_expire.take() {
                            callback();
                        }
                        break;
                    }
                    Some(t) if t.remaining == 0 => break,
                    Some(_) => {}
                    None => {
                        debug!("会话已变更，倒计时结束");
                        break;
                    }
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// 是否还在计时
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 停止倒计时
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::models::question::fixtures::question;
    use crate::models::TestType;

    const SECOND: Duration = Duration::from_secs(1);

    fn timed_store(duration: u32, timer_enabled: bool) -> SessionStore {
        let store = SessionStore::new(duration);
        store.start_session(
            TestType::Full,
            None,
            timer_enabled,
            vec![question(1, Some(0))],
        );
        store
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        (calls, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_pure_tick_expires_exactly_once() {
        let mut remaining = 5;
        let mut expirations = 0;
        for _ in 0..5 {
            let t = tick(remaining);
            remaining = t.remaining;
            expirations += t.expired as usize;
        }
        assert_eq!(remaining, 0);
        assert_eq!(expirations, 1);

        // 到 0 之后再走也不会重复报告
        for _ in 0..10 {
            assert_eq!(tick(remaining), Tick { remaining: 0, expired: false });
        }
    }

    #[test]
    fn test_clock_display() {
        assert_eq!(ClockDisplay::new(3000, 300).to_string(), "50:00");
        assert_eq!(ClockDisplay::new(305, 300).to_string(), "5:05");
        assert!(!ClockDisplay::new(300, 300).low_time);
        assert!(ClockDisplay::new(299, 300).low_time);
        assert_eq!(ClockDisplay::new(9, 300).to_string(), "0:09");
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_fires_once() {
        let store = timed_store(3, true);
        let (calls, on_expire) = counter();

        let timer = CountdownTimer::start(store.clone(), SECOND, on_expire);
        assert!(timer.is_running());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(store.read(|s| s.time_left()), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_timer_never_runs() {
        let store = timed_store(3000, false);
        let (calls, on_expire) = counter();

        let timer = CountdownTimer::start(store.clone(), SECOND, on_expire);
        assert!(!timer.is_running());

        tokio::time::sleep(Duration::from_secs(4000)).await;
        assert_eq!(store.read(|s| s.time_left()), 3000);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_countdown() {
        let store = timed_store(10, true);
        let (calls, on_expire) = counter();

        let timer = CountdownTimer::start(store.clone(), SECOND, on_expire);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        drop(timer);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.read(|s| s.time_left()), 8);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_still_counts_down() {
        let store = timed_store(3, true);
        let (calls, on_expire) = counter();

        let timer = CountdownTimer::start(store.clone(), Duration::ZERO, on_expire);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.read(|s| s.time_left()), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_time_left_expires_immediately() {
        let store = timed_store(0, true);
        let (calls, on_expire) = counter();

        let timer = CountdownTimer::start(store.clone(), SECOND, on_expire);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!timer.is_running());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_ends_countdown() {
        let store = timed_store(10, true);
        let (calls, on_expire) = counter();

        let timer = CountdownTimer::start(store.clone(), SECOND, on_expire);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        store.reset_session();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(!timer.is_running());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.read(|s| s.time_left()), 10);
    }
}
