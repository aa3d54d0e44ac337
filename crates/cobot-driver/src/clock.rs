//! 可注入时钟
//!
//! 抓取/释放的泵气压稳定等待是固定时长的（没有压力反馈），
//! 这类等待通过 [`Clock`] trait 注入，测试里用虚拟时钟验证
//! 停留时长和事件顺序，而不用真的睡两秒。

use std::time::{Duration, Instant};

/// 单调时钟接口
pub trait Clock {
    /// 自时钟创建起的单调时间
    fn now(&self) -> Duration;

    /// 阻塞等待
    fn sleep(&self, duration: Duration);
}

/// 真实时钟（spin_sleep 后端）
///
/// `spin_sleep` 在毫秒级睡眠上比 `std::thread::sleep` 精确，
/// 到位轮询和泵停留共用它。
pub struct SpinClock {
    start: Instant,
    sleeper: spin_sleep::SpinSleeper,
}

impl SpinClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            sleeper: spin_sleep::SpinSleeper::default(),
        }
    }
}

impl Default for SpinClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SpinClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeper.sleep(duration);
    }
}

/// 虚拟时钟（测试用）
///
/// `sleep` 不阻塞，只推进虚拟时间。克隆共享同一时间轴，
/// 设备 Mock 持有克隆为事件打时间戳。
#[cfg(any(test, feature = "mock"))]
#[derive(Clone)]
pub struct MockClock {
    now: std::sync::Arc<std::sync::Mutex<Duration>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockClock {
    pub fn new() -> Self {
        Self {
            now: std::sync::Arc::new(std::sync::Mutex::new(Duration::ZERO)),
        }
    }

    /// 手动推进虚拟时间
    pub fn advance(&self, duration: Duration) {
        *self.now.lock().unwrap() += duration;
    }
}

#[cfg(any(test, feature = "mock"))]
impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "mock"))]
impl Clock for MockClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        *self.now.lock().unwrap() += duration;
    }
}
