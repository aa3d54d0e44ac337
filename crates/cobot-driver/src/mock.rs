//! Mock 设备
//!
//! 无硬件测试用的模拟机械臂：记录全部设备调用到共享事件日志，
//! 事件时间戳来自虚拟时钟，可脚本化地注入失败。

use crate::clock::{Clock, MockClock};
use crate::{ArmDevice, DeviceError, SuctionState};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 设备事件（带虚拟时间戳）
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// 下发角度命令
    WriteAngles {
        angles_deg: [f64; 6],
        speed: u8,
        at: Duration,
    },

    /// 吸盘切换
    Suction { state: SuctionState, at: Duration },
}

/// 共享事件日志
pub type EventLog = Arc<Mutex<Vec<DeviceEvent>>>;

/// 模拟机械臂设备
pub struct MockArmDevice {
    log: EventLog,
    clock: MockClock,
    angles_deg: [f64; 6],
    /// 模拟运动耗时（虚拟时间），0 表示瞬时到位
    move_duration: Duration,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockArmDevice {
    /// 创建模拟设备，与给定虚拟时钟共享时间轴
    pub fn new(clock: MockClock) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            clock,
            angles_deg: [0.0; 6],
            move_duration: Duration::ZERO,
            fail_writes: Arc::new(Mutex::new(false)),
        }
    }

    /// 事件日志句柄（测试侧持有克隆做断言）
    pub fn event_log(&self) -> EventLog {
        Arc::clone(&self.log)
    }

    /// 设置模拟运动耗时
    pub fn with_move_duration(mut self, duration: Duration) -> Self {
        self.move_duration = duration;
        self
    }

    /// 失败开关句柄：置 true 后所有写命令返回 Timeout
    pub fn fail_switch(&self) -> Arc<Mutex<bool>> {
        Arc::clone(&self.fail_writes)
    }

    /// 当前模拟角度
    pub fn current_angles(&self) -> [f64; 6] {
        self.angles_deg
    }
}

impl ArmDevice for MockArmDevice {
    fn sync_write_angles(
        &mut self,
        angles_deg: &[f64; 6],
        speed: u8,
        _timeout: Duration,
    ) -> Result<(), DeviceError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(DeviceError::Timeout);
        }

        if !self.move_duration.is_zero() {
            self.clock.sleep(self.move_duration);
        }

        self.angles_deg = *angles_deg;
        self.log.lock().unwrap().push(DeviceEvent::WriteAngles {
            angles_deg: *angles_deg,
            speed,
            at: self.clock.now(),
        });
        Ok(())
    }

    fn read_angles(&mut self) -> Result<[f64; 6], DeviceError> {
        Ok(self.angles_deg)
    }

    fn set_suction(&mut self, state: SuctionState) -> Result<(), DeviceError> {
        self.log.lock().unwrap().push(DeviceEvent::Suction {
            state,
            at: self.clock.now(),
        });
        Ok(())
    }
}
