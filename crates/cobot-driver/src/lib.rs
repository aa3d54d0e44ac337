//! # Cobot Driver
//!
//! 机械臂设备抽象层。上层（运动控制）通过 [`ArmDevice`] trait
//! 下发命令，本层负责串口收发、到位等待和超时。
//!
//! ## 阻塞模型
//!
//! 所有设备调用都是阻塞的，系统全局同一时刻至多一个未完成的
//! 运动命令（关节状态是无锁的共享可变量，调用方不可重入）。
//! 唯一的时间边界是 [`ArmDevice::sync_write_angles`] 的逐命令超时。
//!
//! ## Feature Flags
//!
//! - `mock` - Mock 设备与虚拟时钟（无硬件测试、CLI `--mock` 模式）

pub mod clock;
pub mod serial;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use clock::{Clock, SpinClock};
pub use serial::SerialArmDevice;

#[cfg(any(test, feature = "mock"))]
pub use clock::MockClock;
#[cfg(any(test, feature = "mock"))]
pub use mock::{DeviceEvent, EventLog, MockArmDevice};

use cobot_protocol::ProtocolError;
use std::time::Duration;
use thiserror::Error;

/// 设备层错误类型
#[derive(Error, Debug)]
pub enum DeviceError {
    /// 串口 IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 协议编解码错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 命令超时（运动未在限时内到位，或设备无应答）
    #[error("Command timeout")]
    Timeout,

    /// 串口打开/配置失败
    #[error("Serial port error: {0}")]
    Port(String),
}

/// 吸盘状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuctionState {
    On,
    Off,
}

impl SuctionState {
    /// 基础输出电平映射
    ///
    /// 吸盘通道低电平有效：On ⇒ 0，Off ⇒ 1。
    pub fn level(self) -> u8 {
        match self {
            SuctionState::On => 0,
            SuctionState::Off => 1,
        }
    }
}

/// 机械臂设备接口（阻塞）
///
/// 角度以度为单位的裸数组传递，单位语义由上层的强类型负责。
pub trait ArmDevice {
    /// 下发目标关节角并阻塞等待到位或超时
    fn sync_write_angles(
        &mut self,
        angles_deg: &[f64; 6],
        speed: u8,
        timeout: Duration,
    ) -> Result<(), DeviceError>;

    /// 读取当前关节角
    fn read_angles(&mut self) -> Result<[f64; 6], DeviceError>;

    /// 切换吸盘
    fn set_suction(&mut self, state: SuctionState) -> Result<(), DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suction_level_is_active_low() {
        assert_eq!(SuctionState::On.level(), 0);
        assert_eq!(SuctionState::Off.level(), 1);
    }

    #[test]
    fn test_device_error_display() {
        let err = DeviceError::Timeout;
        assert_eq!(format!("{}", err), "Command timeout");

        let err = DeviceError::Port("no such device".to_string());
        assert!(format!("{}", err).contains("no such device"));
    }

    #[test]
    fn test_device_error_from_protocol() {
        let err: DeviceError = ProtocolError::InvalidHeader.into();
        assert!(matches!(err, DeviceError::Protocol(_)));
    }
}
