//! # Cobot Client
//!
//! 机械臂高层运动 API。[`MotionController`] 持有关节状态、
//! 命名位姿表和末端几何常量，把"移动到某处/抓取/释放"翻译成
//! 逆解 + 重力补偿 + 设备下发。
//!
//! ## 状态约定
//!
//! - 关节角度字段反映**最后一次下发成功**的目标位姿，不是物理
//!   沉降后的位姿（没有反馈回路）。所有运算（正解、重力补偿）
//!   以该命令值为准。
//! - 失败的移动不修改关节状态（先下发、成功后提交）。
//! - 检测集是单槽位的：一次指令派发周期前置入，周期结束后
//!   无条件清空，旧索引不会泄漏到下一个周期。

pub mod config;
pub mod controller;
pub mod corrector;

pub use config::ControllerConfig;
pub use controller::{Detection, MotionController};
pub use corrector::correct_object_index;

use cobot_driver::DeviceError;
use cobot_kinematics::KinematicsError;
use thiserror::Error;

/// 运动控制错误类型
#[derive(Error, Debug)]
pub enum MotionError {
    /// 运动学错误（含不可达位姿）
    #[error("Kinematics error: {0}")]
    Kinematics(#[from] KinematicsError),

    /// 设备错误（含命令超时）
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// 位姿表中没有这个名字
    #[error("Unknown place: {0:?}")]
    UnknownPlace(String),

    /// 物体索引越界（索引修复后仍不在检测集内）
    #[error("Invalid object index {index} (only {count} detections staged)")]
    InvalidObjectIndex { index: usize, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_error_display() {
        let err = MotionError::UnknownPlace("attic".to_string());
        assert!(format!("{}", err).contains("attic"));

        let err = MotionError::InvalidObjectIndex { index: 120, count: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("120") && msg.contains("3"));
    }

    #[test]
    fn test_motion_error_from_kinematics() {
        let err: MotionError = KinematicsError::Unreachable { iterations: 200 }.into();
        assert!(matches!(err, MotionError::Kinematics(_)));
    }

    #[test]
    fn test_motion_error_from_device() {
        let err: MotionError = DeviceError::Timeout.into();
        assert!(matches!(err, MotionError::Device(_)));
    }
}
