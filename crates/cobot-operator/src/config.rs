//! 操作层配置
//!
//! 启动时构造一次（文件或默认值），显式传入各组件构造函数。
//! 凭据、设备路径都在这里，没有隐式全局。

use crate::interface::InterfaceKind;
use cobot_client::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 操作层配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// 澄清问题的目标自然语言
    pub language: String,

    /// 操作员接口类型
    pub interface: InterfaceKind,

    /// 相机设备编号
    pub camera_id: u32,

    /// 拍摄位姿下的像素尺寸（米/像素），由两点标定得出
    pub pixel_size_m: f64,

    /// 移动到拍摄位姿后的稳定等待（毫秒）
    pub capture_settle_ms: u64,

    /// 运动控制配置
    pub controller: ControllerConfig,
}

impl OperatorConfig {
    /// 拍摄稳定等待
    pub fn capture_settle(&self) -> Duration {
        Duration::from_millis(self.capture_settle_ms)
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            interface: InterfaceKind::Terminal,
            camera_id: 0,
            pixel_size_m: 0.43e-3,
            capture_settle_ms: 1000,
            controller: ControllerConfig::default(),
        }
    }
}
