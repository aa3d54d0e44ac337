//! 运动控制配置
//!
//! 启动时构造一次，显式传入控制器构造函数（不读任何隐式全局）。
//! 位姿表在配置加载后不可变，运行期只按名字查询。

use cobot_kinematics::{JointAngles, JointArray};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// 运动控制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// 串口设备路径
    pub port: String,

    /// 串口波特率
    pub baud_rate: u32,

    /// 吸盘所在的基础输出通道
    pub suction_channel: u8,

    /// 默认水平移动速度（百分比）
    pub default_speed: u8,

    /// 默认垂直移动速度（百分比）
    pub default_z_speed: u8,

    /// 逐命令超时（秒）
    pub command_timeout_secs: u64,

    /// 是否启用重力补偿
    pub use_gravity_compensation: bool,

    /// 泵头偏移高度（米）
    pub pad_offset_height: f64,

    /// 抓取时的物体高度（米）
    pub object_height: f64,

    /// 释放高度（米）
    pub release_height: f64,

    /// 命名位姿表（度）
    pub places: BTreeMap<String, JointAngles>,
}

impl ControllerConfig {
    /// 逐命令超时
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        let mut places = BTreeMap::new();
        places.insert(
            "home".to_string(),
            JointArray::from_degrees([0.0, 20.0, -130.0, 20.0, 0.0, 0.0]),
        );
        places.insert(
            "capture".to_string(),
            JointArray::from_degrees([0.0, 0.0, -30.0, -60.0, 0.0, -45.0]),
        );
        places.insert(
            "drop".to_string(),
            JointArray::from_degrees([-45.0, 20.0, -130.0, 20.0, 0.0, 0.0]),
        );

        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: 115_200,
            suction_channel: 5,
            default_speed: 40,
            default_z_speed: 20,
            command_timeout_secs: 5,
            use_gravity_compensation: false,
            pad_offset_height: 0.065,
            object_height: 0.01,
            release_height: 0.05,
            places,
        }
    }
}
