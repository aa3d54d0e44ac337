//! 命令 ID 定义
//!
//! 固件命令集中本 SDK 使用的子集。ID 与机械臂固件约定一致，
//! 不要随固件版本之外的原因修改。

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 串口命令 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Command {
    /// 读取当前关节角度（应答负载：6 × i16 百分度）
    GetAngles = 0x20,

    /// 写入目标关节角度（负载：6 × i16 百分度 + 速度 u8）
    WriteAngles = 0x22,

    /// 查询是否到位（负载：6 × i16 目标百分度；应答负载：1 字节 0/1）
    IsInPosition = 0x2A,

    /// 设置基础输出电平（负载：通道 u8 + 电平 u8）
    ///
    /// 吸盘接在基础输出通道上，低电平有效。
    SetBasicOutput = 0xA0,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_values() {
        assert_eq!(u8::from(Command::GetAngles), 0x20);
        assert_eq!(u8::from(Command::WriteAngles), 0x22);
        assert_eq!(u8::from(Command::IsInPosition), 0x2A);
        assert_eq!(u8::from(Command::SetBasicOutput), 0xA0);
    }

    #[test]
    fn test_command_from_u8() {
        assert_eq!(Command::try_from(0x22), Ok(Command::WriteAngles));
        assert!(Command::try_from(0x99).is_err());
    }
}
