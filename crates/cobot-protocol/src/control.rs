//! 控制帧构建
//!
//! 面向设备层的命令帧构造函数。角度一律以度为单位传入，
//! 在此处统一转换为线上的 i16 百分度表示。

use crate::ids::Command;
use crate::{SerialFrame, deg_to_centi, i16_to_bytes_be};

/// 速度百分比的合法范围
pub const SPEED_MIN: u8 = 1;
pub const SPEED_MAX: u8 = 100;

/// 限制速度到合法范围
pub fn clamp_speed(speed: u8) -> u8 {
    speed.clamp(SPEED_MIN, SPEED_MAX)
}

/// 构建写关节角度帧
///
/// 负载布局：`[j1_hi, j1_lo, ..., j6_hi, j6_lo, speed]`，共 13 字节。
pub fn encode_write_angles(angles_deg: &[f64; 6], speed: u8) -> SerialFrame {
    let mut payload = Vec::with_capacity(13);
    for &deg in angles_deg {
        payload.extend_from_slice(&i16_to_bytes_be(deg_to_centi(deg)));
    }
    payload.push(clamp_speed(speed));
    SerialFrame::new(Command::WriteAngles, &payload)
}

/// 构建读关节角度帧（无负载）
pub fn encode_get_angles() -> SerialFrame {
    SerialFrame::new(Command::GetAngles, &[])
}

/// 构建到位查询帧
///
/// 负载为目标角度的 12 字节百分度编码，固件用它与当前角度比较。
pub fn encode_is_in_position(angles_deg: &[f64; 6]) -> SerialFrame {
    let mut payload = Vec::with_capacity(12);
    for &deg in angles_deg {
        payload.extend_from_slice(&i16_to_bytes_be(deg_to_centi(deg)));
    }
    SerialFrame::new(Command::IsInPosition, &payload)
}

/// 构建基础输出电平帧
///
/// `level` 按固件约定：0 = 低电平，1 = 高电平。
pub fn encode_set_basic_output(channel: u8, level: u8) -> SerialFrame {
    SerialFrame::new(Command::SetBasicOutput, &[channel, level])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_write_angles_layout() {
        let angles = [0.0, 20.0, -130.0, 20.0, 0.0, 0.0];
        let frame = encode_write_angles(&angles, 40);

        assert_eq!(frame.command, Command::WriteAngles);
        assert_eq!(frame.payload.len(), 13);

        // j2 = 20.0 度 = 2000 百分度 = 0x07D0
        assert_eq!(&frame.payload[2..4], &[0x07, 0xD0]);
        // j3 = -130.0 度 = -13000 百分度
        assert_eq!(&frame.payload[4..6], &(-13000i16).to_be_bytes());
        // 速度在末尾
        assert_eq!(frame.payload[12], 40);
    }

    #[test]
    fn test_encode_write_angles_clamps_speed() {
        let angles = [0.0; 6];
        assert_eq!(encode_write_angles(&angles, 0).payload[12], SPEED_MIN);
        assert_eq!(encode_write_angles(&angles, 255).payload[12], SPEED_MAX);
    }

    #[test]
    fn test_encode_get_angles() {
        let frame = encode_get_angles();
        assert_eq!(frame.command, Command::GetAngles);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_encode_is_in_position() {
        let frame = encode_is_in_position(&[0.0, 0.0, -30.0, -60.0, 0.0, -45.0]);
        assert_eq!(frame.command, Command::IsInPosition);
        assert_eq!(frame.payload.len(), 12);
    }

    #[test]
    fn test_encode_set_basic_output() {
        let frame = encode_set_basic_output(5, 0);
        assert_eq!(frame.command, Command::SetBasicOutput);
        assert_eq!(frame.payload, vec![5, 0]);
    }
}
