//! 反馈帧解析
//!
//! 解析设备应答帧。与 `control` 对称：线上的 i16 百分度在此处
//! 统一转换回度。

use crate::ids::Command;
use crate::{ProtocolError, SerialFrame, bytes_to_i16_be, centi_to_deg};

/// 解析关节角度应答
///
/// 负载布局：`[j1_hi, j1_lo, ..., j6_hi, j6_lo]`，共 12 字节。
pub fn decode_angles_reply(frame: &SerialFrame) -> Result<[f64; 6], ProtocolError> {
    if frame.command != Command::GetAngles {
        return Err(ProtocolError::UnknownCommand {
            id: frame.command.into(),
        });
    }
    if frame.payload.len() != 12 {
        return Err(ProtocolError::InvalidPayload {
            command: frame.command,
            expected: 12,
            actual: frame.payload.len(),
        });
    }

    let mut angles = [0.0; 6];
    for (i, chunk) in frame.payload.chunks_exact(2).enumerate() {
        angles[i] = centi_to_deg(bytes_to_i16_be([chunk[0], chunk[1]]));
    }
    Ok(angles)
}

/// 解析到位查询应答（1 字节，非零表示已到位）
pub fn decode_in_position_reply(frame: &SerialFrame) -> Result<bool, ProtocolError> {
    if frame.command != Command::IsInPosition {
        return Err(ProtocolError::UnknownCommand {
            id: frame.command.into(),
        });
    }
    if frame.payload.len() != 1 {
        return Err(ProtocolError::InvalidPayload {
            command: frame.command,
            expected: 1,
            actual: frame.payload.len(),
        });
    }
    Ok(frame.payload[0] != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i16_to_bytes_be;

    fn angles_frame(angles_centi: [i16; 6]) -> SerialFrame {
        let mut payload = Vec::with_capacity(12);
        for c in angles_centi {
            payload.extend_from_slice(&i16_to_bytes_be(c));
        }
        SerialFrame::new(Command::GetAngles, &payload)
    }

    #[test]
    fn test_decode_angles_reply() {
        let frame = angles_frame([0, 2000, -13000, 2000, 0, -4500]);
        let angles = decode_angles_reply(&frame).unwrap();

        assert!((angles[1] - 20.0).abs() < 1e-12);
        assert!((angles[2] + 130.0).abs() < 1e-12);
        assert!((angles[5] + 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_decode_angles_reply_wrong_len() {
        let frame = SerialFrame::new(Command::GetAngles, &[0x00, 0x01]);
        assert!(matches!(
            decode_angles_reply(&frame),
            Err(ProtocolError::InvalidPayload { expected: 12, .. })
        ));
    }

    #[test]
    fn test_decode_angles_reply_wrong_command() {
        let frame = SerialFrame::new(Command::WriteAngles, &[0u8; 12]);
        assert!(decode_angles_reply(&frame).is_err());
    }

    #[test]
    fn test_decode_in_position_reply() {
        let yes = SerialFrame::new(Command::IsInPosition, &[1]);
        let no = SerialFrame::new(Command::IsInPosition, &[0]);

        assert!(decode_in_position_reply(&yes).unwrap());
        assert!(!decode_in_position_reply(&no).unwrap());
    }

    #[test]
    fn test_decode_in_position_reply_wrong_len() {
        let frame = SerialFrame::new(Command::IsInPosition, &[]);
        assert!(matches!(
            decode_in_position_reply(&frame),
            Err(ProtocolError::InvalidPayload { expected: 1, .. })
        ));
    }
}
