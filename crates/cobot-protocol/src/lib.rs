//! # Cobot Protocol
//!
//! 机械臂串口协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: 命令 ID 常量定义
//! - `control`: 控制帧构建
//! - `feedback`: 反馈帧解析
//!
//! ## 帧格式
//!
//! ```text
//! 0xFE 0xFE <len> <cmd> <payload...> 0xFA
//! ```
//!
//! `len` 计数 `cmd + payload + footer`，即 len 字节之后的全部字节数。
//!
//! ## 字节序
//!
//! 角度使用 i16 百分度（centidegree，度 × 100），高位在前（大端字节序）。
//! 本模块提供了字节序和标度转换工具函数。

pub mod control;
pub mod feedback;
pub mod ids;

// 重新导出常用类型
pub use control::*;
pub use feedback::*;
pub use ids::*;

use thiserror::Error;

/// 帧头字节（连续两个）
pub const FRAME_HEADER: u8 = 0xFE;

/// 帧尾字节
pub const FRAME_FOOTER: u8 = 0xFA;

/// 串口帧的统一抽象
///
/// # 设计目的
///
/// `SerialFrame` 是协议层和设备层之间的中间抽象，提供：
/// - **层次解耦**：协议层不依赖串口实现
/// - **统一接口**：上层通过 `ArmDevice` trait 使用统一的帧类型
/// - **类型安全**：命令 ID 使用枚举，避免原始字节操作错误
///
/// # 转换示例
///
/// ```rust
/// use cobot_protocol::{Command, SerialFrame};
///
/// let frame = SerialFrame::new(Command::SetBasicOutput, &[5, 0]);
/// let bytes = frame.encode();
/// assert_eq!(bytes, vec![0xFE, 0xFE, 0x04, 0xA0, 5, 0, 0xFA]);
///
/// let (decoded, consumed) = SerialFrame::parse(&bytes).unwrap();
/// assert_eq!(decoded, frame);
/// assert_eq!(consumed, bytes.len());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialFrame {
    /// 命令 ID
    pub command: Command,

    /// 帧负载（不含帧头、长度、命令和帧尾）
    pub payload: Vec<u8>,
}

impl SerialFrame {
    /// 创建新帧
    pub fn new(command: Command, payload: &[u8]) -> Self {
        Self {
            command,
            payload: payload.to_vec(),
        }
    }

    /// 编码为线上字节序列
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.payload.len() + 5);
        bytes.push(FRAME_HEADER);
        bytes.push(FRAME_HEADER);
        // len = cmd + payload + footer
        bytes.push((self.payload.len() + 2) as u8);
        bytes.push(self.command.into());
        bytes.extend_from_slice(&self.payload);
        bytes.push(FRAME_FOOTER);
        bytes
    }

    /// 从字节流解析一帧
    ///
    /// 容忍帧头之前的垃圾字节（串口上电噪声、上一帧残留）。
    /// 返回解析出的帧和消耗的字节数（含跳过的垃圾字节）。
    ///
    /// # 错误
    ///
    /// - 找不到连续两个 `0xFE`：`InvalidHeader`
    /// - 字节不足一个完整帧：`TruncatedFrame`
    /// - 帧尾不是 `0xFA`：`InvalidLength`
    /// - 命令 ID 未知：`UnknownCommand`
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), ProtocolError> {
        // 定位帧头
        let start = buf
            .windows(2)
            .position(|w| w == [FRAME_HEADER, FRAME_HEADER])
            .ok_or(ProtocolError::InvalidHeader)?;

        let body = &buf[start..];
        if body.len() < 5 {
            return Err(ProtocolError::TruncatedFrame {
                available: body.len(),
            });
        }

        let len = body[2] as usize;
        if len < 2 {
            return Err(ProtocolError::InvalidLength {
                expected: 2,
                actual: len,
            });
        }

        // 帧总长 = 2 (header) + 1 (len) + len
        let total = 3 + len;
        if body.len() < total {
            return Err(ProtocolError::TruncatedFrame {
                available: body.len(),
            });
        }

        if body[total - 1] != FRAME_FOOTER {
            return Err(ProtocolError::InvalidLength {
                expected: FRAME_FOOTER as usize,
                actual: body[total - 1] as usize,
            });
        }

        let command = Command::try_from(body[3])
            .map_err(|_| ProtocolError::UnknownCommand { id: body[3] })?;
        let payload = body[4..total - 1].to_vec();

        Ok((Self { command, payload }, start + total))
    }
}

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid frame header (no 0xFE 0xFE marker found)")]
    InvalidHeader,

    #[error("Truncated frame: only {available} bytes available")]
    TruncatedFrame { available: usize },

    #[error("Invalid frame length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unknown command id: 0x{id:02X}")]
    UnknownCommand { id: u8 },

    #[error("Invalid payload for {command:?}: expected {expected} bytes, got {actual}")]
    InvalidPayload {
        command: Command,
        expected: usize,
        actual: usize,
    },
}

/// 标度转换工具函数
///
/// 协议中的角度是 i16 百分度（度 × 100），大端字节序。
///
/// 度转百分度
pub fn deg_to_centi(deg: f64) -> i16 {
    (deg * 100.0).round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// 百分度转度
pub fn centi_to_deg(centi: i16) -> f64 {
    centi as f64 / 100.0
}

/// 大端字节序转 i16
pub fn bytes_to_i16_be(bytes: [u8; 2]) -> i16 {
    i16::from_be_bytes(bytes)
}

/// i16 转大端字节序
pub fn i16_to_bytes_be(value: i16) -> [u8; 2] {
    value.to_be_bytes()
}
