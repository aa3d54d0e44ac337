//! 串口设备实现
//!
//! 经由串口驱动真实机械臂。写角度命令本身无应答，到位状态
//! 通过 `IsInPosition` 查询轮询，直到固件报告到位或超出逐命令
//! 超时。

use crate::{ArmDevice, DeviceError, SuctionState};
use cobot_protocol::{
    SerialFrame, decode_angles_reply, decode_in_position_reply, encode_get_angles,
    encode_is_in_position, encode_set_basic_output, encode_write_angles,
};
use std::io::{Read, Write};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// 单次应答的串口读超时
const REPLY_TIMEOUT: Duration = Duration::from_millis(200);

/// 到位查询的轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 串口机械臂设备
pub struct SerialArmDevice {
    port: Box<dyn serialport::SerialPort>,
    suction_channel: u8,
    sleeper: spin_sleep::SpinSleeper,
    read_buf: Vec<u8>,
}

impl SerialArmDevice {
    /// 打开串口
    ///
    /// `path` 形如 `/dev/ttyACM0`（Linux）或 `COM3`（Windows）。
    pub fn open(path: &str, baud_rate: u32, suction_channel: u8) -> Result<Self, DeviceError> {
        let port = serialport::new(path, baud_rate)
            .timeout(REPLY_TIMEOUT)
            .open()
            .map_err(|e| DeviceError::Port(format!("{}: {}", path, e)))?;

        debug!(path, baud_rate, "serial port opened");
        Ok(Self {
            port,
            suction_channel,
            sleeper: spin_sleep::SpinSleeper::default(),
            read_buf: Vec::with_capacity(64),
        })
    }

    /// 发送一帧（无应答）
    fn send(&mut self, frame: &SerialFrame) -> Result<(), DeviceError> {
        let bytes = frame.encode();
        trace!(command = ?frame.command, len = bytes.len(), "tx frame");
        self.port.write_all(&bytes)?;
        self.port.flush()?;
        Ok(())
    }

    /// 发送一帧并等待应答帧
    fn transact(&mut self, frame: &SerialFrame) -> Result<SerialFrame, DeviceError> {
        self.send(frame)?;
        self.read_buf.clear();

        let deadline = Instant::now() + REPLY_TIMEOUT;
        let mut chunk = [0u8; 64];

        loop {
            match self.port.read(&mut chunk) {
                Ok(0) => {},
                Ok(n) => {
                    self.read_buf.extend_from_slice(&chunk[..n]);
                    match SerialFrame::parse(&self.read_buf) {
                        Ok((reply, _consumed)) => {
                            trace!(command = ?reply.command, "rx frame");
                            return Ok(reply);
                        },
                        // 还没收齐，继续读
                        Err(cobot_protocol::ProtocolError::TruncatedFrame { .. })
                        | Err(cobot_protocol::ProtocolError::InvalidHeader) => {},
                        Err(e) => return Err(e.into()),
                    }
                },
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {},
                Err(e) => return Err(e.into()),
            }

            if Instant::now() >= deadline {
                warn!(command = ?frame.command, "no reply before deadline");
                return Err(DeviceError::Timeout);
            }
        }
    }
}

impl ArmDevice for SerialArmDevice {
    fn sync_write_angles(
        &mut self,
        angles_deg: &[f64; 6],
        speed: u8,
        timeout: Duration,
    ) -> Result<(), DeviceError> {
        self.send(&encode_write_angles(angles_deg, speed))?;

        // 轮询到位状态直到固件确认或超时
        let deadline = Instant::now() + timeout;
        loop {
            let reply = self.transact(&encode_is_in_position(angles_deg))?;
            if decode_in_position_reply(&reply)? {
                debug!(?angles_deg, speed, "move settled");
                return Ok(());
            }

            if Instant::now() >= deadline {
                warn!(?angles_deg, "move did not settle before timeout");
                return Err(DeviceError::Timeout);
            }
            self.sleeper.sleep(POLL_INTERVAL);
        }
    }

    fn read_angles(&mut self) -> Result<[f64; 6], DeviceError> {
        let reply = self.transact(&encode_get_angles())?;
        Ok(decode_angles_reply(&reply)?)
    }

    fn set_suction(&mut self, state: SuctionState) -> Result<(), DeviceError> {
        debug!(?state, channel = self.suction_channel, "suction switch");
        self.send(&encode_set_basic_output(self.suction_channel, state.level()))
    }
}
