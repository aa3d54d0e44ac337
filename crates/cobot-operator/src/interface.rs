//! 操作员接口
//!
//! 输入/输出的能力接口：终端或语音。具体实现由配置时的
//! [`InterfaceKind`] 决定，不在运行期做类型探测。语音后端是
//! 外部协作者，本 crate 只内置终端实现。

use crate::OperatorError;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// 接口类型（配置项）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    /// 终端读写
    Terminal,

    /// 语音（需要外部语音后端）
    Audio,
}

/// 操作员输入/输出能力
pub trait OperatorInterface {
    /// 读一条操作员指令，`prefix` 拼接在返回文本之前
    fn input(&mut self, prefix: &str) -> Result<String, OperatorError>;

    /// 输出一条消息（文字或语音渲染），无返回值
    fn output(&mut self, message: &str) -> Result<(), OperatorError>;
}

/// 终端实现
pub struct TerminalInterface;

impl OperatorInterface for TerminalInterface {
    fn input(&mut self, prefix: &str) -> Result<String, OperatorError> {
        print!("Please input your command. > ");
        std::io::stdout()
            .flush()
            .map_err(|e| OperatorError::Interface(e.to_string()))?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| OperatorError::Interface(e.to_string()))?;

        Ok(format!("{}{}", prefix, line.trim_end()))
    }

    fn output(&mut self, message: &str) -> Result<(), OperatorError> {
        println!("Robot: {}", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_kind_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            interface: InterfaceKind,
        }

        let w: Wrapper = toml::from_str("interface = \"terminal\"").unwrap();
        assert_eq!(w.interface, InterfaceKind::Terminal);

        let w: Wrapper = toml::from_str("interface = \"audio\"").unwrap();
        assert_eq!(w.interface, InterfaceKind::Audio);
    }
}
