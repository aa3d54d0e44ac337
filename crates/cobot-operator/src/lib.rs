//! # Cobot Operator
//!
//! 语言引导的抓放操作层：一个命令周期内，数据单向流动——
//!
//! ```text
//! 图像 → 检测集 → 提示词 → 模型文本 → 解析指令 → 关节命令 → 物理运动
//! ```
//!
//! 生成文本永远不会作为宿主代码执行：模型应答被解析成受限的
//! [`Instruction`] 标签变体，只能经由固定派发表触达四个允许的
//! 机器人操作。
//!
//! ## 模块
//!
//! - `parser`: 模型应答分类（澄清问题 / 代码块）与指令解析
//! - `prompt`: 提示词模板渲染
//! - `frame`: 帧预处理（旋转、裁剪、光心）
//! - `perception`: 相机与感知适配接口、面积过滤、像素→米换算
//! - `model`: 语言模型适配接口
//! - `interface`: 操作员输入/输出能力接口
//! - `calibration`: 两点像素尺寸标定状态机
//! - `executor`: 命令周期状态机
//! - `config`: 操作层配置

pub mod calibration;
pub mod config;
pub mod executor;
pub mod frame;
pub mod interface;
pub mod model;
pub mod parser;
pub mod perception;
pub mod prompt;

pub use calibration::{CalibrationSession, CalibrationState};
pub use config::OperatorConfig;
pub use executor::{CommandExecutor, CycleOutcome, CycleState, compose_with_history};
pub use frame::Frame;
pub use interface::{InterfaceKind, OperatorInterface, TerminalInterface};
pub use model::LanguageModel;
pub use parser::{Instruction, ParsedResponse, parse_response};
pub use perception::{Camera, PerceptionAdapter, RawDetection, filter_by_area};
pub use prompt::render_prompt;

use cobot_client::MotionError;
use thiserror::Error;

/// 操作层错误类型
#[derive(Error, Debug)]
pub enum OperatorError {
    /// 运动控制错误
    #[error("Motion error: {0}")]
    Motion(#[from] MotionError),

    /// 取帧失败（中止当前周期，本层不自动重试）
    #[error("Capture failed: {0}")]
    Capture(String),

    /// 感知适配器失败
    #[error("Perception failed: {0}")]
    Perception(String),

    /// 语言模型请求失败
    #[error("Language model request failed: {0}")]
    Model(String),

    /// 操作员接口 IO 失败
    #[error("Interface error: {0}")]
    Interface(String),

    /// 模型应答既不是澄清问题也不是合法代码块
    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    /// 标定输入非法
    #[error("Calibration error: {0}")]
    Calibration(String),
}
