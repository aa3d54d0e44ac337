//! 语言模型接口
//!
//! 模型是外部协作者：输入渲染好的提示词和标注过的帧，输出自由
//! 文本。文本的两种合法形态（澄清问题 / 围栏代码块）由
//! [`crate::parser`] 负责判定，本接口不做任何格式约束。

use crate::frame::Frame;
use crate::OperatorError;

/// 语言模型适配接口（外部协作者）
pub trait LanguageModel {
    /// 请求一次补全（阻塞，无取消）
    fn complete(&mut self, prompt: &str, annotated: &Frame) -> Result<String, OperatorError>;
}
