//! CLI 内置适配器
//!
//! 分割模型和语言模型 API 都是外部协作者，这里提供不依赖网络
//! 凭据的替身，让整条流水线可以在终端上端到端跑通：
//!
//! - [`SyntheticCamera`]: 固定尺寸黑帧（检测来自文件时帧内容无关紧要）
//! - [`FilePerception`]: 从 JSON 文件读检测列表
//! - [`PromptedModel`]: 把提示词打印到终端，由操作员粘贴模型应答

use cobot_operator::{
    Camera, Frame, LanguageModel, OperatorError, PerceptionAdapter, RawDetection, filter_by_area,
};
use nalgebra::Vector2;
use serde::Deserialize;
use std::io::{BufRead, Write};
use tracing::info;

/// 固定尺寸黑帧相机
pub struct SyntheticCamera {
    pub width: usize,
    pub height: usize,
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl Camera for SyntheticCamera {
    fn capture(&mut self) -> Result<Frame, OperatorError> {
        Frame::new(self.width, self.height, vec![0; self.width * self.height * 3])
    }
}

/// JSON 文件里的一条检测
#[derive(Debug, Deserialize)]
struct DetectionRecord {
    /// 质心行坐标（像素）
    row: f64,

    /// 质心列坐标（像素）
    col: f64,

    /// 面积占比
    area_fraction: f64,
}

/// 文件感知适配器
///
/// 每次取检测时重读文件，方便演练中途换场景。
pub struct FilePerception {
    path: String,
}

impl FilePerception {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl PerceptionAdapter for FilePerception {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<RawDetection>, OperatorError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| OperatorError::Perception(format!("{}: {}", self.path, e)))?;
        let records: Vec<DetectionRecord> = serde_json::from_str(&content)
            .map_err(|e| OperatorError::Perception(format!("{}: {}", self.path, e)))?;

        let raw = records
            .into_iter()
            .map(|r| RawDetection {
                center_px: Vector2::new(r.row, r.col),
                area_fraction: r.area_fraction,
            })
            .collect();
        Ok(filter_by_area(raw))
    }
}

/// 终端转发模型
///
/// 把渲染好的提示词打印出来，操作员转给真实模型后粘贴应答。
/// 应答以单独一行 `EOF` 结束。
pub struct PromptedModel;

impl LanguageModel for PromptedModel {
    fn complete(&mut self, prompt: &str, annotated: &Frame) -> Result<String, OperatorError> {
        info!(
            width = annotated.width,
            height = annotated.height,
            "prompt ready"
        );

        println!("===== PROMPT =====");
        println!("{}", prompt);
        println!("==================");
        println!("请粘贴模型应答，单独一行 EOF 结束：");
        std::io::stdout()
            .flush()
            .map_err(|e| OperatorError::Model(e.to_string()))?;

        let stdin = std::io::stdin();
        let mut reply = String::new();
        for line in stdin.lock().lines() {
            let line = line.map_err(|e| OperatorError::Model(e.to_string()))?;
            if line.trim() == "EOF" {
                break;
            }
            reply.push_str(&line);
            reply.push('\n');
        }

        Ok(reply.trim_end().to_string())
    }
}
