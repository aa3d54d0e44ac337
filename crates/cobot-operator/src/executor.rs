//! 命令周期状态机
//!
//! 严格串行、单线程地驱动一个命令周期：
//!
//! ```text
//! Idle → Capturing → Detecting → Prompting → AwaitingResponse
//!      → Parsed → {QuestionOutput | CodeDispatch} → Idle
//! ```
//!
//! 每个 IO 边界（取帧、模型请求、运动下发）都是阻塞调用，
//! 没有取消。任何失败中止当前周期并把控制权交还 Idle，本层
//! 没有重试策略。
//!
//! 不变量：检测集在派发 Code 前置入，派发结束后**无条件**清空
//! （成功或失败都一样），过期索引不可能存活到下一个周期。

use crate::config::OperatorConfig;
use crate::interface::OperatorInterface;
use crate::model::LanguageModel;
use crate::parser::{Instruction, ParsedResponse, parse_response};
use crate::perception::{Camera, PerceptionAdapter, filter_by_area, to_world_detections};
use crate::prompt::render_prompt;
use crate::OperatorError;
use cobot_client::MotionController;
use cobot_driver::{ArmDevice, Clock};
use tracing::{info, warn};

/// 周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Capturing,
    Detecting,
    Prompting,
    AwaitingResponse,
    Parsed,
    QuestionOutput,
    CodeDispatch,
}

/// 一个周期的结果
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// 模型提出了澄清问题（已经由接口输出）
    Question(String),

    /// 指令序列已派发
    Executed {
        /// 成功执行的指令数
        succeeded: usize,

        /// 首个失败的指令（序号与错误描述），None 表示全部成功
        failed: Option<(usize, String)>,
    },
}

/// 把会话历史拼接到新指令之前
///
/// 历史是 (操作员, 机器人) 应答对的列表，逐对展开成
/// `Me: …\nYou: …` 的对话记录。
pub fn compose_with_history(history: &[(String, String)], input: &str) -> String {
    if history.is_empty() {
        return input.to_string();
    }

    let mut text = history
        .iter()
        .map(|(me, you)| format!("Me: {}\nYou: {}", me, you))
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    text.push_str(input);
    text
}

/// 命令周期执行器
///
/// 持有运动控制器和全部外部协作者，串行驱动周期。
pub struct CommandExecutor<D: ArmDevice, C: Clock> {
    controller: MotionController<D, C>,
    clock: C,
    camera: Box<dyn Camera>,
    perception: Box<dyn PerceptionAdapter>,
    model: Box<dyn LanguageModel>,
    interface: Box<dyn OperatorInterface>,
    config: OperatorConfig,
    state: CycleState,
}

impl<D: ArmDevice, C: Clock> CommandExecutor<D, C> {
    pub fn new(
        controller: MotionController<D, C>,
        clock: C,
        camera: Box<dyn Camera>,
        perception: Box<dyn PerceptionAdapter>,
        model: Box<dyn LanguageModel>,
        interface: Box<dyn OperatorInterface>,
        config: OperatorConfig,
    ) -> Self {
        Self {
            controller,
            clock,
            camera,
            perception,
            model,
            interface,
            config,
            state: CycleState::Idle,
        }
    }

    /// 当前周期状态
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// 运动控制器（标定等流程需要直接移动）
    pub fn controller_mut(&mut self) -> &mut MotionController<D, C> {
        &mut self.controller
    }

    /// 操作员接口
    pub fn interface_mut(&mut self) -> &mut dyn OperatorInterface {
        self.interface.as_mut()
    }

    /// 执行一个命令周期
    ///
    /// 失败沿途上抛；无论哪条路径退出，状态都回到 `Idle`，
    /// 检测集都被清空。
    pub fn execute_command(&mut self, input_text: &str) -> Result<CycleOutcome, OperatorError> {
        let result = self.run_cycle(input_text);
        self.controller.clear_detections();
        self.state = CycleState::Idle;
        result
    }

    fn run_cycle(&mut self, input_text: &str) -> Result<CycleOutcome, OperatorError> {
        info!(input_text, "command cycle started");

        // 拍摄：移到拍摄位姿，等稳定，取一帧
        self.state = CycleState::Capturing;
        self.controller.move_to_place("capture", None)?;
        self.clock.sleep(self.config.capture_settle());
        let frame = self.camera.capture()?;
        let (frame, optical_center_px) = frame.preprocess();

        // 检测
        self.state = CycleState::Detecting;
        let raw = filter_by_area(self.perception.detect(&frame)?);
        info!(count = raw.len(), "detections");

        // 提示词
        self.state = CycleState::Prompting;
        let prompt = render_prompt(raw.len(), &self.config.language, input_text);

        // 模型请求
        self.state = CycleState::AwaitingResponse;
        let reply = self.model.complete(&prompt, &frame)?;

        self.state = CycleState::Parsed;
        match parse_response(&reply)? {
            ParsedResponse::Question(question) => {
                self.state = CycleState::QuestionOutput;
                self.interface.output(&question)?;
                Ok(CycleOutcome::Question(question))
            },
            ParsedResponse::Code(instructions) => {
                self.state = CycleState::CodeDispatch;
                self.controller.move_to_place("home", None)?;
                self.controller.set_detections(to_world_detections(
                    &raw,
                    optical_center_px,
                    self.config.pixel_size_m,
                ));
                Ok(self.dispatch_all(&instructions))
            },
        }
    }

    /// 逐条派发指令
    ///
    /// 单条失败在此捕获（报告、不崩溃），后续指令不再执行，
    /// 调用方的清空不变量不受影响。
    fn dispatch_all(&mut self, instructions: &[Instruction]) -> CycleOutcome {
        for (i, instruction) in instructions.iter().enumerate() {
            if let Err(e) = self.dispatch(instruction) {
                warn!(index = i, ?instruction, error = %e, "instruction failed");
                return CycleOutcome::Executed {
                    succeeded: i,
                    failed: Some((i, e.to_string())),
                };
            }
        }
        CycleOutcome::Executed {
            succeeded: instructions.len(),
            failed: None,
        }
    }

    /// 固定派发表：指令 → 机器人操作，唯一的执行路径
    fn dispatch(&mut self, instruction: &Instruction) -> Result<(), OperatorError> {
        match instruction {
            Instruction::Grab => self.controller.grab(None)?,
            Instruction::Release => self.controller.release(None)?,
            Instruction::MoveToObject(index) => self.controller.move_to_object(*index, None)?,
            Instruction::MoveToPlace(name) => self.controller.move_to_place(name, None)?,
        }
        Ok(())
    }
}
