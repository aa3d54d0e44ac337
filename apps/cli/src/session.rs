//! 交互会话与单次命令
//!
//! 会话循环把之前的问答对拼进下一条指令（模型靠上下文消解
//! 澄清问题的答复），每条指令驱动一个完整的命令周期。

use crate::adapters::{FilePerception, PromptedModel, SyntheticCamera};
use crate::commands::config::load_config;
use anyhow::{Context, Result};
use cobot_client::MotionController;
use cobot_driver::{ArmDevice, Clock, MockArmDevice, MockClock, SerialArmDevice, SpinClock};
use cobot_operator::{
    CommandExecutor, CycleOutcome, InterfaceKind, OperatorConfig, OperatorInterface,
    PerceptionAdapter, TerminalInterface,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

/// 启动交互会话
pub fn run_session(mock: bool, detections: Option<&str>, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    if mock {
        let clock = MockClock::new();
        let device = MockArmDevice::new(clock.clone());
        let mut executor = build_executor(device, clock.clone(), clock, &config, detections)?;
        interactive_loop(&mut executor)
    } else {
        let device = open_serial(&config)?;
        let mut executor =
            build_executor(device, SpinClock::new(), SpinClock::new(), &config, detections)?;
        interactive_loop(&mut executor)
    }
}

/// 执行单个命令周期
pub fn run_once(
    text: &str,
    mock: bool,
    detections: Option<&str>,
    config_path: Option<&str>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let input = format!("Me: {}", text);

    if mock {
        let clock = MockClock::new();
        let device = MockArmDevice::new(clock.clone());
        let mut executor = build_executor(device, clock.clone(), clock, &config, detections)?;
        report_outcome(executor.execute_command(&input)?);
    } else {
        let device = open_serial(&config)?;
        let mut executor =
            build_executor(device, SpinClock::new(), SpinClock::new(), &config, detections)?;
        report_outcome(executor.execute_command(&input)?);
    }
    Ok(())
}

fn open_serial(config: &OperatorConfig) -> Result<SerialArmDevice> {
    println!("⏳ 连接到机械臂 {} ...", config.controller.port);
    let device = SerialArmDevice::open(
        &config.controller.port,
        config.controller.baud_rate,
        config.controller.suction_channel,
    )
    .with_context(|| format!("failed to open {}", config.controller.port))?;
    println!("✅ 已连接");
    Ok(device)
}

/// 按配置装配命令执行器
fn build_executor<D: ArmDevice, C: Clock>(
    device: D,
    controller_clock: C,
    executor_clock: C,
    config: &OperatorConfig,
    detections: Option<&str>,
) -> Result<CommandExecutor<D, C>> {
    let controller = MotionController::new(device, controller_clock, config.controller.clone())?;

    let perception: Box<dyn PerceptionAdapter> = match detections {
        Some(path) => Box::new(FilePerception::new(path)),
        None => anyhow::bail!(
            "this build ships the file-backed perception adapter; pass --detections <file>"
        ),
    };

    let interface = make_interface(config.interface)?;

    Ok(CommandExecutor::new(
        controller,
        executor_clock,
        Box::new(SyntheticCamera::default()),
        perception,
        Box::new(PromptedModel),
        interface,
        config.clone(),
    ))
}

/// 接口选择在配置时完成，非法选择是启动期的配置错误
fn make_interface(kind: InterfaceKind) -> Result<Box<dyn OperatorInterface>> {
    match kind {
        InterfaceKind::Terminal => Ok(Box::new(TerminalInterface)),
        InterfaceKind::Audio => anyhow::bail!(
            "the audio interface needs an external speech backend; this build ships terminal only"
        ),
    }
}

fn interactive_loop<D: ArmDevice, C: Clock>(executor: &mut CommandExecutor<D, C>) -> Result<()> {
    println!("输入指令开始（exit 退出）");
    let mut editor = DefaultEditor::new()?;
    let mut history: Vec<(String, String)> = Vec::new();

    loop {
        let line = match editor.readline("cobot> ") {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }
        let _ = editor.add_history_entry(&line);

        let input = cobot_operator::compose_with_history(&history, &format!("Me: {}", line));
        info!(%input, "session command");

        match executor.execute_command(&input) {
            Ok(CycleOutcome::Question(question)) => {
                history.push((line, question));
            },
            Ok(outcome @ CycleOutcome::Executed { .. }) => {
                report_outcome(outcome);
                history.push((line, "<Execute code>".to_string()));
            },
            Err(e) => {
                println!("❌ 周期失败: {}", e);
            },
        }
    }

    println!("会话结束");
    Ok(())
}

fn report_outcome(outcome: CycleOutcome) {
    match outcome {
        CycleOutcome::Question(question) => {
            // 问题已经由操作员接口输出，这里只给会话记录一个回执
            println!("（模型要求澄清：{}）", question);
        },
        CycleOutcome::Executed { succeeded, failed } => match failed {
            None => println!("✅ 已执行 {} 条指令", succeeded),
            Some((index, error)) => {
                println!("❌ 第 {} 条指令失败: {}", index + 1, error);
            },
        },
    }
}
