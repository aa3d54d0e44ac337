//! 命令周期集成测试
//!
//! 用 Mock 设备/时钟/相机/感知/模型把整个周期跑通：
//! 拍摄 → 检测 → 提示词 → 应答解析 → 派发 → 清空检测。

use cobot_client::{ControllerConfig, MotionController};
use cobot_driver::{DeviceEvent, EventLog, MockArmDevice, MockClock, SuctionState};
use cobot_kinematics::Chain;
use cobot_operator::{
    Camera, CommandExecutor, CycleOutcome, CycleState, Frame, LanguageModel, OperatorConfig,
    OperatorError, OperatorInterface, PerceptionAdapter, RawDetection,
};
use nalgebra::Vector2;
use std::sync::{Arc, Mutex};

/// 固定尺寸的黑帧相机
struct StaticCamera;

impl Camera for StaticCamera {
    fn capture(&mut self) -> Result<Frame, OperatorError> {
        Frame::new(64, 48, vec![0; 64 * 48 * 3])
    }
}

/// 取帧必败的相机
struct BrokenCamera;

impl Camera for BrokenCamera {
    fn capture(&mut self) -> Result<Frame, OperatorError> {
        Err(OperatorError::Capture("frame read failed".to_string()))
    }
}

/// 返回固定检测列表的感知适配器
struct StaticPerception {
    detections: Vec<RawDetection>,
}

impl PerceptionAdapter for StaticPerception {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<RawDetection>, OperatorError> {
        Ok(self.detections.clone())
    }
}

/// 返回固定应答并记录提示词的模型
struct ScriptedModel {
    reply: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl LanguageModel for ScriptedModel {
    fn complete(&mut self, prompt: &str, _annotated: &Frame) -> Result<String, OperatorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// 记录输出的操作员接口
struct RecordingInterface {
    outputs: Arc<Mutex<Vec<String>>>,
}

impl OperatorInterface for RecordingInterface {
    fn input(&mut self, prefix: &str) -> Result<String, OperatorError> {
        Ok(prefix.to_string())
    }

    fn output(&mut self, message: &str) -> Result<(), OperatorError> {
        self.outputs.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// 5 个原始检测，面积过滤后剩 3 个
fn five_raw_detections() -> Vec<RawDetection> {
    vec![
        RawDetection {
            center_px: Vector2::new(20.0, 30.0),
            area_fraction: 0.004, // 太小，滤掉
        },
        RawDetection {
            center_px: Vector2::new(18.0, 26.0),
            area_fraction: 0.01,
        },
        RawDetection {
            center_px: Vector2::new(26.0, 38.0),
            area_fraction: 0.03,
        },
        RawDetection {
            center_px: Vector2::new(30.0, 20.0),
            area_fraction: 0.02,
        },
        RawDetection {
            center_px: Vector2::new(10.0, 10.0),
            area_fraction: 0.06, // 太大，滤掉
        },
    ]
}

/// 测试台架的位姿表
///
/// home 取拍摄位姿绕基座转 2°（两者都在工作区中央，逆解都是
/// 小幅局部解），抓取高度取在拍摄位姿下方 1 cm。
fn test_rig_config() -> ControllerConfig {
    let mut config = ControllerConfig::default();
    config.places.insert(
        "home".to_string(),
        cobot_kinematics::JointArray::from_degrees([2.0, 0.0, -30.0, -60.0, 0.0, -45.0]),
    );

    let capture_z = Chain::pump_flange()
        .forward(&config.places["capture"].to_rad())
        .translation
        .vector
        .z;
    config.object_height = capture_z - config.pad_offset_height - 0.01;
    config.release_height = capture_z - config.pad_offset_height - 0.005;
    config
}

struct Harness {
    executor: CommandExecutor<MockArmDevice, MockClock>,
    log: EventLog,
    prompts: Arc<Mutex<Vec<String>>>,
    outputs: Arc<Mutex<Vec<String>>>,
}

fn harness(reply: &str, camera: Box<dyn Camera>) -> Harness {
    let clock = MockClock::new();
    let device = MockArmDevice::new(clock.clone());
    let log = device.event_log();

    let controller =
        MotionController::new(device, clock.clone(), test_rig_config()).unwrap();

    let prompts = Arc::new(Mutex::new(Vec::new()));
    let outputs = Arc::new(Mutex::new(Vec::new()));

    let executor = CommandExecutor::new(
        controller,
        clock,
        camera,
        Box::new(StaticPerception {
            detections: five_raw_detections(),
        }),
        Box::new(ScriptedModel {
            reply: reply.to_string(),
            prompts: Arc::clone(&prompts),
        }),
        Box::new(RecordingInterface {
            outputs: Arc::clone(&outputs),
        }),
        OperatorConfig::default(),
    );

    Harness {
        executor,
        log,
        prompts,
        outputs,
    }
}

fn suction_events(log: &EventLog) -> Vec<SuctionState> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            DeviceEvent::Suction { state, .. } => Some(*state),
            _ => None,
        })
        .collect()
}

fn home_write_count(log: &EventLog) -> usize {
    log.lock()
        .unwrap()
        .iter()
        .filter(|e| {
            matches!(
                e,
                DeviceEvent::WriteAngles { angles_deg, .. }
                    if *angles_deg == [2.0, 0.0, -30.0, -60.0, 0.0, -45.0]
            )
        })
        .count()
}

#[test]
fn test_pick_up_object_cycle_end_to_end() {
    let mut h = harness("```python\nmove_to_object(2)\ngrab()\n```", Box::new(StaticCamera));

    let outcome = h.executor.execute_command("Me: pick up object 2").unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Executed {
            succeeded: 2,
            failed: None,
        }
    );

    // 提示词嵌入过滤后的检测数
    let prompts = h.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("There are 3 objects"));
    assert!(prompts[0].contains("Me: pick up object 2"));
    drop(prompts);

    // 派发前回到 home
    assert_eq!(home_write_count(&h.log), 1);

    // 一次抓取恰好一次开泵
    assert_eq!(suction_events(&h.log), vec![SuctionState::On]);

    // 检测集无条件清空，状态回到 Idle
    assert_eq!(h.executor.controller_mut().detection_count(), 0);
    assert_eq!(h.executor.state(), CycleState::Idle);
}

#[test]
fn test_object_target_uses_mirror_mapping() {
    let mut h = harness("```python\nmove_to_object(2)\n```", Box::new(StaticCamera));
    h.executor.execute_command("Me: move over object 2").unwrap();

    // 过滤后第 2 号检测是原始列表里 0.02 面积那一个
    let config = OperatorConfig::default();
    let optical_center = Vector2::new(24.0, 32.0); // 48/2, 64/2
    let center_m = (Vector2::new(30.0, 20.0) - optical_center) * config.pixel_size_m;

    let capture = test_rig_config().places["capture"];
    let capture_xy = Chain::optical_center()
        .forward(&capture.to_rad())
        .translation
        .vector
        .xy();
    let expected = capture_xy - center_m;

    let reached = h
        .executor
        .controller_mut()
        .current_pose()
        .translation
        .vector
        .xy();
    assert!((reached.x - expected.x).abs() < 1e-4, "x: {} vs {}", reached.x, expected.x);
    assert!((reached.y - expected.y).abs() < 1e-4, "y: {} vs {}", reached.y, expected.y);
}

#[test]
fn test_question_cycle_outputs_without_motion() {
    let mut h = harness("Question - which sphere do you mean?", Box::new(StaticCamera));

    let outcome = h.executor.execute_command("Me: pick up the sphere").unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Question("which sphere do you mean?".to_string())
    );

    // 问题经接口转述
    assert_eq!(
        *h.outputs.lock().unwrap(),
        vec!["which sphere do you mean?".to_string()]
    );

    // 只有移动到拍摄位姿那一次写命令，没有回 home，没有吸盘动作
    assert_eq!(h.log.lock().unwrap().len(), 1);
    assert_eq!(home_write_count(&h.log), 0);
    assert!(suction_events(&h.log).is_empty());
}

#[test]
fn test_failed_instruction_is_reported_and_detections_cleared() {
    let reply = "```python\nmove_to_object(0)\nmove_to_place(\"nowhere\")\ngrab()\n```";
    let mut h = harness(reply, Box::new(StaticCamera));

    let outcome = h.executor.execute_command("Me: put it nowhere").unwrap();
    match outcome {
        CycleOutcome::Executed {
            succeeded,
            failed: Some((index, message)),
        } => {
            assert_eq!(succeeded, 1);
            assert_eq!(index, 1);
            assert!(message.contains("nowhere"));
        },
        other => panic!("Expected a reported failure, got {:?}", other),
    }

    // 失败的指令之后不再继续：grab 未执行
    assert!(suction_events(&h.log).is_empty());

    // 清空不变量不受失败影响
    assert_eq!(h.executor.controller_mut().detection_count(), 0);
    assert_eq!(h.executor.state(), CycleState::Idle);
}

#[test]
fn test_invalid_response_ends_cycle_without_motion() {
    let mut h = harness("I am afraid I cannot do that.", Box::new(StaticCamera));

    let result = h.executor.execute_command("Me: do something");
    assert!(matches!(
        result,
        Err(OperatorError::InvalidResponseFormat(_))
    ));

    // 解析失败发生在回 home 之前，唯一的运动是去拍摄位姿
    assert_eq!(h.log.lock().unwrap().len(), 1);
    assert_eq!(h.executor.state(), CycleState::Idle);
}

#[test]
fn test_capture_failure_aborts_cycle() {
    let mut h = harness("```python\ngrab()\n```", Box::new(BrokenCamera));

    let result = h.executor.execute_command("Me: grab it");
    assert!(matches!(result, Err(OperatorError::Capture(_))));

    // 周期中止，状态交还 Idle，等待下一次外部触发
    assert_eq!(h.executor.state(), CycleState::Idle);
    assert_eq!(h.executor.controller_mut().detection_count(), 0);
}

#[test]
fn test_misread_index_is_repaired_in_dispatch() {
    // 检测只有 3 个，模型把标签误读成 12，修复成 2 后照常执行
    let mut h = harness("```python\nmove_to_object(12)\n```", Box::new(StaticCamera));

    let outcome = h.executor.execute_command("Me: object twelve?").unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Executed {
            succeeded: 1,
            failed: None,
        }
    );
}
