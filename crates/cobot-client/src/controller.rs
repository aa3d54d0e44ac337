//! 运动控制器
//!
//! 把笛卡尔目标翻译成关节命令：正解读当前位姿 → 改写目标分量 →
//! 以当前关节角为种子逆解 → 叠加重力补偿 → 下发并等待到位。
//!
//! 关节状态的提交纪律：目标角度先下发，设备确认成功后才覆盖
//! `current`。逆解不收敛或命令超时都不会留下半截状态。

use crate::config::ControllerConfig;
use crate::corrector::correct_object_index;
use crate::MotionError;
use cobot_driver::{ArmDevice, Clock, SuctionState};
use cobot_kinematics::{Chain, GravityCompensator, JointAngles};
use nalgebra::{Isometry3, Vector2};
use std::time::Duration;
use tracing::{debug, info};

/// 抓取后泵气压稳定等待
///
/// 泵没有压力反馈，通电后需要固定时间建立吸力。
const GRAB_DWELL: Duration = Duration::from_secs(2);

/// 释放后泄气等待
const RELEASE_DWELL: Duration = Duration::from_secs(1);

/// 一个被检测到的物体区域
///
/// 每个命令周期由感知层生成一次，供运动控制消费，周期结束后
/// 整组丢弃。
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// 生成顺序分配的索引（0 起）
    pub index: usize,

    /// 距拍摄位姿光心的平面偏移（米）
    pub center: Vector2<f64>,

    /// 占整幅画面的像素面积比例
    pub area_fraction: f64,
}

/// 运动控制器
///
/// 独占持有关节状态；系统全局同一时刻至多一个未完成的运动命令。
pub struct MotionController<D: ArmDevice, C: Clock> {
    device: D,
    clock: C,
    chain: Chain,
    gravity: GravityCompensator,
    config: ControllerConfig,
    /// 最后一次下发成功的关节角（命令值，非反馈值）
    current: JointAngles,
    /// 拍摄位姿下相机光心的世界坐标 xy（启动时求值一次的常量）
    capture_xy: Vector2<f64>,
    detections: Vec<Detection>,
}

impl<D: ArmDevice, C: Clock> MotionController<D, C> {
    /// 创建控制器
    ///
    /// 从设备读取上电时的关节角作为初始命令状态，并在拍摄位姿
    /// 上对光心链求值一次。位姿表缺少 `"capture"` 是配置错误，
    /// 立即失败。
    pub fn new(mut device: D, clock: C, config: ControllerConfig) -> Result<Self, MotionError> {
        let capture = config
            .places
            .get("capture")
            .ok_or_else(|| MotionError::UnknownPlace("capture".to_string()))?;

        let lens_pose = Chain::optical_center().forward(&capture.to_rad());
        let capture_xy = lens_pose.translation.vector.xy();

        let chain = Chain::pump_flange();
        let gravity = GravityCompensator::new(chain.clone(), config.use_gravity_compensation);

        let current = JointAngles::from_degrees(device.read_angles()?);
        info!(?current, "motion controller initialized");

        Ok(Self {
            device,
            clock,
            chain,
            gravity,
            config,
            current,
            capture_xy,
            detections: Vec::new(),
        })
    }

    /// 最后一次下发成功的关节角
    pub fn current_angles(&self) -> &JointAngles {
        &self.current
    }

    /// 当前位姿（总是从命令关节角重新正解，不缓存）
    pub fn current_pose(&self) -> Isometry3<f64> {
        self.chain.forward(&self.current.to_rad())
    }

    /// 置入本周期的检测集（覆盖旧集）
    pub fn set_detections(&mut self, detections: Vec<Detection>) {
        debug!(count = detections.len(), "detections staged");
        self.detections = detections;
    }

    /// 无条件清空检测集
    pub fn clear_detections(&mut self) {
        self.detections.clear();
    }

    /// 当前置入的检测数
    pub fn detection_count(&self) -> usize {
        self.detections.len()
    }

    /// 叠加重力补偿后下发，成功才提交关节状态
    fn dispatch(&mut self, target: JointAngles, speed: u8) -> Result<(), MotionError> {
        let compensated = target.add(&self.gravity.compensate(&target));
        self.device.sync_write_angles(
            &compensated.to_degrees_array(),
            speed,
            self.config.command_timeout(),
        )?;
        self.current = target;
        debug!(?target, speed, "move committed");
        Ok(())
    }

    /// 移动到笛卡尔位姿
    pub fn move_to_coords(
        &mut self,
        target: &Isometry3<f64>,
        speed: Option<u8>,
    ) -> Result<(), MotionError> {
        let solution = self.chain.inverse(target, &self.current.to_rad())?;
        self.dispatch(solution.to_deg(), speed.unwrap_or(self.config.default_speed))
    }

    /// 水平移动到绝对 xy（保持 z 和姿态）
    pub fn move_to_xy(&mut self, x: f64, y: f64, speed: Option<u8>) -> Result<(), MotionError> {
        let mut pose = self.current_pose();
        pose.translation.vector.x = x;
        pose.translation.vector.y = y;
        self.move_to_coords(&pose, speed)
    }

    /// 垂直移动到绝对 z（保持 xy 和姿态）
    pub fn move_to_z(&mut self, z: f64, speed: Option<u8>) -> Result<(), MotionError> {
        let mut pose = self.current_pose();
        pose.translation.vector.z = z;
        self.move_to_coords(&pose, Some(speed.unwrap_or(self.config.default_z_speed)))
    }

    /// 移动到编号物体上方
    pub fn move_to_object(&mut self, index: usize, speed: Option<u8>) -> Result<(), MotionError> {
        let index = correct_object_index(index, self.detections.len());
        let detection =
            self.detections
                .get(index)
                .cloned()
                .ok_or(MotionError::InvalidObjectIndex {
                    index,
                    count: self.detections.len(),
                })?;

        // 相机帧和机器人帧在本台架上是镜像关系，偏移取反后叠加到
        // 光心坐标。换一台臂/相机几何需要重新推导这个映射。
        let target = self.capture_xy - detection.center;
        info!(index, x = target.x, y = target.y, "move to object");
        self.move_to_xy(target.x, target.y, speed)
    }

    /// 移动到命名位姿（直接关节空间，无需逆解）
    pub fn move_to_place(&mut self, name: &str, speed: Option<u8>) -> Result<(), MotionError> {
        let target = self
            .config
            .places
            .get(name)
            .copied()
            .ok_or_else(|| MotionError::UnknownPlace(name.to_string()))?;

        info!(name, "move to place");
        self.dispatch(target, speed.unwrap_or(self.config.default_speed))
    }

    /// 抓取：下降到物体高度，开泵，等待吸力建立，回到原高度
    pub fn grab(&mut self, speed: Option<u8>) -> Result<(), MotionError> {
        info!("grab");
        let return_z = self.current_pose().translation.vector.z;

        self.move_to_z(
            self.config.object_height + self.config.pad_offset_height,
            speed,
        )?;
        self.device.set_suction(SuctionState::On)?;
        self.clock.sleep(GRAB_DWELL);
        self.move_to_z(return_z, speed)
    }

    /// 释放：下降到释放高度，关泵，等待泄气，回到原高度
    pub fn release(&mut self, speed: Option<u8>) -> Result<(), MotionError> {
        info!("release");
        let return_z = self.current_pose().translation.vector.z;

        self.move_to_z(
            self.config.release_height + self.config.pad_offset_height,
            speed,
        )?;
        self.device.set_suction(SuctionState::Off)?;
        self.clock.sleep(RELEASE_DWELL);
        self.move_to_z(return_z, speed)
    }
}
