//! 开环重力下垂补偿
//!
//! 本机型没有闭环力矩反馈，大臂段在重力下有可观测的下垂。
//! 补偿是开环的：把固定的重力旋量经雅可比转置投影到关节空间，
//! 再按逐关节经验增益缩放，叠加到每次下发的目标角度上。
//!
//! 补偿量依赖当前构型，每次移动前重新计算，不缓存。

use crate::chain::Chain;
use crate::joint::{JOINT_COUNT, JointArray};
use crate::units::Deg;
use crate::JointAngles;
use nalgebra::Vector6;
use tracing::debug;

/// 重力旋量（世界坐标系，m/s²）
fn gravity_wrench() -> Vector6<f64> {
    Vector6::new(0.0, 0.0, -9.8, 0.0, 0.0, 0.0)
}

/// 逐关节经验增益
///
/// 只有肘部两个俯仰关节（J3/J4）有可测的下垂，增益在实机上标定。
const JOINT_GAINS: [f64; JOINT_COUNT] = [0.0, 0.0, -0.15, -0.35, 0.0, 0.0];

/// 重力补偿器
#[derive(Debug, Clone)]
pub struct GravityCompensator {
    chain: Chain,
    enabled: bool,
}

impl GravityCompensator {
    /// 创建补偿器
    pub fn new(chain: Chain, enabled: bool) -> Self {
        Self { chain, enabled }
    }

    /// 是否启用
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 计算当前构型下的补偿角增量（度）
    ///
    /// 禁用时恒等于精确零向量（与输入无关）。
    pub fn compensate(&self, joints: &JointAngles) -> JointArray<Deg> {
        if !self.enabled {
            return JointArray::new([Deg::ZERO; JOINT_COUNT]);
        }

        let j = self.chain.jacobian(&joints.to_rad());
        let torque = j.transpose() * gravity_wrench();

        let delta = JointArray::new(std::array::from_fn(|i| {
            Deg(torque[i].to_degrees() * JOINT_GAINS[i])
        }));
        debug!(?delta, "gravity compensation");
        delta
    }
}
