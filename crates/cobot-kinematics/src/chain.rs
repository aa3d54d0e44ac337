//! 固定运动链
//!
//! 机械臂的 6 关节串联链：正运动学、几何雅可比和数值逆解。
//!
//! # 算法
//!
//! 正运动学按段累乘刚体变换：
//!
//! ```text
//! T = O₁·R(z,θ₁)·O₂·R(z,θ₂)·…·O₆·R(z,θ₆)·tip
//! ```
//!
//! 几何雅可比按旋转关节公式逐列构造：
//!
//! ```text
//! Jᵢ = [ zᵢ × (p_e − pᵢ) ; zᵢ ]
//! ```
//!
//! 逆解使用阻尼最小二乘（DLS）迭代：
//!
//! ```text
//! Δq = Jᵀ (J·Jᵀ + λ²I)⁻¹ · e
//! ```
//!
//! 以当前关节角为种子，收敛到离种子最近的解分支。这是有意的：
//! 保持运动连续，避免解分支跳变，代价是可能错过一个可达但较远的解。
//! 迭代预算内不收敛按不可达处理并上抛，不允许截断。

use crate::joint::{JOINT_COUNT, JointArray};
use crate::units::Rad;
use crate::KinematicsError;
use nalgebra::{Isometry3, Matrix6, Point3, Translation3, Unit, UnitQuaternion, Vector3, Vector6};
use std::f64::consts::FRAC_PI_2;
use tracing::trace;

/// DLS 迭代预算
const IK_MAX_ITERATIONS: usize = 500;

/// 位置收敛容差（米）
const IK_POS_TOLERANCE: f64 = 1e-5;

/// 姿态收敛容差（弧度）
const IK_ROT_TOLERANCE: f64 = 1e-4;

/// DLS 阻尼系数
///
/// 取小了在腕部奇异附近收敛慢的方向上更快，取大了步长更稳。
/// 这个值是在本机型工作空间内扫出来的折中。
const IK_DAMPING: f64 = 0.02;

/// 运动链的一段：固定安装变换 + 关节旋转轴
#[derive(Debug, Clone)]
pub struct Segment {
    /// 关节安装变换（父关节坐标系到本关节坐标系）
    pub origin: Isometry3<f64>,

    /// 关节旋转轴（本关节局部坐标系）
    pub axis: Unit<Vector3<f64>>,
}

impl Segment {
    /// 从 xyz 平移和 rpy 欧拉角构造，旋转轴为局部 z
    pub fn new(xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        Self {
            origin: Isometry3::from_parts(
                Translation3::new(xyz[0], xyz[1], xyz[2]),
                UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]),
            ),
            axis: Vector3::z_axis(),
        }
    }
}

/// 6 关节串联运动链
///
/// 链的几何常量来自本机型的 URDF。同一组关节段可以接不同的
/// 末端变换：吸盘法兰（运动目标）或相机光心（像素坐标换算）。
#[derive(Debug, Clone)]
pub struct Chain {
    segments: [Segment; JOINT_COUNT],
    tip: Isometry3<f64>,
}

/// 基座到各关节的安装段（机型常量）
fn arm_segments() -> [Segment; JOINT_COUNT] {
    [
        Segment::new([0.0, 0.0, 0.13156], [0.0, 0.0, 0.0]),
        Segment::new([0.0, 0.0, -0.001], [FRAC_PI_2, -FRAC_PI_2, 0.0]),
        Segment::new([-0.1104, 0.0, 0.0], [0.0, 0.0, 0.0]),
        Segment::new([-0.096, 0.0, 0.06062], [0.0, 0.0, -FRAC_PI_2]),
        Segment::new([0.0, -0.07318, 0.0], [FRAC_PI_2, -FRAC_PI_2, 0.0]),
        Segment::new([0.0, 0.0456, 0.0], [-FRAC_PI_2, 0.0, 0.0]),
    ]
}

impl Chain {
    /// 吸盘法兰链（运动控制的末端）
    pub fn pump_flange() -> Self {
        Self {
            segments: arm_segments(),
            tip: Isometry3::translation(0.0, 0.0, 0.034),
        }
    }

    /// 相机光心链
    ///
    /// 与法兰链共享全部关节段，仅末端变换不同。只在启动时
    /// 对拍摄位姿求值一次，得到的光心坐标作为常量复用。
    pub fn optical_center() -> Self {
        Self {
            segments: arm_segments(),
            tip: Isometry3::from_parts(
                Translation3::new(0.0, -0.032, 0.045),
                UnitQuaternion::identity(),
            ),
        }
    }

    /// 逐段累积：各关节的世界坐标原点、世界坐标旋转轴和末端位姿
    fn frames(
        &self,
        joints: &JointArray<Rad>,
    ) -> (
        [Point3<f64>; JOINT_COUNT],
        [Vector3<f64>; JOINT_COUNT],
        Isometry3<f64>,
    ) {
        let mut t = Isometry3::identity();
        let mut origins = [Point3::origin(); JOINT_COUNT];
        let mut axes = [Vector3::zeros(); JOINT_COUNT];

        for (i, seg) in self.segments.iter().enumerate() {
            t *= seg.origin;
            origins[i] = Point3::from(t.translation.vector);
            axes[i] = t.rotation * seg.axis.into_inner();
            t *= Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&seg.axis, joints[i].0),
            );
        }

        t *= self.tip;
        (origins, axes, t)
    }

    /// 正运动学：关节角 → 末端位姿
    pub fn forward(&self, joints: &JointArray<Rad>) -> Isometry3<f64> {
        self.frames(joints).2
    }

    /// 几何雅可比（6×6，上三行线速度，下三行角速度）
    pub fn jacobian(&self, joints: &JointArray<Rad>) -> Matrix6<f64> {
        let (origins, axes, end) = self.frames(joints);
        let p_e = end.translation.vector;

        let mut j = Matrix6::zeros();
        for i in 0..JOINT_COUNT {
            let z = axes[i];
            let linear = z.cross(&(p_e - origins[i].coords));
            j.fixed_view_mut::<3, 1>(0, i).copy_from(&linear);
            j.fixed_view_mut::<3, 1>(3, i).copy_from(&z);
        }
        j
    }

    /// 数值逆解：目标位姿 + 种子 → 关节角
    ///
    /// 局部求解，收敛到离种子最近的解分支。迭代预算内不收敛
    /// 返回 [`KinematicsError::Unreachable`]。
    pub fn inverse(
        &self,
        target: &Isometry3<f64>,
        seed: &JointArray<Rad>,
    ) -> Result<JointArray<Rad>, KinematicsError> {
        let mut q = *seed;
        let damping = Matrix6::identity() * (IK_DAMPING * IK_DAMPING);

        for iteration in 0..IK_MAX_ITERATIONS {
            let current = self.forward(&q);

            let pos_err = target.translation.vector - current.translation.vector;
            let rot_err = (target.rotation * current.rotation.inverse()).scaled_axis();

            if pos_err.norm() < IK_POS_TOLERANCE && rot_err.norm() < IK_ROT_TOLERANCE {
                trace!(iteration, "IK converged");
                return Ok(q);
            }

            let e = Vector6::new(
                pos_err.x, pos_err.y, pos_err.z, rot_err.x, rot_err.y, rot_err.z,
            );

            let j = self.jacobian(&q);
            let jjt = j * j.transpose() + damping;
            let inv = jjt
                .try_inverse()
                .ok_or(KinematicsError::SingularJacobian)?;
            let dq = j.transpose() * inv * e;

            for i in 0..JOINT_COUNT {
                q[i] += Rad(dq[i]);
            }
        }

        Err(KinematicsError::Unreachable {
            iterations: IK_MAX_ITERATIONS,
        })
    }
}
