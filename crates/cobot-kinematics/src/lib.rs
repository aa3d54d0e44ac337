//! # Cobot Kinematics
//!
//! 机械臂运动学计算（正解/逆解/雅可比/重力补偿）
//!
//! ## 模块
//!
//! - `units`: 强类型角度单位（`Deg` / `Rad`）
//! - `joint`: 关节数组容器（`JointArray<T>`）
//! - `chain`: 固定运动链、正运动学、几何雅可比、数值逆解
//! - `gravity`: 开环重力下垂补偿
//!
//! ## 单位约定
//!
//! 设备线上和配置文件中的角度以**度**为单位（`Deg`），
//! 运动学内部计算以**弧度**为单位（`Rad`）。两者通过 NewType
//! 区分，在编译期防止混用。

pub mod chain;
pub mod gravity;
pub mod joint;
pub mod units;

// 重新导出常用类型
pub use chain::{Chain, Segment};
pub use gravity::GravityCompensator;
pub use joint::JointArray;
pub use units::{Deg, Rad};

use thiserror::Error;

/// 关节角度（度）
///
/// 设备的线上单位。由 `MotionController` 独占持有，
/// 每次成功移动后提交一次。
pub type JointAngles = JointArray<Deg>;

/// 运动学错误类型
#[derive(Error, Debug)]
pub enum KinematicsError {
    /// 逆解在迭代预算内未收敛
    ///
    /// 目标位姿不可达，或距当前解分支过远。调用方必须传播此错误，
    /// 不允许静默截断到最近可达点。
    #[error("Unreachable pose: IK did not converge within {iterations} iterations")]
    Unreachable { iterations: usize },

    /// 雅可比矩阵奇异，无法求解
    #[error("Singular Jacobian at current configuration")]
    SingularJacobian,
}
