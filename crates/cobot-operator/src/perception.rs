//! 感知接口与检测换算
//!
//! 分割模型本身是外部协作者，这里只规定它的接口：输入一帧，
//! 输出按生成顺序编号的检测列表（像素坐标）。面积占比不在
//! (0.5%, 5%) 开区间内的检测一律滤掉——太小的是噪声，太大的
//! 是桌面或机身。
//!
//! 像素偏移经拍摄位姿下标定的像素尺寸换算成米，得到供运动层
//! 消费的 [`Detection`]。

use crate::frame::Frame;
use crate::OperatorError;
use cobot_client::Detection;
use nalgebra::Vector2;
use tracing::debug;

/// 面积占比下限（开区间）
pub const MIN_AREA_FRACTION: f64 = 0.005;

/// 面积占比上限（开区间）
pub const MAX_AREA_FRACTION: f64 = 0.05;

/// 像素空间的一个检测区域
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// 掩膜质心像素坐标 `(row, col)`
    pub center_px: Vector2<f64>,

    /// 占整幅画面的像素面积比例
    pub area_fraction: f64,
}

/// 相机接口（外部协作者）
pub trait Camera {
    /// 取一帧（阻塞）
    fn capture(&mut self) -> Result<Frame, OperatorError>;
}

/// 感知适配接口（外部协作者）
///
/// 实现方负责跑分割模型并调用 [`filter_by_area`] 过滤结果。
pub trait PerceptionAdapter {
    /// 对一帧求检测列表
    fn detect(&mut self, frame: &Frame) -> Result<Vec<RawDetection>, OperatorError>;
}

/// 按面积占比过滤检测
pub fn filter_by_area(detections: Vec<RawDetection>) -> Vec<RawDetection> {
    let before = detections.len();
    let kept: Vec<RawDetection> = detections
        .into_iter()
        .filter(|d| d.area_fraction > MIN_AREA_FRACTION && d.area_fraction < MAX_AREA_FRACTION)
        .collect();
    debug!(before, after = kept.len(), "area filter");
    kept
}

/// 像素检测换算为世界坐标检测
///
/// 索引按列表顺序重新分配（0 起），与标注图上的数字标签一致。
pub fn to_world_detections(
    raw: &[RawDetection],
    optical_center_px: Vector2<f64>,
    pixel_size_m: f64,
) -> Vec<Detection> {
    raw.iter()
        .enumerate()
        .map(|(index, d)| Detection {
            index,
            center: (d.center_px - optical_center_px) * pixel_size_m,
            area_fraction: d.area_fraction,
        })
        .collect()
}
