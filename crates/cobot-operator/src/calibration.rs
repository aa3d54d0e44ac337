//! 像素尺寸标定
//!
//! 操作员在拍摄位姿的画面里点出直尺上相距 100 mm 的两个点，
//! 由像素距离反推拍摄高度下的像素尺寸（米/像素）。
//!
//! 交互是一个显式两态对象，由离散的点击事件驱动：
//! `AwaitingFirstPoint → AwaitingSecondPoint → Done`。轮询循环
//! 没有超时，只能由操作员手动中断。

use crate::OperatorError;
use nalgebra::Vector2;
use tracing::info;

/// 参考距离：直尺上两点相距 100 mm
const REFERENCE_DISTANCE_M: f64 = 0.1;

/// 标定状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    /// 等待第一个点
    AwaitingFirstPoint,

    /// 等待第二个点
    AwaitingSecondPoint,

    /// 完成，像素尺寸可读
    Done,
}

/// 两点标定会话
#[derive(Debug)]
pub struct CalibrationSession {
    first: Option<Vector2<f64>>,
    pixel_size_m: Option<f64>,
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self {
            first: None,
            pixel_size_m: None,
        }
    }

    /// 当前状态
    pub fn state(&self) -> CalibrationState {
        match (self.first, self.pixel_size_m) {
            (None, None) => CalibrationState::AwaitingFirstPoint,
            (Some(_), None) => CalibrationState::AwaitingSecondPoint,
            (_, Some(_)) => CalibrationState::Done,
        }
    }

    /// 喂入一个点击事件（像素坐标）
    ///
    /// 完成后拒绝更多的点；两点重合无法定标，报错并停留在
    /// 等待第二点状态。
    pub fn feed_point(&mut self, point: Vector2<f64>) -> Result<CalibrationState, OperatorError> {
        match (self.first, self.pixel_size_m) {
            (None, None) => {
                info!(x = point.x, y = point.y, "first calibration point");
                self.first = Some(point);
            },
            (Some(first), None) => {
                let distance_px = (point - first).norm();
                if distance_px == 0.0 {
                    return Err(OperatorError::Calibration(
                        "calibration points coincide".to_string(),
                    ));
                }
                let pixel_size = REFERENCE_DISTANCE_M / distance_px;
                info!(pixel_size, "calibration finished");
                self.pixel_size_m = Some(pixel_size);
            },
            (_, Some(_)) => {
                return Err(OperatorError::Calibration(
                    "calibration already complete".to_string(),
                ));
            },
        }
        Ok(self.state())
    }

    /// 标定结果（米/像素），完成前为 None
    pub fn pixel_size_m(&self) -> Option<f64> {
        self.pixel_size_m
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_points_hundred_pixels_apart() {
        let mut session = CalibrationSession::new();
        assert_eq!(session.state(), CalibrationState::AwaitingFirstPoint);

        let state = session.feed_point(Vector2::new(0.0, 0.0)).unwrap();
        assert_eq!(state, CalibrationState::AwaitingSecondPoint);

        let state = session.feed_point(Vector2::new(0.0, 100.0)).unwrap();
        assert_eq!(state, CalibrationState::Done);

        // 100 mm / 100 px = 1 mm/px
        assert!((session.pixel_size_m().unwrap() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal_distance() {
        let mut session = CalibrationSession::new();
        session.feed_point(Vector2::new(10.0, 10.0)).unwrap();
        session.feed_point(Vector2::new(40.0, 50.0)).unwrap();

        // 距离 50 px
        assert!((session.pixel_size_m().unwrap() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_third_point() {
        let mut session = CalibrationSession::new();
        session.feed_point(Vector2::new(0.0, 0.0)).unwrap();
        session.feed_point(Vector2::new(100.0, 0.0)).unwrap();

        let result = session.feed_point(Vector2::new(50.0, 50.0));
        assert!(matches!(result, Err(OperatorError::Calibration(_))));
        assert_eq!(session.state(), CalibrationState::Done);
    }

    #[test]
    fn test_rejects_coincident_points() {
        let mut session = CalibrationSession::new();
        session.feed_point(Vector2::new(5.0, 5.0)).unwrap();

        let result = session.feed_point(Vector2::new(5.0, 5.0));
        assert!(matches!(result, Err(OperatorError::Calibration(_))));

        // 仍然可以用一个不同的点完成
        assert_eq!(session.state(), CalibrationState::AwaitingSecondPoint);
        session.feed_point(Vector2::new(5.0, 105.0)).unwrap();
        assert_eq!(session.state(), CalibrationState::Done);
    }

    #[test]
    fn test_pixel_size_none_before_done() {
        let mut session = CalibrationSession::new();
        assert!(session.pixel_size_m().is_none());

        session.feed_point(Vector2::new(0.0, 0.0)).unwrap();
        assert!(session.pixel_size_m().is_none());
    }
}
