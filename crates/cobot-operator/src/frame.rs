//! 帧预处理
//!
//! 相机倒装在末端上，原始帧要旋转 180° 才是正视图。机身出现在
//! 画面下沿、末端出现在右沿，这两条都裁掉。光心坐标在裁剪之前
//! 记录（裁剪只去掉下/右侧，不移动光心）。
//!
//! 像素坐标约定：`(row, col)`，与检测中心的偏移量一致。

use crate::OperatorError;
use nalgebra::Vector2;

/// 每像素字节数（BGR8）
const BYTES_PER_PIXEL: usize = 3;

/// 一帧图像（BGR8，行优先）
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// 宽（列数）
    pub width: usize,

    /// 高（行数）
    pub height: usize,

    /// 像素数据，`width * height * 3` 字节
    pub data: Vec<u8>,
}

impl Frame {
    /// 创建帧（校验缓冲区长度）
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, OperatorError> {
        let expected = width * height * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(OperatorError::Capture(format!(
                "frame buffer size mismatch: expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// 旋转 180°
    pub fn rotate180(&self) -> Frame {
        let mut data = Vec::with_capacity(self.data.len());
        for pixel in self.data.chunks_exact(BYTES_PER_PIXEL).rev() {
            data.extend_from_slice(pixel);
        }
        Frame {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// 裁剪到左上角 `new_width × new_height` 区域
    pub fn crop(&self, new_width: usize, new_height: usize) -> Frame {
        let new_width = new_width.min(self.width);
        let new_height = new_height.min(self.height);

        let mut data = Vec::with_capacity(new_width * new_height * BYTES_PER_PIXEL);
        for row in 0..new_height {
            let start = row * self.width * BYTES_PER_PIXEL;
            data.extend_from_slice(&self.data[start..start + new_width * BYTES_PER_PIXEL]);
        }
        Frame {
            width: new_width,
            height: new_height,
            data,
        }
    }

    /// 拍摄预处理：旋转 180°，记录光心，裁掉下四分之一和右八分之一
    ///
    /// 返回处理后的帧和光心像素坐标 `(row, col)`。
    pub fn preprocess(&self) -> (Frame, Vector2<f64>) {
        let rotated = self.rotate180();
        let optical_center = Vector2::new(rotated.height as f64 / 2.0, rotated.width as f64 / 2.0);

        let cropped = rotated.crop(
            rotated.width - rotated.width / 8,
            rotated.height - rotated.height / 4,
        );
        (cropped, optical_center)
    }
}
