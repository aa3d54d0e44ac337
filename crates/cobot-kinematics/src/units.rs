//! 强类型角度单位
//!
//! 使用 NewType 模式防止度和弧度混用。设备线上单位是度，
//! 运动学内部计算用弧度，边界上的转换必须显式。
//!
//! # 示例
//!
//! ```rust
//! use cobot_kinematics::{Deg, Rad};
//!
//! let sag = Deg(-130.0);
//! let rad = sag.to_rad();
//! assert!((rad.to_deg().0 - sag.0).abs() < 1e-9);
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 度（NewType）
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Deg(pub f64);

impl Deg {
    /// 零度常量
    pub const ZERO: Self = Deg(0.0);

    /// 转换为弧度
    #[inline]
    pub fn to_rad(self) -> Rad {
        Rad(self.0.to_radians())
    }

    /// 获取原始值
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// 取绝对值
    #[inline]
    pub fn abs(self) -> Self {
        Deg(self.0.abs())
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

impl Add for Deg {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Deg(self.0 + rhs.0)
    }
}

impl AddAssign for Deg {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Deg {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Deg(self.0 - rhs.0)
    }
}

impl Mul<f64> for Deg {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Deg(self.0 * rhs)
    }
}

impl Neg for Deg {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Deg(-self.0)
    }
}

/// 弧度（NewType）
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Rad(pub f64);

impl Rad {
    /// 零弧度常量
    pub const ZERO: Self = Rad(0.0);

    /// 转换为度
    #[inline]
    pub fn to_deg(self) -> Deg {
        Deg(self.0.to_degrees())
    }

    /// 获取原始值
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// 取绝对值
    #[inline]
    pub fn abs(self) -> Self {
        Rad(self.0.abs())
    }
}

impl fmt::Display for Rad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

impl Add for Rad {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Rad(self.0 + rhs.0)
    }
}

impl AddAssign for Rad {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Rad {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Rad(self.0 - rhs.0)
    }
}

impl Mul<f64> for Rad {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Rad(self.0 * rhs)
    }
}

impl Neg for Rad {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Rad(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deg_rad_roundtrip() {
        let deg = Deg(-130.0);
        assert!((deg.to_rad().to_deg().0 - deg.0).abs() < 1e-12);

        let rad = Rad(std::f64::consts::PI);
        assert!((rad.to_deg().0 - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_deg_arithmetic() {
        assert_eq!(Deg(20.0) + Deg(-130.0), Deg(-110.0));
        assert_eq!(Deg(20.0) - Deg(5.0), Deg(15.0));
        assert_eq!(Deg(20.0) * 0.5, Deg(10.0));
        assert_eq!(-Deg(45.0), Deg(-45.0));
    }

    #[test]
    fn test_rad_arithmetic() {
        assert_eq!(Rad(1.0) + Rad(2.0), Rad(3.0));
        assert_eq!(Rad(2.0) - Rad(0.5), Rad(1.5));

        let mut r = Rad(1.0);
        r += Rad(0.5);
        assert_eq!(r, Rad(1.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Deg(90.0)), "90.00°");
        assert_eq!(format!("{}", Rad(std::f64::consts::FRAC_PI_2)), "1.5708 rad");
    }
}
