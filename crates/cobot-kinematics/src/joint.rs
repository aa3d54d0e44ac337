//! 关节数组容器
//!
//! 6 关节机械臂的定长数组，支持索引、迭代和逐元素映射。
//! 固定长度在编译期排除"少一个关节"一类的配置错误。

use crate::units::{Deg, Rad};
use std::ops::{Index, IndexMut};

/// 关节数量
pub const JOINT_COUNT: usize = 6;

/// 6 关节定长数组
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JointArray<T> {
    data: [T; JOINT_COUNT],
}

impl<T> JointArray<T> {
    /// 创建新的关节数组
    #[inline]
    pub const fn new(data: [T; JOINT_COUNT]) -> Self {
        JointArray { data }
    }

    /// 获取内部数组的引用
    #[inline]
    pub fn as_array(&self) -> &[T; JOINT_COUNT] {
        &self.data
    }

    /// 获取内部数组（消耗 self）
    #[inline]
    pub fn into_array(self) -> [T; JOINT_COUNT] {
        self.data
    }

    /// 迭代器
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// 逐元素映射
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> JointArray<U> {
        JointArray {
            data: std::array::from_fn(|i| f(&self.data[i])),
        }
    }

    /// 与另一个数组逐元素配对映射
    pub fn map_with<U, V, F: FnMut(&T, &U) -> V>(
        &self,
        other: &JointArray<U>,
        mut f: F,
    ) -> JointArray<V> {
        JointArray {
            data: std::array::from_fn(|i| f(&self.data[i], &other.data[i])),
        }
    }
}

impl<T> From<[T; JOINT_COUNT]> for JointArray<T> {
    fn from(data: [T; JOINT_COUNT]) -> Self {
        JointArray { data }
    }
}

impl<T> Index<usize> for JointArray<T> {
    type Output = T;
    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for JointArray<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<'a, T> IntoIterator for &'a JointArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl JointArray<Deg> {
    /// 全零角度
    pub fn zeros() -> Self {
        JointArray::new([Deg::ZERO; JOINT_COUNT])
    }

    /// 从裸 f64 数组构造（度）
    pub fn from_degrees(values: [f64; JOINT_COUNT]) -> Self {
        JointArray::new(values.map(Deg))
    }

    /// 转换为弧度数组
    pub fn to_rad(&self) -> JointArray<Rad> {
        self.map(|d| d.to_rad())
    }

    /// 转换为裸 f64 数组（度），用于协议编码
    pub fn to_degrees_array(&self) -> [f64; JOINT_COUNT] {
        self.data.map(|d| d.0)
    }

    /// 逐关节相加（重力补偿叠加用）
    pub fn add(&self, delta: &JointArray<Deg>) -> JointArray<Deg> {
        self.map_with(delta, |a, b| *a + *b)
    }
}

impl JointArray<Rad> {
    /// 转换为度数组
    pub fn to_deg(&self) -> JointArray<Deg> {
        self.map(|r| r.to_deg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_degrees_and_index() {
        let home = JointArray::from_degrees([0.0, 20.0, -130.0, 20.0, 0.0, 0.0]);
        assert_eq!(home[2], Deg(-130.0));
    }

    #[test]
    fn test_to_rad_roundtrip() {
        let angles = JointArray::from_degrees([0.0, 20.0, -130.0, 20.0, 0.0, -45.0]);
        let back = angles.to_rad().to_deg();

        for (a, b) in angles.iter().zip(back.iter()) {
            assert!((a.0 - b.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_add() {
        let base = JointArray::from_degrees([0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        let delta = JointArray::from_degrees([1.0, -1.0, 0.0, 0.5, 0.0, -0.5]);
        let sum = base.add(&delta);

        assert_eq!(sum[0], Deg(1.0));
        assert_eq!(sum[1], Deg(9.0));
        assert_eq!(sum[3], Deg(30.5));
    }

    #[test]
    fn test_map_with() {
        let a = JointArray::new([1.0; 6]);
        let b = JointArray::new([2.0; 6]);
        let sum = a.map_with(&b, |x, y| x + y);
        assert_eq!(sum, JointArray::new([3.0; 6]));
    }

    #[test]
    fn test_serde_transparent() {
        let angles = JointArray::from_degrees([0.0, 20.0, -130.0, 20.0, 0.0, 0.0]);
        let json = serde_json::to_string(&angles).unwrap();
        assert_eq!(json, "[0.0,20.0,-130.0,20.0,0.0,0.0]");
    }
}
