//! 物体索引修复
//!
//! 分割结果的数字标注挨得很近时，视觉模型会把两个相邻的个位数
//! 标签误读成一个两位数。当物体总数在两位数以内时，对不存在的
//! 索引取个位数即可还原本意。
//!
//! 这是启发式修复，不是正确性保证。没有新的误识别证据之前
//! 不要加强它。

/// 修复越界的检测索引
///
/// - `index < detection_count`：原样返回
/// - `detection_count <= index < 100`：返回 `index % 10`
/// - `index >= 100`：原样返回，留给下游查找时报错
pub fn correct_object_index(index: usize, detection_count: usize) -> usize {
    if index >= detection_count && index < 100 {
        index % 10
    } else {
        index
    }
}
