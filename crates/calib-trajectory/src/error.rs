//! 轨迹数据层错误类型定义

use thiserror::Error;

/// 轨迹数据错误类型
#[derive(Error, Debug)]
pub enum TrajectoryError {
    /// 各通道长度不一致
    #[error("channel length mismatch: {channel} has {got} samples, expected {expected}")]
    LengthMismatch {
        /// 出错的通道名
        channel: &'static str,
        /// 实际长度
        got: usize,
        /// 期望长度
        expected: usize,
    },

    /// 样本数不足（仿真会丢弃最后 2 个样本，因此至少需要 2 个）
    #[error("trajectory too short: {got} samples, need at least {min}")]
    TooShort {
        /// 实际样本数
        got: usize,
        /// 最少样本数
        min: usize,
    },

    /// 采样频率非法（必须为正数）
    #[error("invalid sample frequency: {0} Hz")]
    InvalidSampleFreq(f64),

    /// 筛选后没有剩余样本（速度窗口过窄）
    #[error("velocity window ({min}, {max}) rad/s selected no samples")]
    EmptySelection {
        /// 窗口下界
        min: f64,
        /// 窗口上界
        max: f64,
    },
}
