//! Multisine Trajectory Info - 多正弦激励轨迹元信息
//!
//! 惯量/纹波联合辨识使用多正弦激励：多个频率的正弦叠加，
//! 同时激发惯量和纹波动态。本类型只描述激励参数，
//! 实际采样数据仍由 [`TrajectorySample`](crate::TrajectorySample) 承载。

use serde::{Deserialize, Serialize};

/// 多正弦激励轨迹的元信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultisineTrjInfo {
    /// 基频（Hz），各正弦频率为 `freq0` 的整数倍
    pub freq0: f64,

    /// 正弦个数
    pub num_of_sinusoids: usize,

    /// 采样频率（Hz）
    pub samp_freq: f64,

    /// 过渡时间（秒）：激励前后的加减速段，处理时丢弃
    pub trans_time: f64,
}

impl MultisineTrjInfo {
    /// 积分步长（秒），即 `1 / samp_freq`
    pub fn dt(&self) -> f64 {
        1.0 / self.samp_freq
    }

    /// 激励信号的周期（秒），由基频决定
    pub fn period(&self) -> f64 {
        1.0 / self.freq0
    }
}
