//! Trajectory Sample - 归一化采样数据集
//!
//! 每一次回归求解和 ODE 仿真消费的标准数据结构。由外部协作者
//! （日志解析层）构造一次，之后不可变；纹波/偏置移除等变换返回
//! 新的派生副本，不修改原数据。

use crate::error::TrajectoryError;

/// 仿真丢弃的尾部样本数（加速度差分的边界伪影）
pub const EDGE_SAMPLES: usize = 2;

/// 归一化的时间索引数据集
///
/// 所有通道等长；`acc` 可以在构造后由 `vel` 的中心差分派生。
///
/// # 单位
///
/// - `pos`: rad
/// - `vel`: rad/s
/// - `acc`: rad/s²
/// - `torque_load` / `torque_motor`: Nm
/// - `samp_freq`: Hz
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySample {
    /// 时间戳（秒，从 0 开始）
    pub time: Vec<f64>,

    /// 电机位置（rad）
    pub pos: Vec<f64>,

    /// 电机速度（rad/s）
    pub vel: Vec<f64>,

    /// 电机加速度（rad/s²）
    pub acc: Vec<f64>,

    /// 负载端力矩（Nm，来自 loadcell / 辅助传感器）
    pub torque_load: Vec<f64>,

    /// 电机端力矩（Nm，电流 × 力矩常数 × 减速比）
    pub torque_motor: Vec<f64>,

    /// 采样频率（Hz）
    pub samp_freq: f64,
}

impl TrajectorySample {
    /// 构造并校验数据集
    ///
    /// # 错误
    ///
    /// - 通道长度不一致 → [`TrajectoryError::LengthMismatch`]
    /// - 样本数 < 2 → [`TrajectoryError::TooShort`]
    /// - 采样频率非正 → [`TrajectoryError::InvalidSampleFreq`]
    pub fn new(
        time: Vec<f64>,
        pos: Vec<f64>,
        vel: Vec<f64>,
        acc: Vec<f64>,
        torque_load: Vec<f64>,
        torque_motor: Vec<f64>,
        samp_freq: f64,
    ) -> Result<Self, TrajectoryError> {
        if !(samp_freq.is_finite() && samp_freq > 0.0) {
            return Err(TrajectoryError::InvalidSampleFreq(samp_freq));
        }

        let n = time.len();
        if n < EDGE_SAMPLES {
            return Err(TrajectoryError::TooShort {
                got: n,
                min: EDGE_SAMPLES,
            });
        }

        for (channel, len) in [
            ("pos", pos.len()),
            ("vel", vel.len()),
            ("acc", acc.len()),
            ("torque_load", torque_load.len()),
            ("torque_motor", torque_motor.len()),
        ] {
            if len != n {
                return Err(TrajectoryError::LengthMismatch {
                    channel,
                    got: len,
                    expected: n,
                });
            }
        }

        Ok(Self {
            time,
            pos,
            vel,
            acc,
            torque_load,
            torque_motor,
            samp_freq,
        })
    }

    /// 从原始电流通道构造（`aux` 为原始电流，单位 A）
    ///
    /// `torque_motor = aux * k_tau * gear_ratio`，加速度由速度中心差分派生。
    pub fn from_current_log(
        time: Vec<f64>,
        pos: Vec<f64>,
        vel: Vec<f64>,
        torque_load: Vec<f64>,
        aux_current: &[f64],
        k_tau: f64,
        gear_ratio: f64,
        samp_freq: f64,
    ) -> Result<Self, TrajectoryError> {
        let torque_motor = aux_current
            .iter()
            .map(|i| i * k_tau * gear_ratio)
            .collect::<Vec<_>>();
        let acc = finite_diff(&vel, samp_freq);

        Self::new(time, pos, vel, acc, torque_load, torque_motor, samp_freq)
    }

    /// 样本数
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// 由速度中心差分派生加速度，返回新副本
    ///
    /// 端点使用单侧差分，内部使用中心差分 `(v[i+1] - v[i-1]) / (2 dt)`。
    pub fn derive_acc(&self) -> Self {
        let mut out = self.clone();
        out.acc = finite_diff(&self.vel, self.samp_freq);
        out
    }

    /// 选取速度落在 `(min_vel, max_vel)` 区间内的样本，返回新副本
    ///
    /// 用于从恒速段日志中隔离摩擦（加速度 ≈ 0）。
    ///
    /// # 错误
    ///
    /// 窗口内没有样本 → [`TrajectoryError::EmptySelection`]
    pub fn select_velocity_window(
        &self,
        min_vel: f64,
        max_vel: f64,
    ) -> Result<Self, TrajectoryError> {
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.vel[i] >= min_vel && self.vel[i] <= max_vel)
            .collect();

        if keep.len() < EDGE_SAMPLES {
            return Err(TrajectoryError::EmptySelection {
                min: min_vel,
                max: max_vel,
            });
        }

        tracing::debug!(
            kept = keep.len(),
            total = self.len(),
            "velocity window selection"
        );

        let pick = |v: &[f64]| keep.iter().map(|&i| v[i]).collect::<Vec<_>>();
        Self::new(
            pick(&self.time),
            pick(&self.pos),
            pick(&self.vel),
            pick(&self.acc),
            pick(&self.torque_load),
            pick(&self.torque_motor),
            self.samp_freq,
        )
    }

    /// 从负载力矩中减去常数偏置 `c`，返回新副本
    ///
    /// `c` 通常来自纹波标定的偏置项 `results.ripple.c`。
    pub fn remove_torque_offset(&self, c: f64) -> Self {
        let mut out = self.clone();
        for t in &mut out.torque_load {
            *t -= c;
        }
        out
    }

    /// 用位置-力矩函数移除纹波贡献，返回新副本
    ///
    /// `ripple(pos)` 是纹波模型对位置的预测（含常数偏置时由调用方决定）。
    pub fn remove_ripple<F>(&self, ripple: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let mut out = self.clone();
        for (t, &p) in out.torque_load.iter_mut().zip(self.pos.iter()) {
            *t -= ripple(p);
        }
        out
    }

    /// 回归的左端项：`tau_m - tau_l`（逐样本）
    pub fn friction_lhs(&self) -> Vec<f64> {
        self.torque_motor
            .iter()
            .zip(self.torque_load.iter())
            .map(|(m, l)| m - l)
            .collect()
    }
}

/// 中心差分（端点单侧）
fn finite_diff(v: &[f64], samp_freq: f64) -> Vec<f64> {
    let n = v.len();
    let dt = 1.0 / samp_freq;
    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = Vec::with_capacity(n);
    out.push((v[1] - v[0]) / dt);
    for i in 1..n - 1 {
        out.push((v[i + 1] - v[i - 1]) / (2.0 * dt));
    }
    out.push((v[n - 1] - v[n - 2]) / dt);
    out
}
