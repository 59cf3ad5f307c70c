//! 标定配置
//!
//! 历史脚本把这些选项散落在 YAML 字段、函数默认参数和就地常量里，
//! 且不同拷贝之间默认值不一致。这里收敛成一个显式配置结构，
//! 字段缺省即采用统一后的默认值。

use crate::error::CalibError;

use calib_trajectory::MultisineTrjInfo;
use serde::{Deserialize, Serialize};

/// 线性求解策略选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobustStrategy {
    /// Huber 鲁棒回归：力矩日志在换向瞬间常有离群点，作为默认
    #[default]
    Huber,
    /// SVD 伪逆普通最小二乘
    LsqPseudoinv,
}

/// 平滑常数 gamma 的搜索区间
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for GammaBounds {
    fn default() -> Self {
        Self {
            min: 1000.0,
            max: f64::INFINITY,
        }
    }
}

/// 恒速段筛选的速度窗口（rad/s）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityWindow {
    pub min: f64,
    pub max: f64,
}

impl Default for VelocityWindow {
    fn default() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }
}

/// 标定流水线配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibConfig {
    /// 减速比
    pub gear_ratio: f64,
    /// 力矩常数（Nm/A），电流通道乘以 `k_tau * gear_ratio` 得电机力矩
    pub k_tau: f64,
    /// 非线性细化阶段 gamma 的边界
    pub gamma_bounds: GammaBounds,
    /// 线性阶段固定的 gamma 初值
    pub init_gamma: f64,
    /// 是否做非线性细化（释放 gamma）
    pub refine_gamma: bool,
    /// 恒速段筛选窗口
    pub velocity_window: VelocityWindow,
    /// 纹波拟合的最大谐波数（1..=3）
    pub harmonics_count: usize,
    /// 纹波聚类容差（rad）：起点相距 `2 * trj_error` 内的往返
    /// 归入同一位置档
    pub trj_error: f64,
    /// 摩擦/惯量阶段的线性求解策略
    pub robust_strategy: RobustStrategy,
    /// 多正弦激励基频（Hz）
    pub freq0: f64,
    /// 多正弦激励的正弦个数
    pub num_of_sinusoids: usize,
    /// 激励前后的过渡时间（秒）
    pub trans_time: f64,
    /// 惯量拟合后是否做正向仿真验证
    pub run_simulation: bool,
}

impl Default for CalibConfig {
    fn default() -> Self {
        Self {
            gear_ratio: 1.0,
            k_tau: 1.0,
            gamma_bounds: GammaBounds::default(),
            init_gamma: 1000.0,
            refine_gamma: true,
            velocity_window: VelocityWindow::default(),
            harmonics_count: 3,
            trj_error: 0.01,
            robust_strategy: RobustStrategy::default(),
            freq0: 0.1,
            num_of_sinusoids: 5,
            trans_time: 5.0,
            run_simulation: true,
        }
    }
}

impl CalibConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(s: &str) -> Result<Self, CalibError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验字段取值
    pub fn validate(&self) -> Result<(), CalibError> {
        if !(self.gear_ratio > 0.0) {
            return Err(CalibError::InvalidConfig(format!(
                "gear_ratio must be positive, got {}",
                self.gear_ratio
            )));
        }
        if !(self.k_tau > 0.0) {
            return Err(CalibError::InvalidConfig(format!(
                "k_tau must be positive, got {}",
                self.k_tau
            )));
        }
        if !(self.init_gamma > 0.0) {
            return Err(CalibError::InvalidConfig(format!(
                "init_gamma must be positive, got {}",
                self.init_gamma
            )));
        }
        if self.gamma_bounds.min > self.gamma_bounds.max {
            return Err(CalibError::InvalidConfig(format!(
                "gamma_bounds min {} exceeds max {}",
                self.gamma_bounds.min, self.gamma_bounds.max
            )));
        }
        if self.velocity_window.min > self.velocity_window.max {
            return Err(CalibError::InvalidConfig(format!(
                "velocity_window min {} exceeds max {}",
                self.velocity_window.min, self.velocity_window.max
            )));
        }
        if !(self.trj_error > 0.0) {
            return Err(CalibError::InvalidConfig(format!(
                "trj_error must be positive, got {}",
                self.trj_error
            )));
        }
        // 谐波数上限由模型层复核，这里先挡掉 0
        if self.harmonics_count == 0 {
            return Err(CalibError::InvalidConfig(
                "harmonics_count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// 多正弦激励元信息（`samp_freq` 来自实测轨迹）
    pub fn multisine_info(&self, samp_freq: f64) -> MultisineTrjInfo {
        MultisineTrjInfo {
            freq0: self.freq0,
            num_of_sinusoids: self.num_of_sinusoids,
            samp_freq,
            trans_time: self.trans_time,
        }
    }
}
