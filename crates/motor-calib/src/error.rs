//! 流水线错误汇聚
//!
//! 各层错误通过 `#[from]` 上浮，流水线自身只新增配置类错误。

use thiserror::Error;

/// 标定流水线错误
#[derive(Debug, Error)]
pub enum CalibError {
    /// 配置不合法
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// 配置文件解析失败
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 求解结果里缺少预期的参数名
    #[error("fitted parameter dictionary is missing {0}")]
    MissingParameter(String),

    /// 标定数据不足（筛选/聚类后样本过少）
    #[error("insufficient calibration data: {stage} kept {kept} samples, need {min}")]
    InsufficientData {
        stage: &'static str,
        kept: usize,
        min: usize,
    },

    /// 轨迹层错误
    #[error(transparent)]
    Trajectory(#[from] calib_trajectory::TrajectoryError),

    /// 模型层错误
    #[error(transparent)]
    Model(#[from] calib_model::ModelError),

    /// 回归层错误
    #[error(transparent)]
    Regression(#[from] calib_regression::RegressionError),

    /// 仿真层错误
    #[error(transparent)]
    Simulation(#[from] calib_sim::SimulationError),
}
