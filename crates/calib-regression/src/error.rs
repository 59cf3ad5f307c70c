//! 回归层错误类型定义
//!
//! 传播策略：所有错误上抛给直接调用方，不做内部吞错或默认值
//! 静默替换。求解失败后调用方可以选择丢弃某个项重试，
//! 但核心不自动重试。

use calib_model::{ModelError, ParamDict};
use thiserror::Error;

/// 回归错误类型
#[derive(Error, Debug)]
pub enum RegressionError {
    /// 通道 / 目标样本数不一致
    #[error("sample count mismatch: {channel} has {got} samples, expected {expected}")]
    SampleCountMismatch {
        /// 通道名
        channel: &'static str,
        /// 实际样本数
        got: usize,
        /// 期望样本数
        expected: usize,
    },

    /// 求解前置数据缺失（未调用 set_pos_vel_acc / set_lhs）
    #[error("regression data not set: {0}")]
    DataNotSet(&'static str),

    /// 没有待拟合的模型项
    #[error("no model terms added to the regression")]
    NoModel,

    /// 非线性项被加入线性回归
    #[error("term is not linear in its coefficients (free gamma or free frequency); \
             use NonLinearRegression instead")]
    NonLinearTerm,

    /// 设计矩阵秩亏（独立列数少于待解系数）
    #[error("rank-deficient design matrix: rank {rank} < {cols} coefficients")]
    RankDeficient {
        /// 数值秩
        rank: usize,
        /// 系数个数
        cols: usize,
    },

    /// 非线性求解器超出迭代预算仍未收敛
    ///
    /// 携带最后一次迭代的参数供诊断，绝不作为静默接受的输出。
    #[error("solver did not converge within {iterations} iterations (final cost {last_cost:.6e})")]
    Convergence {
        /// 已执行的迭代数
        iterations: usize,
        /// 最后一次迭代的代价
        last_cost: f64,
        /// 最后一次迭代的参数（诊断用）
        last_params: ParamDict,
    },

    /// 边界本身不一致（下界大于上界）
    #[error("inconsistent bounds: lower {lower} > upper {upper}")]
    InconsistentBounds {
        /// 下界
        lower: f64,
        /// 上界
        upper: f64,
    },

    /// 参数初值越界
    #[error("bounds violation for {param}: value {value} outside [{lower}, {upper}]")]
    BoundsViolation {
        /// 参数名
        param: String,
        /// 当前值
        value: f64,
        /// 下界
        lower: f64,
        /// 上界
        upper: f64,
    },

    /// 查询尚未求解的回归结果
    #[error("regression has not been solved yet")]
    NotSolved,

    /// 模型配置错误（重名参数、非法谐波个数）
    #[error(transparent)]
    Model(#[from] ModelError),
}
