//! # Calib Regression - 参数估计层
//!
//! 把一组 [`ModelTerm`](calib_model::ModelTerm) 组装成回归问题，
//! 对采样轨迹数据求解：
//!
//! - [`LinearRegression`] - 由线性项构建设计矩阵，按可选策略求解
//!   `X·β ≈ lhs`（普通最小二乘 / Huber 鲁棒回归 / 有界最小二乘）
//! - [`NonLinearRegression`] - 有界 Levenberg-Marquardt，
//!   处理平滑常数 gamma、自由频率等非仿射参数
//! - [`estimate_init_freq`] - 力矩-位置信号的 FFT 主峰频率估计
//!
//! # 两阶段拟合
//!
//! 摩擦项对幅值线性、对 gamma 非线性。推荐流程：先用固定的默认
//! gamma 做线性求解（精确且快），再把已解出的线性模型作为固定基底
//! 推入非线性回归、释放 gamma 联合细化。线性解为非线性搜索提供
//! 良好初始化，避免对全参数冷启动。
//!
//! # 确定性
//!
//! 所有求解器是确定性的：同一实例、同一数据上重复 `solve()`
//! 得到逐位一致的参数字典。

pub mod design;
pub mod error;
pub mod freq;
pub mod linear;
pub mod nonlinear;
pub mod strategy;

pub use error::RegressionError;
pub use freq::estimate_init_freq;
pub use linear::LinearRegression;
pub use nonlinear::{NonLinearRegression, SolverSettings};
pub use strategy::{
    LinearStrategy, bounded_lsq_strategy, huber_regr_strategy, lsq_pseudoinv_strategy,
};
