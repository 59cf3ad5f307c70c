//! # Calib Model - 可组合的电机力矩模型
//!
//! 把对总力矩的物理贡献项（惯量、非对称黏性/库伦摩擦、
//! 位置周期性纹波、常数偏置）建模为封闭的 [`ModelTerm`] 枚举，
//! 通过 [`CompositeModel`] 求和组合。
//!
//! # 设计
//!
//! - **封闭枚举而非 trait object**: 项的种类是封闭集合，
//!   用 `match` 分发可获得编译期穷尽性检查。
//! - **统一参数导出**: 每个项通过 [`ModelTerm::param_dict`] 导出
//!   `名字 → 数值`，组合模型合并导出并拒绝重名。
//! - **回归钩子**: 线性项暴露设计矩阵的基函数列；非线性项暴露
//!   带边界的自由参数描述符（[`ParamSpec`]）。
//!
//! # 线性 / 非线性
//!
//! 摩擦项在平滑常数 `gamma` 固定时对幅值参数是线性的；
//! 纹波项在谐波频率固定时经 sin/cos 分解后是线性的。
//! 释放 `gamma` 或频率则进入非线性最小二乘路径。

pub mod composite;
pub mod error;
pub mod param;
pub mod terms;

pub use composite::CompositeModel;
pub use error::ModelError;
pub use param::{ParamDict, ParamSpec};
pub use terms::{
    logistic, AsymmetricCoulombStribeckFriction, AsymmetricViscousFriction, ModelTerm,
    MotorInertia, TauOffset, TorqueRippleSinPhase,
};
