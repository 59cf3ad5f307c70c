//! Motor Calib - 齿轮电机摩擦/惯量/纹波辨识
//!
//! 对下层各 crate 的门面：输入已解析好的
//! [`TrajectorySample`](calib_trajectory::TrajectorySample)，
//! 输出可序列化的标定结果文档与已拟合模型。
//!
//! # 分层
//!
//! - **轨迹层** (`calib-trajectory`): 采样数据值类型与不可变变换
//! - **模型层** (`calib-model`): 力矩贡献项与组合模型
//! - **回归层** (`calib-regression`): 线性/非线性最小二乘
//! - **仿真层** (`calib-sim`): 前向欧拉验证仿真
//! - **本 crate**: 配置、流水线编排、结果文档
//!
//! # 快速开始
//!
//! ```rust
//! use motor_calib::prelude::*;
//! # fn demo(const_vel: calib_trajectory::TrajectorySample,
//! #         passes: Vec<motor_calib::RipplePass>)
//! #     -> Result<(), motor_calib::CalibError> {
//! let config = CalibConfig::default();
//!
//! // 先纹波，再用其偏置 c 做摩擦/惯量
//! let ripple = identify_ripple(&config, &passes)?;
//! let friction = identify_friction(&config, &const_vel, ripple.results.c, None)?;
//! # let _ = friction;
//! # Ok(())
//! # }
//! ```
//!
//! 日志/绘图/YAML 文件读写属于外围工具链，不在本 crate 范围内。

pub mod config;
pub mod error;
pub mod friction;
pub mod results;
pub mod ripple;

// Prelude 模块
pub mod prelude;

// --- 用户以此为界 ---

pub use config::{CalibConfig, GammaBounds, RobustStrategy, VelocityWindow};
pub use error::CalibError;
pub use friction::{FrictionOutcome, SimulatedTrajectory, identify_friction};
pub use results::{
    CoulombFrictionResult, FrictionParams, FrictionResults, FrictionStatistics,
    RippleHarmonicResult, RippleResults, ViscousFrictionResult,
};
pub use ripple::{RippleOutcome, RipplePass, identify_ripple};
