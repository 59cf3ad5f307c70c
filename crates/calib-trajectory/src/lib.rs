//! # Calib Trajectory - 轨迹数据层
//!
//! 电机标定流程消费的时间序列数据类型：
//! - [`TrajectorySample`] - 归一化的采样数据集（pos/vel/acc/torque）
//! - [`MultisineTrjInfo`] - 多正弦激励轨迹的元信息
//! - 不可变数据变换（速度窗口筛选、纹波/偏置移除、有限差分加速度）
//! - RMSE / NRMSE 拟合质量统计
//!
//! # 依赖原则
//!
//! 本 crate 是叶子 crate：只做纯数据，不依赖回归层和仿真层。
//! 日志解析、YAML 读写属于外部协作者，不在本 crate 范围内。

pub mod error;
pub mod multisine;
pub mod sample;
pub mod stats;

pub use error::TrajectoryError;
pub use multisine::MultisineTrjInfo;
pub use sample::TrajectorySample;
pub use stats::{nrmse, rmse, std_dev};
