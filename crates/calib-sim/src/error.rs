//! 仿真层错误类型

use thiserror::Error;

/// 仿真错误
///
/// 前四个变体是调用契约错误：`solve_ode` 之前必须完成全部设置。
#[derive(Debug, Error)]
pub enum SimulationError {
    /// 未设置模型
    #[error("model not set: call set_model before solve_ode")]
    ModelNotSet,

    /// 未设置电机力矩序列
    #[error("motor torque not set: call set_motor_torque before solve_ode")]
    TorqueNotSet,

    /// 未设置初始条件
    #[error("initial conditions not set: call set_init_conditions before solve_ode")]
    InitConditionsNotSet,

    /// 未设置时间区间
    #[error("time interval not set: call set_time_interval before solve_ode")]
    TimeIntervalNotSet,

    /// 模型缺少正的惯量参数，二阶动力学无法成立
    #[error("model has no positive motor_inertia parameter (got {0:?})")]
    MissingInertia(Option<f64>),

    /// 力矩序列太短，裁掉边界样本后为空
    #[error("torque series too short: {got} samples, need at least {min}")]
    TooShort { got: usize, min: usize },
}
