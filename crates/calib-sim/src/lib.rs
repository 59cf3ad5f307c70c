//! # Calib Sim - 辨识模型的正向验证仿真
//!
//! 用前向欧拉积分把 [`CompositeModel`](calib_model::CompositeModel)
//! 和实测电机力矩推成仿真轨迹，和实测位置/速度对比可量化
//! 辨识质量（仿真 RMSE/NRMSE）。
//!
//! # 示例
//!
//! ```no_run
//! use calib_sim::Simulation;
//! # fn demo(model: calib_model::CompositeModel,
//! #         motor: calib_trajectory::TrajectorySample,
//! #         trj_info: calib_trajectory::MultisineTrjInfo)
//! #     -> Result<(), calib_sim::SimulationError> {
//! let mut sim = Simulation::new();
//! sim.set_init_conditions(&motor);
//! sim.set_time_interval(&trj_info);
//! sim.set_model(model);
//! sim.set_motor_torque(&motor);
//!
//! let (pos, vel) = sim.solve_ode()?;
//! # let _ = (pos, vel);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod simulation;

pub use error::SimulationError;
pub use simulation::Simulation;
