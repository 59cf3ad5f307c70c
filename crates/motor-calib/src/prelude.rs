//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use motor_calib::prelude::*;
//! ```

pub use crate::config::{CalibConfig, GammaBounds, RobustStrategy, VelocityWindow};
pub use crate::error::CalibError;
pub use crate::friction::{FrictionOutcome, identify_friction};
pub use crate::results::{FrictionResults, RippleResults};
pub use crate::ripple::{RippleOutcome, RipplePass, identify_ripple};

// 下层常用类型
pub use calib_model::{CompositeModel, ModelTerm};
pub use calib_sim::Simulation;
pub use calib_trajectory::{MultisineTrjInfo, TrajectorySample};
