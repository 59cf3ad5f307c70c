//! 惯量项：`predict = I · acc`

use crate::param::ParamDict;

/// 电机折算惯量项（对 `I` 线性）
#[derive(Debug, Clone, PartialEq)]
pub struct MotorInertia {
    /// 折算到电机侧的惯量（kg·m²）
    pub inertia: f64,
}

impl MotorInertia {
    /// 默认初值 0（线性求解不需要初值，非线性求解可用
    /// [`Self::with_initial_guess`] 提供先验）
    pub fn new() -> Self {
        Self { inertia: 0.0 }
    }

    /// 使用外部先验初值（例如 flash 中保存的上次标定值）
    pub fn with_initial_guess(inertia: f64) -> Self {
        Self { inertia }
    }

    /// 该项的力矩贡献
    pub fn predict(&self, acc: f64) -> f64 {
        self.inertia * acc
    }

    /// 导出参数名（结果文档键 `motor_inertia`）
    pub fn param_name(&self) -> &'static str {
        "motor_inertia"
    }

    pub(crate) fn param_dict(&self) -> ParamDict {
        vec![(self.param_name().to_string(), self.inertia)]
    }
}

impl Default for MotorInertia {
    fn default() -> Self {
        Self::new()
    }
}
