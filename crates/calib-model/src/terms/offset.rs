//! 常数力矩偏置项（平凡线性项）

use crate::param::ParamDict;

/// 常数力矩偏置 `predict = c`
#[derive(Debug, Clone, PartialEq)]
pub struct TauOffset {
    /// 偏置（Nm）
    pub c: f64,
}

impl TauOffset {
    /// 偏置初值 0
    pub fn new() -> Self {
        Self { c: 0.0 }
    }

    /// 给定偏置值
    pub fn with_value(c: f64) -> Self {
        Self { c }
    }

    /// 该项的力矩贡献（与 pos/vel/acc/t 无关）
    pub fn predict(&self) -> f64 {
        self.c
    }

    pub(crate) fn param_dict(&self) -> ParamDict {
        vec![("tau_offset".to_string(), self.c)]
    }
}

impl Default for TauOffset {
    fn default() -> Self {
        Self::new()
    }
}
