//! 参数描述符与参数字典
//!
//! 源于标定结果文档的约定：参数以 `名字 → 数值` 导出，
//! 插入顺序即项的声明顺序，名字在组合模型内全局唯一。

/// 有序参数字典（插入顺序 = 项声明顺序）
pub type ParamDict = Vec<(String, f64)>;

/// 在参数字典中按名字查找
pub fn lookup(dict: &ParamDict, name: &str) -> Option<f64> {
    dict.iter()
        .find(|(n, _)| n == name)
        .map(|&(_, v)| v)
}

/// 非线性求解的自由参数描述符
///
/// 构造时携带初值和每参数边界；`smoothing` 标记平滑常数类参数
/// （gamma），求解器可以用调用方提供的 gamma 边界收紧它们。
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// 参数名（全局唯一）
    pub name: String,

    /// 初值（来自项构造时的默认值或外部先验）
    pub value: f64,

    /// 下界（无界用 `f64::NEG_INFINITY`）
    pub lower: f64,

    /// 上界（无界用 `f64::INFINITY`）
    pub upper: f64,

    /// 是否为平滑常数类参数（gamma）
    pub smoothing: bool,
}

impl ParamSpec {
    /// 无界系数参数
    pub fn coefficient(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            smoothing: false,
        }
    }

    /// 带边界的参数
    pub fn bounded(name: impl Into<String>, value: f64, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            value,
            lower,
            upper,
            smoothing: false,
        }
    }

    /// 平滑常数参数（gamma），下界为 0
    pub fn smoothing(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            lower: 0.0,
            upper: f64::INFINITY,
            smoothing: true,
        }
    }

    /// 初值是否落在边界内
    pub fn in_bounds(&self) -> bool {
        self.lower <= self.value && self.value <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let dict: ParamDict = vec![("dv_plus".into(), 0.5), ("dv_minus".into(), 0.4)];
        assert_eq!(lookup(&dict, "dv_minus"), Some(0.4));
        assert_eq!(lookup(&dict, "gamma_v"), None);
    }

    #[test]
    fn test_param_spec_in_bounds() {
        let spec = ParamSpec::bounded("gamma_v", 1000.0, 1.0, 1e6);
        assert!(spec.in_bounds());

        let spec = ParamSpec::bounded("gamma_v", 0.5, 1.0, 1e6);
        assert!(!spec.in_bounds());
    }

    #[test]
    fn test_smoothing_flag() {
        assert!(ParamSpec::smoothing("gamma_c", 1000.0).smoothing);
        assert!(!ParamSpec::coefficient("dc_plus", 0.0).smoothing);
    }
}
