//! 可序列化的标定结果文档
//!
//! 布局沿用历史结果 YAML 的 `results.friction.*` / `results.ripple.*`
//! 结构，便于旧工具链直接消费。统计键保留原有的大写 RMSE 后缀。

use serde::{Deserialize, Serialize};

/// 摩擦阶段使用的筛选/边界参数，随结果一起归档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionParams {
    pub min_gamma: f64,
    pub max_gamma: f64,
    pub min_const_vel: f64,
    pub max_const_vel: f64,
}

/// 非对称黏性摩擦结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViscousFrictionResult {
    pub gamma: f64,
    pub dv_plus: f64,
    pub dv_minus: f64,
}

/// 非对称库伦摩擦结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoulombFrictionResult {
    pub gamma: f64,
    pub dc_plus: f64,
    pub dc_minus: f64,
}

/// 拟合质量统计
///
/// 惯量与仿真统计只有对应阶段运行过才存在。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionStatistics {
    #[serde(rename = "friction_model_RMSE")]
    pub friction_model_rmse: f64,
    #[serde(rename = "friction_model_NRMSE")]
    pub friction_model_nrmse: f64,

    #[serde(rename = "inertia_model_RMSE", skip_serializing_if = "Option::is_none")]
    pub inertia_model_rmse: Option<f64>,
    #[serde(rename = "inertia_model_NRMSE", skip_serializing_if = "Option::is_none")]
    pub inertia_model_nrmse: Option<f64>,

    #[serde(rename = "position_model_RMSE", skip_serializing_if = "Option::is_none")]
    pub position_model_rmse: Option<f64>,
    #[serde(rename = "position_model_NRMSE", skip_serializing_if = "Option::is_none")]
    pub position_model_nrmse: Option<f64>,
    #[serde(rename = "velocity_model_RMSE", skip_serializing_if = "Option::is_none")]
    pub velocity_model_rmse: Option<f64>,
    #[serde(rename = "velocity_model_NRMSE", skip_serializing_if = "Option::is_none")]
    pub velocity_model_nrmse: Option<f64>,
}

/// 摩擦/惯量辨识结果（`results.friction.*`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrictionResults {
    pub params: FrictionParams,
    pub viscous_friction: ViscousFrictionResult,
    pub coulomb_friction: CoulombFrictionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motor_inertia: Option<f64>,
    pub statistics: FrictionStatistics,
}

/// 单个纹波谐波
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RippleHarmonicResult {
    /// 幅值（Nm）
    pub a: f64,
    /// 角频率（rad，相对一圈机械位置）
    pub w: f64,
    /// 相位（rad）
    pub p: f64,
}

/// 纹波辨识结果（`results.ripple.*`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RippleResults {
    /// 选中的候选模型的正弦个数
    pub num_of_sinusoids: usize,
    /// 常数偏置（Nm），摩擦流水线用它去除负载力矩偏置
    pub c: f64,
    pub harmonics: Vec<RippleHarmonicResult>,
    /// 选中模型在位置档中值上的 RMSE（Nm）
    #[serde(rename = "RMSE")]
    pub rmse: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_keys_keep_legacy_case() {
        let stats = FrictionStatistics {
            friction_model_rmse: 0.01,
            friction_model_nrmse: 0.05,
            inertia_model_rmse: Some(0.02),
            inertia_model_nrmse: Some(0.06),
            position_model_rmse: None,
            position_model_nrmse: None,
            velocity_model_rmse: None,
            velocity_model_nrmse: None,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("friction_model_RMSE").is_some());
        assert!(json.get("inertia_model_NRMSE").is_some());
        // 未运行的阶段不出现在文档里
        assert!(json.get("position_model_RMSE").is_none());
    }

    #[test]
    fn test_ripple_results_roundtrip() {
        let results = RippleResults {
            num_of_sinusoids: 2,
            c: 0.03,
            harmonics: vec![
                RippleHarmonicResult { a: 0.1, w: 1.0, p: 0.2 },
                RippleHarmonicResult { a: 0.05, w: 2.0, p: -0.4 },
            ],
            rmse: 0.004,
        };

        let json = serde_json::to_string(&results).unwrap();
        let back: RippleResults = serde_json::from_str(&json).unwrap();
        assert_eq!(results, back);
    }
}
