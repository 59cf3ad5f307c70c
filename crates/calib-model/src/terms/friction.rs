//! 非对称摩擦项
//!
//! 两个摩擦项共用同一套平滑结构：速度正负两侧各有独立幅值，
//! 零速附近用 logistic 函数 `sig(γv) = 1/(1+e^{-γv})` 过渡，
//! 保证项处处可微。γ 越大过渡越陡，γ → ∞ 收敛到符号切换。
//!
//! γ 固定时两项对幅值参数线性；释放 γ（`fit_gamma`）则需要
//! 非线性最小二乘。

use crate::error::ModelError;
use crate::param::{ParamDict, ParamSpec};

use super::BasisRow;
use smallvec::SmallVec;

/// 数值稳定的 logistic 函数
///
/// 避免 `exp` 在大参数下上溢：按符号选择等价形式。
pub fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// 非对称黏性摩擦项
///
/// `predict(v) = v · (dv_plus · sig(γv) + dv_minus · (1 − sig(γv)))`
///
/// 正速度侧斜率 `dv_plus`，负速度侧斜率 `dv_minus`。
#[derive(Debug, Clone, PartialEq)]
pub struct AsymmetricViscousFriction {
    /// 正速度侧黏性系数（Nm·s/rad）
    pub dv_plus: f64,
    /// 负速度侧黏性系数（Nm·s/rad）
    pub dv_minus: f64,
    /// 平滑常数
    pub gamma: f64,
    /// 是否把 gamma 作为自由参数参与非线性求解
    pub fit_gamma: bool,
}

impl AsymmetricViscousFriction {
    /// 创建黏性摩擦项，幅值初值 0
    ///
    /// # 错误
    ///
    /// gamma 非正 → [`ModelError::InvalidGamma`]
    pub fn new(gamma: f64) -> Result<Self, ModelError> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(ModelError::InvalidGamma(gamma));
        }
        Ok(Self {
            dv_plus: 0.0,
            dv_minus: 0.0,
            gamma,
            fit_gamma: false,
        })
    }

    /// 设置 gamma 是否自由
    pub fn with_fit_gamma(mut self, fit_gamma: bool) -> Self {
        self.fit_gamma = fit_gamma;
        self
    }

    /// 直接给定斜率（仿真 / 合成数据场景）
    pub fn with_slopes(mut self, dv_plus: f64, dv_minus: f64) -> Self {
        self.dv_plus = dv_plus;
        self.dv_minus = dv_minus;
        self
    }

    /// 该项的力矩贡献
    pub fn predict(&self, vel: f64) -> f64 {
        let s = logistic(self.gamma * vel);
        vel * (self.dv_plus * s + self.dv_minus * (1.0 - s))
    }

    pub(crate) fn linear_basis_row(&self, vel: f64) -> BasisRow {
        let s = logistic(self.gamma * vel);
        SmallVec::from_slice(&[vel * s, vel * (1.0 - s)])
    }

    pub(crate) fn param_dict(&self) -> ParamDict {
        vec![
            ("dv_plus".to_string(), self.dv_plus),
            ("dv_minus".to_string(), self.dv_minus),
            ("gamma_v".to_string(), self.gamma),
        ]
    }

    pub(crate) fn free_params(&self) -> Vec<ParamSpec> {
        let mut specs = vec![
            ParamSpec::coefficient("dv_plus", self.dv_plus),
            ParamSpec::coefficient("dv_minus", self.dv_minus),
        ];
        if self.fit_gamma {
            specs.push(ParamSpec::smoothing("gamma_v", self.gamma));
        }
        specs
    }

    pub(crate) fn apply_free_params(&mut self, values: &[f64]) {
        self.dv_plus = values[0];
        self.dv_minus = values[1];
        if self.fit_gamma {
            self.gamma = values[2];
        }
    }
}

/// 非对称库伦-Stribeck 摩擦项
///
/// `predict(v) = dc_plus · sig(γv) − dc_minus · (1 − sig(γv))`
///
/// 有界饱和项（不随速度成比例）：v → +∞ 时趋于 `dc_plus`，
/// v → −∞ 时趋于 `−dc_minus`，v = 0 时严格落在两渐近值之间。
#[derive(Debug, Clone, PartialEq)]
pub struct AsymmetricCoulombStribeckFriction {
    /// 正速度侧库伦摩擦幅值（Nm）
    pub dc_plus: f64,
    /// 负速度侧库伦摩擦幅值（Nm）
    pub dc_minus: f64,
    /// 平滑常数
    pub gamma: f64,
    /// 是否把 gamma 作为自由参数参与非线性求解
    pub fit_gamma: bool,
}

impl AsymmetricCoulombStribeckFriction {
    /// 创建库伦摩擦项，幅值初值 0
    ///
    /// # 错误
    ///
    /// gamma 非正 → [`ModelError::InvalidGamma`]
    pub fn new(gamma: f64) -> Result<Self, ModelError> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(ModelError::InvalidGamma(gamma));
        }
        Ok(Self {
            dc_plus: 0.0,
            dc_minus: 0.0,
            gamma,
            fit_gamma: false,
        })
    }

    /// 设置 gamma 是否自由
    pub fn with_fit_gamma(mut self, fit_gamma: bool) -> Self {
        self.fit_gamma = fit_gamma;
        self
    }

    /// 直接给定幅值（仿真 / 合成数据场景）
    pub fn with_magnitudes(mut self, dc_plus: f64, dc_minus: f64) -> Self {
        self.dc_plus = dc_plus;
        self.dc_minus = dc_minus;
        self
    }

    /// 该项的力矩贡献
    pub fn predict(&self, vel: f64) -> f64 {
        let s = logistic(self.gamma * vel);
        self.dc_plus * s - self.dc_minus * (1.0 - s)
    }

    pub(crate) fn linear_basis_row(&self, vel: f64) -> BasisRow {
        let s = logistic(self.gamma * vel);
        SmallVec::from_slice(&[s, -(1.0 - s)])
    }

    pub(crate) fn param_dict(&self) -> ParamDict {
        vec![
            ("dc_plus".to_string(), self.dc_plus),
            ("dc_minus".to_string(), self.dc_minus),
            ("gamma_c".to_string(), self.gamma),
        ]
    }

    pub(crate) fn free_params(&self) -> Vec<ParamSpec> {
        let mut specs = vec![
            ParamSpec::coefficient("dc_plus", self.dc_plus),
            ParamSpec::coefficient("dc_minus", self.dc_minus),
        ];
        if self.fit_gamma {
            specs.push(ParamSpec::smoothing("gamma_c", self.gamma));
        }
        specs
    }

    pub(crate) fn apply_free_params(&mut self, values: &[f64]) {
        self.dc_plus = values[0];
        self.dc_minus = values[1];
        if self.fit_gamma {
            self.gamma = values[2];
        }
    }
}
