//! 模型项：对总力矩的单个物理贡献
//!
//! 封闭的变体集合，经 [`ModelTerm`] 统一分发。每个项满足：
//! `predict(pos, vel, acc, t)` 在参数给定时是纯函数。

mod friction;
mod inertia;
mod offset;
mod ripple;

pub use friction::{logistic, AsymmetricCoulombStribeckFriction, AsymmetricViscousFriction};
pub use inertia::MotorInertia;
pub use offset::TauOffset;
pub use ripple::TorqueRippleSinPhase;

use crate::param::{ParamDict, ParamSpec};
use smallvec::SmallVec;

/// 设计矩阵的一行中，单个项贡献的列（纹波项最多 2×3+1=7 列）
pub type BasisRow = SmallVec<[f64; 8]>;

/// 对总力矩的单个物理贡献项
///
/// 封闭枚举：新增项种类必须在此登记，所有消费端（回归、仿真）
/// 由编译器保证穷尽处理。
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTerm {
    /// 惯量项 `I · acc`
    MotorInertia(MotorInertia),
    /// 非对称黏性摩擦
    AsymmetricViscousFriction(AsymmetricViscousFriction),
    /// 非对称库伦-Stribeck 摩擦
    AsymmetricCoulombStribeckFriction(AsymmetricCoulombStribeckFriction),
    /// 位置周期性力矩纹波
    TorqueRippleSinPhase(TorqueRippleSinPhase),
    /// 常数力矩偏置
    TauOffset(TauOffset),
}

impl ModelTerm {
    /// 在单个采样点上预测该项的力矩贡献（Nm）
    pub fn predict(&self, pos: f64, vel: f64, acc: f64, t: f64) -> f64 {
        match self {
            Self::MotorInertia(term) => term.predict(acc),
            Self::AsymmetricViscousFriction(term) => term.predict(vel),
            Self::AsymmetricCoulombStribeckFriction(term) => term.predict(vel),
            Self::TorqueRippleSinPhase(term) => term.predict(pos),
            Self::TauOffset(term) => {
                let _ = (pos, vel, acc, t);
                term.predict()
            }
        }
    }

    /// 当前参数下，该项是否对系数线性（决定线性回归路径的资格）
    pub fn is_linear(&self) -> bool {
        match self {
            Self::MotorInertia(_) | Self::TauOffset(_) => true,
            Self::AsymmetricViscousFriction(term) => !term.fit_gamma,
            Self::AsymmetricCoulombStribeckFriction(term) => !term.fit_gamma,
            Self::TorqueRippleSinPhase(term) => !term.fit_w,
        }
    }

    /// 导出 `参数名 → 数值`（插入顺序固定）
    pub fn param_dict(&self) -> ParamDict {
        match self {
            Self::MotorInertia(term) => term.param_dict(),
            Self::AsymmetricViscousFriction(term) => term.param_dict(),
            Self::AsymmetricCoulombStribeckFriction(term) => term.param_dict(),
            Self::TorqueRippleSinPhase(term) => term.param_dict(),
            Self::TauOffset(term) => term.param_dict(),
        }
    }

    /// 线性路径下该项占据的设计矩阵列数（非线性项为 0）
    pub fn linear_coeff_count(&self) -> usize {
        match self {
            Self::MotorInertia(_) | Self::TauOffset(_) => 1,
            Self::AsymmetricViscousFriction(term) => {
                if term.fit_gamma { 0 } else { 2 }
            }
            Self::AsymmetricCoulombStribeckFriction(term) => {
                if term.fit_gamma { 0 } else { 2 }
            }
            Self::TorqueRippleSinPhase(term) => {
                if term.fit_w {
                    0
                } else {
                    2 * term.num_of_sin() + 1
                }
            }
        }
    }

    /// 线性路径下各列对应的系数名（与 [`Self::linear_coeff_count`] 等长）
    pub fn linear_coeff_names(&self) -> Vec<String> {
        match self {
            Self::MotorInertia(term) => vec![term.param_name().to_string()],
            Self::TauOffset(_) => vec!["tau_offset".to_string()],
            Self::AsymmetricViscousFriction(term) => {
                if term.fit_gamma {
                    Vec::new()
                } else {
                    vec!["dv_plus".to_string(), "dv_minus".to_string()]
                }
            }
            Self::AsymmetricCoulombStribeckFriction(term) => {
                if term.fit_gamma {
                    Vec::new()
                } else {
                    vec!["dc_plus".to_string(), "dc_minus".to_string()]
                }
            }
            Self::TorqueRippleSinPhase(term) => term.linear_coeff_names(),
        }
    }

    /// 在单个采样点上求该项的基函数列（线性路径）
    ///
    /// 第 j 列在样本 i 处的取值就是系数 j 的乘子，例如惯量项为 `acc`。
    pub fn linear_basis_row(&self, pos: f64, vel: f64, acc: f64) -> BasisRow {
        match self {
            Self::MotorInertia(_) => SmallVec::from_slice(&[acc]),
            Self::TauOffset(_) => SmallVec::from_slice(&[1.0]),
            Self::AsymmetricViscousFriction(term) => term.linear_basis_row(vel),
            Self::AsymmetricCoulombStribeckFriction(term) => term.linear_basis_row(vel),
            Self::TorqueRippleSinPhase(term) => term.linear_basis_row(pos),
        }
    }

    /// 把线性求解得到的系数写回该项（`beta` 长度 = 列数）
    pub fn apply_linear_coeffs(&mut self, beta: &[f64]) {
        debug_assert_eq!(beta.len(), self.linear_coeff_count());
        match self {
            Self::MotorInertia(term) => term.inertia = beta[0],
            Self::TauOffset(term) => term.c = beta[0],
            Self::AsymmetricViscousFriction(term) => {
                term.dv_plus = beta[0];
                term.dv_minus = beta[1];
            }
            Self::AsymmetricCoulombStribeckFriction(term) => {
                term.dc_plus = beta[0];
                term.dc_minus = beta[1];
            }
            Self::TorqueRippleSinPhase(term) => term.apply_linear_coeffs(beta),
        }
    }

    /// 非线性求解的自由参数描述符（顺序固定，与写回顺序一致）
    pub fn free_params(&self) -> Vec<ParamSpec> {
        match self {
            Self::MotorInertia(term) => {
                vec![ParamSpec::coefficient(term.param_name(), term.inertia)]
            }
            Self::TauOffset(term) => vec![ParamSpec::coefficient("tau_offset", term.c)],
            Self::AsymmetricViscousFriction(term) => term.free_params(),
            Self::AsymmetricCoulombStribeckFriction(term) => term.free_params(),
            Self::TorqueRippleSinPhase(term) => term.free_params(),
        }
    }

    /// 把非线性求解得到的自由参数写回该项
    pub fn apply_free_params(&mut self, values: &[f64]) {
        debug_assert_eq!(values.len(), self.free_params().len());
        match self {
            Self::MotorInertia(term) => term.inertia = values[0],
            Self::TauOffset(term) => term.c = values[0],
            Self::AsymmetricViscousFriction(term) => term.apply_free_params(values),
            Self::AsymmetricCoulombStribeckFriction(term) => term.apply_free_params(values),
            Self::TorqueRippleSinPhase(term) => term.apply_free_params(values),
        }
    }
}

impl From<MotorInertia> for ModelTerm {
    fn from(term: MotorInertia) -> Self {
        Self::MotorInertia(term)
    }
}

impl From<AsymmetricViscousFriction> for ModelTerm {
    fn from(term: AsymmetricViscousFriction) -> Self {
        Self::AsymmetricViscousFriction(term)
    }
}

impl From<AsymmetricCoulombStribeckFriction> for ModelTerm {
    fn from(term: AsymmetricCoulombStribeckFriction) -> Self {
        Self::AsymmetricCoulombStribeckFriction(term)
    }
}

impl From<TorqueRippleSinPhase> for ModelTerm {
    fn from(term: TorqueRippleSinPhase) -> Self {
        Self::TorqueRippleSinPhase(term)
    }
}

impl From<TauOffset> for ModelTerm {
    fn from(term: TauOffset) -> Self {
        Self::TauOffset(term)
    }
}
